use actix_web::{get, web, HttpResponse};
use log::error;
use tokio::fs;

use crate::error::AppError;
use crate::server::AppState;
use crate::storage::image_store::RECENT_IMAGE_ID;

/// Configure image serving routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(recent_image).service(generated_image);
}

async fn serve_stored_image(state: &AppState, id: &str) -> Result<HttpResponse, AppError> {
    let (path, mime_type) = state.image_store.lookup(id).await?;
    let bytes = fs::read(&path).await.map_err(|e| {
        error!("Failed to read stored image {}: {}", path.display(), e);
        AppError::Storage(format!("Failed to serve image: {e}"))
    })?;
    Ok(HttpResponse::Ok().content_type(mime_type).body(bytes))
}

/// Serve the most recently generated image
#[get("/recent-image")]
pub async fn recent_image(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    serve_stored_image(state.get_ref(), RECENT_IMAGE_ID).await
}

/// Serve a generated image by id
#[get("/generated-image/{id}")]
pub async fn generated_image(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    serve_stored_image(state.get_ref(), &id).await
}
