use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;

use crate::config::API_KEY_ENV;
use crate::dto::HealthResponse;
use crate::server::AppState;

/// Configure health check routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    // Credential presence is re-checked per call rather than cached at startup
    let api_configured = std::env::var(API_KEY_ENV)
        .map(|v| !v.is_empty())
        .unwrap_or(false);

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        message: "StyleAI backend is running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        api_configured,
        model: state.model.clone(),
        recent_image_exists: state.image_store.recent_exists().await,
    })
}
