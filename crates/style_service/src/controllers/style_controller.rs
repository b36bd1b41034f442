use actix_web::{post, web, HttpResponse};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use log::{error, info};

use crate::dto::{GenerateStyleResponse, ImageData};
use crate::error::AppError;
use crate::models::FashionItem;
use crate::server::AppState;
use crate::services::prompt_builder::{analyze_items, create_style_prompt};

/// Configure style generation routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(generate_style);
}

/// Pull a non-empty `selectedItems` array out of the request body. All
/// shape problems become 400s before any upstream call happens.
fn parse_selected_items(body: &serde_json::Value) -> Result<Vec<FashionItem>, AppError> {
    let raw = body
        .get("selectedItems")
        .ok_or_else(|| AppError::Validation("No selectedItems provided.".to_string()))?;

    let items: Vec<FashionItem> = serde_json::from_value(raw.clone()).map_err(|_| {
        AppError::Validation("selectedItems must be a non-empty array.".to_string())
    })?;

    if items.is_empty() {
        return Err(AppError::Validation(
            "selectedItems must be a non-empty array.".to_string(),
        ));
    }
    Ok(items)
}

#[post("/generate-style")]
pub async fn generate_style(
    body: web::Json<serde_json::Value>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let items = parse_selected_items(&body)?;
    info!("Received {} items for style generation.", items.len());

    let prompt = create_style_prompt(&items);
    info!("Generated prompt length: {} characters", prompt.len());

    let image = state
        .image_client
        .generate_image(&prompt)
        .await
        .map_err(|e| {
            error!(
                "Image generation failed: {} (prompt: {:.100}...)",
                e, prompt
            );
            AppError::from(e)
        })?;

    let stored = state.image_store.store(&image).await?;

    // Serve back exactly what landed on disk, not the pre-normalization bytes.
    let (stored_bytes, mime_type) = state.image_store.load(&stored.image_id).await?;
    let encoded = BASE64.encode(&stored_bytes);

    info!(
        "Successfully generated and stored image '{}' ({} bytes).",
        stored.filename,
        stored_bytes.len()
    );

    Ok(HttpResponse::Ok().json(GenerateStyleResponse {
        success: true,
        message: "Style generated successfully!".to_string(),
        generated_description: format!(
            "AI-generated outfit combining {} selected fashion items into a cohesive, stylish look.",
            items.len()
        ),
        style_analysis: analyze_items(&items),
        timestamp: Utc::now().to_rfc3339(),
        image_url: state.image_store.url_for(&stored.image_id),
        image_data: ImageData {
            base64: encoded,
            filename: stored.filename,
            image_id: stored.image_id,
            mime_type,
        },
    }))
}
