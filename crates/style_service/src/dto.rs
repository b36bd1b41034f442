//! Response DTOs for the HTTP surface.
use serde::{Deserialize, Serialize};

/// Success body for `POST /generate-style`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GenerateStyleResponse {
    pub success: bool,
    pub message: String,
    pub generated_description: String,
    pub style_analysis: StyleAnalysis,
    pub timestamp: String,
    pub image_data: ImageData,
    pub image_url: String,
}

/// Aggregated summary of the input items, echoed back to the caller.
/// Distinct lists use set semantics; items with a missing field simply
/// do not contribute to that list.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StyleAnalysis {
    pub total_items: usize,
    pub categories: Vec<String>,
    pub dominant_colors: Vec<String>,
    pub style_themes: Vec<String>,
    pub items_used: Vec<String>,
}

/// The generated image embedded inline in the response
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImageData {
    pub base64: String,
    pub filename: String,
    pub image_id: String,
    pub mime_type: String,
}

/// Body for `GET /health`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
    pub api_configured: bool,
    pub model: String,
    pub recent_image_exists: bool,
}
