use async_trait::async_trait;

use crate::error::GeminiError;

/// A generated image as returned by the model client: decoded bytes, the
/// MIME type reported upstream, and a freshly generated unique id.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub image_id: String,
}

impl GeneratedImage {
    pub fn file_extension(&self) -> &'static str {
        crate::extract::extension_for_mime(&self.mime_type)
    }
}

#[async_trait]
pub trait ImageModelClient: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GeminiError>;
}
