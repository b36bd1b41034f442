pub mod client;
pub mod client_trait;
pub mod error;
pub mod extract;
pub mod protocol;

pub use client::{GeminiClient, GeminiConfig};
pub use client_trait::{GeneratedImage, ImageModelClient};
pub use error::GeminiError;
