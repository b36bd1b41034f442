use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Gemini request failed: {0}")]
    Transport(String),

    #[error("Gemini request timed out")]
    Timeout,

    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("No image payload found in Gemini response")]
    NoImage,

    #[error("Invalid image payload from Gemini: {0}")]
    InvalidPayload(String),
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeminiError::Timeout
        } else {
            GeminiError::Transport(err.to_string())
        }
    }
}
