use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use gemini_client::GeminiError;
use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Image API error: {0}")]
    Upstream(String),

    #[error("Failed to generate image with AI. Please try again.")]
    GenerationFailed,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    NotFound(String),
}

#[derive(Serialize)]
struct JsonError {
    success: bool,
    error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::GenerationFailed => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(JsonError {
            success: false,
            error: self.to_string(),
        })
    }
}

impl From<GeminiError> for AppError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::NoImage => AppError::GenerationFailed,
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
