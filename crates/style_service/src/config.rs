//! Configuration management for the style backend
//!
//! Supports loading configuration from environment variables with fallback to defaults.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::storage::image_store::PersistenceMode;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-preview-image-generation";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub storage_mode: PersistenceMode,
    pub upstream_timeout: Duration,
}

/// Load AppConfig from environment variables
///
/// Environment variables:
/// - `GEMINI_API_KEY`: API credential (required, startup fails without it)
/// - `GEMINI_MODEL`: model name (default: gemini-2.0-flash-preview-image-generation)
/// - `APP_PORT`: HTTP listen port (default: 5000)
/// - `STYLE_DATA_DIR`: directory holding the recent-image slot and generated_images/ (default: .)
/// - `STYLE_STORAGE_MODE`: `single-slot` or `per-request` (default: single-slot)
/// - `GEMINI_TIMEOUT_SECS`: upstream call timeout in seconds (default: 60)
pub fn load_config() -> Result<AppConfig> {
    let api_key = match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.is_empty() => key,
        _ => bail!("{API_KEY_ENV} environment variable not set"),
    };

    let storage_mode = match std::env::var("STYLE_STORAGE_MODE") {
        Ok(raw) => match PersistenceMode::parse(&raw) {
            Some(mode) => mode,
            None => bail!("invalid STYLE_STORAGE_MODE '{raw}' (expected 'single-slot' or 'per-request')"),
        },
        Err(_) => PersistenceMode::SingleSlot,
    };

    Ok(AppConfig {
        api_key,
        model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        port: std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000),
        data_dir: std::env::var("STYLE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".")),
        storage_mode,
        upstream_timeout: Duration::from_secs(
            std::env::var("GEMINI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        ),
    })
}
