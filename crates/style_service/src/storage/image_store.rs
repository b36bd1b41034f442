//! File-backed persistence for generated images.
//!
//! Two persistence policies behind one type:
//! - [`PersistenceMode::SingleSlot`]: every success overwrites one fixed
//!   `recent.png`; the externally visible id is always the literal token
//!   `recent`. Concurrent generation requests race on the slot and the last
//!   write wins; callers needing stronger guarantees must serialize writes
//!   themselves.
//! - [`PersistenceMode::PerRequest`]: each success gets its own file under
//!   `generated_images/`, named by the request's uuid and never overwritten
//!   or cleaned up.
//!
//! Stored output is normalized to PNG. Bytes are fully decoded in memory
//! before anything touches disk, so a decode failure never leaves a partial
//! file behind.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use gemini_client::GeneratedImage;
use log::info;
use tokio::fs;

use crate::error::{AppError, Result};

pub const RECENT_IMAGE_ID: &str = "recent";
const RECENT_FILE: &str = "recent.png";
const GENERATED_DIR: &str = "generated_images";
const STORED_MIME: &str = "image/png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    SingleSlot,
    PerRequest,
}

impl PersistenceMode {
    pub fn parse(raw: &str) -> Option<PersistenceMode> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "single-slot" | "single_slot" => Some(PersistenceMode::SingleSlot),
            "per-request" | "per_request" => Some(PersistenceMode::PerRequest),
            _ => None,
        }
    }
}

/// Where a generated image ended up on disk.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub path: PathBuf,
    pub filename: String,
    pub image_id: String,
    pub mime_type: String,
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    base_dir: PathBuf,
    mode: PersistenceMode,
}

/// An id is servable only if it is plain alphanumerics and hyphens; anything
/// else (dots, separators, escapes) is rejected before touching the
/// filesystem.
pub fn is_safe_image_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Validate decoded bytes and normalize the stored layout to PNG. Bytes that
/// already are PNG are kept verbatim so the served payload round-trips
/// byte-identically with what the model produced.
fn normalize_to_png(data: &[u8], mime_type: &str) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(data)
        .map_err(|e| AppError::Storage(format!("could not decode generated image: {e}")))?;

    if mime_type == STORED_MIME {
        return Ok(data.to_vec());
    }

    let mut buffer = Cursor::new(Vec::new());
    decoded
        .write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| AppError::Storage(format!("could not re-encode image as PNG: {e}")))?;
    Ok(buffer.into_inner())
}

impl ImageStore {
    pub fn new(base_dir: impl AsRef<Path>, mode: PersistenceMode) -> Self {
        ImageStore {
            base_dir: base_dir.as_ref().to_path_buf(),
            mode,
        }
    }

    pub fn mode(&self) -> PersistenceMode {
        self.mode
    }

    /// Create the backing directories. Called once at startup.
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(self.base_dir.join(GENERATED_DIR)).await?;
        Ok(())
    }

    fn recent_path(&self) -> PathBuf {
        self.base_dir.join(RECENT_FILE)
    }

    fn generated_path(&self, id: &str) -> PathBuf {
        self.base_dir
            .join(GENERATED_DIR)
            .join(format!("style_{id}.png"))
    }

    /// Persist a generated image according to the configured policy.
    pub async fn store(&self, image: &GeneratedImage) -> Result<StoredImage> {
        let normalized = normalize_to_png(&image.data, &image.mime_type)?;

        let (path, filename, image_id) = match self.mode {
            PersistenceMode::SingleSlot => (
                self.recent_path(),
                RECENT_FILE.to_string(),
                RECENT_IMAGE_ID.to_string(),
            ),
            PersistenceMode::PerRequest => {
                let path = self.generated_path(&image.image_id);
                let filename = format!("style_{}.png", image.image_id);
                (path, filename, image.image_id.clone())
            }
        };

        fs::write(&path, &normalized).await?;
        info!("Stored {} byte image at {}", normalized.len(), path.display());

        Ok(StoredImage {
            path,
            filename,
            image_id,
            mime_type: STORED_MIME.to_string(),
        })
    }

    /// Resolve a safe id to its on-disk file, `NotFound` when absent.
    pub async fn lookup(&self, id: &str) -> Result<(PathBuf, String)> {
        if !is_safe_image_id(id) {
            return Err(AppError::Validation(
                "image id may only contain letters, digits and hyphens".to_string(),
            ));
        }

        let path = if id == RECENT_IMAGE_ID {
            self.recent_path()
        } else {
            self.generated_path(id)
        };

        match fs::try_exists(&path).await {
            Ok(true) => Ok((path, STORED_MIME.to_string())),
            _ => Err(AppError::NotFound("Image not found.".to_string())),
        }
    }

    /// Read a stored image back as `(bytes, mime_type)`.
    pub async fn load(&self, id: &str) -> Result<(Vec<u8>, String)> {
        let (path, mime_type) = self.lookup(id).await?;
        let bytes = fs::read(&path).await?;
        Ok((bytes, mime_type))
    }

    pub async fn recent_exists(&self) -> bool {
        fs::try_exists(self.recent_path()).await.unwrap_or(false)
    }

    /// URL path under which a stored image can be fetched later.
    pub fn url_for(&self, image_id: &str) -> String {
        match self.mode {
            PersistenceMode::SingleSlot => "/recent-image".to_string(),
            PersistenceMode::PerRequest => format!("/generated-image/{image_id}"),
        }
    }
}
