//! Image extraction over streamed response chunks.
//!
//! Chunks are flattened into a sequence of tagged [`ResponsePart`] values so
//! the extraction policy is a pure function, independent of the live stream.

use log::info;

use crate::protocol::{GenerateContentResponse, Part};

/// One content part in model-output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    Text(String),
    /// Inline binary payload; `data` is still base64 as received.
    Image { mime_type: String, data: String },
}

impl ResponsePart {
    fn from_part(part: Part) -> Option<ResponsePart> {
        if let Some(inline) = part.inline_data {
            return Some(ResponsePart::Image {
                mime_type: inline.mime_type,
                data: inline.data,
            });
        }
        part.text.map(ResponsePart::Text)
    }
}

/// Flatten one chunk into its parts, in candidate/part order.
pub fn flatten_chunk(chunk: GenerateContentResponse) -> Vec<ResponsePart> {
    chunk
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .filter_map(ResponsePart::from_part)
        .collect()
}

/// Scan parts in order and return the first non-empty inline image as
/// `(mime_type, base64_data)`. Text parts encountered before it are logged
/// and otherwise ignored.
pub fn find_image_part<I>(parts: I) -> Option<(String, String)>
where
    I: IntoIterator<Item = ResponsePart>,
{
    for part in parts {
        match part {
            ResponsePart::Image { mime_type, data } if !data.is_empty() => {
                return Some((mime_type, data));
            }
            ResponsePart::Image { .. } => {}
            ResponsePart::Text(text) => {
                info!("Model text output: {}", text.trim());
            }
        }
    }
    None
}

/// Best-effort file extension for a MIME type; unknown types fall back to
/// `.png` since the stored output is normalized to PNG anyway.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => ".png",
        "image/jpeg" => ".jpg",
        "image/webp" => ".webp",
        "image/gif" => ".gif",
        "image/bmp" => ".bmp",
        _ => ".png",
    }
}
