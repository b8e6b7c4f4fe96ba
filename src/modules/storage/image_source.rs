//! Parsing of client-supplied image references
//!
//! The dashboard sends the image as either a base64 data URI (file picked in
//! the browser) or a remote `http(s)` URL. Both are resolved server-side and
//! re-uploaded, so only the canonical store URL is ever persisted.

use base64::prelude::*;

use crate::core::error::{AppError, Result};
use crate::shared::validation::DATA_URI_REGEX;

/// Allowed MIME types for uploaded images
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Maximum image size in bytes (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// A resolved image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Inline image bytes decoded from a data URI
    Inline { content_type: String, data: Vec<u8> },
    /// Image hosted elsewhere, fetched before upload
    Remote(String),
}

impl ImageSource {
    pub fn parse(source: &str) -> Result<Self> {
        let source = source.trim();

        if let Some(caps) = DATA_URI_REGEX.captures(source) {
            let content_type = caps[1].to_ascii_lowercase();
            let payload: String = caps[2].split_whitespace().collect();
            let data = BASE64_STANDARD
                .decode(payload.as_bytes())
                .map_err(|e| AppError::Storage(format!("Invalid base64 image payload: {}", e)))?;
            ensure_acceptable(&content_type, data.len())?;
            return Ok(Self::Inline { content_type, data });
        }

        if source.starts_with("https://") || source.starts_with("http://") {
            return Ok(Self::Remote(source.to_string()));
        }

        Err(AppError::Storage(format!(
            "Unsupported image reference: {}",
            source.chars().take(64).collect::<String>()
        )))
    }
}

/// Check content type and size limits for image bytes
pub fn ensure_acceptable(content_type: &str, size: usize) -> Result<()> {
    ensure_allowed_type(content_type)?;

    if size == 0 {
        return Err(AppError::Storage("Image is empty".to_string()));
    }

    ensure_within_limit(size)
}

pub fn ensure_allowed_type(content_type: &str) -> Result<()> {
    if ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Ok(());
    }
    Err(AppError::Storage(format!(
        "Image type '{}' is not allowed. Allowed types: {}",
        content_type,
        ALLOWED_IMAGE_TYPES.join(", ")
    )))
}

pub fn ensure_within_limit(size: usize) -> Result<()> {
    if size > MAX_IMAGE_SIZE {
        return Err(AppError::Storage(format!(
            "Image too large: {} bytes (max {} bytes)",
            size, MAX_IMAGE_SIZE
        )));
    }
    Ok(())
}

/// Get file extension from content type
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}
