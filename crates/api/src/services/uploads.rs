//! Multipart form handling and image storage.
//!
//! Admin create/update endpoints for products and bank accounts accept a
//! multipart form: text fields plus an optional image file. Images are
//! written under the configured upload directory and served back via the
//! `/uploads` static route.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::Multipart;
use chrono::Utc;
use rand::Rng;
use thiserror::Error;

/// Maximum accepted image size (5 MiB).
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image content types and the file extension each maps to.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", ".jpg"),
    ("image/jpg", ".jpg"),
    ("image/png", ".png"),
    ("image/webp", ".webp"),
    ("image/gif", ".gif"),
];

/// Upload errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// File is not one of the accepted image types.
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),

    /// File exceeds the size cap.
    #[error("image exceeds the 5 MiB limit")]
    TooLarge,

    /// Reading the multipart stream failed.
    #[error("multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    /// Writing the file to disk failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// An image written to disk.
#[derive(Debug, Clone)]
pub struct SavedImage {
    /// File name on disk (within the subdirectory).
    pub file_name: String,
    /// Public URL path the file is served at.
    pub public_url: String,
}

/// A parsed multipart form: text fields plus at most one saved image.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub image: Option<SavedImage>,
}

impl MultipartForm {
    /// Get a text field by name.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Drain a multipart stream into text fields and an optional image.
///
/// The image (any file part) is validated against the accepted content
/// types and size cap, then written to `<upload_dir>/<subdir>/` with a
/// `<prefix>-<millis>-<rand><ext>` name.
///
/// # Errors
///
/// Returns `UploadError` if the stream is malformed, the file is not an
/// accepted image type, it exceeds the size cap, or the write fails.
pub async fn collect(
    mut multipart: Multipart,
    upload_dir: &Path,
    subdir: &str,
    prefix: &str,
) -> Result<MultipartForm, UploadError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        if field.file_name().is_some() {
            let content_type = field.content_type().unwrap_or_default().to_string();
            let Some(ext) = extension_for(&content_type) else {
                return Err(UploadError::UnsupportedType(content_type));
            };

            let data = field.bytes().await?;
            if data.len() > MAX_IMAGE_BYTES {
                return Err(UploadError::TooLarge);
            }

            let file_name = unique_file_name(prefix, ext);
            let dir = upload_dir.join(subdir);
            tokio::fs::create_dir_all(&dir).await?;
            tokio::fs::write(dir.join(&file_name), &data).await?;

            form.image = Some(SavedImage {
                public_url: format!("/uploads/{subdir}/{file_name}"),
                file_name,
            });
        } else {
            let value = field.text().await?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

/// Look up the file extension for an accepted image content type.
fn extension_for(content_type: &str) -> Option<&'static str> {
    IMAGE_TYPES
        .iter()
        .find(|(ty, _)| *ty == content_type)
        .map(|(_, ext)| *ext)
}

/// Timestamped, randomised file name. Never trusts the client's name.
fn unique_file_name(prefix: &str, ext: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let rand: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("{prefix}-{millis}-{rand}{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_accepted_types() {
        assert_eq!(extension_for("image/jpeg"), Some(".jpg"));
        assert_eq!(extension_for("image/png"), Some(".png"));
        assert_eq!(extension_for("image/webp"), Some(".webp"));
        assert_eq!(extension_for("image/gif"), Some(".gif"));
    }

    #[test]
    fn test_extension_for_rejected_types() {
        assert_eq!(extension_for("application/pdf"), None);
        assert_eq!(extension_for("image/svg+xml"), None);
        assert_eq!(extension_for(""), None);
    }

    #[test]
    fn test_unique_file_name_shape() {
        let name = unique_file_name("product", ".png");
        assert!(name.starts_with("product-"));
        assert!(name.ends_with(".png"));
        // prefix, millis, random: three dash-separated parts
        assert_eq!(name.matches('-').count(), 2);
    }
}
