//! Product image intake.
//!
//! Uploads are checked against the content-type allow-list before anything
//! touches disk. Stored names follow
//! `{sanitized-original-stem}-{millisecond-timestamp}.{extension}` and are
//! served back as static files under [`UPLOADS_PUBLIC_PATH`].

use std::path::Path;

use chrono::Utc;
use thiserror::Error;

use eshop_core::ImageType;

/// Public URL path uploads are served under.
pub const UPLOADS_PUBLIC_PATH: &str = "/public/uploads";

/// Maximum number of files accepted by the gallery update.
pub const MAX_GALLERY_IMAGES: usize = 10;

/// Fallback stem when sanitization eats the whole original name.
const FALLBACK_STEM: &str = "image";

/// Errors from the upload service.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Content type outside the png/jpeg/jpg allow-list.
    #[error("invalid image type: {0}")]
    InvalidImageType(String),

    /// The request carried no image file.
    #[error("no image in request")]
    MissingImage,

    /// More gallery files than allowed.
    #[error("too many gallery images (max {max})")]
    TooManyImages { max: usize },

    /// Writing the file failed.
    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// A stored upload: the on-disk filename and the public URL.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub filename: String,
    pub url: String,
}

/// Resolve an upload's declared content type against the allow-list.
///
/// # Errors
///
/// Returns `UploadError::InvalidImageType` for anything outside
/// png/jpeg/jpg, including a missing content type.
pub fn required_image_type(content_type: Option<&str>) -> Result<ImageType, UploadError> {
    let mime = content_type.unwrap_or("");
    ImageType::from_mime(mime).ok_or_else(|| UploadError::InvalidImageType(mime.to_owned()))
}

/// Sanitize the stem of an uploaded filename.
///
/// Whitespace and anything path-hostile collapses to `-`; the original
/// extension is dropped (the stored extension comes from the verified
/// content type, not the client's name).
#[must_use]
pub fn sanitize_file_stem(original: &str) -> String {
    let stem = original.rsplit_once('.').map_or(original, |(stem, _)| stem);

    let sanitized: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();

    let trimmed = sanitized.trim_matches('-');
    if trimmed.is_empty() {
        FALLBACK_STEM.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Build the stored filename for an upload.
#[must_use]
pub fn build_filename(original: &str, image_type: ImageType, timestamp_ms: i64) -> String {
    format!(
        "{}-{}.{}",
        sanitize_file_stem(original),
        timestamp_ms,
        image_type.extension()
    )
}

/// Validate, name, and persist one uploaded image.
///
/// The allow-list check runs before any disk write.
///
/// # Errors
///
/// Returns `UploadError::InvalidImageType` for a disallowed content type,
/// `UploadError::Io` if the write fails.
pub async fn store_image(
    uploads_dir: &Path,
    base_url: &str,
    original_name: &str,
    content_type: Option<&str>,
    data: &[u8],
) -> Result<StoredImage, UploadError> {
    let image_type = required_image_type(content_type)?;
    let filename = build_filename(original_name, image_type, Utc::now().timestamp_millis());

    tokio::fs::create_dir_all(uploads_dir).await?;
    tokio::fs::write(uploads_dir.join(&filename), data).await?;

    let url = format!("{base_url}{UPLOADS_PUBLIC_PATH}/{filename}");
    Ok(StoredImage { filename, url })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_spaces() {
        assert_eq!(sanitize_file_stem("my product photo.png"), "my-product-photo");
    }

    #[test]
    fn test_sanitize_drops_extension_only_once() {
        assert_eq!(sanitize_file_stem("archive.tar.gz"), "archive-tar");
    }

    #[test]
    fn test_sanitize_neutralizes_path_traversal() {
        let stem = sanitize_file_stem("../../etc/passwd");
        assert!(!stem.contains('/'));
        assert!(!stem.contains(".."));
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_file_stem("///.png"), "image");
        assert_eq!(sanitize_file_stem(""), "image");
    }

    #[test]
    fn test_build_filename_shape() {
        let name = build_filename("red mug.jpeg", ImageType::Jpeg, 1_700_000_000_000);
        assert_eq!(name, "red-mug-1700000000000.jpeg");
    }

    #[test]
    fn test_extension_comes_from_content_type() {
        // Client claims .png in the name but uploaded JPEG bytes.
        let name = build_filename("sneaky.png", ImageType::Jpg, 42);
        assert_eq!(name, "sneaky-42.jpg");
    }

    #[test]
    fn test_required_image_type_allow_list() {
        assert!(required_image_type(Some("image/png")).is_ok());
        assert!(required_image_type(Some("image/jpeg")).is_ok());
        assert!(matches!(
            required_image_type(Some("image/gif")),
            Err(UploadError::InvalidImageType(_))
        ));
        assert!(matches!(
            required_image_type(None),
            Err(UploadError::InvalidImageType(_))
        ));
    }
}
