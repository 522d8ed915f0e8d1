//! Upload image content-type allow-list.

use serde::{Deserialize, Serialize};

/// Image content types accepted for product uploads.
///
/// Uploads declaring any other MIME type are rejected before anything is
/// written to disk or the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Png,
    Jpeg,
    Jpg,
}

impl ImageType {
    /// Look up an image type from a MIME string (e.g. `image/png`).
    ///
    /// Returns `None` for anything outside the allow-list.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            "image/jpg" => Some(Self::Jpg),
            _ => None,
        }
    }

    /// The file extension used when storing an upload of this type.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Jpg => "jpg",
        }
    }

    /// The canonical MIME string for this type.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Jpg => "image/jpg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_listed_mimes() {
        assert_eq!(ImageType::from_mime("image/png"), Some(ImageType::Png));
        assert_eq!(ImageType::from_mime("image/jpeg"), Some(ImageType::Jpeg));
        assert_eq!(ImageType::from_mime("image/jpg"), Some(ImageType::Jpg));
    }

    #[test]
    fn test_rejected_mimes() {
        assert_eq!(ImageType::from_mime("image/gif"), None);
        assert_eq!(ImageType::from_mime("image/svg+xml"), None);
        assert_eq!(ImageType::from_mime("application/pdf"), None);
        assert_eq!(ImageType::from_mime("text/html"), None);
        assert_eq!(ImageType::from_mime(""), None);
    }

    #[test]
    fn test_extension_matches_mime() {
        assert_eq!(ImageType::Png.extension(), "png");
        assert_eq!(ImageType::Jpeg.extension(), "jpeg");
        assert_eq!(ImageType::Jpg.extension(), "jpg");
        assert_eq!(ImageType::Png.mime(), "image/png");
    }
}
