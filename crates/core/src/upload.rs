//! Validation of uploaded image files.
//!
//! The declared content type is only advisory; the file's magic bytes decide
//! the stored extension and MIME type.

use image::ImageFormat;

use crate::error::CoreError;

/// Maximum accepted upload size (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A validated image upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedImage {
    pub extension: &'static str,
    pub mime_type: &'static str,
    pub size: usize,
}

/// Check size, declared type, and sniffed format of an uploaded image.
pub fn validate_image_upload(
    declared_mime: Option<&str>,
    data: &[u8],
) -> Result<ValidatedImage, CoreError> {
    if data.is_empty() {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation(format!(
            "Uploaded file exceeds the {} MiB limit",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    if let Some(mime) = declared_mime {
        if !mime.starts_with("image/") && mime != "application/octet-stream" {
            return Err(CoreError::Validation(format!(
                "Unsupported content type '{mime}'. Only images may be uploaded"
            )));
        }
    }

    let format = image::guess_format(data)
        .map_err(|_| CoreError::Validation("File is not a recognized image".into()))?;

    let (extension, mime_type) = match format {
        ImageFormat::Jpeg => ("jpg", "image/jpeg"),
        ImageFormat::Png => ("png", "image/png"),
        ImageFormat::WebP => ("webp", "image/webp"),
        ImageFormat::Gif => ("gif", "image/gif"),
        other => {
            return Err(CoreError::Validation(format!(
                "Unsupported image format {other:?}. Supported: JPEG, PNG, WebP, GIF"
            )))
        }
    };

    Ok(ValidatedImage {
        extension,
        mime_type,
        size: data.len(),
    })
}

/// Object key under which an uploaded image is stored.
pub fn object_key(template_id: &str, extension: &str) -> String {
    format!("templates/{template_id}/{}.{extension}", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn sniffs_png_regardless_of_declared_type() {
        let image = validate_image_upload(Some("application/octet-stream"), PNG_HEADER).unwrap();
        assert_eq!(image.extension, "png");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.size, PNG_HEADER.len());
    }

    #[test]
    fn sniffs_jpeg() {
        let image = validate_image_upload(Some("image/jpeg"), JPEG_HEADER).unwrap();
        assert_eq!(image.extension, "jpg");
    }

    #[test]
    fn rejects_non_images() {
        assert_matches!(
            validate_image_upload(Some("image/png"), b"hello world, not an image"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_image_upload(Some("text/plain"), PNG_HEADER),
            Err(CoreError::Validation(_))
        );
        assert_matches!(validate_image_upload(None, &[]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn object_keys_are_scoped_by_template() {
        let key = object_key("abc123", "png");
        assert!(key.starts_with("templates/abc123/"));
        assert!(key.ends_with(".png"));
    }
}
