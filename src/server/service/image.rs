//! Recipe image storage.
//!
//! Images arrive inline as `data:image/<ext>;base64,<data>` URLs. They are decoded, checked
//! against the signature of the declared format, and written under
//! `<media_root>/recipes/` with a random file name. The database stores the path relative to
//! the media root; responses expose it prefixed with the media URL.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::Rng;

pub static IMAGE_DIR: &str = "recipes";

/// Decoded image bytes and the file extension they will be stored with
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImageDecodeError {
    #[error("Image must be a base64 encoded data URL.")]
    NotDataUrl,
    #[error("Unsupported image format {0:?}.")]
    UnsupportedFormat(String),
    #[error("Image data is not valid base64.")]
    InvalidBase64,
    #[error("Upload a valid image. The file you uploaded was either not an image or a corrupted image.")]
    InvalidImage,
}

/// Decodes a `data:image/<ext>;base64,<data>` URL
pub fn decode_data_url(value: &str) -> Result<DecodedImage, ImageDecodeError> {
    let (header, data) = value
        .trim()
        .split_once(',')
        .ok_or(ImageDecodeError::NotDataUrl)?;

    let format = header
        .strip_prefix("data:image/")
        .and_then(|rest| rest.strip_suffix(";base64"))
        .ok_or(ImageDecodeError::NotDataUrl)?;

    let extension = match format.to_ascii_lowercase().as_str() {
        "png" => "png",
        "jpeg" => "jpeg",
        "jpg" => "jpg",
        "gif" => "gif",
        "webp" => "webp",
        other => return Err(ImageDecodeError::UnsupportedFormat(other.to_string())),
    };

    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|_| ImageDecodeError::InvalidBase64)?;

    if !has_signature(extension, &bytes) {
        return Err(ImageDecodeError::InvalidImage);
    }

    Ok(DecodedImage { extension, bytes })
}

fn has_signature(extension: &str, bytes: &[u8]) -> bool {
    match extension {
        "png" => bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "jpeg" | "jpg" => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
        "gif" => bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a"),
        "webp" => bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP",
        _ => false,
    }
}

/// Filesystem location and public URL prefix of uploaded media
#[derive(Debug, Clone)]
pub struct ImageStore {
    media_root: PathBuf,
    media_url: String,
}

impl ImageStore {
    pub fn new(media_root: impl Into<PathBuf>, media_url: impl Into<String>) -> Self {
        Self {
            media_root: media_root.into(),
            media_url: media_url.into(),
        }
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    /// Writes the image under a fresh random name
    ///
    /// # Returns
    /// - `Ok(String)`: Path of the stored file relative to the media root
    /// - `Err(std::io::Error)`: The directory or file could not be written
    pub async fn save(&self, image: &DecodedImage) -> Result<String, std::io::Error> {
        let dir = self.media_root.join(IMAGE_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let name: u128 = rand::rng().random();
        let file_name = format!("{:032x}.{}", name, image.extension);
        tokio::fs::write(dir.join(&file_name), &image.bytes).await?;

        Ok(format!("{}/{}", IMAGE_DIR, file_name))
    }

    /// Removes a stored image, a file that is already gone is not an error
    pub async fn remove(&self, relative_path: &str) {
        if relative_path.is_empty() {
            return;
        }

        match tokio::fs::remove_file(self.media_root.join(relative_path)).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %relative_path, "Failed to remove image: {}", err);
            }
        }
    }

    /// Public URL of a stored image
    pub fn url(&self, relative_path: &str) -> String {
        format!("{}{}", self.media_url, relative_path)
    }
}
