use anyhow::{Context, Result};
use async_trait::async_trait;
use image::ImageFormat;
use pv_core::photo::{MimeType, PhotoFile};
use pv_core::ports::{PhotoReadError, PhotoReaderPort};
use std::path::Path;
use tokio::fs;

/// Reads user-selected photos from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsPhotoReader;

impl FsPhotoReader {
    pub fn new() -> Self {
        Self
    }

    /// Builds the picker-style handle for `path` without reading its content.
    ///
    /// The declared MIME type comes from the file extension, like a browser
    /// file input reports it; unknown extensions are `application/octet-stream`.
    pub async fn open(&self, path: impl AsRef<Path>) -> Result<PhotoFile> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)
            .await
            .with_context(|| format!("stat photo failed: {}", path.display()))?;
        if !metadata.is_file() {
            anyhow::bail!("not a regular file: {}", path.display());
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(PhotoFile::new(
            name,
            declared_mime_type(path),
            metadata.len(),
            path,
        ))
    }
}

/// Image types browsers report that `ImageFormat` does not know.
const EXTRA_IMAGE_TYPES: &[(&str, &str)] = &[
    ("svg", "image/svg+xml"),
    ("svgz", "image/svg+xml"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("jxl", "image/jxl"),
    ("jfif", "image/jpeg"),
    ("apng", "image/apng"),
];

fn declared_mime_type(path: &Path) -> MimeType {
    if let Ok(format) = ImageFormat::from_path(path) {
        return MimeType::from(format.to_mime_type());
    }
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    EXTRA_IMAGE_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| MimeType::from(*mime))
        .unwrap_or_else(MimeType::octet_stream)
}

#[async_trait]
impl PhotoReaderPort for FsPhotoReader {
    async fn read(&self, file: &PhotoFile) -> Result<Vec<u8>, PhotoReadError> {
        fs::read(&file.path)
            .await
            .map_err(|e| PhotoReadError(format!("{}: {}", file.path.display(), e)))
    }
}
