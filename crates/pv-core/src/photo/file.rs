use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::MimeType;

/// Handle to a user-selected photo.
///
/// Carries the metadata a file picker reports up front (name, declared type,
/// size) so the upload policy can run before any content is read. Content
/// is read later through a [`PhotoReaderPort`](crate::ports::PhotoReaderPort).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoFile {
    pub name: String,
    pub mime_type: MimeType,
    pub size_bytes: u64,
    pub path: PathBuf,
}

impl PhotoFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: MimeType,
        size_bytes: u64,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type,
            size_bytes,
            path: path.into(),
        }
    }
}
