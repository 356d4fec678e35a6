use super::PhotoFile;

/// 5 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Why a selected file was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("File size exceeds {}. Please choose a smaller image.", format_limit(*max_bytes))]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },

    #[error("Invalid file type. Please upload an image (JPEG, PNG, GIF, WEBP).")]
    InvalidMimeType { declared: String },
}

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Renders a byte limit the way the rejection message shows it: `5MB`,
/// `1.5MB`, `500KB`, `300 bytes`.
fn format_limit(bytes: u64) -> String {
    if bytes >= MIB {
        if bytes % MIB == 0 {
            format!("{}MB", bytes / MIB)
        } else {
            format!("{:.1}MB", bytes as f64 / MIB as f64)
        }
    } else if bytes >= KIB {
        if bytes % KIB == 0 {
            format!("{}KB", bytes / KIB)
        } else {
            format!("{:.1}KB", bytes as f64 / KIB as f64)
        }
    } else {
        format!("{bytes} bytes")
    }
}

/// Limits enforced on a selected file before it is encoded or sent anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_size_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn new(max_size_bytes: u64) -> Self {
        Self { max_size_bytes }
    }

    /// Size is checked before type. A file of exactly the limit passes.
    pub fn validate(&self, file: &PhotoFile) -> Result<(), UploadRejection> {
        if file.size_bytes > self.max_size_bytes {
            return Err(UploadRejection::FileTooLarge {
                size_bytes: file.size_bytes,
                max_bytes: self.max_size_bytes,
            });
        }
        if !file.mime_type.is_image() {
            return Err(UploadRejection::InvalidMimeType {
                declared: file.mime_type.to_string(),
            });
        }
        Ok(())
    }
}
