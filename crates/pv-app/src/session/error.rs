use pv_core::photo::UploadRejection;

pub const GENERATION_FALLBACK_MESSAGE: &str = "Failed to generate poem. Please try again.";

/// User-facing failures of the photo → poem flow.
///
/// None of these are fatal; each is recoverable by selecting another file or
/// re-triggering the action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Rejected(#[from] UploadRejection),

    #[error("Could not read the selected image.")]
    PhotoReadFailed,

    #[error("Please upload a photo first.")]
    NoPhoto,

    #[error("A poem is already being generated.")]
    Busy,

    #[error("{0}")]
    GenerationFailed(String),

    #[error("The photo changed while the poem was being generated.")]
    Superseded,

    #[error("No photo or poem to save.")]
    NothingToSave,

    #[error("No photo or poem to export.")]
    NothingToExport,
}

impl SessionError {
    /// Wraps a gateway message, falling back to a generic one when blank.
    pub fn generation_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::GenerationFailed(GENERATION_FALLBACK_MESSAGE.to_string())
        } else {
            Self::GenerationFailed(message)
        }
    }
}
