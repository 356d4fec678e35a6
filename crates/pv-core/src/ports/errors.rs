use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("durable storage is not available")]
    Unavailable,

    #[error("storage quota exceeded: {0}")]
    Quota(String),

    #[error("storage i/o error: {0}")]
    Io(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The model call failed; carries the collaborator's message.
    #[error("{0}")]
    Failed(String),

    #[error("the model returned no poem")]
    EmptyOutput,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to read photo: {0}")]
pub struct PhotoReadError(pub String);
