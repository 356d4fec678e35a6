use async_trait::async_trait;

use super::PhotoReadError;
use crate::photo::PhotoFile;

#[async_trait]
pub trait PhotoReaderPort: Send + Sync {
    /// Reads the full byte content of a selected photo.
    async fn read(&self, file: &PhotoFile) -> Result<Vec<u8>, PhotoReadError>;
}
