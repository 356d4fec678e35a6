use async_trait::async_trait;
use std::path::PathBuf;

use crate::poem::PoemExport;

/// Delivers an export artifact to the user (a download, a file on disk).
#[async_trait]
pub trait ExportSinkPort: Send + Sync {
    /// Returns where the artifact ended up.
    async fn deliver(&self, export: &PoemExport) -> anyhow::Result<PathBuf>;
}
