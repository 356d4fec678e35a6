use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use pv_core::ids::PoemId;
use pv_core::poem::{PoemExport, SavedPoem};
use pv_core::ports::ExportSinkPort;
use tracing::info;

use crate::collection::SavedPoems;
use crate::session::{PhotoSession, SessionError};

/// Renders a poem into a plain-text artifact and hands it to the sink.
/// Never mutates the session or the collection.
pub struct ExportPoem {
    session: PhotoSession,
    poems: SavedPoems,
    sink: Arc<dyn ExportSinkPort>,
}

impl ExportPoem {
    pub fn new(session: PhotoSession, poems: SavedPoems, sink: Arc<dyn ExportSinkPort>) -> Self {
        Self {
            session,
            poems,
            sink,
        }
    }

    /// Exports the poem generated for the currently selected photo.
    #[tracing::instrument(name = "usecase.export_poem.execute", skip(self), fields(source = "current"))]
    pub async fn execute_current(&self) -> Result<PathBuf> {
        let state = self.session.snapshot();
        let (Some(photo), Some(poem)) = (state.photo, state.poem) else {
            return Err(SessionError::NothingToExport.into());
        };
        self.deliver(PoemExport::for_upload(&photo.name, &poem)).await
    }

    #[tracing::instrument(
        name = "usecase.export_poem.execute",
        skip_all,
        fields(source = "saved", poem_id = %id)
    )]
    pub async fn execute_saved(&self, id: &PoemId) -> Result<PathBuf> {
        let poem = self
            .poems
            .find(id)
            .await
            .ok_or_else(|| anyhow!("Saved poem not found: {}", id))?;
        self.execute_record(&poem).await
    }

    pub async fn execute_record(&self, poem: &SavedPoem) -> Result<PathBuf> {
        self.deliver(PoemExport::for_saved(poem)).await
    }

    async fn deliver(&self, export: PoemExport) -> Result<PathBuf> {
        let path = self.sink.deliver(&export).await?;
        info!(file = %export.file_name, path = %path.display(), "Poem exported");
        Ok(path)
    }
}
