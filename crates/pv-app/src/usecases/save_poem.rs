use std::sync::Arc;

use pv_core::poem::SavedPoem;
use pv_core::ports::ClockPort;
use tracing::{info, warn};

use crate::collection::SavedPoems;
use crate::session::{PhotoSession, SessionError};

/// Stores the current photo + poem as a new collection record.
pub struct SavePoem {
    session: PhotoSession,
    poems: SavedPoems,
    clock: Arc<dyn ClockPort>,
}

impl SavePoem {
    pub fn new(session: PhotoSession, poems: SavedPoems, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            session,
            poems,
            clock,
        }
    }

    /// Fails with `NothingToSave` (and mutates nothing) unless both a
    /// preview and a poem are present.
    #[tracing::instrument(name = "usecase.save_poem.execute", skip(self))]
    pub async fn execute(&self) -> Result<SavedPoem, SessionError> {
        let state = self.session.snapshot();
        let (Some(preview), Some(poem_text)) = (state.preview, state.poem) else {
            warn!("Save requested without both a photo and a poem");
            return Err(SessionError::NothingToSave);
        };

        let record = SavedPoem::new(preview, poem_text, self.clock.now_utc());
        let stored = self.poems.insert(record).await;
        info!(poem_id = %stored.id, "Poem saved to collection");
        Ok(stored)
    }
}
