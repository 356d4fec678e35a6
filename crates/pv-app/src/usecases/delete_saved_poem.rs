use pv_core::ids::PoemId;
use tracing::info;

use crate::collection::SavedPoems;

pub struct DeleteSavedPoem {
    poems: SavedPoems,
}

impl DeleteSavedPoem {
    pub fn new(poems: SavedPoems) -> Self {
        Self { poems }
    }

    /// Returns `true` when a record was removed. Unknown ids are a no-op.
    #[tracing::instrument(
        name = "usecase.delete_saved_poem.execute",
        skip_all,
        fields(poem_id = %id)
    )]
    pub async fn execute(&self, id: &PoemId) -> bool {
        let removed = self.poems.delete(id).await;
        info!(poem_id = %id, removed, "Processed saved poem deletion");
        removed
    }
}
