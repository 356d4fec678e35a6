use std::sync::Arc;

use pv_core::poem::SavedPoem;

use crate::collection::SavedPoems;

pub struct ListSavedPoems {
    poems: SavedPoems,
}

impl ListSavedPoems {
    pub fn new(poems: SavedPoems) -> Self {
        Self { poems }
    }

    /// Newest first.
    pub async fn execute(&self) -> Arc<Vec<SavedPoem>> {
        self.poems.list().await
    }
}
