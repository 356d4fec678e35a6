use std::sync::Arc;

use pv_core::ids::PoemId;
use pv_core::poem::{prepend_capped, remove_by_id, SavedPoem, MAX_SAVED_POEMS, SAVED_POEMS_KEY};
use tokio::sync::watch;
use tracing::debug;

use crate::persistence::{DurableKeyedStore, PersistedCell};

/// Saved poems persisted under [`SAVED_POEMS_KEY`].
///
/// Each instance owns its own cell; two instances over the same store
/// observe each other only through storage (i.e. after a restart).
#[derive(Clone)]
pub struct SavedPoems {
    cell: Arc<PersistedCell<Vec<SavedPoem>>>,
    cap: usize,
}

impl SavedPoems {
    pub fn new(store: DurableKeyedStore) -> Self {
        Self::with_cap(store, MAX_SAVED_POEMS)
    }

    pub fn with_cap(store: DurableKeyedStore, cap: usize) -> Self {
        Self {
            cell: Arc::new(PersistedCell::with_initializer(store, SAVED_POEMS_KEY, Vec::new)),
            cap,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub async fn list(&self) -> Arc<Vec<SavedPoem>> {
        self.cell.get().await
    }

    pub async fn find(&self, id: &PoemId) -> Option<SavedPoem> {
        self.cell.get().await.iter().find(|p| &p.id == id).cloned()
    }

    pub async fn subscribe(&self) -> watch::Receiver<Arc<Vec<SavedPoem>>> {
        self.cell.subscribe().await
    }

    /// Prepends `poem` and drops whatever falls beyond the cap, in one
    /// update. Returns the record as stored (its id is re-rolled in the
    /// unlikely case it collides with an existing one).
    pub async fn insert(&self, poem: SavedPoem) -> SavedPoem {
        let cap = self.cap;
        let fallback = poem.clone();
        let mut stored = None;
        self.cell
            .update(|prev| {
                let mut poem = poem;
                while prev.iter().any(|p| p.id == poem.id) {
                    poem.id = PoemId::new();
                }
                stored = Some(poem.clone());
                prepend_capped(prev, poem, cap)
            })
            .await;
        stored.unwrap_or(fallback)
    }

    /// Removes the record with `id`. Returns `false` (and writes nothing)
    /// when no such record exists.
    pub async fn delete(&self, id: &PoemId) -> bool {
        if !self.cell.get().await.iter().any(|p| &p.id == id) {
            debug!(poem_id = %id, "Delete of unknown poem ignored");
            return false;
        }
        let mut removed = false;
        self.cell
            .update(|prev| {
                let next = remove_by_id(prev, id);
                removed = next.len() != prev.len();
                next
            })
            .await;
        removed
    }

    pub async fn flush(&self) {
        self.cell.flush().await;
    }
}
