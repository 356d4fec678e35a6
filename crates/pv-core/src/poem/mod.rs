//! Saved poems and the rules governing the persisted collection.

mod collection;
mod export;
mod saved_poem;

pub use collection::{prepend_capped, remove_by_id, MAX_SAVED_POEMS, SAVED_POEMS_KEY};
pub use export::PoemExport;
pub use saved_poem::SavedPoem;
