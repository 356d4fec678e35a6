//! The saved-poem collection: newest-first, capped, persisted.

mod saved_poems;

pub use saved_poems::SavedPoems;
