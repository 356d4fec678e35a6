//! Durable keyed storage and the write-through cell built on it.

mod durable_store;
mod persisted_cell;

pub use durable_store::DurableKeyedStore;
pub use persisted_cell::PersistedCell;
