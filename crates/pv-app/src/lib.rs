//! PhotoVerse Application Orchestration Layer
//!
//! This crate contains the persistence cell, the photo session and the
//! use cases built on top of the `pv-core` ports.

pub mod collection;
pub mod deps;
pub mod persistence;
pub mod session;
pub mod usecases;

pub use collection::SavedPoems;
pub use deps::{App, AppDeps};
pub use persistence::{DurableKeyedStore, PersistedCell};
pub use session::{IngestOutcome, PhotoSession, SessionError, WorkingState};
