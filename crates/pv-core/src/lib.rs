//! # pv-core
//!
//! Core domain models and business logic for PhotoVerse.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

pub mod config;
pub mod ids;
pub mod photo;
pub mod poem;
pub mod ports;

pub use config::AppConfig;
pub use ids::PoemId;
pub use photo::{DataUri, MimeType, PhotoFile, UploadPolicy, UploadRejection};
pub use poem::{PoemExport, SavedPoem, MAX_SAVED_POEMS, SAVED_POEMS_KEY};
