//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. This follows Hexagonal Architecture
//! principles, allowing the core business logic to remain independent of
//! external dependencies.

mod clock;
pub mod errors;
mod export_sink;
mod key_value_store;
mod photo_reader;
mod poem_generator;

pub use clock::ClockPort;
pub use errors::{GenerationError, PhotoReadError, StorageError};
pub use export_sink::ExportSinkPort;
pub use key_value_store::KeyValueStorePort;
pub use photo_reader::PhotoReaderPort;
pub use poem_generator::{GeneratePoemInput, GeneratePoemOutput, PoemGeneratorPort};
