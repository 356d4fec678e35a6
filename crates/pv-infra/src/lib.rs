pub mod export;
pub mod fs;
pub mod gateway;
pub mod photo;
pub mod storage;
pub mod time;

pub use export::FileExportSink;
pub use gateway::GeminiPoemGenerator;
pub use photo::FsPhotoReader;
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore};
pub use time::SystemClock;
