//! Business logic use cases
//!
//! SelectPhoto → GeneratePoem → SavePoem / ExportPoem
//!                                 ↓
//!               ListSavedPoems / DeleteSavedPoem / ExportPoem

pub mod clear_session;
pub mod delete_saved_poem;
pub mod export_poem;
pub mod generate_poem;
pub mod list_saved_poems;
pub mod save_poem;
pub mod select_photo;

pub use clear_session::ClearSession;
pub use delete_saved_poem::DeleteSavedPoem;
pub use export_poem::ExportPoem;
pub use generate_poem::GeneratePoem;
pub use list_saved_poems::ListSavedPoems;
pub use save_poem::SavePoem;
pub use select_photo::SelectPhoto;
