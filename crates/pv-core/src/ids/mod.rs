//! ID type wrappers for type safety.

mod id_macro;
pub mod poem_id;

pub use poem_id::PoemId;
