//! Transient working state for one photo → poem round: the selected file,
//! its data-URI preview, the generated poem and the generation status.

mod error;
mod photo_session;
mod working_state;

pub use error::{SessionError, GENERATION_FALLBACK_MESSAGE};
pub use photo_session::{GenerationTicket, IngestOutcome, PhotoSession};
pub use working_state::WorkingState;
