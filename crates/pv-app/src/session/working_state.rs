use pv_core::photo::{DataUri, PhotoFile};

use super::SessionError;

/// Snapshot of the session. Nothing in here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingState {
    /// Currently selected file.
    pub photo: Option<PhotoFile>,
    /// Data URI of `photo`, present once encoding has finished.
    pub preview: Option<DataUri>,
    /// Most recently generated poem.
    pub poem: Option<String>,
    /// A generation call is in flight.
    pub busy: bool,
    pub error: Option<SessionError>,
}

impl WorkingState {
    pub fn can_generate(&self) -> bool {
        self.preview.is_some() && !self.busy
    }

    pub fn can_save(&self) -> bool {
        self.preview.is_some() && self.poem.is_some()
    }
}
