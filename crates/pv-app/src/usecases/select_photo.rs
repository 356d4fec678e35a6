use pv_core::photo::PhotoFile;
use tracing::info;

use crate::session::{IngestOutcome, PhotoSession};

/// Hands a newly selected file (or none) to the ingestion pipeline.
pub struct SelectPhoto {
    session: PhotoSession,
}

impl SelectPhoto {
    pub fn new(session: PhotoSession) -> Self {
        Self { session }
    }

    #[tracing::instrument(name = "usecase.select_photo.execute", skip_all)]
    pub async fn execute(&self, file: Option<PhotoFile>) -> IngestOutcome {
        let name = file.as_ref().map(|f| f.name.clone());
        let outcome = self.session.ingest(file).await;
        info!(file = ?name, accepted = outcome.accepted, "Photo selection processed");
        outcome
    }
}
