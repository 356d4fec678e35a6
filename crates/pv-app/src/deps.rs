//! Application dependency grouping and the assembled application.

use std::sync::Arc;

use pv_core::photo::UploadPolicy;
use pv_core::ports::{
    ClockPort, ExportSinkPort, KeyValueStorePort, PhotoReaderPort, PoemGeneratorPort,
};

use crate::collection::SavedPoems;
use crate::persistence::DurableKeyedStore;
use crate::session::PhotoSession;
use crate::usecases::{
    ClearSession, DeleteSavedPoem, ExportPoem, GeneratePoem, ListSavedPoems, SavePoem,
    SelectPhoto,
};

/// Every port the application needs.
///
/// This is parameter grouping, not a builder: wiring decides which adapter
/// fills each slot. `store: None` runs without durable storage (collection
/// lives in memory only).
pub struct AppDeps {
    pub store: Option<Arc<dyn KeyValueStorePort>>,
    pub photo_reader: Arc<dyn PhotoReaderPort>,
    pub poem_generator: Arc<dyn PoemGeneratorPort>,
    pub export_sink: Arc<dyn ExportSinkPort>,
    pub clock: Arc<dyn ClockPort>,
    pub upload_policy: UploadPolicy,
}

/// One running application instance: a photo session plus the saved-poem
/// collection, with use cases constructed on demand.
#[derive(Clone)]
pub struct App {
    session: PhotoSession,
    poems: SavedPoems,
    poem_generator: Arc<dyn PoemGeneratorPort>,
    export_sink: Arc<dyn ExportSinkPort>,
    clock: Arc<dyn ClockPort>,
}

impl App {
    pub fn new(deps: AppDeps) -> Self {
        let store = match deps.store {
            Some(backend) => DurableKeyedStore::new(backend),
            None => DurableKeyedStore::detached(),
        };
        Self {
            session: PhotoSession::new(deps.upload_policy, deps.photo_reader),
            poems: SavedPoems::new(store),
            poem_generator: deps.poem_generator,
            export_sink: deps.export_sink,
            clock: deps.clock,
        }
    }

    pub fn session(&self) -> &PhotoSession {
        &self.session
    }

    pub fn saved_poems(&self) -> &SavedPoems {
        &self.poems
    }

    pub fn select_photo(&self) -> SelectPhoto {
        SelectPhoto::new(self.session.clone())
    }

    pub fn clear_session(&self) -> ClearSession {
        ClearSession::new(self.session.clone())
    }

    pub fn generate_poem(&self) -> GeneratePoem {
        GeneratePoem::new(self.session.clone(), self.poem_generator.clone())
    }

    pub fn save_poem(&self) -> SavePoem {
        SavePoem::new(self.session.clone(), self.poems.clone(), self.clock.clone())
    }

    pub fn list_saved_poems(&self) -> ListSavedPoems {
        ListSavedPoems::new(self.poems.clone())
    }

    pub fn delete_saved_poem(&self) -> DeleteSavedPoem {
        DeleteSavedPoem::new(self.poems.clone())
    }

    pub fn export_poem(&self) -> ExportPoem {
        ExportPoem::new(
            self.session.clone(),
            self.poems.clone(),
            self.export_sink.clone(),
        )
    }

    /// Waits for queued collection writes to reach durable storage.
    pub async fn shutdown(&self) {
        self.poems.flush().await;
    }
}
