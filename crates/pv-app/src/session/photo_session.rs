//! Photo ingestion pipeline and generation bookkeeping.

use std::sync::{Arc, Mutex, MutexGuard};

use pv_core::photo::{DataUri, PhotoFile, UploadPolicy, UploadRejection};
use pv_core::ports::{PhotoReadError, PhotoReaderPort};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{SessionError, WorkingState};

/// Synchronous result of [`PhotoSession::ingest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub accepted: bool,
    pub error: Option<UploadRejection>,
}

impl IngestOutcome {
    fn cleared() -> Self {
        Self {
            accepted: false,
            error: None,
        }
    }
}

struct Guarded {
    state: WorkingState,
    // Bumped on every selection or clear; async completions carrying an
    // older epoch are stale.
    epoch: u64,
    encoding: Option<JoinHandle<()>>,
}

struct Shared {
    policy: UploadPolicy,
    reader: Arc<dyn PhotoReaderPort>,
    guarded: Mutex<Guarded>,
    published: watch::Sender<WorkingState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Guarded> {
        self.guarded.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut Guarded) -> R) -> R {
        let mut guarded = self.lock();
        let result = f(&mut guarded);
        self.published.send_replace(guarded.state.clone());
        result
    }

    fn complete_encoding(&self, epoch: u64, result: Result<DataUri, PhotoReadError>) {
        self.mutate(|g| {
            if g.epoch != epoch {
                debug!(epoch, current = g.epoch, "Discarding stale photo encoding");
                return;
            }
            g.encoding = None;
            match result {
                Ok(uri) => {
                    debug!(bytes = uri.as_str().len(), "Photo preview ready");
                    g.state.preview = Some(uri);
                }
                Err(err) => {
                    warn!(error = %err, "Failed to encode selected photo");
                    g.state.photo = None;
                    g.state.preview = None;
                    g.state.error = Some(SessionError::PhotoReadFailed);
                }
            }
        });
    }
}

/// Working state of one user session plus the photo ingestion pipeline.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct PhotoSession {
    shared: Arc<Shared>,
}

impl PhotoSession {
    pub fn new(policy: UploadPolicy, reader: Arc<dyn PhotoReaderPort>) -> Self {
        let (published, _) = watch::channel(WorkingState::default());
        Self {
            shared: Arc::new(Shared {
                policy,
                reader,
                guarded: Mutex::new(Guarded {
                    state: WorkingState::default(),
                    epoch: 0,
                    encoding: None,
                }),
                published,
            }),
        }
    }

    pub fn policy(&self) -> UploadPolicy {
        self.shared.policy
    }

    pub fn snapshot(&self) -> WorkingState {
        self.shared.lock().state.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkingState> {
        self.shared.published.subscribe()
    }

    /// Selects a new file (or none).
    ///
    /// Any previous poem and error are cleared first. Rejected files clear
    /// the selection. An accepted file is retained immediately and its
    /// preview appears once background encoding finishes; an encoding
    /// still running for an earlier selection is cancelled.
    pub async fn ingest(&self, file: Option<PhotoFile>) -> IngestOutcome {
        let shared = Arc::clone(&self.shared);
        self.shared.mutate(move |g| {
            g.state.poem = None;
            g.state.error = None;
            g.epoch += 1;
            if let Some(previous) = g.encoding.take() {
                previous.abort();
            }

            let Some(file) = file else {
                g.state.photo = None;
                g.state.preview = None;
                return IngestOutcome::cleared();
            };

            if let Err(rejection) = shared.policy.validate(&file) {
                info!(
                    file = %file.name,
                    size_bytes = file.size_bytes,
                    mime = %file.mime_type,
                    reason = %rejection,
                    "Rejected photo selection"
                );
                g.state.photo = None;
                g.state.preview = None;
                g.state.error = Some(SessionError::Rejected(rejection.clone()));
                return IngestOutcome {
                    accepted: false,
                    error: Some(rejection),
                };
            }

            info!(
                file = %file.name,
                size_bytes = file.size_bytes,
                mime = %file.mime_type,
                "Accepted photo selection"
            );
            g.state.photo = Some(file.clone());
            g.state.preview = None;

            let epoch = g.epoch;
            let task_shared = Arc::clone(&shared);
            g.encoding = Some(tokio::spawn(async move {
                let result = encode(task_shared.reader.as_ref(), file).await;
                task_shared.complete_encoding(epoch, result);
            }));

            IngestOutcome {
                accepted: true,
                error: None,
            }
        })
    }

    /// Waits until the current selection either has a preview or is gone.
    pub async fn wait_for_preview(&self) -> Option<DataUri> {
        let mut rx = self.subscribe();
        let state = rx
            .wait_for(|s| s.preview.is_some() || s.photo.is_none())
            .await
            .ok()?;
        state.preview.clone()
    }

    /// Full reset of the working state. An in-flight generation keeps its
    /// busy flag until it completes, but its result is discarded.
    pub fn clear(&self) {
        self.shared.mutate(|g| {
            g.epoch += 1;
            if let Some(encoding) = g.encoding.take() {
                encoding.abort();
            }
            let busy = g.state.busy;
            g.state = WorkingState {
                busy,
                ..WorkingState::default()
            };
        });
        debug!("Cleared photo session");
    }

    /// Starts a generation round.
    ///
    /// Rejected without any state change while another round is in flight.
    /// Without a preview the user-facing error is set instead.
    pub fn begin_generation(&self) -> Result<GenerationTicket, SessionError> {
        self.shared.mutate(|g| {
            if g.state.busy {
                return Err(SessionError::Busy);
            }
            let Some(preview) = g.state.preview.clone() else {
                g.state.error = Some(SessionError::NoPhoto);
                return Err(SessionError::NoPhoto);
            };

            g.state.busy = true;
            g.state.poem = None;
            g.state.error = None;
            Ok(GenerationTicket {
                shared: Arc::clone(&self.shared),
                epoch: g.epoch,
                photo_data_uri: preview,
                finished: false,
            })
        })
    }
}

async fn encode(reader: &dyn PhotoReaderPort, file: PhotoFile) -> Result<DataUri, PhotoReadError> {
    let bytes = reader.read(&file).await?;
    let mime = file.mime_type;
    tokio::task::spawn_blocking(move || DataUri::encode(&mime, &bytes))
        .await
        .map_err(|e| PhotoReadError(format!("encoding task failed: {e}")))
}

/// An in-flight generation round.
///
/// The busy flag is released when the ticket is finished or dropped,
/// whichever comes first.
pub struct GenerationTicket {
    shared: Arc<Shared>,
    epoch: u64,
    photo_data_uri: DataUri,
    finished: bool,
}

impl GenerationTicket {
    pub fn photo_data_uri(&self) -> &DataUri {
        &self.photo_data_uri
    }

    /// Records the generated poem. Returns `false` when the selection changed
    /// meanwhile and the poem was discarded.
    pub fn succeed(mut self, poem: String) -> bool {
        self.finish(|state| state.poem = Some(poem))
    }

    /// Records a failure. Returns `false` when the selection changed
    /// meanwhile and the error was discarded.
    pub fn fail(mut self, error: SessionError) -> bool {
        self.finish(|state| {
            state.poem = None;
            state.error = Some(error);
        })
    }

    fn finish(&mut self, apply: impl FnOnce(&mut WorkingState)) -> bool {
        self.finished = true;
        let epoch = self.epoch;
        self.shared.mutate(|g| {
            g.state.busy = false;
            if g.epoch != epoch {
                debug!(epoch, current = g.epoch, "Discarding stale generation result");
                return false;
            }
            apply(&mut g.state);
            true
        })
    }
}

impl Drop for GenerationTicket {
    fn drop(&mut self) {
        if !self.finished {
            self.shared.mutate(|g| g.state.busy = false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pv_core::photo::MimeType;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct MemoryReader {
        files: HashMap<PathBuf, Vec<u8>>,
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl PhotoReaderPort for MemoryReader {
        async fn read(&self, file: &PhotoFile) -> Result<Vec<u8>, PhotoReadError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.files
                .get(&file.path)
                .cloned()
                .ok_or_else(|| PhotoReadError(format!("no such file: {}", file.path.display())))
        }
    }

    fn png(name: &str, size: u64) -> PhotoFile {
        PhotoFile::new(name, MimeType::from("image/png"), size, format!("/photos/{name}"))
    }

    fn session_with(files: &[(&PhotoFile, &[u8])]) -> PhotoSession {
        let reader = MemoryReader {
            files: files
                .iter()
                .map(|(f, bytes)| (f.path.clone(), bytes.to_vec()))
                .collect(),
            gate: None,
        };
        PhotoSession::new(UploadPolicy::default(), Arc::new(reader))
    }

    #[tokio::test]
    async fn accepted_file_eventually_gets_a_preview() {
        let file = png("cat.png", 3);
        let session = session_with(&[(&file, b"cat")]);

        let outcome = session.ingest(Some(file.clone())).await;
        assert!(outcome.accepted);
        assert_eq!(session.snapshot().photo, Some(file));

        let preview = session.wait_for_preview().await.unwrap();
        assert!(preview.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(preview.decode().unwrap(), b"cat");
    }

    #[tokio::test]
    async fn none_clears_selection_without_error() {
        let file = png("cat.png", 3);
        let session = session_with(&[(&file, b"cat")]);
        session.ingest(Some(file)).await;
        session.wait_for_preview().await;

        let outcome = session.ingest(None).await;

        assert_eq!(outcome, IngestOutcome::cleared());
        let state = session.snapshot();
        assert!(state.photo.is_none());
        assert!(state.preview.is_none());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_and_clears_preview() {
        let good = png("cat.png", 3);
        let session = session_with(&[(&good, b"cat")]);
        session.ingest(Some(good)).await;
        session.wait_for_preview().await;

        let huge = PhotoFile::new("big.jpg", MimeType::from("image/jpeg"), 10 * 1024 * 1024, "/photos/big.jpg");
        let outcome = session.ingest(Some(huge)).await;

        assert!(!outcome.accepted);
        assert!(matches!(outcome.error, Some(UploadRejection::FileTooLarge { .. })));
        let state = session.snapshot();
        assert!(state.photo.is_none());
        assert!(state.preview.is_none());
        assert!(matches!(
            state.error,
            Some(SessionError::Rejected(UploadRejection::FileTooLarge { .. }))
        ));
    }

    #[tokio::test]
    async fn non_image_is_rejected() {
        let session = session_with(&[]);
        let doc = PhotoFile::new("notes.txt", MimeType::from("text/plain"), 12, "/photos/notes.txt");

        let outcome = session.ingest(Some(doc)).await;

        assert!(!outcome.accepted);
        assert!(matches!(outcome.error, Some(UploadRejection::InvalidMimeType { .. })));
        assert!(session.snapshot().photo.is_none());
    }

    #[tokio::test]
    async fn new_selection_clears_poem_and_error() {
        let first = png("a.png", 1);
        let second = png("b.png", 1);
        let session = session_with(&[(&first, b"a"), (&second, b"b")]);
        session.ingest(Some(first)).await;
        session.wait_for_preview().await;
        session.shared.mutate(|g| {
            g.state.poem = Some("old poem".into());
            g.state.error = Some(SessionError::GenerationFailed("old".into()));
        });

        session.ingest(Some(second)).await;

        let state = session.snapshot();
        assert!(state.poem.is_none());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn stale_encoding_results_are_discarded() {
        let gate = Arc::new(Notify::new());
        let first = png("first.png", 5);
        let second = png("second.png", 6);
        let reader = MemoryReader {
            files: [
                (first.path.clone(), b"first".to_vec()),
                (second.path.clone(), b"second".to_vec()),
            ]
            .into_iter()
            .collect(),
            gate: Some(gate.clone()),
        };
        let session = PhotoSession::new(UploadPolicy::default(), Arc::new(reader));

        session.ingest(Some(first)).await;
        session.ingest(Some(second.clone())).await;
        // Only the second read is still alive to take the permit.
        gate.notify_one();

        let preview = session.wait_for_preview().await.unwrap();
        assert_eq!(preview.decode().unwrap(), b"second");
        assert_eq!(session.snapshot().photo, Some(second));
    }

    #[tokio::test]
    async fn completion_from_an_older_selection_is_ignored() {
        let file = png("cat.png", 3);
        let session = session_with(&[(&file, b"cat")]);
        session.ingest(Some(file)).await;
        session.wait_for_preview().await;
        let before = session.snapshot();

        let stale_epoch = session.shared.lock().epoch - 1;
        let stale = DataUri::encode(&MimeType::from("image/png"), b"stale");
        session.shared.complete_encoding(stale_epoch, Ok(stale));

        assert_eq!(session.snapshot(), before);
    }

    #[tokio::test]
    async fn read_failure_clears_selection() {
        let ghost = png("ghost.png", 4);
        let session = session_with(&[]);

        assert!(session.ingest(Some(ghost)).await.accepted);
        let preview = session.wait_for_preview().await;

        assert!(preview.is_none());
        let state = session.snapshot();
        assert!(state.photo.is_none());
        assert_eq!(state.error, Some(SessionError::PhotoReadFailed));
    }

    #[tokio::test]
    async fn generation_requires_a_preview() {
        let session = session_with(&[]);

        let err = session.begin_generation().err();

        assert_eq!(err, Some(SessionError::NoPhoto));
        assert_eq!(session.snapshot().error, Some(SessionError::NoPhoto));
        assert!(!session.snapshot().busy);
    }

    #[tokio::test]
    async fn second_generation_is_rejected_while_busy() {
        let file = png("cat.png", 3);
        let session = session_with(&[(&file, b"cat")]);
        session.ingest(Some(file)).await;
        session.wait_for_preview().await;

        let ticket = session.begin_generation().unwrap();
        assert!(session.snapshot().busy);
        assert_eq!(session.begin_generation().err(), Some(SessionError::Busy));

        assert!(ticket.succeed("Whiskers at dusk.".into()));
        let state = session.snapshot();
        assert!(!state.busy);
        assert_eq!(state.poem.as_deref(), Some("Whiskers at dusk."));
    }

    #[tokio::test]
    async fn dropped_ticket_releases_busy_flag() {
        let file = png("cat.png", 3);
        let session = session_with(&[(&file, b"cat")]);
        session.ingest(Some(file)).await;
        session.wait_for_preview().await;

        let ticket = session.begin_generation().unwrap();
        drop(ticket);

        assert!(!session.snapshot().busy);
        assert!(session.snapshot().poem.is_none());
    }

    #[tokio::test]
    async fn clear_resets_everything_and_discards_pending_generation() {
        let file = png("cat.png", 3);
        let session = session_with(&[(&file, b"cat")]);
        session.ingest(Some(file)).await;
        session.wait_for_preview().await;
        let ticket = session.begin_generation().unwrap();

        session.clear();
        assert!(session.snapshot().busy);

        assert!(!ticket.succeed("too late".into()));
        assert_eq!(session.snapshot(), WorkingState::default());
    }
}
