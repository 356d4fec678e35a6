use std::sync::Arc;

use pv_core::ports::{GeneratePoemInput, GenerationError, PoemGeneratorPort};
use tracing::{error, info, warn};

use crate::session::{PhotoSession, SessionError};

/// Sends the current preview to the generation gateway and records the
/// outcome in the session.
pub struct GeneratePoem {
    session: PhotoSession,
    generator: Arc<dyn PoemGeneratorPort>,
}

impl GeneratePoem {
    pub fn new(session: PhotoSession, generator: Arc<dyn PoemGeneratorPort>) -> Self {
        Self { session, generator }
    }

    /// Runs one generation round.
    ///
    /// - `Busy` while another round is in flight (nothing changes).
    /// - `NoPhoto` without a ready preview (the session shows the error).
    /// - `GenerationFailed` with the gateway's message, or a generic one.
    /// - `Superseded` when the selection changed before the gateway answered.
    ///
    /// Exactly one of poem / error is set on completion and the busy flag is
    /// always released.
    #[tracing::instrument(name = "usecase.generate_poem.execute", skip(self))]
    pub async fn execute(&self) -> Result<String, SessionError> {
        let ticket = self.session.begin_generation()?;
        let input = GeneratePoemInput {
            photo_data_uri: ticket.photo_data_uri().to_string(),
        };

        let result = match self.generator.generate(input).await {
            Ok(output) if !output.poem.trim().is_empty() => Ok(output.poem),
            Ok(_) => Err(GenerationError::EmptyOutput),
            Err(err) => Err(err),
        };

        match result {
            Ok(poem) => {
                if !ticket.succeed(poem.clone()) {
                    warn!("Selection changed during generation; poem discarded");
                    return Err(SessionError::Superseded);
                }
                info!(chars = poem.chars().count(), "Poem generated");
                Ok(poem)
            }
            Err(err) => {
                error!(error = %err, "Poem generation failed");
                let session_error = match err {
                    GenerationError::Failed(message) => SessionError::generation_failed(message),
                    GenerationError::EmptyOutput => SessionError::generation_failed(""),
                };
                if !ticket.fail(session_error.clone()) {
                    return Err(SessionError::Superseded);
                }
                Err(session_error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::GENERATION_FALLBACK_MESSAGE;
    use async_trait::async_trait;
    use pv_core::photo::{MimeType, PhotoFile, UploadPolicy};
    use pv_core::ports::{GeneratePoemOutput, PhotoReadError, PhotoReaderPort};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    struct FixedReader;

    #[async_trait]
    impl PhotoReaderPort for FixedReader {
        async fn read(&self, _file: &PhotoFile) -> Result<Vec<u8>, PhotoReadError> {
            Ok(b"pixels".to_vec())
        }
    }

    struct ScriptedGenerator {
        reply: Result<GeneratePoemOutput, GenerationError>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PoemGeneratorPort for ScriptedGenerator {
        async fn generate(&self, input: GeneratePoemInput) -> Result<GeneratePoemOutput, GenerationError> {
            assert!(input.photo_data_uri.starts_with("data:image/png;base64,"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    async fn ready_session() -> PhotoSession {
        let session = PhotoSession::new(UploadPolicy::default(), Arc::new(FixedReader));
        session
            .ingest(Some(PhotoFile::new("p.png", MimeType::from("image/png"), 6, "/p.png")))
            .await;
        session.wait_for_preview().await.unwrap();
        session
    }

    fn generator(reply: Result<GeneratePoemOutput, GenerationError>) -> Arc<ScriptedGenerator> {
        Arc::new(ScriptedGenerator {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn empty_output_uses_fallback_message() {
        let session = ready_session().await;
        let gen = generator(Ok(GeneratePoemOutput { poem: "  \n".into() }));
        let uc = GeneratePoem::new(session.clone(), gen);

        let err = uc.execute().await.unwrap_err();

        assert_eq!(
            err,
            SessionError::GenerationFailed(GENERATION_FALLBACK_MESSAGE.into())
        );
        let state = session.snapshot();
        assert!(state.poem.is_none());
        assert!(!state.busy);
    }

    #[tokio::test]
    async fn blank_gateway_message_uses_fallback() {
        let session = ready_session().await;
        let uc = GeneratePoem::new(session.clone(), generator(Err(GenerationError::Failed(String::new()))));

        let err = uc.execute().await.unwrap_err();

        assert_eq!(err.to_string(), GENERATION_FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn no_gateway_call_without_preview() {
        let session = PhotoSession::new(UploadPolicy::default(), Arc::new(FixedReader));
        let gen = generator(Ok(GeneratePoemOutput { poem: "x".into() }));
        let uc = GeneratePoem::new(session.clone(), gen.clone());

        assert_eq!(uc.execute().await.unwrap_err(), SessionError::NoPhoto);
        assert_eq!(gen.calls.load(Ordering::SeqCst), 0);
    }

    /// Holds every call until the gate opens; signals `started` on entry.
    struct GatedGenerator {
        started: Arc<Notify>,
        gate: Arc<Notify>,
        reply: Result<GeneratePoemOutput, GenerationError>,
    }

    #[async_trait]
    impl PoemGeneratorPort for GatedGenerator {
        async fn generate(&self, _input: GeneratePoemInput) -> Result<GeneratePoemOutput, GenerationError> {
            self.started.notify_one();
            self.gate.notified().await;
            self.reply.clone()
        }
    }

    /// Starts a generation round, reselects a photo while the gateway is
    /// still working, then lets the gateway answer with `reply`.
    async fn reselect_during_generation(
        reply: Result<GeneratePoemOutput, GenerationError>,
    ) -> (PhotoSession, Result<String, SessionError>) {
        let session = ready_session().await;
        let started = Arc::new(Notify::new());
        let gate = Arc::new(Notify::new());
        let uc = GeneratePoem::new(
            session.clone(),
            Arc::new(GatedGenerator {
                started: started.clone(),
                gate: gate.clone(),
                reply,
            }),
        );

        let round = tokio::spawn(async move { uc.execute().await });
        started.notified().await;
        assert!(session.snapshot().busy);

        let outcome = session
            .ingest(Some(PhotoFile::new("q.png", MimeType::from("image/png"), 6, "/q.png")))
            .await;
        assert!(outcome.accepted);
        session.wait_for_preview().await.unwrap();

        gate.notify_one();
        let result = round.await.unwrap();
        (session, result)
    }

    #[tokio::test]
    async fn poem_for_replaced_photo_is_discarded() {
        let (session, result) =
            reselect_during_generation(Ok(GeneratePoemOutput { poem: "Old light.".into() })).await;

        assert_eq!(result, Err(SessionError::Superseded));
        let state = session.snapshot();
        assert!(state.poem.is_none());
        assert!(state.error.is_none());
        assert!(!state.busy);
        assert_eq!(state.photo.map(|p| p.name).as_deref(), Some("q.png"));
        assert!(state.preview.is_some());
    }

    #[tokio::test]
    async fn failure_for_replaced_photo_is_discarded() {
        let (session, result) =
            reselect_during_generation(Err(GenerationError::Failed("boom".into()))).await;

        assert_eq!(result, Err(SessionError::Superseded));
        let state = session.snapshot();
        assert!(state.poem.is_none());
        assert!(state.error.is_none());
        assert!(!state.busy);
        assert!(state.can_generate());
    }

    #[tokio::test]
    async fn second_trigger_while_busy_is_ignored() {
        let session = ready_session().await;
        let started = Arc::new(Notify::new());
        let gate = Arc::new(Notify::new());
        let uc = Arc::new(GeneratePoem::new(
            session.clone(),
            Arc::new(GatedGenerator {
                started: started.clone(),
                gate: gate.clone(),
                reply: Ok(GeneratePoemOutput { poem: "Once.".into() }),
            }),
        ));

        let first = {
            let uc = uc.clone();
            tokio::spawn(async move { uc.execute().await })
        };
        started.notified().await;

        assert_eq!(uc.execute().await, Err(SessionError::Busy));

        gate.notify_one();
        assert_eq!(first.await.unwrap().as_deref(), Ok("Once."));
        assert!(!session.snapshot().busy);
    }
}
