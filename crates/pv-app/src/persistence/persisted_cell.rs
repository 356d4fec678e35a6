//! Reactive value + setter pair bound to one key of a [`DurableKeyedStore`].

use std::fmt;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{mpsc, oneshot, watch, OnceCell};
use tracing::{debug, warn};

use super::DurableKeyedStore;

type Initializer<T> = Arc<dyn Fn() -> T + Send + Sync>;

enum WriteCommand<T> {
    Persist(Arc<T>),
    Flush(oneshot::Sender<()>),
}

struct Hydrated<T> {
    value: watch::Sender<Arc<T>>,
    writer: mpsc::UnboundedSender<WriteCommand<T>>,
}

/// A value that hydrates lazily from durable storage and writes through on
/// every mutation.
///
/// - The store is read once, on first access. A detached store yields the
///   initial value and is not consulted again for the lifetime of the cell.
/// - [`update`](Self::update) recomputes synchronously from the latest value,
///   so rapid successive updates never lose each other.
/// - Persistence runs on a background task in setter order; callers never
///   wait for it. [`flush`](Self::flush) waits for everything queued so far.
pub struct PersistedCell<T> {
    key: Arc<str>,
    store: DurableKeyedStore,
    init: Initializer<T>,
    state: OnceCell<Hydrated<T>>,
}

impl<T> PersistedCell<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(store: DurableKeyedStore, key: impl Into<String>, initial: T) -> Self
    where
        T: Clone,
    {
        Self::with_initializer(store, key, move || initial.clone())
    }

    pub fn with_initializer<F>(store: DurableKeyedStore, key: impl Into<String>, init: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            key: Arc::from(key.into()),
            store,
            init: Arc::new(init),
            state: OnceCell::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_hydrated(&self) -> bool {
        self.state.initialized()
    }

    /// Current value.
    pub async fn get(&self) -> Arc<T> {
        Arc::clone(&self.hydrated().await.value.borrow())
    }

    /// Receiver notified after every mutation.
    pub async fn subscribe(&self) -> watch::Receiver<Arc<T>> {
        self.hydrated().await.value.subscribe()
    }

    /// Replaces the value.
    pub async fn set(&self, value: T) -> Arc<T> {
        self.update(move |_| value).await
    }

    /// Computes the next value from the latest one and persists it.
    pub async fn update<F>(&self, f: F) -> Arc<T>
    where
        F: FnOnce(&T) -> T,
    {
        let hydrated = self.hydrated().await;
        let mut next = None;

        // The snapshot is queued while the value lock is held, so the write
        // order always matches the order of updates.
        hydrated.value.send_modify(|current| {
            let value = Arc::new(f(current.as_ref()));
            *current = Arc::clone(&value);
            if hydrated
                .writer
                .send(WriteCommand::Persist(Arc::clone(&value)))
                .is_err()
            {
                warn!(key = %self.key, "Persisted cell writer is gone; value not persisted");
            }
            next = Some(value);
        });

        match next {
            Some(value) => value,
            None => Arc::clone(&hydrated.value.borrow()),
        }
    }

    /// Waits until every write queued before this call has reached the store.
    pub async fn flush(&self) {
        let Some(hydrated) = self.state.get() else {
            return;
        };
        let (ack_tx, ack_rx) = oneshot::channel();
        if hydrated.writer.send(WriteCommand::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    async fn hydrated(&self) -> &Hydrated<T> {
        self.state
            .get_or_init(|| async {
                let init = Arc::clone(&self.init);
                let value = self.store.read(&self.key, move || init()).await;
                debug!(
                    key = %self.key,
                    attached = self.store.is_attached(),
                    "Hydrated persisted cell"
                );

                let (writer, rx) = mpsc::unbounded_channel();
                tokio::spawn(run_writer(Arc::clone(&self.key), self.store.clone(), rx));

                let (value, _) = watch::channel(Arc::new(value));
                Hydrated { value, writer }
            })
            .await
    }
}

impl<T> fmt::Debug for PersistedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedCell")
            .field("key", &self.key)
            .field("store", &self.store)
            .field("hydrated", &self.state.initialized())
            .finish()
    }
}

async fn run_writer<T>(
    key: Arc<str>,
    store: DurableKeyedStore,
    mut rx: mpsc::UnboundedReceiver<WriteCommand<T>>,
) where
    T: Serialize + Send + Sync + 'static,
{
    while let Some(command) = rx.recv().await {
        match command {
            WriteCommand::Persist(mut latest) => {
                // Only the newest queued snapshot needs to hit the store.
                let mut acks = Vec::new();
                loop {
                    match rx.try_recv() {
                        Ok(WriteCommand::Persist(next)) => latest = next,
                        Ok(WriteCommand::Flush(ack)) => {
                            acks.push(ack);
                            break;
                        }
                        Err(_) => break,
                    }
                }

                store.write(&key, latest.as_ref()).await;
                for ack in acks {
                    let _ = ack.send(());
                }
            }
            WriteCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!(key = %key, "Persisted cell writer stopped");
}
