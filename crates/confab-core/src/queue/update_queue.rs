//! Single-consumer coalescing queue for external status writes.
//!
//! One [`UpdateQueue`] instance is owned by the application context and
//! shared by reference; there is no process-wide singleton. Internally a
//! mutex-guarded map from [`ResourceKey`] to the pending request plus an
//! insertion-ordered key list feed one lazily-started processing task.
//!
//! Request lifecycle: `Queued -> (InFlight | Superseded | Aborted) ->
//! (Resolved | Aborted | Upstream)`. Entries for different keys dispatch in
//! FIFO insertion order; entries for the same key coalesce so only the most
//! recently enqueued intent is ever sent, with at most one call per key in
//! flight.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, Mutex};
use tracing::debug;
use uuid::Uuid;

use crate::error::UpdateError;
use crate::queue::cancel::CancelToken;

/// Composite identifier for the unit of serialization and coalescing.
///
/// A struct key rather than a concatenated string, so ids containing the
/// would-be separator cannot collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub calendar_id: String,
    pub event_uid: String,
}

impl ResourceKey {
    pub fn new(calendar_id: impl Into<String>, event_uid: impl Into<String>) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            event_uid: event_uid.into(),
        }
    }
}

/// RSVP intent carried to the external write API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsvpStatus {
    Accepted,
    Declined,
    Tentative,
}

/// The status-update payload for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePayload {
    pub status: RsvpStatus,
    pub note: Option<String>,
}

impl UpdatePayload {
    pub fn new(status: RsvpStatus) -> Self {
        Self { status, note: None }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Port for the external write API.
///
/// The queue never retries; implementations must be safe to call once per
/// dispatched intent.
#[async_trait]
pub trait StatusWriter: Send + Sync {
    async fn update_status(
        &self,
        key: &ResourceKey,
        payload: &UpdatePayload,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Queue tuning knobs.
#[derive(Debug, Clone)]
pub struct UpdateQueueConfig {
    /// Minimum pause between consecutive dispatches, throttling load on the
    /// external write API.
    pub dispatch_delay: Duration,
}

impl Default for UpdateQueueConfig {
    fn default() -> Self {
        Self {
            dispatch_delay: Duration::from_millis(100),
        }
    }
}

/// Completion handle returned by [`UpdateQueue::enqueue`].
pub struct UpdateHandle {
    id: Uuid,
    rx: oneshot::Receiver<Result<(), UpdateError>>,
}

impl UpdateHandle {
    /// Id of the underlying request, for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Wait for the request to settle.
    pub async fn outcome(self) -> Result<(), UpdateError> {
        // The sender only disappears unsettled if the queue itself is torn
        // down mid-flight; report that as an abort.
        self.rx.await.unwrap_or(Err(UpdateError::Aborted))
    }
}

struct QueuedEntry {
    id: Uuid,
    payload: UpdatePayload,
    token: CancelToken,
    result_tx: oneshot::Sender<Result<(), UpdateError>>,
    // Dropped when the entry settles, which tears down its cancel watcher.
    _settled_tx: oneshot::Sender<()>,
}

struct CurrentEntry {
    id: Uuid,
    key: ResourceKey,
    aborted: bool,
    result_tx: oneshot::Sender<Result<(), UpdateError>>,
    _settled_tx: oneshot::Sender<()>,
}

#[derive(Default)]
struct State {
    /// Cross-key dispatch order. Each queued key appears exactly once.
    order: VecDeque<ResourceKey>,
    queued: HashMap<ResourceKey, QueuedEntry>,
    current: Option<CurrentEntry>,
    /// Whether a processing loop is running; guards against double-starts.
    running: bool,
}

struct Inner {
    writer: Arc<dyn StatusWriter>,
    config: UpdateQueueConfig,
    state: Mutex<State>,
}

/// Per-resource, single-in-flight coalescing queue.
#[derive(Clone)]
pub struct UpdateQueue {
    inner: Arc<Inner>,
}

impl UpdateQueue {
    pub fn new(writer: Arc<dyn StatusWriter>) -> Self {
        Self::with_config(writer, UpdateQueueConfig::default())
    }

    pub fn with_config(writer: Arc<dyn StatusWriter>, config: UpdateQueueConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                writer,
                config,
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Enqueue a status update for `key`, coalescing with any pending one.
    ///
    /// A still-queued request under the same key is rejected `Superseded`
    /// and replaced in place (it keeps its position in the dispatch order).
    /// A request currently in flight under the same key cannot be recalled;
    /// it is flagged so its completion reports `Aborted`, and the new
    /// request queues behind it.
    pub async fn enqueue(
        &self,
        key: ResourceKey,
        payload: UpdatePayload,
        token: CancelToken,
    ) -> UpdateHandle {
        let id = Uuid::new_v4();
        let (result_tx, result_rx) = oneshot::channel();
        let (settled_tx, settled_rx) = oneshot::channel();

        let entry = QueuedEntry {
            id,
            payload,
            token: token.clone(),
            result_tx,
            _settled_tx: settled_tx,
        };

        {
            let mut st = self.inner.state.lock().await;

            if let Some(old) = st.queued.insert(key.clone(), entry) {
                debug!(request_id = %old.id, ?key, "queued update superseded");
                let _ = old.result_tx.send(Err(UpdateError::Superseded));
            } else {
                if let Some(current) = st.current.as_mut() {
                    if current.key == key {
                        debug!(request_id = %current.id, ?key, "in-flight update flagged aborted");
                        current.aborted = true;
                    }
                }
                st.order.push_back(key.clone());
            }

            if !st.running {
                st.running = true;
                tokio::spawn(Inner::run(self.inner.clone()));
            }
        }

        // Watch the token until the request settles; a fired token must pull
        // a queued entry out before it ever reaches the external API.
        let inner = self.inner.clone();
        let watch_key = key;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => inner.handle_cancel(id, &watch_key).await,
                _ = settled_rx => {}
            }
        });

        UpdateHandle { id, rx: result_rx }
    }

    /// Queued entries plus one if a request is in flight. Exact at every
    /// observation point.
    pub async fn pending_count(&self) -> usize {
        let st = self.inner.state.lock().await;
        st.queued.len() + usize::from(st.current.is_some())
    }
}

impl Inner {
    /// React to a fired cancel token for request `id`.
    async fn handle_cancel(&self, id: Uuid, key: &ResourceKey) {
        let mut st = self.state.lock().await;

        // Still queued: remove and reject before dispatch. Match on id so a
        // superseding entry under the same key is left alone.
        if st.queued.get(key).is_some_and(|e| e.id == id) {
            if let Some(entry) = st.queued.remove(key) {
                st.order.retain(|k| k != key);
                debug!(request_id = %id, ?key, "queued update cancelled");
                let _ = entry.result_tx.send(Err(UpdateError::Aborted));
            }
            return;
        }

        // In flight: cannot be recalled, only its reported outcome changes.
        if let Some(current) = st.current.as_mut() {
            if current.id == id {
                current.aborted = true;
            }
        }
    }

    /// Single processing loop per queue instance. Exits when the queue is
    /// empty; restarted lazily by the next enqueue.
    async fn run(self: Arc<Self>) {
        loop {
            let (key, payload) = {
                let mut st = self.state.lock().await;
                loop {
                    let Some(key) = st.order.pop_front() else {
                        st.running = false;
                        return;
                    };
                    let Some(entry) = st.queued.remove(&key) else {
                        continue;
                    };

                    // Token fired between enqueue and dispatch.
                    if entry.token.is_cancelled() {
                        debug!(request_id = %entry.id, ?key, "skipping cancelled update");
                        let _ = entry.result_tx.send(Err(UpdateError::Aborted));
                        continue;
                    }

                    debug!(request_id = %entry.id, ?key, "dispatching update");
                    st.current = Some(CurrentEntry {
                        id: entry.id,
                        key: key.clone(),
                        aborted: false,
                        result_tx: entry.result_tx,
                        _settled_tx: entry._settled_tx,
                    });
                    break (key, entry.payload);
                }
            };

            let result = self.writer.update_status(&key, &payload).await;

            let more_pending = {
                let mut st = self.state.lock().await;
                if let Some(current) = st.current.take() {
                    let outcome = if current.aborted {
                        Err(UpdateError::Aborted)
                    } else {
                        result.map_err(|err| UpdateError::Upstream(err.to_string()))
                    };
                    debug!(request_id = %current.id, ?key, ok = outcome.is_ok(), "update settled");
                    let _ = current.result_tx.send(outcome);
                }
                !st.order.is_empty()
            };

            if more_pending {
                tokio::time::sleep(self.config.dispatch_delay).await;
            }
        }
    }
}
