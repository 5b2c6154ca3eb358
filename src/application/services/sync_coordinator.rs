//! Sync Coordinator - Keeps each viewing context's working copy consistent
//!
//! Each viewer owns one [`ViewingContext`] and one [`SyncCoordinator`]. Two
//! producers, an interval ticker and a change-notification listener, feed a
//! single queue. One consumer loop drains it and also serves
//! write commands, so every state transition happens in one place:
//!
//! ```text
//! ticker ──────┐
//! listener ────┼──> mpsc queue ──> consumer (IDLE -> SYNCING -> IDLE) ──> watch<Snapshot>
//! SyncHandle ──┘
//! ```
//!
//! Local mode is last-writer-wins on whole-collection snapshots, guarded by
//! `last_applied`. Remote mode replaces the working copy with every fetch and
//! falls back to the local store for a tick whenever the remote call fails.
//! While degraded that way, a remote context also accepts local notifications
//! under the same last-writer-wins rule.
//!
//! Local writes read the entire collection, modify it and write it back with
//! no version token. Two contexts that read the same prior collection can
//! overwrite each other's addition; this race is part of the store contract.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use crate::application::ports::outbound::{
    ChangeNotification, ChangeNotifierPort, EventStorePort, StoreError, StoredCollection,
};
use crate::application::services::transfer_service::{export_json, import_json, TransferError};
use crate::domain::entities::EmotionEvent;
use crate::domain::value_objects::ContextId;

/// Immutable view of the collection shared with renderers
pub type Snapshot = Arc<Vec<EmotionEvent>>;

const QUEUE_CAPACITY: usize = 64;
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error("Sync loop for this viewing context has shut down")]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Local,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
}

/// What a tick or notification did to the working copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Working copy replaced with this many events
    Applied(usize),
    /// Update was not newer than the last applied one
    Discarded,
    /// Store has nothing to offer yet
    NoData,
    /// Store could not be read; already logged
    Failed,
}

/// Where a viewing context reads and writes the collection
#[derive(Clone)]
pub enum SyncBackend {
    Local {
        store: Arc<dyn EventStorePort>,
    },
    Remote {
        remote: Arc<dyn EventStorePort>,
        fallback: Arc<dyn EventStorePort>,
    },
}

impl SyncBackend {
    pub fn mode(&self) -> SyncMode {
        match self {
            Self::Local { .. } => SyncMode::Local,
            Self::Remote { .. } => SyncMode::Remote,
        }
    }
}

/// Per-viewer sync state, constructed once per viewing session
#[derive(Debug, Clone)]
pub struct ViewingContext {
    pub id: ContextId,
    pub poll_interval: Duration,
    state: SyncState,
    last_applied: Option<DateTime<Utc>>,
    degraded: bool,
}

impl ViewingContext {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            id: ContextId::new(),
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
            state: SyncState::Idle,
            last_applied: None,
            degraded: false,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn last_applied(&self) -> Option<DateTime<Utc>> {
        self.last_applied
    }

    /// True while remote reads are failing and the local store is serving them
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

/// Messages drained by the sync loop
pub enum SyncMessage {
    Tick,
    Notification(ChangeNotification),
    Record {
        event: EmotionEvent,
        reply: oneshot::Sender<Result<(), SyncError>>,
    },
    Replace {
        events: Vec<EmotionEvent>,
        reply: oneshot::Sender<Result<(), SyncError>>,
    },
    Clear {
        reply: oneshot::Sender<Result<(), SyncError>>,
    },
}

pub struct SyncCoordinator {
    context: ViewingContext,
    backend: SyncBackend,
    notifier: Arc<dyn ChangeNotifierPort>,
    working_copy: watch::Sender<Snapshot>,
}

impl SyncCoordinator {
    pub fn new(
        context: ViewingContext,
        backend: SyncBackend,
        notifier: Arc<dyn ChangeNotifierPort>,
    ) -> Self {
        let (working_copy, _) = watch::channel(Snapshot::default());
        Self {
            context,
            backend,
            notifier,
            working_copy,
        }
    }

    pub fn context(&self) -> &ViewingContext {
        &self.context
    }

    pub fn mode(&self) -> SyncMode {
        self.backend.mode()
    }

    /// Current working copy
    pub fn snapshot(&self) -> Snapshot {
        self.working_copy.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.working_copy.subscribe()
    }

    /// Timer tick: pull the collection from the backend
    #[instrument(skip(self), fields(context = %self.context.id))]
    pub async fn poll(&mut self) -> SyncOutcome {
        self.begin();
        let outcome = match self.backend.clone() {
            SyncBackend::Local { store } => self.poll_local(store.as_ref()).await,
            SyncBackend::Remote { remote, fallback } => {
                self.poll_remote(remote.as_ref(), fallback.as_ref()).await
            }
        };
        self.finish();
        outcome
    }

    /// Change notification from a sibling context
    pub fn on_notification(&mut self, notification: ChangeNotification) -> SyncOutcome {
        if self.mode() == SyncMode::Remote && !self.context.degraded {
            debug!(context = %self.context.id, "Ignoring change notification while remote is reachable");
            return SyncOutcome::Discarded;
        }
        self.begin();
        let outcome = self.apply_if_newer(notification.collection, notification.sent_at);
        if outcome == SyncOutcome::Discarded {
            debug!(
                context = %self.context.id,
                sender = %notification.sender,
                sent_at = %notification.sent_at,
                "Discarded stale change notification"
            );
        }
        self.finish();
        outcome
    }

    /// Add one event to the collection
    ///
    /// In local mode the new collection is persisted, applied to this context
    /// and broadcast to siblings. In remote mode the append is sent and the
    /// next poll picks up the result.
    #[instrument(skip(self, event), fields(context = %self.context.id, event_id = %event.id))]
    pub async fn record(&mut self, event: EmotionEvent) -> Result<(), SyncError> {
        self.begin();
        let result = match self.backend.clone() {
            SyncBackend::Local { store } => self.record_local(store.as_ref(), event).await,
            SyncBackend::Remote { remote, .. } => remote.append(&event).await.map(|_| ()),
        };
        self.finish();
        result.map_err(|e| {
            error!(error = %e, "Failed to record emotion event");
            SyncError::from(e)
        })
    }

    /// Replace the whole collection
    #[instrument(skip(self, events), fields(context = %self.context.id, count = events.len()))]
    pub async fn replace_all(&mut self, events: Vec<EmotionEvent>) -> Result<(), SyncError> {
        self.begin();
        let result = match self.backend.clone() {
            SyncBackend::Local { store } => match store.replace_all(&events).await {
                Ok(receipt) => {
                    self.commit_local(events, receipt.written_at);
                    Ok(())
                }
                Err(e) => Err(e),
            },
            SyncBackend::Remote { remote, .. } => remote.replace_all(&events).await.map(|_| ()),
        };
        self.finish();
        result.map_err(|e| {
            error!(error = %e, "Failed to replace collection");
            SyncError::from(e)
        })
    }

    /// Remove every event
    #[instrument(skip(self), fields(context = %self.context.id))]
    pub async fn clear(&mut self) -> Result<(), SyncError> {
        self.begin();
        let result = match self.backend.clone() {
            SyncBackend::Local { store } => match store.clear().await {
                Ok(receipt) => {
                    self.commit_local(Vec::new(), receipt.written_at);
                    Ok(())
                }
                Err(e) => Err(e),
            },
            SyncBackend::Remote { remote, .. } => remote.clear().await.map(|_| ()),
        };
        self.finish();
        result.map_err(|e| {
            error!(error = %e, "Failed to clear collection");
            SyncError::from(e)
        })
    }

    /// Handle one queued message
    pub async fn dispatch(&mut self, message: SyncMessage) {
        match message {
            SyncMessage::Tick => {
                self.poll().await;
            }
            SyncMessage::Notification(notification) => {
                self.on_notification(notification);
            }
            SyncMessage::Record { event, reply } => {
                let _ = reply.send(self.record(event).await);
            }
            SyncMessage::Replace { events, reply } => {
                let _ = reply.send(self.replace_all(events).await);
            }
            SyncMessage::Clear { reply } => {
                let _ = reply.send(self.clear().await);
            }
        }
    }

    /// Start the producers and the consumer loop for this context
    pub fn spawn(self) -> SyncHandle {
        let (commands, mut queue) = mpsc::channel::<SyncMessage>(QUEUE_CAPACITY);
        let snapshots = self.working_copy.subscribe();
        let context_id = self.context.id;
        let period = self.context.poll_interval;

        let ticker = {
            let commands = commands.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    interval.tick().await;
                    if commands.send(SyncMessage::Tick).await.is_err() {
                        break;
                    }
                }
            })
        };

        let listener = {
            let mut notifications = self.notifier.subscribe();
            let commands = commands.clone();
            tokio::spawn(async move {
                loop {
                    match notifications.recv().await {
                        Ok(notification) => {
                            if commands
                                .send(SyncMessage::Notification(notification))
                                .await
                                .is_err()
                            {
                                break;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(context = %context_id, skipped, "Notification listener lagged; polling will catch up");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            })
        };

        let mut coordinator = self;
        let consumer = tokio::spawn(async move {
            info!(context = %context_id, mode = ?coordinator.mode(), "Sync loop started");
            while let Some(message) = queue.recv().await {
                coordinator.dispatch(message).await;
            }
            info!(context = %context_id, "Sync loop stopped");
        });

        SyncHandle {
            context_id,
            commands,
            snapshots,
            ticker,
            listener,
            consumer: Some(consumer),
        }
    }

    async fn poll_local(&mut self, store: &dyn EventStorePort) -> SyncOutcome {
        match store.fetch().await {
            Ok(StoredCollection {
                events,
                written_at: Some(written_at),
            }) => self.apply_if_newer(Arc::new(events), written_at),
            Ok(_) => SyncOutcome::NoData,
            Err(e) => {
                warn!(error = %e, "Local store poll failed");
                SyncOutcome::Failed
            }
        }
    }

    async fn poll_remote(
        &mut self,
        remote: &dyn EventStorePort,
        fallback: &dyn EventStorePort,
    ) -> SyncOutcome {
        match remote.fetch().await {
            Ok(collection) => {
                if self.context.degraded {
                    info!("Remote store reachable again");
                    self.context.degraded = false;
                }
                let count = collection.events.len();
                self.replace_working_copy(Arc::new(collection.events));
                SyncOutcome::Applied(count)
            }
            Err(e) => {
                if !self.context.degraded {
                    warn!(error = %e, "Remote store unavailable, reading from local store");
                    self.context.degraded = true;
                }
                self.poll_local(fallback).await
            }
        }
    }

    async fn record_local(
        &mut self,
        store: &dyn EventStorePort,
        event: EmotionEvent,
    ) -> Result<(), StoreError> {
        let mut collection = store.fetch_all().await?;
        collection.push(event);
        let receipt = store.replace_all(&collection).await?;
        self.commit_local(collection, receipt.written_at);
        Ok(())
    }

    /// Apply a persisted local write to this context and notify siblings
    fn commit_local(&mut self, collection: Vec<EmotionEvent>, written_at: DateTime<Utc>) {
        let snapshot = Arc::new(collection);
        self.replace_working_copy(Arc::clone(&snapshot));
        self.context.last_applied = Some(match self.context.last_applied {
            Some(last) => last.max(written_at),
            None => written_at,
        });

        let delivered = self.notifier.publish(ChangeNotification {
            collection: snapshot,
            sent_at: written_at,
            sender: self.context.id,
        });
        debug!(context = %self.context.id, delivered, "Broadcast collection update");
    }

    fn apply_if_newer(&mut self, snapshot: Snapshot, observed_at: DateTime<Utc>) -> SyncOutcome {
        if let Some(last) = self.context.last_applied {
            if observed_at <= last {
                return SyncOutcome::Discarded;
            }
        }
        let count = snapshot.len();
        self.replace_working_copy(snapshot);
        self.context.last_applied = Some(observed_at);
        SyncOutcome::Applied(count)
    }

    fn replace_working_copy(&mut self, snapshot: Snapshot) {
        self.working_copy.send_replace(snapshot);
    }

    fn begin(&mut self) {
        self.context.state = SyncState::Syncing;
    }

    fn finish(&mut self) {
        self.context.state = SyncState::Idle;
    }
}

/// Handle to a running sync loop
///
/// Dropping the handle stops the ticker and the listener; [`SyncHandle::shutdown`]
/// additionally waits for the consumer to finish queued work.
pub struct SyncHandle {
    context_id: ContextId,
    commands: mpsc::Sender<SyncMessage>,
    snapshots: watch::Receiver<Snapshot>,
    ticker: JoinHandle<()>,
    listener: JoinHandle<()>,
    consumer: Option<JoinHandle<()>>,
}

impl SyncHandle {
    pub fn context_id(&self) -> ContextId {
        self.context_id
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    pub async fn record(&self, event: EmotionEvent) -> Result<(), SyncError> {
        self.request(|reply| SyncMessage::Record { event, reply }).await
    }

    pub async fn replace_all(&self, events: Vec<EmotionEvent>) -> Result<(), SyncError> {
        self.request(|reply| SyncMessage::Replace { events, reply }).await
    }

    pub async fn clear(&self) -> Result<(), SyncError> {
        self.request(|reply| SyncMessage::Clear { reply }).await
    }

    /// Replace the collection with an exported one
    ///
    /// The text is fully parsed and validated before anything is written.
    pub async fn import(&self, text: &str) -> Result<usize, SyncError> {
        let events = import_json(text)?;
        let count = events.len();
        self.replace_all(events).await?;
        Ok(count)
    }

    /// Export the current working copy
    pub fn export(&self) -> Result<String, SyncError> {
        Ok(export_json(&self.snapshot())?)
    }

    async fn request(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<(), SyncError>>) -> SyncMessage,
    ) -> Result<(), SyncError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| SyncError::Closed)?;
        response.await.map_err(|_| SyncError::Closed)?
    }

    /// Stop the timer, unsubscribe from notifications and wait for the loop to exit
    pub async fn shutdown(mut self) {
        self.stop_producers();
        let consumer = self.consumer.take();
        drop(self);
        if let Some(consumer) = consumer {
            if let Err(e) = consumer.await {
                warn!(error = %e, "Sync loop ended abnormally");
            }
        }
    }

    fn stop_producers(&self) {
        self.ticker.abort();
        self.listener.abort();
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.stop_producers();
    }
}
