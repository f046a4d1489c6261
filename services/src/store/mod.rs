//! Storage contract for sessions and attendance records.
//!
//! One interface, two interchangeable backends: a shared database
//! (`RemoteStore`) reachable by every client, and a per-device file store
//! (`LocalStore`). Application logic depends only on the trait.

pub mod local;
pub mod remote;

pub use local::LocalStore;
pub use remote::RemoteStore;

use crate::error::AttendanceError;
use crate::types::{AttendanceRecord, ClassSession};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Change notification delivered through `watch_records` / `watch_session`.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    RecordAdded(AttendanceRecord),
    SessionDeleted { session_id: String },
}

/// Result of a dedup-checked attendance submission.
///
/// `AlreadyRegistered` is informational — the student is present either way.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Recorded(AttendanceRecord),
    AlreadyRegistered,
    SessionNotFound,
}

/// The capability set every backend must provide.
///
/// Consistency is only as strong as the backend: the remote store gives
/// read-your-own-write for the submitting client; the local store only
/// notifies subscribers on the same device and makes no cross-device
/// promises (a property of that backend choice, not a bug).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Existence check; `None` means the session ended or never existed.
    async fn get_session(
        &self,
        owner_id: &str,
        session_id: &str,
    ) -> Result<Option<ClassSession>, AttendanceError>;

    /// Creates a session with a fresh opaque token, the current time as
    /// start time, and `active = true`.
    async fn create_session(&self, owner_id: &str) -> Result<ClassSession, AttendanceError>;

    /// Deletes the session and (by cascade) its records. Idempotent.
    async fn delete_session(
        &self,
        owner_id: &str,
        session_id: &str,
    ) -> Result<(), AttendanceError>;

    /// Dedup-checked, identity-keyed insert. The check and the insert are a
    /// single logical transaction: concurrent submissions by the same
    /// identity never produce two records.
    async fn submit_record(
        &self,
        owner_id: &str,
        session_id: &str,
        student_identity: Option<&str>,
        display_name: &str,
    ) -> Result<SubmitOutcome, AttendanceError>;

    /// All records of the session in ascending join-time order.
    async fn list_records(
        &self,
        owner_id: &str,
        session_id: &str,
    ) -> Result<Vec<AttendanceRecord>, AttendanceError>;

    /// Live feed of `RecordAdded` (and a final `SessionDeleted`) for one
    /// session, in store commit order. Dropping the receiver unsubscribes.
    async fn watch_records(&self, owner_id: &str, session_id: &str)
    -> broadcast::Receiver<StoreEvent>;

    /// Live feed of lifecycle events (`SessionDeleted`) for one session.
    async fn watch_session(&self, owner_id: &str, session_id: &str)
    -> broadcast::Receiver<StoreEvent>;
}

/// Topic-keyed fan-out of `StoreEvent`s, shared by both backends.
///
/// Same shape as the WebSocket manager: lazily created broadcast channels,
/// removed once the last subscriber is gone.
#[derive(Clone, Default)]
pub(crate) struct WatchHub {
    inner: Arc<RwLock<HashMap<String, broadcast::Sender<StoreEvent>>>>,
}

impl WatchHub {
    pub(crate) fn records_topic(session_id: &str) -> String {
        format!("records:{session_id}")
    }

    pub(crate) fn session_topic(session_id: &str) -> String {
        format!("session:{session_id}")
    }

    pub(crate) async fn subscribe(&self, topic: &str) -> broadcast::Receiver<StoreEvent> {
        let mut map = self.inner.write().await;
        map.entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(100).0)
            .subscribe()
    }

    pub(crate) async fn publish(&self, topic: &str, event: StoreEvent) {
        let mut map = self.inner.write().await;
        if let Some(sender) = map.get(topic) {
            let _ = sender.send(event);
            if sender.receiver_count() == 0 {
                map.remove(topic);
            }
        }
    }

    /// Announce a committed record on the records topic.
    pub(crate) async fn record_added(&self, record: &AttendanceRecord) {
        self.publish(
            &Self::records_topic(&record.session_id),
            StoreEvent::RecordAdded(record.clone()),
        )
        .await;
    }

    /// Announce deletion on both topics so record feeds terminate too.
    pub(crate) async fn session_deleted(&self, session_id: &str) {
        let event = StoreEvent::SessionDeleted {
            session_id: session_id.to_string(),
        };
        self.publish(&Self::session_topic(session_id), event.clone())
            .await;
        self.publish(&Self::records_topic(session_id), event).await;
    }
}
