//! Lecturer-side session controller: owns the "current session" reference,
//! the proximity advertisement lifetime, and the live attendance feed.

use crate::error::AttendanceError;
use crate::proximity::{AdvertiseGuard, ProximityRadio, format_payload};
use crate::store::{SessionStore, StoreEvent};
use crate::types::{AttendanceRecord, ClassSession};
use chrono::Utc;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};
use tracing::warn;

/// Persisted pointer to an owner's running session. Explicit load/save so
/// the reference survives a restart of the lecturer device.
#[derive(Clone)]
pub struct CurrentSessionRef {
    root: PathBuf,
}

impl CurrentSessionRef {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AttendanceError> {
        let root = root.into().join("current");
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path(&self, owner_id: &str) -> PathBuf {
        self.root.join(format!("{owner_id}.json"))
    }

    pub fn load(&self, owner_id: &str) -> Result<Option<String>, AttendanceError> {
        let path = self.path(owner_id);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        Ok(Some(raw.trim().to_string()).filter(|s| !s.is_empty()))
    }

    pub fn save(&self, owner_id: &str, session_id: &str) -> Result<(), AttendanceError> {
        fs::write(self.path(owner_id), session_id)?;
        Ok(())
    }

    pub fn clear(&self, owner_id: &str) -> Result<(), AttendanceError> {
        let path = self.path(owner_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Snapshot of a session's records plus a live subscription for everything
/// committed after it. Dropping the feed releases the watch.
pub struct AttendanceFeed {
    pub snapshot: Vec<AttendanceRecord>,
    pub events: broadcast::Receiver<StoreEvent>,
}

pub struct SessionService<S: SessionStore> {
    store: Arc<S>,
    radio: Arc<dyn ProximityRadio>,
    current: CurrentSessionRef,
    // One advertisement per owner; replacing or removing the guard stops it.
    guards: Arc<Mutex<HashMap<String, AdvertiseGuard>>>,
}

impl<S: SessionStore + 'static> SessionService<S> {
    pub fn new(
        store: Arc<S>,
        radio: Arc<dyn ProximityRadio>,
        storage_root: impl Into<PathBuf>,
    ) -> Result<Self, AttendanceError> {
        Ok(Self {
            store,
            radio,
            current: CurrentSessionRef::new(storage_root)?,
            guards: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Creates a session for the owner, persists the current-session
    /// reference and starts the proximity advertisement. A radio without
    /// broadcast capability degrades to QR-only joining.
    pub async fn start_session(&self, owner_id: &str) -> Result<ClassSession, AttendanceError> {
        if owner_id.trim().is_empty() {
            return Err(AttendanceError::AuthUnavailable);
        }

        let session = self.store.create_session(owner_id).await?;
        self.current.save(owner_id, &session.id)?;

        match self.radio.advertise(&format_payload(&session.id)) {
            Ok(guard) => {
                self.guards.lock().await.insert(owner_id.to_string(), guard);
            }
            Err(err) => {
                warn!(owner_id, session_id = %session.id, "proximity advertising unavailable: {err}");
            }
        }

        self.spawn_lifecycle_watch(owner_id.to_string(), session.id.clone())
            .await;
        Ok(session)
    }

    /// Clears the current-session reference and drops the advertisement if
    /// the session disappears out from under us (deleted elsewhere).
    async fn spawn_lifecycle_watch(&self, owner_id: String, session_id: String) {
        let mut rx = self.store.watch_session(&owner_id, &session_id).await;
        let current = self.current.clone();
        let guards = Arc::clone(&self.guards);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(StoreEvent::SessionDeleted { session_id: gone }) if gone == session_id => {
                        if current.load(&owner_id).ok().flatten().as_deref() == Some(&session_id) {
                            let _ = current.clear(&owner_id);
                        }
                        guards.lock().await.remove(&owner_id);
                        break;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// The owner's running session, if any. A stale reference (session
    /// deleted elsewhere) is cleared on sight.
    pub async fn current_session(
        &self,
        owner_id: &str,
    ) -> Result<Option<ClassSession>, AttendanceError> {
        let Some(session_id) = self.current.load(owner_id)? else {
            return Ok(None);
        };
        match self.store.get_session(owner_id, &session_id).await? {
            Some(session) => Ok(Some(session)),
            None => {
                self.current.clear(owner_id)?;
                self.guards.lock().await.remove(owner_id);
                Ok(None)
            }
        }
    }

    /// Ends the owner's running session: deletes it (records go with it),
    /// clears the reference, stops the advertisement. Idempotent.
    pub async fn end_session(&self, owner_id: &str) -> Result<(), AttendanceError> {
        if let Some(session_id) = self.current.load(owner_id)? {
            self.store.delete_session(owner_id, &session_id).await?;
            self.current.clear(owner_id)?;
        }
        self.guards.lock().await.remove(owner_id);
        Ok(())
    }

    /// Ends a specific session by id, whether or not it is the current one.
    pub async fn end_session_by_id(
        &self,
        owner_id: &str,
        session_id: &str,
    ) -> Result<(), AttendanceError> {
        self.store.delete_session(owner_id, session_id).await?;
        if self.current.load(owner_id)?.as_deref() == Some(session_id) {
            self.current.clear(owner_id)?;
            self.guards.lock().await.remove(owner_id);
        }
        Ok(())
    }

    /// Current records plus a live feed of later commits. The subscription
    /// starts before the snapshot is read so nothing slips between them.
    pub async fn observe_attendance(
        &self,
        owner_id: &str,
        session_id: &str,
    ) -> Result<AttendanceFeed, AttendanceError> {
        if self.store.get_session(owner_id, session_id).await?.is_none() {
            return Err(AttendanceError::SessionNotFound);
        }
        let events = self.store.watch_records(owner_id, session_id).await;
        let snapshot = self.store.list_records(owner_id, session_id).await?;
        Ok(AttendanceFeed { snapshot, events })
    }

    /// Lifecycle feed for one session; yields `SessionDeleted` when it ends.
    pub async fn observe_lifecycle(
        &self,
        owner_id: &str,
        session_id: &str,
    ) -> broadcast::Receiver<StoreEvent> {
        self.store.watch_session(owner_id, session_id).await
    }

    pub async fn list_records(
        &self,
        owner_id: &str,
        session_id: &str,
    ) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        if self.store.get_session(owner_id, session_id).await?.is_none() {
            return Err(AttendanceError::SessionNotFound);
        }
        self.store.list_records(owner_id, session_id).await
    }
}

/// Whole seconds since the session started. Derived, never stored.
pub fn elapsed_seconds(session: &ClassSession) -> i64 {
    (Utc::now() - session.start_time).num_seconds().max(0)
}

/// `mm:ss` as shown on the lecturer dashboard.
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
