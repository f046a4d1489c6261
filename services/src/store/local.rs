//! Per-device file backend: sessions and records persisted as JSON under a
//! storage root. Change notifications only reach subscribers in the same
//! process; nothing crosses device boundaries.

use super::{SessionStore, StoreEvent, SubmitOutcome, WatchHub};
use crate::error::AttendanceError;
use crate::types::{AttendanceRecord, ClassSession};
use async_trait::async_trait;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};
use uuid::Uuid;

#[derive(Clone)]
pub struct LocalStore {
    root: PathBuf,
    // Serializes every check-then-write sequence. File IO here is small and
    // rare enough that one lock is fine.
    lock: Arc<Mutex<()>>,
    hub: WatchHub,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AttendanceError> {
        let root = root.into();
        fs::create_dir_all(root.join("sessions"))?;
        fs::create_dir_all(root.join("records"))?;
        Ok(Self {
            root,
            lock: Arc::new(Mutex::new(())),
            hub: WatchHub::default(),
        })
    }

    fn session_path(&self, session_id: &str) -> PathBuf {
        self.root.join("sessions").join(format!("{session_id}.json"))
    }

    fn records_path(&self, session_id: &str) -> PathBuf {
        self.root.join("records").join(format!("{session_id}.json"))
    }

    fn read_session(&self, path: &Path) -> Result<Option<ClassSession>, AttendanceError> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        let session = serde_json::from_str(&raw)
            .map_err(|e| AttendanceError::SubmissionFailed(format!("corrupt session file: {e}")))?;
        Ok(Some(session))
    }

    fn read_records(&self, session_id: &str) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        let path = self.records_path(session_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)?;
        let records = serde_json::from_str(&raw)
            .map_err(|e| AttendanceError::SubmissionFailed(format!("corrupt records file: {e}")))?;
        Ok(records)
    }

    fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), AttendanceError> {
        let raw = serde_json::to_string_pretty(value)
            .map_err(|e| AttendanceError::SubmissionFailed(e.to_string()))?;
        fs::write(path, raw)?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for LocalStore {
    async fn get_session(
        &self,
        owner_id: &str,
        session_id: &str,
    ) -> Result<Option<ClassSession>, AttendanceError> {
        let _guard = self.lock.lock().await;
        let found = self.read_session(&self.session_path(session_id))?;
        Ok(found.filter(|s| s.owner_id == owner_id))
    }

    async fn create_session(&self, owner_id: &str) -> Result<ClassSession, AttendanceError> {
        let session = ClassSession {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            start_time: Utc::now(),
            active: true,
        };
        let _guard = self.lock.lock().await;
        Self::write_json(&self.session_path(&session.id), &session)?;
        Ok(session)
    }

    async fn delete_session(
        &self,
        owner_id: &str,
        session_id: &str,
    ) -> Result<(), AttendanceError> {
        let _guard = self.lock.lock().await;
        let path = self.session_path(session_id);
        match self.read_session(&path)? {
            Some(s) if s.owner_id == owner_id => {
                fs::remove_file(&path)?;
                let records = self.records_path(session_id);
                if records.exists() {
                    fs::remove_file(&records)?;
                }
                // Same ordering rule as `submit_record`: notify under the lock.
                self.hub.session_deleted(session_id).await;
            }
            // Deleting a session that is already gone is a no-op, not an error.
            _ => {}
        }
        Ok(())
    }

    async fn submit_record(
        &self,
        owner_id: &str,
        session_id: &str,
        student_identity: Option<&str>,
        display_name: &str,
    ) -> Result<SubmitOutcome, AttendanceError> {
        let _guard = self.lock.lock().await;
        let session = self.read_session(&self.session_path(session_id))?;
        if !session.is_some_and(|s| s.owner_id == owner_id) {
            return Ok(SubmitOutcome::SessionNotFound);
        }

        let dedup_key = AttendanceRecord::dedup_key_for(student_identity, display_name);
        let mut records = self.read_records(session_id)?;
        if records.iter().any(|r| r.dedup_key == dedup_key) {
            return Ok(SubmitOutcome::AlreadyRegistered);
        }

        let record = AttendanceRecord {
            session_id: session_id.to_string(),
            dedup_key,
            student_name: display_name.to_string(),
            student_identity: student_identity.map(|s| s.to_string()),
            joined_at: Utc::now(),
        };
        records.push(record.clone());
        Self::write_json(&self.records_path(session_id), &records)?;
        // Publish while still holding the lock so watchers observe events in
        // file commit order.
        self.hub.record_added(&record).await;
        Ok(SubmitOutcome::Recorded(record))
    }

    async fn list_records(
        &self,
        _owner_id: &str,
        session_id: &str,
    ) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        let _guard = self.lock.lock().await;
        // Records are appended in commit order, so the file is already sorted.
        self.read_records(session_id)
    }

    async fn watch_records(
        &self,
        _owner_id: &str,
        session_id: &str,
    ) -> broadcast::Receiver<StoreEvent> {
        self.hub.subscribe(&WatchHub::records_topic(session_id)).await
    }

    async fn watch_session(
        &self,
        _owner_id: &str,
        session_id: &str,
    ) -> broadcast::Receiver<StoreEvent> {
        self.hub.subscribe(&WatchHub::session_topic(session_id)).await
    }
}
