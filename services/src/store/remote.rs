//! Shared-database backend: one store reachable by the lecturer and every
//! student device, with read-your-own-write consistency for submitters.

use super::{SessionStore, StoreEvent, SubmitOutcome, WatchHub};
use crate::error::AttendanceError;
use crate::types::{AttendanceRecord, ClassSession};
use async_trait::async_trait;
use chrono::Utc;
use db::models::{attendance_record, class_session};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Clone)]
pub struct RemoteStore {
    db: DatabaseConnection,
    hub: WatchHub,
}

impl RemoteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            hub: WatchHub::default(),
        }
    }

    async fn find_session(
        &self,
        owner_id: &str,
        session_id: &str,
    ) -> Result<Option<class_session::Model>, AttendanceError> {
        let found = class_session::Entity::find()
            .filter(class_session::Column::Id.eq(session_id))
            .filter(class_session::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?;
        Ok(found)
    }
}

#[async_trait]
impl SessionStore for RemoteStore {
    async fn get_session(
        &self,
        owner_id: &str,
        session_id: &str,
    ) -> Result<Option<ClassSession>, AttendanceError> {
        Ok(self
            .find_session(owner_id, session_id)
            .await?
            .map(ClassSession::from))
    }

    async fn create_session(&self, owner_id: &str) -> Result<ClassSession, AttendanceError> {
        let now = Utc::now();
        let model = class_session::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            owner_id: Set(owner_id.to_string()),
            start_time: Set(now),
            active: Set(true),
            created_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(ClassSession::from(model))
    }

    async fn delete_session(
        &self,
        owner_id: &str,
        session_id: &str,
    ) -> Result<(), AttendanceError> {
        let res = class_session::Entity::delete_many()
            .filter(class_session::Column::Id.eq(session_id))
            .filter(class_session::Column::OwnerId.eq(owner_id))
            .exec(&self.db)
            .await?;

        // Deleting a session that is already gone is a no-op, not an error.
        if res.rows_affected > 0 {
            self.hub.session_deleted(session_id).await;
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
        if self.find_session(owner_id, session_id).await?.is_none() {
            return Ok(SubmitOutcome::SessionNotFound);
        }

        let dedup_key = AttendanceRecord::dedup_key_for(student_identity, display_name);
        let insert = attendance_record::ActiveModel {
            session_id: Set(session_id.to_string()),
            dedup_key: Set(dedup_key),
            student_name: Set(display_name.to_string()),
            student_identity: Set(student_identity.map(|s| s.to_string())),
            joined_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await;

        match insert {
            Ok(model) => {
                let record = AttendanceRecord::from(model);
                self.hub.record_added(&record).await;
                Ok(SubmitOutcome::Recorded(record))
            }
            // The dedup key is part of the primary key: a duplicate identity
            // surfaces as a pk violation instead of a racy read-then-write.
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Ok(SubmitOutcome::AlreadyRegistered),
                // Session deleted between the existence check and the insert.
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    Ok(SubmitOutcome::SessionNotFound)
                }
                _ => Err(AttendanceError::from(err)),
            },
        }
    }

    async fn list_records(
        &self,
        _owner_id: &str,
        session_id: &str,
    ) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        let rows = attendance_record::Entity::find()
            .filter(attendance_record::Column::SessionId.eq(session_id))
            .order_by_asc(attendance_record::Column::JoinedAt)
            .order_by_asc(attendance_record::Column::DedupKey)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
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
