//! Student-side join controller: the step machine a joining device walks
//! through, plus the validated submission path.

use crate::error::AttendanceError;
use crate::store::{SessionStore, SubmitOutcome};
use std::sync::Arc;

/// Shortest display name accepted for an attendance submission.
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 100;

/// Fallback shown on the confirmation page when no name was carried over.
pub const FALLBACK_NAME: &str = "Student";

/// Steps of the join experience, in order. The proximity check is skipped
/// when the scanning radio has no capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStep {
    ProximityCheck,
    QrScan,
    Submitting,
    Success,
}

/// Forward-only step machine; the single backward edge is a failed
/// submission returning to the QR step for a rescan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinFlow {
    step: JoinStep,
}

impl JoinFlow {
    pub fn begin(proximity_available: bool) -> Self {
        Self {
            step: if proximity_available {
                JoinStep::ProximityCheck
            } else {
                JoinStep::QrScan
            },
        }
    }

    pub fn step(&self) -> JoinStep {
        self.step
    }

    /// Proximity confirmed the lecturer is nearby (or the check was waived).
    pub fn proximity_confirmed(&mut self) {
        if self.step == JoinStep::ProximityCheck {
            self.step = JoinStep::QrScan;
        }
    }

    /// A valid join target was scanned and the name form was submitted.
    pub fn submission_started(&mut self) {
        if self.step == JoinStep::QrScan {
            self.step = JoinStep::Submitting;
        }
    }

    /// Recorded or already registered; either way the student is in.
    pub fn submission_succeeded(&mut self) {
        if self.step == JoinStep::Submitting {
            self.step = JoinStep::Success;
        }
    }

    /// Session gone or backend failure; back to the scanner to retry.
    pub fn submission_failed(&mut self) {
        if self.step == JoinStep::Submitting {
            self.step = JoinStep::QrScan;
        }
    }
}

/// Trims and length-checks a display name. Failures carry a field message
/// for the form, never a silent drop.
pub fn validate_name(name: &str) -> Result<&str, AttendanceError> {
    let trimmed = name.trim();
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(AttendanceError::ValidationFailed {
            field: "name",
            message: format!("name must be at least {MIN_NAME_LEN} characters"),
        });
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AttendanceError::ValidationFailed {
            field: "name",
            message: format!("name must be at most {MAX_NAME_LEN} characters"),
        });
    }
    Ok(trimmed)
}

pub struct JoinService<S: SessionStore> {
    store: Arc<S>,
}

impl<S: SessionStore> JoinService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Pure existence check used by the landing page before showing the
    /// name form.
    pub async fn check_session_joinable(
        &self,
        owner_id: &str,
        session_id: &str,
    ) -> Result<bool, AttendanceError> {
        Ok(self.store.get_session(owner_id, session_id).await?.is_some())
    }

    /// Validates the name, then hands off to the store's idempotent submit.
    pub async fn submit_attendance(
        &self,
        owner_id: &str,
        session_id: &str,
        student_identity: Option<&str>,
        name: &str,
    ) -> Result<SubmitOutcome, AttendanceError> {
        let name = validate_name(name)?;
        self.store
            .submit_record(owner_id, session_id, student_identity, name)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RemoteStore;
    use db::test_utils::setup_test_db;

    async fn make_service() -> (Arc<RemoteStore>, JoinService<RemoteStore>) {
        let store = Arc::new(RemoteStore::new(setup_test_db().await));
        (Arc::clone(&store), JoinService::new(store))
    }

    #[test]
    fn flow_walks_forward_through_all_steps() {
        let mut flow = JoinFlow::begin(true);
        assert_eq!(flow.step(), JoinStep::ProximityCheck);
        flow.proximity_confirmed();
        assert_eq!(flow.step(), JoinStep::QrScan);
        flow.submission_started();
        assert_eq!(flow.step(), JoinStep::Submitting);
        flow.submission_succeeded();
        assert_eq!(flow.step(), JoinStep::Success);
    }

    #[test]
    fn flow_skips_proximity_without_capability() {
        let flow = JoinFlow::begin(false);
        assert_eq!(flow.step(), JoinStep::QrScan);
    }

    #[test]
    fn failed_submission_returns_to_the_scanner() {
        let mut flow = JoinFlow::begin(false);
        flow.submission_started();
        flow.submission_failed();
        assert_eq!(flow.step(), JoinStep::QrScan);
    }

    #[test]
    fn out_of_order_transitions_are_ignored() {
        let mut flow = JoinFlow::begin(false);
        flow.submission_succeeded();
        assert_eq!(flow.step(), JoinStep::QrScan);
        flow.proximity_confirmed();
        assert_eq!(flow.step(), JoinStep::QrScan);
    }

    #[test]
    fn name_validation_boundaries() {
        assert!(validate_name("J").is_err());
        assert!(validate_name(" J ").is_err());
        assert_eq!(validate_name("Jo").unwrap(), "Jo");
        assert_eq!(validate_name("  Jane Doe  ").unwrap(), "Jane Doe");
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[tokio::test]
    async fn joinable_tracks_session_existence() {
        let (store, service) = make_service().await;
        let sess = store.create_session("lect-1").await.unwrap();

        assert!(service.check_session_joinable("lect-1", &sess.id).await.unwrap());
        store.delete_session("lect-1", &sess.id).await.unwrap();
        assert!(!service.check_session_joinable("lect-1", &sess.id).await.unwrap());
    }

    #[tokio::test]
    async fn submit_validates_before_touching_the_store() {
        let (store, service) = make_service().await;
        let sess = store.create_session("lect-1").await.unwrap();

        let err = service
            .submit_attendance("lect-1", &sess.id, None, "J")
            .await
            .unwrap_err();
        assert!(matches!(err, AttendanceError::ValidationFailed { field: "name", .. }));
        assert!(store.list_records("lect-1", &sess.id).await.unwrap().is_empty());

        let outcome = service
            .submit_attendance("lect-1", &sess.id, None, "  Jane Doe  ")
            .await
            .unwrap();
        match outcome {
            SubmitOutcome::Recorded(r) => assert_eq!(r.student_name, "Jane Doe"),
            other => panic!("unexpected outcome: {other:?}"),
        }

        // trimmed duplicate hits the same dedup key
        let again = service
            .submit_attendance("lect-1", &sess.id, None, "Jane Doe")
            .await
            .unwrap();
        assert_eq!(again, SubmitOutcome::AlreadyRegistered);
    }
}
