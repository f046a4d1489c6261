use thiserror::Error;

/// Domain error taxonomy for the attendance core.
///
/// `AlreadyRegistered` is deliberately *not* here: a duplicate submission is
/// an informational outcome (`store::SubmitOutcome::AlreadyRegistered`), not
/// a failure. No variant is fatal; every caller maps these back to an
/// interactive, retry-capable state.
#[derive(Debug, Error)]
pub enum AttendanceError {
    /// No owner identity could be established (e.g. anonymous sign-in failed).
    /// Operations that require an owner refuse instead of silently degrading.
    #[error("no owner identity could be established")]
    AuthUnavailable,

    /// The target session is absent — it ended or never existed.
    #[error("class session not found")]
    SessionNotFound,

    /// A platform capability (camera, Bluetooth radio) is missing or denied.
    /// Non-fatal: callers surface a warning and continue without it.
    #[error("capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Malformed user input; always carries a field-level message.
    #[error("validation failed for `{field}`: {message}")]
    ValidationFailed {
        field: &'static str,
        message: String,
    },

    /// Generic backend failure while writing a record.
    #[error("submission failed: {0}")]
    SubmissionFailed(String),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AttendanceError {
    /// True for errors the UI reports inline without leaving the current step.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AttendanceError::AuthUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_identity_is_unrecoverable() {
        assert!(!AttendanceError::AuthUnavailable.is_recoverable());
        assert!(AttendanceError::SessionNotFound.is_recoverable());
        assert!(
            AttendanceError::CapabilityUnavailable("no radio".into()).is_recoverable()
        );
        assert!(
            AttendanceError::ValidationFailed {
                field: "name",
                message: "too short".into(),
            }
            .is_recoverable()
        );
    }
}
