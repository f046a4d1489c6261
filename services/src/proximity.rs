//! Short-range presence channel. A lecturer device advertises an opaque
//! payload carrying the session token; student devices scan for it before
//! the QR step. The platform radio itself is an external collaborator
//! behind the `ProximityRadio` trait.

use std::sync::{Arc, RwLock};
use thiserror::Error;

use crate::error::AttendanceError;

#[derive(Debug, Error)]
pub enum ProximityError {
    /// The device has no usable radio, or permission was denied. Non-fatal:
    /// callers log a warning and continue without the proximity step.
    #[error("proximity capability unavailable: {0}")]
    Unavailable(String),

    #[error("radio failure: {0}")]
    Radio(String),
}

impl From<ProximityError> for AttendanceError {
    fn from(err: ProximityError) -> Self {
        AttendanceError::CapabilityUnavailable(err.to_string())
    }
}

/// Builds the advertised payload, `<tag>:<session_id>`.
pub fn format_payload(session_id: &str) -> String {
    format!("{}:{}", util::config::proximity_tag(), session_id)
}

/// Extracts the session token from a scanned payload. Payloads carrying a
/// different tag belong to someone else and are ignored.
pub fn parse_payload(payload: &str) -> Option<String> {
    let tag = util::config::proximity_tag();
    let rest = payload.strip_prefix(&tag)?.strip_prefix(':')?;
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

/// Result of one scan attempt. An empty airspace is a normal outcome,
/// not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Found(String),
    NoneFound,
}

/// Stops the advertisement when dropped, so every exit path of the session
/// controller turns the broadcast off.
pub struct AdvertiseGuard {
    stop: Option<Box<dyn FnOnce() + Send>>,
}

impl AdvertiseGuard {
    pub fn new(stop: impl FnOnce() + Send + 'static) -> Self {
        Self {
            stop: Some(Box::new(stop)),
        }
    }
}

impl Drop for AdvertiseGuard {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }
}

pub trait ProximityRadio: Send + Sync {
    /// Starts broadcasting `payload` until the returned guard is dropped.
    fn advertise(&self, payload: &str) -> Result<AdvertiseGuard, ProximityError>;

    /// One bounded scan pass over nearby advertisements.
    fn scan(&self) -> Result<ScanOutcome, ProximityError>;
}

/// In-process radio: advertisement and scan share one slot. Used by tests
/// and single-host deployments where lecturer and students talk to the
/// same server process.
#[derive(Clone, Default)]
pub struct LoopbackRadio {
    slot: Arc<RwLock<Option<String>>>,
}

impl LoopbackRadio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProximityRadio for LoopbackRadio {
    fn advertise(&self, payload: &str) -> Result<AdvertiseGuard, ProximityError> {
        {
            let mut slot = self
                .slot
                .write()
                .map_err(|_| ProximityError::Radio("advertisement slot poisoned".to_string()))?;
            *slot = Some(payload.to_string());
        }
        let slot = Arc::clone(&self.slot);
        Ok(AdvertiseGuard::new(move || {
            if let Ok(mut slot) = slot.write() {
                *slot = None;
            }
        }))
    }

    fn scan(&self) -> Result<ScanOutcome, ProximityError> {
        let slot = self
            .slot
            .read()
            .map_err(|_| ProximityError::Radio("advertisement slot poisoned".to_string()))?;
        match slot.as_deref().and_then(parse_payload) {
            Some(session_id) => Ok(ScanOutcome::Found(session_id)),
            None => Ok(ScanOutcome::NoneFound),
        }
    }
}

/// Radio for platforms without Bluetooth support; every call reports the
/// missing capability.
#[derive(Clone, Copy, Default)]
pub struct UnsupportedRadio;

impl ProximityRadio for UnsupportedRadio {
    fn advertise(&self, _payload: &str) -> Result<AdvertiseGuard, ProximityError> {
        Err(ProximityError::Unavailable(
            "bluetooth advertising not supported on this device".to_string(),
        ))
    }

    fn scan(&self) -> Result<ScanOutcome, ProximityError> {
        Err(ProximityError::Unavailable(
            "bluetooth scanning not supported on this device".to_string(),
        ))
    }
}
