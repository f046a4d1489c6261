//! QR join channel: encodes the join URL a session is reachable under,
//! builds the external image-renderer URL for it, validates scanned
//! payloads, and runs the cooperative frame-sampling loop. Camera capture
//! and barcode decoding are external collaborators behind `FrameSource`.

use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use std::time::Duration;
use tokio::sync::watch;
use url::Url;

/// Delay between sampled frames so the loop never spins the device.
const FRAME_INTERVAL: Duration = Duration::from_millis(200);

/// Where a valid scanned code points.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinTarget {
    /// Absent for codes in the legacy single-segment form.
    pub owner_id: Option<String>,
    pub session_id: String,
}

/// `{base}/join/{owner_id}/{session_id}`.
pub fn join_url(base: &str, owner_id: &str, session_id: &str) -> String {
    format!("{}/join/{owner_id}/{session_id}", base.trim_end_matches('/'))
}

/// URL of the externally rendered QR image for a join URL.
pub fn image_url(join_url: &str) -> String {
    let data = utf8_percent_encode(join_url, NON_ALPHANUMERIC);
    format!(
        "{}?data={data}&size=256x256&bgcolor=f0f0f0",
        util::config::qr_render_url().trim_end_matches('/')
    )
}

/// Validates a scanned payload. Accepts absolute URLs whose path is
/// `/join/{owner}/{session}`, or the older `/join/{session}` form.
/// Everything else is rejected so the sampling loop keeps going.
pub fn parse_scanned(payload: &str) -> Option<JoinTarget> {
    let url = Url::parse(payload).ok()?;
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["join", owner, session] => Some(JoinTarget {
            owner_id: Some((*owner).to_string()),
            session_id: (*session).to_string(),
        }),
        ["join", session] => Some(JoinTarget {
            owner_id: None,
            session_id: (*session).to_string(),
        }),
        _ => None,
    }
}

/// One sampled camera frame after barcode decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Decoded(String),
    NoCode,
}

/// Supplies decoded frames; `None` means the source is exhausted (camera
/// closed). Dropping the source releases the camera.
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self) -> Option<Frame>;
}

/// Samples frames at a bounded rate until a frame decodes to a valid join
/// target, the stop signal fires, or the source runs out. Invalid decodes
/// are skipped, not errors.
pub async fn scan_frames(
    source: &mut dyn FrameSource,
    stop: &mut watch::Receiver<bool>,
) -> Option<JoinTarget> {
    if *stop.borrow() {
        return None;
    }
    loop {
        let frame = tokio::select! {
            frame = source.next_frame() => frame?,
            _ = stop.changed() => {
                if *stop.borrow() {
                    return None;
                }
                continue;
            }
        };

        if let Frame::Decoded(payload) = frame {
            if let Some(target) = parse_scanned(&payload) {
                return Some(target);
            }
        }
        tokio::time::sleep(FRAME_INTERVAL).await;
    }
}
