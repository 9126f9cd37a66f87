//! Health verdict inputs.
//!
//! Two independent signals feed the verdict: output bitrate and the playback
//! cursor of the watched media input. Either one failing makes the whole
//! verdict unhealthy.

use serde::Serialize;

/// Why a tick was judged unhealthy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnhealthyReason {
    /// Output bitrate strictly below the threshold.
    LowBitrate { kbps: f64, threshold: u64 },
    /// Cursor missing, or the media input could not be queried.
    CursorUnavailable,
    /// Cursor identical to the previous tick.
    CursorFrozen { cursor: f64 },
}

/// Result of one evaluation. Healthy iff no reason was recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Verdict {
    reasons: Vec<UnhealthyReason>,
}

impl Verdict {
    pub fn healthy(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn reasons(&self) -> &[UnhealthyReason] {
        &self.reasons
    }

    pub fn push(&mut self, reason: UnhealthyReason) {
        self.reasons.push(reason);
    }
}

/// Bitrate check. Equal to the threshold passes.
pub fn evaluate_bitrate(kbps: f64, threshold: u64) -> Option<UnhealthyReason> {
    if kbps < threshold as f64 {
        Some(UnhealthyReason::LowBitrate { kbps, threshold })
    } else {
        None
    }
}

/// Outcome of feeding one cursor reading to the [`FreezeDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorCheck {
    Advancing,
    Frozen(f64),
    Unavailable,
}

/// Remembers the previous cursor to spot a source that stopped moving.
///
/// `None` means unknown: nothing to compare against yet.
#[derive(Debug, Default)]
pub struct FreezeDetector {
    last_cursor: Option<f64>,
}

impl FreezeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `cursor` with the previous reading and remember it.
    ///
    /// A frozen reading leaves the memory as is; a missing one clears it.
    pub fn observe(&mut self, cursor: Option<f64>) -> CursorCheck {
        match cursor {
            None => {
                self.last_cursor = None;
                CursorCheck::Unavailable
            }
            Some(current) if self.last_cursor == Some(current) => CursorCheck::Frozen(current),
            Some(current) => {
                self.last_cursor = Some(current);
                CursorCheck::Advancing
            }
        }
    }

    /// Forget the previous reading. Called whenever the OBS session is lost.
    pub fn reset(&mut self) {
        self.last_cursor = None;
    }

    pub fn last_cursor(&self) -> Option<f64> {
        self.last_cursor
    }
}
