// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types.
//!
//! Everything the engine deliberately absorbs instead of failing on ends up
//! here: rejected configurations, stalls, audio snaps and end-of-stream
//! crossings.

use std::time::Instant;

use crate::error::ConfigError;

/// What happened.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEventKind {
    /// A session could not be assembled; the host got an inert error instead.
    ConfigurationRejected { error: ConfigError },

    /// The media source reported it is waiting for data.
    MediaStalled {
        position_secs: f64,
        /// Whether the stall paused playback (`pause_on_stall`).
        paused: bool,
    },

    /// The audio timeline drifted past tolerance and was snapped to video.
    AudioResynced { drift_secs: f64 },

    /// Playback crossed the end of the stream.
    EndOfStream { looped: bool },

    /// A session released its scheduler handles and audio track.
    SessionUnbound,
}

/// A diagnostic event with the instant it was recorded.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    pub at: Instant,
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            at: Instant::now(),
            kind,
        }
    }
}
