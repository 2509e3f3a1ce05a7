// SPDX-License-Identifier: MPL-2.0
//! Playback state machine.
//!
//! `Idle --play--> Playing --pause--> Paused --play--> Playing`.
//! Reaching the end of the stream passes through `Ended` while the end
//! notification is delivered, then settles on `Paused`, or on `Playing`
//! when looping. `stop` forces `Paused`.

/// Represents the current playback state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing has been played yet.
    #[default]
    Idle,
    /// Ticks are advancing the timeline.
    Playing,
    /// Paused by the host, or stopped.
    Paused,
    /// The last tick crossed the end of the stream. Transient.
    Ended,
}

impl PlaybackState {
    /// Returns true if the session is currently playing.
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns true if the session is paused.
    #[must_use]
    pub fn is_paused(self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Returns true if the session reached the end of the stream.
    #[must_use]
    pub fn is_ended(self) -> bool {
        matches!(self, Self::Ended)
    }

    /// Returns true if `play` has never been called.
    #[must_use]
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}
