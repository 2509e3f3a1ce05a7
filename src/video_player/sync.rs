// SPDX-License-Identifier: MPL-2.0
//! Audio/video drift correction.
//!
//! Video is the master clock. The audio timeline runs on its own and is
//! compared against the video after every advance; once the two diverge by
//! more than [`DRIFT_TOLERANCE_SECS`] the audio is snapped to the video
//! position. There is no rate adjustment and no gradual pull: after a snap
//! both timelines read the same time.
//!
//! Play and seek resync unconditionally, independent of the tolerance.

use super::host::AudioTimeline;
use crate::config::AUDIO_DRIFT_TOLERANCE_SECS;

/// Divergence in seconds tolerated before audio is snapped to video.
pub const DRIFT_TOLERANCE_SECS: f64 = AUDIO_DRIFT_TOLERANCE_SECS;

/// Outcome of a drift check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncAction {
    /// Within tolerance, leave the audio alone.
    InSync,

    /// Audio must jump to the video position.
    /// `drift_secs` is `audio - video` (positive = audio ahead).
    Snap { drift_secs: f64 },
}

/// Decides whether the audio timeline needs correcting.
#[must_use]
pub fn calculate_sync_action(video_secs: f64, audio_secs: f64) -> SyncAction {
    let drift = audio_secs - video_secs;
    if drift.abs() > DRIFT_TOLERANCE_SECS {
        SyncAction::Snap { drift_secs: drift }
    } else {
        SyncAction::InSync
    }
}

/// Steady-state correction, run after each advance.
pub fn correct_drift(audio: &mut dyn AudioTimeline, video_secs: f64) -> SyncAction {
    let action = calculate_sync_action(video_secs, audio.current_time());
    if let SyncAction::Snap { drift_secs } = action {
        audio.set_current_time(video_secs);
        tracing::debug!(drift_secs, video_secs, "snapped audio to video");
    }
    action
}

/// Out-of-band resync used by play and seek.
pub fn resync(audio: &mut dyn AudioTimeline, video_secs: f64) {
    audio.set_current_time(video_secs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    struct Track(f64);

    impl AudioTimeline for Track {
        fn current_time(&self) -> f64 {
            self.0
        }
        fn set_current_time(&mut self, secs: f64) {
            self.0 = secs;
        }
        fn duration(&self) -> f64 {
            60.0
        }
        fn play(&mut self) {}
        fn pause(&mut self) {}
    }

    #[test]
    fn within_tolerance_is_in_sync() {
        assert_eq!(calculate_sync_action(10.0, 10.2), SyncAction::InSync);
        assert_eq!(calculate_sync_action(10.0, 9.8), SyncAction::InSync);
        assert_eq!(calculate_sync_action(10.0, 10.25), SyncAction::InSync);
    }

    #[test]
    fn beyond_tolerance_snaps_either_direction() {
        match calculate_sync_action(10.0, 10.5) {
            SyncAction::Snap { drift_secs } => assert_abs_diff_eq!(drift_secs, 0.5),
            other => panic!("expected snap, got {other:?}"),
        }
        match calculate_sync_action(10.0, 9.0) {
            SyncAction::Snap { drift_secs } => assert_abs_diff_eq!(drift_secs, -1.0),
            other => panic!("expected snap, got {other:?}"),
        }
    }

    #[test]
    fn correction_leaves_zero_divergence() {
        let mut track = Track(4.0);
        let action = correct_drift(&mut track, 5.0);
        assert!(matches!(action, SyncAction::Snap { .. }));
        assert_eq!(track.0, 5.0);
    }

    #[test]
    fn correction_within_tolerance_does_not_touch_audio() {
        let mut track = Track(5.1);
        assert_eq!(correct_drift(&mut track, 5.0), SyncAction::InSync);
        assert_eq!(track.0, 5.1);
    }

    #[test]
    fn resync_is_unconditional() {
        let mut track = Track(5.1);
        resync(&mut track, 5.0);
        assert_eq!(track.0, 5.0);
    }
}
