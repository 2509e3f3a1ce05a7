// SPDX-License-Identifier: MPL-2.0
//! Video playback newtypes.
//!
//! This module provides type-safe wrappers for playback values,
//! ensuring they are always within valid ranges.

// =============================================================================
// FramesPerSecond
// =============================================================================

/// Frame rate bounds (1 to 240 fps).
pub mod fps_bounds {
    /// Minimum frame rate.
    pub const MIN: f64 = 1.0;
    /// Maximum frame rate.
    pub const MAX: f64 = 240.0;
    /// Default frame rate.
    pub const DEFAULT: f64 = 25.0;
}

/// Advance cadence of the render loop.
///
/// This is a throttle, not a frame lock: ticks arriving sooner than one
/// frame interval after the last advance still draw, they just don't move
/// the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramesPerSecond(f64);

impl FramesPerSecond {
    /// Creates a new frame rate, clamping to valid range.
    ///
    /// Non-finite values fall back to the default.
    #[must_use]
    pub fn new(fps: f64) -> Self {
        if fps.is_finite() {
            Self(fps.clamp(fps_bounds::MIN, fps_bounds::MAX))
        } else {
            Self::default()
        }
    }

    /// Returns the frame rate as f64.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the throttle floor in seconds (`1 / fps`).
    #[must_use]
    pub fn frame_interval_secs(self) -> f64 {
        1.0 / self.0
    }
}

impl Default for FramesPerSecond {
    fn default() -> Self {
        Self(fps_bounds::DEFAULT)
    }
}

// =============================================================================
// SeekFraction
// =============================================================================

/// Position on the timeline as a fraction of the duration, within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekFraction(f64);

impl SeekFraction {
    /// Creates a new fraction, clamping to `[0, 1]`. NaN maps to the start.
    #[must_use]
    pub fn new(fraction: f64) -> Self {
        if fraction.is_nan() {
            Self(0.0)
        } else {
            Self(fraction.clamp(0.0, 1.0))
        }
    }

    /// Returns the fraction as f64.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Maps the fraction onto a timeline of the given duration.
    #[must_use]
    pub fn to_time(self, duration_secs: f64) -> f64 {
        duration_secs * self.0
    }
}

impl Default for SeekFraction {
    fn default() -> Self {
        Self(0.0)
    }
}
