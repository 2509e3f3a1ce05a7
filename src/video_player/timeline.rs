// SPDX-License-Identifier: MPL-2.0
//! Timeline scrubbing and progress.
//!
//! Pointer positions are mapped to a fraction of the timeline bar. The
//! fraction is not clamped here; seeking clamps it.

/// Page-relative horizontal extent of the timeline bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineBounds {
    pub left: f64,
    pub width: f64,
}

impl TimelineBounds {
    #[must_use]
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Maps a page X coordinate onto the bar. `None` if the bar has no width.
    #[must_use]
    pub fn fraction_at(self, pointer_x: f64) -> Option<f64> {
        if self.width > 0.0 {
            Some((pointer_x - self.left) / self.width)
        } else {
            None
        }
    }
}

/// Input device behind a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    /// Touch input has no hover; every move is a drag.
    Touch,
}

/// Pointer-down to pointer-up span on the timeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrubGesture {
    active: bool,
}

impl ScrubGesture {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn begin(&mut self) {
        self.active = true;
    }

    pub fn end(&mut self) {
        self.active = false;
    }

    /// Returns the seek fraction for a move event, or `None` if the move
    /// should not seek (no drag in progress, or no usable bounds).
    #[must_use]
    pub fn on_move(
        &self,
        pointer_x: f64,
        kind: PointerKind,
        bounds: Option<TimelineBounds>,
    ) -> Option<f64> {
        if !self.active && kind != PointerKind::Touch {
            return None;
        }
        bounds?.fraction_at(pointer_x)
    }
}

/// Played portion of the timeline in percent, rounded to two decimals.
///
/// `None` while the duration is unknown.
#[must_use]
pub fn progress_percent(current_secs: f64, duration_secs: f64) -> Option<f64> {
    if !(duration_secs.is_finite() && duration_secs > 0.0) {
        return None;
    }
    let percent = current_secs * 100.0 / duration_secs;
    Some((percent * 100.0).round() / 100.0)
}
