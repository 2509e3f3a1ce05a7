// SPDX-License-Identifier: MPL-2.0
//! Host collaborators.
//!
//! The engine never touches a DOM, a decoder or a timer API directly. The
//! host hands it implementations of these traits and forwards its own
//! events into the session's `on_*` handlers.

use std::time::{Duration, Instant};

use super::poster::PosterImage;
use super::scheduler::TickHandle;
use super::timeline::TimelineBounds;
use crate::domain::geometry::{OutputGeometry, SourceSize};

/// How much data the media source has buffered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    #[default]
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

/// A host-decoded video: seekable, with a drawable current frame.
pub trait MediaSource {
    /// Current position in seconds.
    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, secs: f64);

    /// Duration in seconds. NaN until metadata is known.
    fn duration(&self) -> f64;

    /// Natural frame size; zero until metadata is known.
    fn natural_size(&self) -> SourceSize;

    fn ready_state(&self) -> ReadyState;

    /// Starts (re)loading the source.
    fn load(&mut self);

    /// Resumes the source's own playback.
    fn play(&mut self);

    fn pause(&mut self);

    /// Shows or hides the media element itself.
    fn set_visible(&mut self, visible: bool);

    /// Sizes the media element. Only used in native-playback mode.
    fn set_display_size(&mut self, _geometry: OutputGeometry) {}
}

/// An independent audio timeline kept phase-locked to the video.
pub trait AudioTimeline {
    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, secs: f64);

    fn duration(&self) -> f64;

    fn play(&mut self);

    fn pause(&mut self);

    /// Releases the host resources behind the track (e.g. removes the
    /// element it created). Called once, on teardown.
    fn detach(&mut self) {}
}

/// A 2D surface the session paints onto.
pub trait DrawSurface {
    /// Sets the surface's pixel size.
    fn resize(&mut self, geometry: OutputGeometry);

    /// Draws the media's current frame scaled to `geometry` at the origin.
    fn draw_frame(&mut self, media: &dyn MediaSource, geometry: OutputGeometry);

    /// Draws a poster image scaled to `geometry` at the origin.
    fn draw_poster(&mut self, poster: &PosterImage, geometry: OutputGeometry);

    fn set_visible(&mut self, visible: bool);
}

/// The container the surface lives in.
pub trait Viewport {
    fn container_width(&self) -> u32;

    fn container_height(&self) -> u32;

    /// Computed `max-width` style constraint, if any.
    fn max_width(&self) -> Option<u32>;

    /// Computed `max-height` style constraint, if any.
    fn max_height(&self) -> Option<u32>;
}

/// The timeline control: a bar that can be scrubbed and a progress element.
pub trait TimelineBar {
    /// Page-relative bounds of the bar. `None` while it is hidden or detached.
    fn bounds(&self) -> Option<TimelineBounds>;

    /// Sets the played portion, in percent.
    fn set_progress(&mut self, percent: f64);

    /// Whether the progress element could be resolved.
    fn has_progress(&self) -> bool {
        true
    }
}

/// Timer primitives of the host.
///
/// Every request carries a handle allocated by the session; the host hands
/// the same handle back to `on_tick` / `on_timeout` when the request fires.
pub trait FrameScheduler {
    /// One wake-up at the next display refresh.
    fn request_animation_frame(&mut self, handle: TickHandle);

    fn cancel_animation_frame(&mut self, handle: TickHandle);

    /// Recurring wake-ups every `period`, until cleared.
    fn set_interval(&mut self, handle: TickHandle, period: Duration);

    fn clear_interval(&mut self, handle: TickHandle);

    /// One wake-up after `delay`.
    fn set_timeout(&mut self, handle: TickHandle, delay: Duration);

    fn clear_timeout(&mut self, handle: TickHandle);
}

/// Wall-clock source.
pub trait Clock {
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// [`Clock`] backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_states_are_ordered() {
        assert!(ReadyState::HaveNothing < ReadyState::HaveMetadata);
        assert!(ReadyState::HaveCurrentData >= ReadyState::HaveCurrentData);
        assert!(ReadyState::HaveEnoughData > ReadyState::HaveCurrentData);
        assert_eq!(ReadyState::default(), ReadyState::HaveNothing);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
