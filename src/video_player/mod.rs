// SPDX-License-Identifier: MPL-2.0
//! Canvas video playback engine.
//!
//! A [`PlaybackSession`] paints a host-decoded video onto a drawable surface
//! on its own tick loop, keeps an optional audio timeline locked to it and
//! sizes the surface to its container. The host supplies the collaborators
//! in [`host`] and forwards its events into the session.

mod factory;
pub mod geometry;
pub mod headless;
pub mod host;
pub mod poster;
mod resize;
pub mod scheduler;
mod state;
pub mod sync;
pub mod timeline;

pub use factory::{SessionFactory, SessionParts};
pub use geometry::compute_output_size;
pub use host::{
    AudioTimeline, Clock, DrawSurface, FrameScheduler, MediaSource, ReadyState, SystemClock,
    TimelineBar, Viewport,
};
pub use poster::{PosterCache, PosterImage};
pub use resize::ResizeDebouncer;
pub use scheduler::{SchedulerStrategy, TickHandle, TickScheduler};
pub use state::{EventListener, PlaybackSession, PlayerEvent};
pub use sync::{calculate_sync_action, SyncAction, DRIFT_TOLERANCE_SECS};
pub use timeline::{progress_percent, PointerKind, ScrubGesture, TimelineBounds};
