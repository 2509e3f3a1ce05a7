// SPDX-License-Identifier: MPL-2.0
//! Playback session: the play/pause/stop state machine and the tick loop.
//!
//! State transitions:
//! - `Idle --play--> Playing`
//! - `Playing --pause--> Paused`, `Paused --play--> Playing`
//! - `Playing --end reached--> Ended --> Paused`, or `Playing` again when
//!   looping. `Ended` only lasts while the end notification is delivered.
//! - `stop` forces any state to `Paused` with the position reset to zero.
//!
//! The session never registers listeners or timers of its own. The host
//! forwards media signals, scheduler wake-ups, resizes and pointer input
//! into the `on_*` handlers, and everything happens synchronously inside
//! those calls.

use std::rc::Rc;
use std::time::Instant;

use super::geometry::compute_output_size;
use super::host::{
    AudioTimeline, Clock, DrawSurface, FrameScheduler, MediaSource, ReadyState, TimelineBar,
    Viewport,
};
use super::poster::PosterImage;
use super::resize::ResizeDebouncer;
use super::scheduler::{SchedulerStrategy, TickHandle, TickScheduler};
use super::sync::{self, SyncAction};
use super::timeline::{progress_percent, PointerKind, ScrubGesture};
use crate::config::PlayerOptions;
use crate::diagnostics::{DiagnosticEventKind, DiagnosticsLog};
use crate::domain::geometry::{OutputGeometry, SizeConstraints};
use crate::domain::video::{FramesPerSecond, PlaybackState, SeekFraction};
use crate::platform::PlatformCapabilities;

/// Lifecycle notification delivered to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// The media source has its first frame.
    Ready,
    Play,
    Pause,
    /// Playback reached the end, or was stopped.
    PlayEnd,
    /// A frame was drawn for a new position.
    Update { current_time: f64, duration: f64 },
}

/// Host callback receiving [`PlayerEvent`]s.
pub type EventListener = Box<dyn FnMut(&PlayerEvent)>;

/// Host collaborators of one session, already validated.
pub(crate) struct Collaborators {
    pub media: Box<dyn MediaSource>,
    pub audio: Option<Box<dyn AudioTimeline>>,
    pub surface: Box<dyn DrawSurface>,
    pub viewport: Box<dyn Viewport>,
    pub timeline: Option<Box<dyn TimelineBar>>,
    pub timers: Box<dyn FrameScheduler>,
    pub clock: Box<dyn Clock>,
}

/// A video painted frame by frame onto a drawable surface.
///
/// Built by [`SessionFactory`](super::SessionFactory). Dropping the session
/// tears it down as if [`unbind`](Self::unbind) had been called.
pub struct PlaybackSession {
    options: PlayerOptions,
    capabilities: PlatformCapabilities,
    frame_interval_secs: f64,
    state: PlaybackState,
    last_tick: Instant,

    media: Box<dyn MediaSource>,
    audio: Option<Box<dyn AudioTimeline>>,
    surface: Box<dyn DrawSurface>,
    viewport: Box<dyn Viewport>,
    timeline: Option<Box<dyn TimelineBar>>,
    timers: Box<dyn FrameScheduler>,
    clock: Box<dyn Clock>,

    scheduler: TickScheduler,
    resize: ResizeDebouncer,
    scrub: ScrubGesture,
    geometry: Option<OutputGeometry>,
    poster: Option<Rc<PosterImage>>,

    listener: Option<EventListener>,
    diagnostics: DiagnosticsLog,
    /// Set once the tick loop has handled an end crossing, so a late media
    /// "ended" signal does not notify a second time.
    end_handled: bool,
    bound: bool,
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("state", &self.state)
            .field("strategy", &self.scheduler.strategy())
            .field("geometry", &self.geometry)
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}

impl PlaybackSession {
    pub(crate) fn assemble(
        options: PlayerOptions,
        capabilities: PlatformCapabilities,
        parts: Collaborators,
        poster: Option<Rc<PosterImage>>,
        diagnostics: DiagnosticsLog,
    ) -> Self {
        let fps = FramesPerSecond::new(options.frames_per_second);
        let last_tick = parts.clock.now();
        Self {
            frame_interval_secs: fps.frame_interval_secs(),
            scheduler: TickScheduler::new(SchedulerStrategy::for_capabilities(&capabilities)),
            options,
            capabilities,
            state: PlaybackState::Idle,
            last_tick,
            media: parts.media,
            audio: parts.audio,
            surface: parts.surface,
            viewport: parts.viewport,
            timeline: parts.timeline,
            timers: parts.timers,
            clock: parts.clock,
            resize: ResizeDebouncer::default(),
            scrub: ScrubGesture::default(),
            geometry: None,
            poster,
            listener: None,
            diagnostics,
            end_handled: false,
            bound: true,
        }
    }

    /// Loads the source, sizes the surface and autoplays if configured.
    pub(crate) fn initialize(&mut self) {
        let width = self.viewport.container_width();
        let height = self.viewport.container_height();
        let initial = OutputGeometry::new(f64::from(width), f64::from(height));
        if initial.is_drawable() {
            self.geometry = Some(initial);
        }

        self.media.load();
        self.recompute_geometry();

        if self.options.hide_video {
            self.media.set_visible(false);
        }

        if self.media.ready_state() >= ReadyState::HaveCurrentData {
            self.draw();
        }

        if self.options.autoplay {
            self.play();
        }
    }

    /// Registers the callback receiving lifecycle notifications, replacing
    /// any previous one.
    pub fn set_listener(&mut self, listener: impl FnMut(&PlayerEvent) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    // ------------------------------------------------------------------
    // Public operations
    // ------------------------------------------------------------------

    /// Starts or restarts playback from the current position.
    pub fn play(&mut self) {
        if !self.bound {
            tracing::trace!("play on unbound session ignored");
            return;
        }

        self.last_tick = self.clock.now();
        self.state = PlaybackState::Playing;
        self.end_handled = false;
        tracing::debug!(position = self.media.current_time(), "play");

        if self.capabilities.prefers_native_playback {
            self.media.play();
            self.media.set_visible(true);
            self.surface.set_visible(false);
            return;
        }

        self.scheduler.arm(self.timers.as_mut());
        self.emit(PlayerEvent::Play);

        let position = self.media.current_time();
        if let Some(audio) = self.audio.as_deref_mut() {
            sync::resync(audio, position);
            audio.play();
        }
    }

    /// Pauses playback. Pausing a session that is not playing only
    /// re-asserts the cancelled state.
    pub fn pause(&mut self) {
        if !self.bound {
            return;
        }

        let was_playing = self.state.is_playing();
        if was_playing {
            self.state = PlaybackState::Paused;
            tracing::debug!(position = self.media.current_time(), "pause");
        }
        self.cancel_ticks();

        if self.capabilities.prefers_native_playback {
            self.media.pause();
            self.media.set_visible(false);
            self.surface.set_visible(true);
            return;
        }

        if was_playing {
            self.emit(PlayerEvent::Pause);
        }
        if let Some(audio) = self.audio.as_deref_mut() {
            audio.pause();
        }
    }

    pub fn play_pause(&mut self) {
        if self.state.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Rewinds to the start and pauses, firing one end notification.
    pub fn stop(&mut self) {
        if !self.bound {
            return;
        }

        self.media.set_current_time(0.0);
        self.state = PlaybackState::Paused;
        self.cancel_ticks();
        tracing::debug!("stop");
        self.emit(PlayerEvent::PlayEnd);

        if let Some(audio) = self.audio.as_deref_mut() {
            audio.pause();
        }
    }

    /// Seeks to `fraction` of the duration (clamped to `[0, 1]`).
    ///
    /// Does nothing while the duration is unknown, so it can simply be
    /// retried once metadata has arrived.
    pub fn jump_to(&mut self, fraction: f64) {
        if !self.bound {
            return;
        }

        let Some(duration) = self.known_duration() else {
            tracing::trace!(
                fraction,
                duration = self.media.duration(),
                "seek before duration is known ignored"
            );
            return;
        };

        let target = SeekFraction::new(fraction).to_time(duration);
        self.media.set_current_time(target);
        self.end_handled = false;
        if let Some(audio) = self.audio.as_deref_mut() {
            sync::resync(audio, target);
        }
        tracing::trace!(target, "seek");
    }

    /// Tears the session down: cancels every pending timer, releases the
    /// audio track and stops reacting to host events. Idempotent.
    pub fn unbind(&mut self) {
        if !self.bound {
            return;
        }

        self.cancel_ticks();
        self.resize.cancel(self.timers.as_mut());
        self.scrub.end();
        if let Some(audio) = self.audio.as_deref_mut() {
            audio.pause();
            audio.detach();
        }
        self.audio = None;
        self.bound = false;

        self.diagnostics.record(DiagnosticEventKind::SessionUnbound);
        tracing::debug!("session unbound");
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.media.current_time()
    }

    #[must_use]
    pub fn duration(&self) -> f64 {
        self.media.duration()
    }

    /// Current output geometry, if one has been computed.
    #[must_use]
    pub fn geometry(&self) -> Option<OutputGeometry> {
        self.geometry
    }

    #[must_use]
    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    #[must_use]
    pub fn capabilities(&self) -> PlatformCapabilities {
        self.capabilities
    }

    #[must_use]
    pub fn strategy(&self) -> SchedulerStrategy {
        self.scheduler.strategy()
    }

    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// Returns true while a tick request is outstanding.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.scheduler.is_armed()
    }

    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticsLog {
        &self.diagnostics
    }

    // ------------------------------------------------------------------
    // Media signals
    // ------------------------------------------------------------------

    /// The media source has data for its first frame.
    pub fn on_media_ready(&mut self) {
        if !self.bound {
            return;
        }
        self.emit(PlayerEvent::Ready);
        self.recompute_geometry();
        if self.capabilities.prefers_native_playback {
            self.draw();
        }
    }

    pub fn on_can_play(&mut self) {
        if self.bound {
            self.draw();
        }
    }

    /// The media source reports a new position on its own.
    pub fn on_time_update(&mut self) {
        if !self.bound {
            return;
        }
        self.draw();
        self.update_timeline();
        self.emit_update();
    }

    /// The media source is waiting for data.
    pub fn on_media_waiting(&mut self) {
        if !self.bound {
            return;
        }
        let pausing = self.options.pause_on_stall && self.state.is_playing();
        let position = self.media.current_time();
        tracing::debug!(position, pausing, "media stalled");
        self.diagnostics.record(DiagnosticEventKind::MediaStalled {
            position_secs: position,
            paused: pausing,
        });
        if pausing {
            self.pause();
        }
    }

    /// The media source played to its end on its own.
    pub fn on_media_ended(&mut self) {
        if !self.bound {
            return;
        }
        if self.end_handled {
            // The tick loop already handled this crossing.
            tracing::trace!("media ended after end-of-stream");
            return;
        }
        self.stop();
    }

    /// The media element started playing. Only meaningful in native mode,
    /// where the element's own controls drive playback.
    pub fn on_media_play(&mut self) {
        if !self.bound || !self.capabilities.prefers_native_playback {
            return;
        }
        self.state = PlaybackState::Playing;
        self.emit(PlayerEvent::Play);
    }

    /// The media element paused. Only meaningful in native mode.
    pub fn on_media_pause(&mut self) {
        if !self.bound || !self.capabilities.prefers_native_playback {
            return;
        }
        if self.state.is_playing() {
            self.state = PlaybackState::Paused;
        }
        self.cancel_ticks();
        self.emit(PlayerEvent::Pause);
    }

    // ------------------------------------------------------------------
    // Scheduler wake-ups
    // ------------------------------------------------------------------

    /// A frame request or interval fired.
    pub fn on_tick(&mut self, handle: TickHandle) {
        if !self.bound || !self.scheduler.accept_tick(handle) {
            tracing::trace!(handle = handle.id(), "stale tick dropped");
            return;
        }
        if !self.state.is_playing() {
            self.cancel_ticks();
            return;
        }
        self.tick();
    }

    /// A one-shot timeout fired: either the delayed media resume or the
    /// settled resize window.
    pub fn on_timeout(&mut self, handle: TickHandle) {
        if !self.bound {
            return;
        }
        if self.scheduler.take_resume(handle) {
            if self.state.is_playing() {
                self.media.play();
            } else {
                tracing::trace!("delayed resume after pause ignored");
            }
        } else if self.resize.take(handle) {
            self.recompute_geometry();
            self.draw();
        } else {
            tracing::trace!(handle = handle.id(), "stale timeout dropped");
        }
    }

    // ------------------------------------------------------------------
    // Layout and poster
    // ------------------------------------------------------------------

    /// The viewport changed size. Redraws once the size has settled.
    pub fn on_resize(&mut self) {
        if !self.bound {
            return;
        }
        let handle = self.scheduler.allocate();
        self.resize.signal(handle, self.timers.as_mut());
    }

    /// The configured thumbnail finished loading.
    pub fn on_poster_loaded(&mut self, poster: Rc<PosterImage>) {
        if !self.bound {
            return;
        }
        if self.options.thumbnail.as_deref() != Some(poster.url()) {
            tracing::debug!(url = poster.url(), "poster for another thumbnail ignored");
            return;
        }
        self.poster = Some(poster);
        self.recompute_geometry();
    }

    // ------------------------------------------------------------------
    // Timeline input
    // ------------------------------------------------------------------

    pub fn on_pointer_down(&mut self) {
        if self.bound && self.options.scrub_enabled() && self.timeline.is_some() {
            self.scrub.begin();
        }
    }

    /// Pointer moved over the timeline at page coordinate `pointer_x`.
    pub fn on_pointer_move(&mut self, pointer_x: f64, kind: PointerKind) {
        if !self.bound || !self.options.scrub_enabled() {
            return;
        }
        let bounds = self.timeline.as_ref().and_then(|timeline| timeline.bounds());
        if let Some(fraction) = self.scrub.on_move(pointer_x, kind, bounds) {
            self.jump_to(fraction);
        }
    }

    pub fn on_pointer_up(&mut self) {
        self.scrub.end();
    }

    /// Click (without drag) on the timeline at page coordinate `pointer_x`.
    pub fn on_timeline_click(&mut self, pointer_x: f64) {
        self.scrub.end();
        if !self.bound || !self.options.scrub_enabled() {
            return;
        }
        let fraction = self
            .timeline
            .as_ref()
            .and_then(|timeline| timeline.bounds())
            .and_then(|bounds| bounds.fraction_at(pointer_x));
        match fraction {
            Some(fraction) => self.jump_to(fraction),
            None => tracing::trace!("click on hidden timeline ignored"),
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn tick(&mut self) {
        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(self.last_tick).as_secs_f64();

        if elapsed >= self.frame_interval_secs {
            let mut position = self.media.current_time() + elapsed;
            if let Some(duration) = self.known_duration() {
                position = position.min(duration);
            }
            self.media.set_current_time(position);
            self.last_tick = now;

            if let Some(audio) = self.audio.as_deref_mut() {
                if let SyncAction::Snap { drift_secs } = sync::correct_drift(audio, position) {
                    self.diagnostics
                        .record(DiagnosticEventKind::AudioResynced { drift_secs });
                }
            }
        }

        if let Some(duration) = self.known_duration() {
            if self.media.current_time() >= duration {
                self.end_of_stream();
            }
        }

        self.draw();
        self.update_timeline();
        self.emit_update();

        if self.state.is_playing() {
            self.scheduler.rearm(self.timers.as_mut());
        } else {
            self.cancel_ticks();
        }
    }

    fn end_of_stream(&mut self) {
        let looped = self.options.loop_playback;
        self.state = PlaybackState::Ended;
        tracing::debug!(looped, reset = self.options.reset_on_last_frame, "end of stream");

        if self.options.reset_on_last_frame {
            self.media.set_current_time(0.0);
        }
        if looped {
            self.media.set_current_time(0.0);
            self.play();
        } else if let Some(audio) = self.audio.as_deref_mut() {
            audio.pause();
        }

        self.emit(PlayerEvent::PlayEnd);
        self.diagnostics
            .record(DiagnosticEventKind::EndOfStream { looped });

        if self.state.is_ended() {
            self.state = PlaybackState::Paused;
            self.end_handled = true;
        }
    }

    /// The media duration, once it is known and positive.
    fn known_duration(&self) -> Option<f64> {
        let duration = self.media.duration();
        (duration.is_finite() && duration > 0.0).then_some(duration)
    }

    /// Cancels the tick chain; pauses the media if it was playing on its own
    /// behind a continuous interval.
    fn cancel_ticks(&mut self) {
        if self.scheduler.cancel(self.timers.as_mut()) {
            self.media.pause();
        }
    }

    fn recompute_geometry(&mut self) {
        let source = match &self.poster {
            Some(poster) if !poster.size().is_empty() => poster.size(),
            _ => self.media.natural_size(),
        };
        let mut constraints = SizeConstraints::new(self.viewport.container_width());
        constraints.max_width = self.viewport.max_width();
        constraints.max_height = self.viewport.max_height();

        let Some(geometry) = compute_output_size(source, constraints) else {
            tracing::trace!(?source, "source size unknown, geometry kept");
            return;
        };

        tracing::debug!(width = geometry.width, height = geometry.height, "geometry");
        self.geometry = Some(geometry);
        self.surface.resize(geometry);
        if self.capabilities.prefers_native_playback {
            self.media.set_display_size(geometry);
        }
        if let Some(poster) = &self.poster {
            self.surface.draw_poster(poster, geometry);
        }
    }

    fn draw(&mut self) {
        if let Some(geometry) = self.geometry {
            self.surface.draw_frame(self.media.as_ref(), geometry);
        }
    }

    fn update_timeline(&mut self) {
        if !self.options.has_timeline() {
            return;
        }
        let Some(percent) = progress_percent(self.media.current_time(), self.media.duration())
        else {
            return;
        };
        if let Some(timeline) = self.timeline.as_deref_mut() {
            timeline.set_progress(percent);
        }
    }

    fn emit_update(&mut self) {
        let event = PlayerEvent::Update {
            current_time: self.media.current_time(),
            duration: self.media.duration(),
        };
        self.emit(event);
    }

    fn emit(&mut self, event: PlayerEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.unbind();
    }
}
