// SPDX-License-Identifier: MPL-2.0
//! In-memory host.
//!
//! Every collaborator here is a cheap clonable handle over shared state, so
//! one clone goes into the session and another stays with the caller for
//! inspection. [`WakeupQueue`] plays the role of the host's timers and the
//! `run_*` drivers feed its wake-ups back into a session, either on virtual
//! time (tests, benches) or in real time under tokio (the binary).
//!
//! The simulated media source does not advance on its own: its position
//! only moves when the session (or the caller) sets it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::factory::SessionParts;
use super::host::{
    AudioTimeline, Clock, DrawSurface, FrameScheduler, MediaSource, ReadyState, TimelineBar,
    Viewport,
};
use super::poster::PosterImage;
use super::scheduler::TickHandle;
use super::state::{PlaybackSession, PlayerEvent};
use super::timeline::TimelineBounds;
use crate::domain::geometry::{OutputGeometry, SourceSize};
use crate::platform::PlatformCapabilities;

/// Display refresh period of the simulated host (60 Hz).
pub const FRAME_PERIOD: Duration = Duration::from_micros(16_667);

// =============================================================================
// Media
// =============================================================================

#[derive(Debug, Clone)]
pub struct MediaState {
    pub current_time: f64,
    pub duration: f64,
    pub natural_size: SourceSize,
    pub ready_state: ReadyState,
    pub playing: bool,
    pub visible: bool,
    pub load_count: u32,
    pub display_size: Option<OutputGeometry>,
}

/// A seekable media source with a fixed duration and frame size.
#[derive(Debug, Clone)]
pub struct SimulatedMedia {
    inner: Rc<RefCell<MediaState>>,
}

impl SimulatedMedia {
    #[must_use]
    pub fn new(duration: f64, natural_size: SourceSize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MediaState {
                current_time: 0.0,
                duration,
                natural_size,
                ready_state: ReadyState::HaveNothing,
                playing: false,
                visible: true,
                load_count: 0,
                display_size: None,
            })),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> MediaState {
        self.inner.borrow().clone()
    }

    #[must_use]
    pub fn position(&self) -> f64 {
        self.inner.borrow().current_time
    }

    pub fn set_position(&self, secs: f64) {
        self.inner.borrow_mut().current_time = secs;
    }

    pub fn set_duration(&self, secs: f64) {
        self.inner.borrow_mut().duration = secs;
    }

    pub fn set_natural_size(&self, size: SourceSize) {
        self.inner.borrow_mut().natural_size = size;
    }

    pub fn set_ready_state(&self, state: ReadyState) {
        self.inner.borrow_mut().ready_state = state;
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.inner.borrow().playing
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.inner.borrow().visible
    }

    #[must_use]
    pub fn load_count(&self) -> u32 {
        self.inner.borrow().load_count
    }
}

impl MediaSource for SimulatedMedia {
    fn current_time(&self) -> f64 {
        self.inner.borrow().current_time
    }

    fn set_current_time(&mut self, secs: f64) {
        let mut state = self.inner.borrow_mut();
        state.current_time = if state.duration.is_finite() && state.duration > 0.0 {
            secs.clamp(0.0, state.duration)
        } else {
            secs.max(0.0)
        };
    }

    fn duration(&self) -> f64 {
        self.inner.borrow().duration
    }

    fn natural_size(&self) -> SourceSize {
        self.inner.borrow().natural_size
    }

    fn ready_state(&self) -> ReadyState {
        self.inner.borrow().ready_state
    }

    fn load(&mut self) {
        self.inner.borrow_mut().load_count += 1;
    }

    fn play(&mut self) {
        self.inner.borrow_mut().playing = true;
    }

    fn pause(&mut self) {
        self.inner.borrow_mut().playing = false;
    }

    fn set_visible(&mut self, visible: bool) {
        self.inner.borrow_mut().visible = visible;
    }

    fn set_display_size(&mut self, geometry: OutputGeometry) {
        self.inner.borrow_mut().display_size = Some(geometry);
    }
}

// =============================================================================
// Audio
// =============================================================================

#[derive(Debug, Clone, Default)]
struct AudioState {
    current_time: f64,
    duration: f64,
    playing: bool,
    detached: bool,
}

/// An audio timeline that only moves when set.
#[derive(Debug, Clone)]
pub struct SimulatedAudio {
    inner: Rc<RefCell<AudioState>>,
}

impl SimulatedAudio {
    #[must_use]
    pub fn new(duration: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(AudioState {
                duration,
                ..AudioState::default()
            })),
        }
    }

    #[must_use]
    pub fn position(&self) -> f64 {
        self.inner.borrow().current_time
    }

    /// Moves the track without going through the session, e.g. to
    /// simulate drift.
    pub fn set_position(&self, secs: f64) {
        self.inner.borrow_mut().current_time = secs;
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.inner.borrow().playing
    }

    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.inner.borrow().detached
    }
}

impl AudioTimeline for SimulatedAudio {
    fn current_time(&self) -> f64 {
        self.inner.borrow().current_time
    }

    fn set_current_time(&mut self, secs: f64) {
        self.inner.borrow_mut().current_time = secs;
    }

    fn duration(&self) -> f64 {
        self.inner.borrow().duration
    }

    fn play(&mut self) {
        self.inner.borrow_mut().playing = true;
    }

    fn pause(&mut self) {
        self.inner.borrow_mut().playing = false;
    }

    fn detach(&mut self) {
        self.inner.borrow_mut().detached = true;
    }
}

// =============================================================================
// Surface
// =============================================================================

/// One `draw_frame` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnFrame {
    pub media_time: f64,
    pub geometry: OutputGeometry,
}

#[derive(Debug)]
struct SurfaceState {
    size: Option<OutputGeometry>,
    frames: Vec<DrawnFrame>,
    posters: Vec<String>,
    visible: bool,
}

/// A surface that records what it was asked to draw.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    inner: Rc<RefCell<SurfaceState>>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SurfaceState {
                size: None,
                frames: Vec::new(),
                posters: Vec::new(),
                visible: true,
            })),
        }
    }
}

impl RecordingSurface {
    #[must_use]
    pub fn size(&self) -> Option<OutputGeometry> {
        self.inner.borrow().size
    }

    #[must_use]
    pub fn frames(&self) -> Vec<DrawnFrame> {
        self.inner.borrow().frames.clone()
    }

    #[must_use]
    pub fn frames_drawn(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    #[must_use]
    pub fn posters_drawn(&self) -> usize {
        self.inner.borrow().posters.len()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.inner.borrow().visible
    }
}

impl DrawSurface for RecordingSurface {
    fn resize(&mut self, geometry: OutputGeometry) {
        self.inner.borrow_mut().size = Some(geometry);
    }

    fn draw_frame(&mut self, media: &dyn MediaSource, geometry: OutputGeometry) {
        self.inner.borrow_mut().frames.push(DrawnFrame {
            media_time: media.current_time(),
            geometry,
        });
    }

    fn draw_poster(&mut self, poster: &PosterImage, _geometry: OutputGeometry) {
        self.inner.borrow_mut().posters.push(poster.url().to_owned());
    }

    fn set_visible(&mut self, visible: bool) {
        self.inner.borrow_mut().visible = visible;
    }
}

// =============================================================================
// Viewport and timeline
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct ViewportState {
    width: u32,
    height: u32,
    max_width: Option<u32>,
    max_height: Option<u32>,
}

/// A container whose size changes only when told to.
#[derive(Debug, Clone)]
pub struct FixedViewport {
    inner: Rc<Cell<ViewportState>>,
}

impl FixedViewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: Rc::new(Cell::new(ViewportState {
                width,
                height,
                max_width: None,
                max_height: None,
            })),
        }
    }

    #[must_use]
    pub fn with_max_width(self, max_width: u32) -> Self {
        let mut state = self.inner.get();
        state.max_width = Some(max_width);
        self.inner.set(state);
        self
    }

    #[must_use]
    pub fn with_max_height(self, max_height: u32) -> Self {
        let mut state = self.inner.get();
        state.max_height = Some(max_height);
        self.inner.set(state);
        self
    }

    pub fn set_container_width(&self, width: u32) {
        let mut state = self.inner.get();
        state.width = width;
        self.inner.set(state);
    }
}

impl Viewport for FixedViewport {
    fn container_width(&self) -> u32 {
        self.inner.get().width
    }

    fn container_height(&self) -> u32 {
        self.inner.get().height
    }

    fn max_width(&self) -> Option<u32> {
        self.inner.get().max_width
    }

    fn max_height(&self) -> Option<u32> {
        self.inner.get().max_height
    }
}

#[derive(Debug)]
struct TimelineState {
    bounds: Option<TimelineBounds>,
    progress: Option<f64>,
    has_progress: bool,
}

#[derive(Debug, Clone)]
pub struct SimulatedTimeline {
    inner: Rc<RefCell<TimelineState>>,
}

impl SimulatedTimeline {
    #[must_use]
    pub fn new(bounds: TimelineBounds) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TimelineState {
                bounds: Some(bounds),
                progress: None,
                has_progress: true,
            })),
        }
    }

    /// A timeline whose progress element could not be resolved.
    #[must_use]
    pub fn without_progress(self) -> Self {
        self.inner.borrow_mut().has_progress = false;
        self
    }

    /// Hides the bar; it has no bounds until shown again.
    pub fn hide(&self) {
        self.inner.borrow_mut().bounds = None;
    }

    pub fn show(&self, bounds: TimelineBounds) {
        self.inner.borrow_mut().bounds = Some(bounds);
    }

    /// Last progress percentage pushed by the session.
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.inner.borrow().progress
    }
}

impl TimelineBar for SimulatedTimeline {
    fn bounds(&self) -> Option<TimelineBounds> {
        self.inner.borrow().bounds
    }

    fn set_progress(&mut self, percent: f64) {
        self.inner.borrow_mut().progress = Some(percent);
    }

    fn has_progress(&self) -> bool {
        self.inner.borrow().has_progress
    }
}

// =============================================================================
// Time
// =============================================================================

/// A clock that only moves when advanced.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Moves the clock to `instant`. Never moves it backwards.
    pub fn set(&self, instant: Instant) {
        if instant > self.now.get() {
            self.now.set(instant);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// What kind of request a wake-up answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeupKind {
    Frame,
    Interval,
    Timeout,
}

/// A pending scheduler request.
#[derive(Debug, Clone, Copy)]
pub struct Wakeup {
    pub handle: TickHandle,
    pub kind: WakeupKind,
    pub due: Instant,
    period: Option<Duration>,
    seq: u64,
}

#[derive(Debug, Default)]
struct QueueState {
    entries: Vec<Wakeup>,
    next_seq: u64,
}

impl QueueState {
    fn push(&mut self, handle: TickHandle, kind: WakeupKind, due: Instant, period: Option<Duration>) {
        self.next_seq += 1;
        self.entries.push(Wakeup {
            handle,
            kind,
            due,
            period,
            seq: self.next_seq,
        });
    }

    fn remove(&mut self, handle: TickHandle) {
        self.entries.retain(|entry| entry.handle != handle);
    }

    fn earliest(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| (entry.due, entry.seq))
            .map(|(index, _)| index)
    }
}

/// The host's timers, kept as an ordered list of pending wake-ups.
#[derive(Clone)]
pub struct WakeupQueue {
    inner: Rc<RefCell<QueueState>>,
    clock: Rc<dyn Clock>,
    frame_period: Duration,
}

impl fmt::Debug for WakeupQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WakeupQueue")
            .field("entries", &self.inner.borrow().entries)
            .field("frame_period", &self.frame_period)
            .finish_non_exhaustive()
    }
}

impl WakeupQueue {
    #[must_use]
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(QueueState::default())),
            clock,
            frame_period: FRAME_PERIOD,
        }
    }

    #[must_use]
    pub fn with_frame_period(mut self, period: Duration) -> Self {
        self.frame_period = period;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    #[must_use]
    pub fn count(&self, kind: WakeupKind) -> usize {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .count()
    }

    /// Handle of the first pending frame request or interval.
    #[must_use]
    pub fn armed_tick(&self) -> Option<TickHandle> {
        self.inner
            .borrow()
            .entries
            .iter()
            .find(|entry| entry.kind != WakeupKind::Timeout)
            .map(|entry| entry.handle)
    }

    /// Like [`armed_tick`](Self::armed_tick), but consumes a frame request
    /// the way firing it would.
    pub fn fire_tick(&self) -> Option<TickHandle> {
        let mut state = self.inner.borrow_mut();
        let index = state
            .entries
            .iter()
            .position(|entry| entry.kind != WakeupKind::Timeout)?;
        let entry = state.entries[index];
        if entry.kind == WakeupKind::Frame {
            state.entries.remove(index);
        }
        Some(entry.handle)
    }

    /// Handle of the first pending timeout.
    #[must_use]
    pub fn pending_timeout(&self) -> Option<TickHandle> {
        self.inner
            .borrow()
            .entries
            .iter()
            .find(|entry| entry.kind == WakeupKind::Timeout)
            .map(|entry| entry.handle)
    }

    /// When the next wake-up is due.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        let state = self.inner.borrow();
        state.earliest().map(|index| state.entries[index].due)
    }

    /// Removes and returns the earliest wake-up due at `now`. Intervals are
    /// re-queued one period later.
    pub fn pop_due(&self, now: Instant) -> Option<Wakeup> {
        let mut state = self.inner.borrow_mut();
        let index = state.earliest()?;
        if state.entries[index].due > now {
            return None;
        }
        let wakeup = state.entries.remove(index);
        if let Some(period) = wakeup.period {
            state.push(wakeup.handle, wakeup.kind, wakeup.due + period, Some(period));
        }
        Some(wakeup)
    }

    fn schedule(&self, handle: TickHandle, kind: WakeupKind, delay: Duration, period: Option<Duration>) {
        let due = self.clock.now() + delay;
        self.inner.borrow_mut().push(handle, kind, due, period);
    }
}

impl FrameScheduler for WakeupQueue {
    fn request_animation_frame(&mut self, handle: TickHandle) {
        self.schedule(handle, WakeupKind::Frame, self.frame_period, None);
    }

    fn cancel_animation_frame(&mut self, handle: TickHandle) {
        self.inner.borrow_mut().remove(handle);
    }

    fn set_interval(&mut self, handle: TickHandle, period: Duration) {
        self.schedule(handle, WakeupKind::Interval, period, Some(period));
    }

    fn clear_interval(&mut self, handle: TickHandle) {
        self.inner.borrow_mut().remove(handle);
    }

    fn set_timeout(&mut self, handle: TickHandle, delay: Duration) {
        self.schedule(handle, WakeupKind::Timeout, delay, None);
    }

    fn clear_timeout(&mut self, handle: TickHandle) {
        self.inner.borrow_mut().remove(handle);
    }
}

// =============================================================================
// Host bundle, events and drivers
// =============================================================================

/// Every collaborator a session needs, backed by the simulations above.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    pub media: SimulatedMedia,
    pub audio: Option<SimulatedAudio>,
    pub surface: RecordingSurface,
    pub viewport: FixedViewport,
    pub timeline: Option<SimulatedTimeline>,
    pub queue: WakeupQueue,
}

impl HeadlessHost {
    /// Builds a host with an 800×450 container around `media`.
    #[must_use]
    pub fn new(media: SimulatedMedia, clock: Rc<dyn Clock>) -> Self {
        Self {
            media,
            audio: None,
            surface: RecordingSurface::default(),
            viewport: FixedViewport::new(800, 450),
            timeline: None,
            queue: WakeupQueue::new(clock),
        }
    }

    #[must_use]
    pub fn with_audio(mut self, audio: SimulatedAudio) -> Self {
        self.audio = Some(audio);
        self
    }

    #[must_use]
    pub fn with_timeline(mut self, timeline: SimulatedTimeline) -> Self {
        self.timeline = Some(timeline);
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, viewport: FixedViewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Hands clones of every collaborator to a new session.
    #[must_use]
    pub fn parts(&self, capabilities: PlatformCapabilities) -> SessionParts {
        SessionParts {
            media: Some(Box::new(self.media.clone())),
            surface: Some(Box::new(self.surface.clone())),
            viewport: Box::new(self.viewport.clone()),
            timeline: self
                .timeline
                .clone()
                .map(|timeline| Box::new(timeline) as Box<dyn TimelineBar>),
            audio: self
                .audio
                .clone()
                .map(|audio| Box::new(audio) as Box<dyn AudioTimeline>),
            scheduler: Box::new(self.queue.clone()),
            clock: Box::new(Rc::clone(&self.queue.clock)),
            capabilities,
        }
    }
}

/// Collects the notifications a session emits.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<PlayerEvent>>>,
}

impl EventLog {
    /// A listener appending to this log.
    #[must_use]
    pub fn listener(&self) -> impl FnMut(&PlayerEvent) + 'static {
        let events = Rc::clone(&self.events);
        move |event| events.borrow_mut().push(event.clone())
    }

    #[must_use]
    pub fn events(&self) -> Vec<PlayerEvent> {
        self.events.borrow().clone()
    }

    #[must_use]
    pub fn count(&self, predicate: impl Fn(&PlayerEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|event| predicate(event)).count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

/// Routes one wake-up to the matching session handler.
pub fn dispatch(session: &mut PlaybackSession, wakeup: &Wakeup) {
    match wakeup.kind {
        WakeupKind::Frame | WakeupKind::Interval => session.on_tick(wakeup.handle),
        WakeupKind::Timeout => session.on_timeout(wakeup.handle),
    }
}

/// Runs `session` for `span` of virtual time, jumping `clock` from one
/// wake-up to the next. Returns the number of wake-ups dispatched.
pub fn run_virtual(
    session: &mut PlaybackSession,
    queue: &WakeupQueue,
    clock: &ManualClock,
    span: Duration,
) -> usize {
    let deadline = clock.now() + span;
    let mut dispatched = 0;
    while let Some(due) = queue.next_due() {
        if due > deadline || !session.is_bound() {
            break;
        }
        clock.set(due);
        while let Some(wakeup) = queue.pop_due(clock.now()) {
            dispatch(session, &wakeup);
            dispatched += 1;
        }
    }
    clock.set(deadline);
    dispatched
}

/// Runs `session` for `span` of wall-clock time, sleeping on tokio timers
/// between wake-ups. The queue's clock must be a real clock.
pub async fn run_realtime(
    session: &mut PlaybackSession,
    queue: &WakeupQueue,
    span: Duration,
) -> usize {
    let deadline = tokio::time::Instant::now() + span;
    let mut dispatched = 0;
    while let Some(due) = queue.next_due() {
        let due = tokio::time::Instant::from_std(due);
        if due > deadline || !session.is_bound() {
            break;
        }
        tokio::time::sleep_until(due).await;
        while let Some(wakeup) = queue.pop_due(Instant::now()) {
            dispatch(session, &wakeup);
            dispatched += 1;
        }
    }
    dispatched
}
