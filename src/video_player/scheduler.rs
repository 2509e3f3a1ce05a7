// SPDX-License-Identifier: MPL-2.0
//! Tick scheduling strategies.
//!
//! Two strategies exist, picked once per session from the platform
//! capabilities:
//!
//! - **Cooperative frame**: one outstanding display-refresh request at a
//!   time, re-requested after every tick.
//! - **Continuous interval**: one recurring timer that keeps firing until
//!   cleared, plus a one-shot delayed request to resume the media source's
//!   own playback once the copy loop is running.
//!
//! Cancellation is handle-based. Every request carries a fresh
//! [`TickHandle`]; a wake-up whose handle is not the armed one is stale and
//! must be dropped by the caller. This is what guarantees a single chain:
//! arming always clears the previous handle first.

use std::time::Duration;

use super::host::FrameScheduler;
use crate::config::{CONTINUOUS_INTERVAL_MS, MEDIA_RESUME_DELAY_MS};
use crate::platform::PlatformCapabilities;

/// Identifies one scheduler request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(u64);

impl TickHandle {
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Scheduling strategy of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerStrategy {
    /// One frame request per display refresh, re-armed from each tick.
    CooperativeFrame,
    /// A fixed recurring interval plus a delayed resume of the media.
    ///
    /// Every tick adds the elapsed time to the media position, including
    /// after the resume. The host's media source is expected not to
    /// advance its own position while the session drives it, otherwise
    /// time moves twice as fast.
    ContinuousInterval,
}

impl SchedulerStrategy {
    #[must_use]
    pub fn for_capabilities(caps: &PlatformCapabilities) -> Self {
        if caps.uses_cooperative_scheduler {
            Self::CooperativeFrame
        } else {
            Self::ContinuousInterval
        }
    }
}

/// Owns the session's tick handles and talks to the host's timers.
#[derive(Debug)]
pub struct TickScheduler {
    strategy: SchedulerStrategy,
    next_id: u64,
    armed: Option<TickHandle>,
    pending_resume: Option<TickHandle>,
    interval_period: Duration,
    resume_delay: Duration,
}

impl TickScheduler {
    #[must_use]
    pub fn new(strategy: SchedulerStrategy) -> Self {
        Self {
            strategy,
            next_id: 0,
            armed: None,
            pending_resume: None,
            interval_period: Duration::from_millis(CONTINUOUS_INTERVAL_MS),
            resume_delay: Duration::from_millis(MEDIA_RESUME_DELAY_MS),
        }
    }

    #[must_use]
    pub fn strategy(&self) -> SchedulerStrategy {
        self.strategy
    }

    /// Returns a handle no other request of this session has used.
    pub fn allocate(&mut self) -> TickHandle {
        self.next_id += 1;
        TickHandle(self.next_id)
    }

    /// Returns true while a tick request is outstanding.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Handle of the outstanding tick request, if any.
    #[must_use]
    pub fn armed_handle(&self) -> Option<TickHandle> {
        self.armed
    }

    /// Handle of the outstanding delayed media resume, if any.
    #[must_use]
    pub fn pending_resume(&self) -> Option<TickHandle> {
        self.pending_resume
    }

    /// Starts a new tick chain, fully cancelling the previous one first.
    pub fn arm(&mut self, host: &mut dyn FrameScheduler) {
        self.clear(host);
        let handle = self.allocate();
        match self.strategy {
            SchedulerStrategy::CooperativeFrame => host.request_animation_frame(handle),
            SchedulerStrategy::ContinuousInterval => {
                host.set_interval(handle, self.interval_period);
                let resume = self.allocate();
                host.set_timeout(resume, self.resume_delay);
                self.pending_resume = Some(resume);
            }
        }
        self.armed = Some(handle);
        tracing::trace!(handle = handle.id(), strategy = ?self.strategy, "armed tick chain");
    }

    /// Keeps the chain alive after a tick. A cooperative request is one-shot
    /// and needs a new one; a running interval keeps firing on its own.
    pub fn rearm(&mut self, host: &mut dyn FrameScheduler) {
        if self.armed.is_some() {
            return;
        }
        let handle = self.allocate();
        match self.strategy {
            SchedulerStrategy::CooperativeFrame => host.request_animation_frame(handle),
            SchedulerStrategy::ContinuousInterval => host.set_interval(handle, self.interval_period),
        }
        self.armed = Some(handle);
    }

    /// Checks a wake-up against the armed handle.
    ///
    /// Returns false for stale handles. A cooperative request is consumed by
    /// the wake-up it produced.
    pub fn accept_tick(&mut self, handle: TickHandle) -> bool {
        if self.armed != Some(handle) {
            return false;
        }
        if self.strategy == SchedulerStrategy::CooperativeFrame {
            self.armed = None;
        }
        true
    }

    /// Checks a timeout against the pending media resume and consumes it.
    pub fn take_resume(&mut self, handle: TickHandle) -> bool {
        if self.pending_resume == Some(handle) {
            self.pending_resume = None;
            true
        } else {
            false
        }
    }

    /// Cancels the chain and any pending resume.
    ///
    /// Returns true if a continuous interval was running, in which case the
    /// media source was playing on its own and should be paused by the caller.
    pub fn cancel(&mut self, host: &mut dyn FrameScheduler) -> bool {
        let had_interval =
            self.strategy == SchedulerStrategy::ContinuousInterval && self.armed.is_some();
        self.clear(host);
        had_interval
    }

    fn clear(&mut self, host: &mut dyn FrameScheduler) {
        if let Some(handle) = self.armed.take() {
            match self.strategy {
                SchedulerStrategy::CooperativeFrame => host.cancel_animation_frame(handle),
                SchedulerStrategy::ContinuousInterval => host.clear_interval(handle),
            }
            tracing::trace!(handle = handle.id(), "cancelled tick chain");
        }
        if let Some(resume) = self.pending_resume.take() {
            host.clear_timeout(resume);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Calls(Vec<String>);

    impl FrameScheduler for Calls {
        fn request_animation_frame(&mut self, handle: TickHandle) {
            self.0.push(format!("raf {}", handle.id()));
        }
        fn cancel_animation_frame(&mut self, handle: TickHandle) {
            self.0.push(format!("cancel-raf {}", handle.id()));
        }
        fn set_interval(&mut self, handle: TickHandle, period: Duration) {
            self.0.push(format!("interval {} {}ms", handle.id(), period.as_millis()));
        }
        fn clear_interval(&mut self, handle: TickHandle) {
            self.0.push(format!("clear-interval {}", handle.id()));
        }
        fn set_timeout(&mut self, handle: TickHandle, delay: Duration) {
            self.0.push(format!("timeout {} {}ms", handle.id(), delay.as_millis()));
        }
        fn clear_timeout(&mut self, handle: TickHandle) {
            self.0.push(format!("clear-timeout {}", handle.id()));
        }
    }

    #[test]
    fn strategy_follows_capabilities() {
        assert_eq!(
            SchedulerStrategy::for_capabilities(&PlatformCapabilities::cooperative()),
            SchedulerStrategy::CooperativeFrame
        );
        assert_eq!(
            SchedulerStrategy::for_capabilities(&PlatformCapabilities::default()),
            SchedulerStrategy::ContinuousInterval
        );
    }

    #[test]
    fn cooperative_request_is_consumed_by_its_tick() {
        let mut host = Calls::default();
        let mut scheduler = TickScheduler::new(SchedulerStrategy::CooperativeFrame);

        scheduler.arm(&mut host);
        let handle = scheduler.armed_handle().unwrap();
        assert!(scheduler.accept_tick(handle));
        assert!(!scheduler.is_armed());

        scheduler.rearm(&mut host);
        assert!(scheduler.is_armed());
        assert_eq!(host.0, vec!["raf 1", "raf 2"]);
    }

    #[test]
    fn rearming_cancels_previous_chain() {
        let mut host = Calls::default();
        let mut scheduler = TickScheduler::new(SchedulerStrategy::CooperativeFrame);

        scheduler.arm(&mut host);
        let first = scheduler.armed_handle().unwrap();
        scheduler.arm(&mut host);

        assert!(!scheduler.accept_tick(first));
        assert_eq!(host.0, vec!["raf 1", "cancel-raf 1", "raf 2"]);
    }

    #[test]
    fn continuous_arm_sets_interval_and_delayed_resume() {
        let mut host = Calls::default();
        let mut scheduler = TickScheduler::new(SchedulerStrategy::ContinuousInterval);

        scheduler.arm(&mut host);
        let handle = scheduler.armed_handle().unwrap();
        let resume = scheduler.pending_resume().unwrap();

        assert_eq!(host.0, vec!["interval 1 4ms", "timeout 2 100ms"]);
        assert!(scheduler.accept_tick(handle));
        assert!(scheduler.accept_tick(handle), "interval keeps firing");
        assert!(scheduler.take_resume(resume));
        assert!(!scheduler.take_resume(resume));
    }

    #[test]
    fn cancel_clears_interval_and_resume() {
        let mut host = Calls::default();
        let mut scheduler = TickScheduler::new(SchedulerStrategy::ContinuousInterval);

        scheduler.arm(&mut host);
        assert!(scheduler.cancel(&mut host));
        assert!(!scheduler.cancel(&mut host), "second cancel is a no-op");
        assert!(!scheduler.is_armed());
        assert!(scheduler.pending_resume().is_none());
        assert_eq!(
            host.0,
            vec![
                "interval 1 4ms",
                "timeout 2 100ms",
                "clear-interval 1",
                "clear-timeout 2"
            ]
        );
    }

    #[test]
    fn allocated_handles_are_unique() {
        let mut scheduler = TickScheduler::new(SchedulerStrategy::CooperativeFrame);
        let a = scheduler.allocate();
        let b = scheduler.allocate();
        assert_ne!(a, b);
        assert!(b > a);
    }
}
