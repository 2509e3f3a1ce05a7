// SPDX-License-Identifier: MPL-2.0
//! Debounced resize handling.
//!
//! Every resize signal restarts the window, so only the settled size is
//! measured and drawn.

use std::time::Duration;

use super::host::FrameScheduler;
use super::scheduler::TickHandle;
use crate::config::RESIZE_DEBOUNCE_MS;

#[derive(Debug)]
pub struct ResizeDebouncer {
    window: Duration,
    pending: Option<TickHandle>,
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(RESIZE_DEBOUNCE_MS))
    }
}

impl ResizeDebouncer {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Restarts the window under a fresh handle.
    pub fn signal(&mut self, handle: TickHandle, host: &mut dyn FrameScheduler) {
        self.cancel(host);
        host.set_timeout(handle, self.window);
        self.pending = Some(handle);
    }

    /// Returns true (once) if `handle` is the timeout that settles the window.
    pub fn take(&mut self, handle: TickHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self, host: &mut dyn FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            host.clear_timeout(handle);
        }
    }
}
