// SPDX-License-Identifier: MPL-2.0
//! Shared diagnostics log.
//!
//! The factory and every session it builds hold a clone of the same
//! [`DiagnosticsLog`]. Sessions are single-threaded, so the buffer lives
//! behind `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::rc::Rc;

use super::buffer::{BufferCapacity, CircularBuffer};
use super::events::{DiagnosticEvent, DiagnosticEventKind};

/// Cloneable handle onto a bounded event buffer.
#[derive(Debug, Clone)]
pub struct DiagnosticsLog {
    buffer: Rc<RefCell<CircularBuffer<DiagnosticEvent>>>,
}

impl Default for DiagnosticsLog {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}

impl DiagnosticsLog {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self {
            buffer: Rc::new(RefCell::new(CircularBuffer::new(capacity))),
        }
    }

    pub fn record(&self, kind: DiagnosticEventKind) {
        self.buffer.borrow_mut().push(DiagnosticEvent::new(kind));
    }

    /// Returns a snapshot of the recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.buffer.borrow().iter().cloned().collect()
    }

    /// Returns the kinds of the recorded events, oldest first.
    #[must_use]
    pub fn kinds(&self) -> Vec<DiagnosticEventKind> {
        self.buffer.borrow().iter().map(|e| e.kind.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.buffer.borrow_mut().clear();
    }
}
