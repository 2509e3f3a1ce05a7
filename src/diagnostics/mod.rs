// SPDX-License-Identifier: MPL-2.0
//! Non-fatal diagnostics channel.
//!
//! Configuration errors, stalls and drift corrections never interrupt the
//! host. They are logged through `tracing` and recorded here, in a
//! memory-bounded circular buffer the host can inspect.
//!
//! - [`CircularBuffer`]: Generic ring buffer with configurable capacity
//! - [`DiagnosticEvent`]: A recorded event and its timestamp
//! - [`DiagnosticsLog`]: Shared handle used by the factory and its sessions

mod buffer;
mod events;
mod log;

pub use buffer::{BufferCapacity, CircularBuffer};
pub use events::{DiagnosticEvent, DiagnosticEventKind};
pub use log::DiagnosticsLog;
