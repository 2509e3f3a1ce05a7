// SPDX-License-Identifier: MPL-2.0
//! Diagnostics domain types.
//!
//! Value types for the diagnostics channel:
//! - [`BufferCapacity`]: Capacity for the diagnostic event buffer

mod newtypes;

pub use newtypes::{buffer_capacity_bounds, BufferCapacity};
