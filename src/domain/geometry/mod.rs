// SPDX-License-Identifier: MPL-2.0
//! Geometry domain types.
//!
//! - [`SourceSize`]: natural size of a source
//! - [`SizeConstraints`]: container width and optional max bounds
//! - [`OutputGeometry`]: the rendered surface size

mod types;

pub use types::{OutputGeometry, SizeConstraints, SourceSize};
