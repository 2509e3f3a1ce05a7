// SPDX-License-Identifier: MPL-2.0
//! Domain layer - pure value types with ZERO external dependencies.
//!
//! # Modules
//!
//! - [`diagnostics`]: Diagnostics types ([`BufferCapacity`](diagnostics::BufferCapacity))
//! - [`geometry`]: Sizing types ([`SourceSize`](geometry::SourceSize),
//!   [`SizeConstraints`](geometry::SizeConstraints), [`OutputGeometry`](geometry::OutputGeometry))
//! - [`video`]: Playback types ([`PlaybackState`](video::PlaybackState),
//!   [`FramesPerSecond`](video::FramesPerSecond), [`SeekFraction`](video::SeekFraction))

pub mod diagnostics;
pub mod geometry;
pub mod video;
