// SPDX-License-Identifier: MPL-2.0
//! `canvas_video` paints a video frame by frame onto a drawable surface.
//!
//! The engine owns the play/pause/stop state machine, the tick loop that
//! advances video time, the audio drift correction and the responsive
//! geometry solver. Everything platform specific (decoding, drawing, timers,
//! layout) is supplied by the host through the traits in
//! [`video_player::host`].

#![doc(html_root_url = "https://docs.rs/canvas_video/0.1.0")]

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod platform;
pub mod video_player;

#[cfg(test)]
mod test_utils;
