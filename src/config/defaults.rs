// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Frame rate**: Advance throttle floor bounds
//! - **Sync**: Audio drift tolerance and delayed media resume
//! - **Scheduling**: Continuous interval period and resize debounce
//! - **Poster cache**: Number of decoded poster images kept per factory

// ==========================================================================
// Frame Rate Defaults
// ==========================================================================

/// Default advance cadence in frames per second.
pub const DEFAULT_FRAMES_PER_SECOND: f64 = 25.0;

/// Minimum accepted frames per second.
pub const MIN_FRAMES_PER_SECOND: f64 = 1.0;

/// Maximum accepted frames per second.
pub const MAX_FRAMES_PER_SECOND: f64 = 240.0;

// ==========================================================================
// Sync Defaults
// ==========================================================================

/// Audio/video divergence (seconds) above which audio is snapped to video.
pub const AUDIO_DRIFT_TOLERANCE_SECS: f64 = 0.3;

/// Lag between arming the continuous scheduler and resuming the media
/// source's own playback (milliseconds).
pub const MEDIA_RESUME_DELAY_MS: u64 = 100;

// ==========================================================================
// Scheduling Defaults
// ==========================================================================

/// Period of the continuous-interval scheduler (milliseconds).
/// Zero-delay host intervals are clamped to this.
pub const CONTINUOUS_INTERVAL_MS: u64 = 4;

/// Quiet window after the last resize signal before geometry is recomputed.
pub const RESIZE_DEBOUNCE_MS: u64 = 500;

// ==========================================================================
// Poster Cache Defaults
// ==========================================================================

/// Default number of decoded poster images kept by a session factory.
pub const DEFAULT_POSTER_CACHE_CAPACITY: usize = 4;

/// Minimum poster cache capacity.
pub const MIN_POSTER_CACHE_CAPACITY: usize = 1;

/// Maximum poster cache capacity.
pub const MAX_POSTER_CACHE_CAPACITY: usize = 64;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_FRAMES_PER_SECOND > 0.0);
    assert!(MAX_FRAMES_PER_SECOND > MIN_FRAMES_PER_SECOND);
    assert!(DEFAULT_FRAMES_PER_SECOND >= MIN_FRAMES_PER_SECOND);
    assert!(DEFAULT_FRAMES_PER_SECOND <= MAX_FRAMES_PER_SECOND);

    assert!(AUDIO_DRIFT_TOLERANCE_SECS > 0.0);
    assert!(CONTINUOUS_INTERVAL_MS > 0);
    assert!(RESIZE_DEBOUNCE_MS > MEDIA_RESUME_DELAY_MS);

    assert!(MIN_POSTER_CACHE_CAPACITY > 0);
    assert!(MAX_POSTER_CACHE_CAPACITY >= MIN_POSTER_CACHE_CAPACITY);
    assert!(DEFAULT_POSTER_CACHE_CAPACITY >= MIN_POSTER_CACHE_CAPACITY);
    assert!(DEFAULT_POSTER_CACHE_CAPACITY <= MAX_POSTER_CACHE_CAPACITY);
};
