// SPDX-License-Identifier: MPL-2.0
//! This module handles the player configuration surface, including loading and
//! saving options to a `player.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use canvas_video::config::{self, PlayerOptions};
//! use std::path::PathBuf;
//!
//! // Load existing configuration
//! let mut options = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! options.loop_playback = true;
//!
//! // Save the modified configuration
//! config::save(&options).expect("Failed to save config");
//!
//! // To load/save from a specific path (e.g., for testing)
//! let temp_dir = PathBuf::from("./temp_config_dir");
//! std::fs::create_dir_all(&temp_dir).unwrap();
//! let temp_file = temp_dir.join("test_player.toml");
//! config::save_to_path(&options, &temp_file).expect("Failed to save to path");
//! let loaded = config::load_from_path(&temp_file).expect("Failed to load from path");
//! assert!(loaded.loop_playback);
//! std::fs::remove_dir_all(&temp_dir).unwrap();
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "player.toml";
const APP_NAME: &str = "CanvasVideo";

/// Audio configuration: `false`, `true` (a companion track sharing the
/// video's sources) or a selector naming an existing audio element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AudioOption {
    Flag(bool),
    Selector(String),
}

impl AudioOption {
    /// Returns true if an independent audio timeline is requested.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Flag(enabled) => *enabled,
            Self::Selector(_) => true,
        }
    }

    /// Returns the explicit selector, if one was given.
    #[must_use]
    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::Selector(selector) => Some(selector),
            Self::Flag(_) => None,
        }
    }
}

impl Default for AudioOption {
    fn default() -> Self {
        Self::Flag(false)
    }
}

/// Options exposed to the host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerOptions {
    pub video_selector: Option<String>,
    pub canvas_selector: Option<String>,
    /// Advance throttle floor.
    pub frames_per_second: f64,
    pub hide_video: bool,
    pub autoplay: bool,
    pub audio: AudioOption,
    /// Progress element of the timeline. Setting it requires a timeline.
    pub timeline_selector: Option<String>,
    /// Bar element of the timeline. Enables scrubbing.
    pub timeline_bar: Option<String>,
    pub reset_on_last_frame: bool,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    /// Poster image URL driving the initial geometry.
    pub thumbnail: Option<String>,
    /// Pause when the media source reports it is waiting for data.
    pub pause_on_stall: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            video_selector: None,
            canvas_selector: None,
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
            hide_video: true,
            autoplay: false,
            audio: AudioOption::default(),
            timeline_selector: None,
            timeline_bar: None,
            reset_on_last_frame: true,
            loop_playback: false,
            thumbnail: None,
            pause_on_stall: false,
        }
    }
}

impl PlayerOptions {
    /// Creates options bound to the given video and canvas selectors.
    #[must_use]
    pub fn new(video_selector: impl Into<String>, canvas_selector: impl Into<String>) -> Self {
        Self {
            video_selector: Some(video_selector.into()),
            canvas_selector: Some(canvas_selector.into()),
            ..Self::default()
        }
    }

    /// Returns true if a timeline (progress and bar) is configured.
    #[must_use]
    pub fn has_timeline(&self) -> bool {
        self.timeline_selector.is_some()
    }

    /// Returns true if scrubbing on the timeline bar is enabled.
    #[must_use]
    pub fn scrub_enabled(&self) -> bool {
        self.timeline_bar.is_some()
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<PlayerOptions> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(PlayerOptions::default())
}

pub fn save(options: &PlayerOptions) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(options, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<PlayerOptions> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(options) => Ok(options),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "invalid player options, using defaults");
            Ok(PlayerOptions::default())
        }
    }
}

pub fn save_to_path(options: &PlayerOptions, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(options)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_options() {
        let options = PlayerOptions {
            frames_per_second: 30.0,
            loop_playback: true,
            audio: AudioOption::Selector("#soundtrack".to_string()),
            thumbnail: Some("poster.jpg".to_string()),
            ..PlayerOptions::new("#video", "#canvas")
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("player.toml");

        save_to_path(&options, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, options);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("player.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded, PlayerOptions::default());
    }

    #[test]
    fn load_from_path_errors_on_missing_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let result = load_from_path(&temp_dir.path().join("absent.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("player.toml");
        fs::write(&config_path, "loop = true\naudio = true\n").expect("failed to write toml");

        let loaded = load_from_path(&config_path).expect("failed to load config");
        assert!(loaded.loop_playback);
        assert_eq!(loaded.audio, AudioOption::Flag(true));
        assert!(loaded.reset_on_last_frame);
        assert_eq!(loaded.frames_per_second, DEFAULT_FRAMES_PER_SECOND);
    }

    #[test]
    fn default_options_match_player_defaults() {
        let options = PlayerOptions::default();
        assert_eq!(options.frames_per_second, 25.0);
        assert!(options.hide_video);
        assert!(!options.autoplay);
        assert!(!options.audio.is_enabled());
        assert!(options.reset_on_last_frame);
        assert!(!options.loop_playback);
        assert!(!options.pause_on_stall);
        assert!(!options.has_timeline());
    }

    #[test]
    fn audio_option_selector() {
        assert!(AudioOption::Flag(true).is_enabled());
        assert_eq!(AudioOption::Flag(true).selector(), None);
        let selected = AudioOption::Selector(".track".into());
        assert!(selected.is_enabled());
        assert_eq!(selected.selector(), Some(".track"));
    }
}
