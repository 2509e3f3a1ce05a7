// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Image(String),
    Setup(ConfigError),
}

/// Problems detected once, while assembling a playback session.
///
/// A session that fails validation is never constructed; the host keeps
/// running and is expected to check for a usable instance before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No video selector configured, or the host could not resolve it.
    MissingVideo,

    /// No canvas selector configured, or the host could not resolve it.
    MissingCanvas,

    /// A timeline was requested but its bar element is missing.
    MissingTimeline,

    /// A timeline was requested but its progress element is missing.
    MissingTimelineProgress,

    /// An audio selector was configured but no audio timeline was supplied.
    MissingAudio,
}

impl ConfigError {
    /// Returns the option key this error refers to.
    pub fn option_key(&self) -> &'static str {
        match self {
            ConfigError::MissingVideo => "video_selector",
            ConfigError::MissingCanvas => "canvas_selector",
            ConfigError::MissingTimeline => "timeline_bar",
            ConfigError::MissingTimelineProgress => "timeline_selector",
            ConfigError::MissingAudio => "audio",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVideo => {
                write!(f, "No \"video_selector\" property, or the element is not found")
            }
            ConfigError::MissingCanvas => {
                write!(f, "No \"canvas_selector\" property, or the element is not found")
            }
            ConfigError::MissingTimeline => {
                write!(f, "Element for the \"timeline_bar\" selector not found")
            }
            ConfigError::MissingTimelineProgress => {
                write!(f, "Element for the \"timeline_selector\" not found")
            }
            ConfigError::MissingAudio => write!(f, "Element for the \"audio\" not found"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Image(e) => write!(f, "Image Error: {}", e),
            Error::Setup(e) => write!(f, "Setup Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Setup(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
