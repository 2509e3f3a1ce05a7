// SPDX-License-Identifier: MPL-2.0
//! Host capability descriptor.
//!
//! The playback engine never inspects platform identity. It receives a
//! [`PlatformCapabilities`] once, at construction, and the descriptor stays
//! fixed for the session's lifetime. [`PlatformCapabilities::from_user_agent`]
//! is the stock way to compute one from a browser user-agent string.

/// Broad platform family detected from a user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    Webkit,
    Gecko,
    Other,
}

impl Platform {
    /// Classifies a user agent. Order matters: Android and iOS agents
    /// also mention WebKit.
    #[must_use]
    pub fn detect(user_agent: &str) -> Self {
        let agent = user_agent.to_ascii_lowercase();
        if agent.contains("android") {
            Self::Android
        } else if ["iphone", "ipad", "ipod"].iter().any(|d| agent.contains(d)) {
            Self::Ios
        } else if agent.contains("webkit") {
            Self::Webkit
        } else if agent.contains("gecko") {
            Self::Gecko
        } else {
            Self::Other
        }
    }
}

/// Android releases older than 4.4 cannot paint video onto a canvas reliably.
const NATIVE_PLAYBACK_BELOW_ANDROID: u32 = 440;

/// Extracts the OS version as a number: digits only, right-padded with
/// zeros to at least three digits (`"4.4"` → 440, `"13_2_3"` → 1323).
///
/// Returns 0 for platforms without a version or when none is found.
#[must_use]
pub fn os_version(platform: Platform, user_agent: &str) -> u32 {
    let (marker, separator) = match platform {
        Platform::Android => ("android", '.'),
        Platform::Ios => ("os", '_'),
        _ => return 0,
    };

    let lower = user_agent.to_ascii_lowercase();
    let digits = lower
        .match_indices(marker)
        .filter_map(|(idx, _)| {
            let rest = &lower[idx + marker.len()..];
            let trimmed = rest.trim_start();
            if trimmed.len() == rest.len() {
                // The marker must be followed by whitespace.
                return None;
            }
            let version: String = trimmed
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == separator)
                .filter(char::is_ascii_digit)
                .collect();
            (!version.is_empty()).then_some(version)
        })
        .next();

    let Some(mut digits) = digits else {
        return 0;
    };
    while digits.len() < 3 {
        digits.push('0');
    }
    digits.parse().unwrap_or(0)
}

/// Capabilities of the host platform, injected at session construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCapabilities {
    /// Use the cooperative (display-refresh) scheduler instead of the
    /// continuous interval.
    pub uses_cooperative_scheduler: bool,
    /// Let the media element play natively instead of painting frames.
    pub prefers_native_playback: bool,
    /// Whether a separate audio track may start without a user gesture.
    pub allows_audio_autoplay: bool,
}

impl Default for PlatformCapabilities {
    fn default() -> Self {
        Self {
            uses_cooperative_scheduler: false,
            prefers_native_playback: false,
            allows_audio_autoplay: true,
        }
    }
}

impl PlatformCapabilities {
    /// Capabilities of a host that refreshes on display frames.
    #[must_use]
    pub fn cooperative() -> Self {
        Self {
            uses_cooperative_scheduler: true,
            ..Self::default()
        }
    }

    /// Capabilities of a host that must fall back to native playback.
    #[must_use]
    pub fn native() -> Self {
        Self {
            prefers_native_playback: true,
            ..Self::default()
        }
    }

    /// Derives capabilities from a browser user-agent string.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        let platform = Platform::detect(user_agent);
        let version = os_version(platform, user_agent);
        let caps = Self {
            uses_cooperative_scheduler: platform == Platform::Ios,
            prefers_native_playback: platform == Platform::Android
                && version < NATIVE_PLAYBACK_BELOW_ANDROID,
            allows_audio_autoplay: platform != Platform::Ios,
        };
        tracing::debug!(?platform, version, ?caps, "detected platform capabilities");
        caps
    }
}
