// SPDX-License-Identifier: MPL-2.0
//! Session construction.
//!
//! [`SessionFactory`] validates a configuration against the collaborators
//! the host could resolve, and owns what sessions share: the poster cache
//! and the diagnostics log.

use std::rc::Rc;

use super::host::{
    AudioTimeline, Clock, DrawSurface, FrameScheduler, MediaSource, TimelineBar, Viewport,
};
use super::poster::{PosterCache, PosterImage};
use super::state::{Collaborators, PlaybackSession};
use crate::config::PlayerOptions;
use crate::diagnostics::{DiagnosticEventKind, DiagnosticsLog};
use crate::error::{ConfigError, Result};
use crate::platform::PlatformCapabilities;

/// What the host resolved for one session.
///
/// `media` and `surface` are optional so that an unresolved element is
/// reported as a configuration error rather than being impossible to
/// express.
pub struct SessionParts {
    pub media: Option<Box<dyn MediaSource>>,
    pub surface: Option<Box<dyn DrawSurface>>,
    pub viewport: Box<dyn Viewport>,
    pub timeline: Option<Box<dyn TimelineBar>>,
    pub audio: Option<Box<dyn AudioTimeline>>,
    pub scheduler: Box<dyn FrameScheduler>,
    pub clock: Box<dyn Clock>,
    pub capabilities: PlatformCapabilities,
}

/// Builds playback sessions.
#[derive(Debug, Default)]
pub struct SessionFactory {
    posters: PosterCache,
    diagnostics: DiagnosticsLog,
}

impl SessionFactory {
    #[must_use]
    pub fn new(posters: PosterCache, diagnostics: DiagnosticsLog) -> Self {
        Self {
            posters,
            diagnostics,
        }
    }

    /// Validates `options` against `parts` and builds an initialized session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Setup`](crate::error::Error::Setup) when a required
    /// collaborator is missing. The rejection is also logged and recorded
    /// in the diagnostics log; nothing else happens.
    pub fn create(
        &mut self,
        mut options: PlayerOptions,
        parts: SessionParts,
    ) -> Result<PlaybackSession> {
        let (collaborators, capabilities) = match validate(&options, parts) {
            Ok(validated) => validated,
            Err(error) => {
                tracing::error!(option = error.option_key(), "{error}");
                self.diagnostics
                    .record(DiagnosticEventKind::ConfigurationRejected {
                        error: error.clone(),
                    });
                return Err(error.into());
            }
        };

        if options.autoplay && options.audio.is_enabled() && !capabilities.allows_audio_autoplay {
            tracing::debug!("audio autoplay blocked on this platform, autoplay disabled");
            options.autoplay = false;
        }

        let poster = self.posters.select(options.thumbnail.as_deref());
        let mut session = PlaybackSession::assemble(
            options,
            capabilities,
            collaborators,
            poster,
            self.diagnostics.clone(),
        );
        session.initialize();
        tracing::debug!(?capabilities, strategy = ?session.strategy(), "session created");
        Ok(session)
    }

    /// Stores a poster the host finished loading and returns the handle to
    /// pass to [`PlaybackSession::on_poster_loaded`].
    pub fn poster_loaded(&mut self, poster: PosterImage) -> Rc<PosterImage> {
        self.posters.insert(poster)
    }

    #[must_use]
    pub fn posters(&self) -> &PosterCache {
        &self.posters
    }

    pub fn posters_mut(&mut self) -> &mut PosterCache {
        &mut self.posters
    }

    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticsLog {
        &self.diagnostics
    }
}

fn validate(
    options: &PlayerOptions,
    parts: SessionParts,
) -> std::result::Result<(Collaborators, PlatformCapabilities), ConfigError> {
    let SessionParts {
        media,
        surface,
        viewport,
        timeline,
        audio,
        scheduler,
        clock,
        capabilities,
    } = parts;

    let media = media
        .filter(|_| options.video_selector.is_some())
        .ok_or(ConfigError::MissingVideo)?;
    let surface = surface
        .filter(|_| options.canvas_selector.is_some())
        .ok_or(ConfigError::MissingCanvas)?;

    if options.has_timeline() || options.scrub_enabled() {
        match &timeline {
            None => return Err(ConfigError::MissingTimeline),
            Some(bar) if options.has_timeline() && !bar.has_progress() => {
                return Err(ConfigError::MissingTimelineProgress)
            }
            Some(_) => {}
        }
    }

    let audio = if options.audio.is_enabled() {
        Some(audio.ok_or(ConfigError::MissingAudio)?)
    } else {
        if audio.is_some() {
            tracing::debug!("audio timeline supplied but audio is disabled, ignoring it");
        }
        None
    };

    let collaborators = Collaborators {
        media,
        audio,
        surface,
        viewport,
        timeline,
        timers: scheduler,
        clock,
    };
    Ok((collaborators, capabilities))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AudioOption;
    use crate::domain::geometry::{OutputGeometry, SourceSize};
    use crate::domain::video::PlaybackState;
    use crate::error::Error;
    use crate::video_player::headless::{
        HeadlessHost, ManualClock, SimulatedAudio, SimulatedMedia, SimulatedTimeline,
    };
    use crate::video_player::timeline::TimelineBounds;

    fn host() -> HeadlessHost {
        HeadlessHost::new(
            SimulatedMedia::new(10.0, SourceSize::new(1280, 720)),
            Rc::new(ManualClock::new()),
        )
    }

    fn options() -> PlayerOptions {
        PlayerOptions::new("#video", "#canvas")
    }

    fn rejection(result: Result<PlaybackSession>) -> ConfigError {
        match result {
            Err(Error::Setup(error)) => error,
            other => panic!("expected a setup error, got {other:?}"),
        }
    }

    #[test]
    fn missing_selectors_are_rejected_and_recorded() {
        let mut factory = SessionFactory::default();

        let error = rejection(factory.create(PlayerOptions::default(), host().parts(Default::default())));
        assert_eq!(error, ConfigError::MissingVideo);

        let mut opts = options();
        opts.canvas_selector = None;
        let error = rejection(factory.create(opts, host().parts(Default::default())));
        assert_eq!(error, ConfigError::MissingCanvas);

        assert_eq!(
            factory.diagnostics().kinds(),
            vec![
                DiagnosticEventKind::ConfigurationRejected {
                    error: ConfigError::MissingVideo
                },
                DiagnosticEventKind::ConfigurationRejected {
                    error: ConfigError::MissingCanvas
                },
            ]
        );
    }

    #[test]
    fn unresolved_media_is_rejected() {
        let mut factory = SessionFactory::default();
        let mut parts = host().parts(Default::default());
        parts.media = None;
        assert_eq!(rejection(factory.create(options(), parts)), ConfigError::MissingVideo);
    }

    #[test]
    fn timeline_requirements() {
        let mut factory = SessionFactory::default();

        let mut opts = options();
        opts.timeline_selector = Some("#passed".into());
        let error = rejection(factory.create(opts.clone(), host().parts(Default::default())));
        assert_eq!(error, ConfigError::MissingTimeline);

        let timeline = SimulatedTimeline::new(TimelineBounds::new(0.0, 100.0)).without_progress();
        let parts = host().with_timeline(timeline).parts(Default::default());
        let error = rejection(factory.create(opts, parts));
        assert_eq!(error, ConfigError::MissingTimelineProgress);
    }

    #[test]
    fn audio_requirements() {
        let mut factory = SessionFactory::default();
        let mut opts = options();
        opts.audio = AudioOption::Selector("#track".into());
        assert_eq!(
            rejection(factory.create(opts, host().parts(Default::default()))),
            ConfigError::MissingAudio
        );

        let parts = host()
            .with_audio(SimulatedAudio::new(10.0))
            .parts(Default::default());
        let session = factory.create(options(), parts).unwrap();
        assert!(!session.has_audio(), "audio disabled drops the track");
    }

    #[test]
    fn initialization_loads_sizes_and_hides() {
        let mut factory = SessionFactory::default();
        let host = host();
        host.media.set_ready_state(crate::video_player::ReadyState::HaveEnoughData);
        let session = factory.create(options(), host.parts(Default::default())).unwrap();

        assert_eq!(host.media.load_count(), 1);
        assert!(!host.media.is_visible());
        assert_eq!(session.geometry(), Some(OutputGeometry::new(800.0, 450.0)));
        assert_eq!(host.surface.size(), Some(OutputGeometry::new(800.0, 450.0)));
        assert_eq!(host.surface.frames_drawn(), 1);
        assert_eq!(session.state(), PlaybackState::Idle);
    }

    #[test]
    fn autoplay_starts_playback() {
        let mut factory = SessionFactory::default();
        let mut opts = options();
        opts.autoplay = true;
        let host = host();
        let session = factory.create(opts, host.parts(Default::default())).unwrap();
        assert!(session.is_playing());
        assert!(session.is_ticking());
    }

    #[test]
    fn audio_autoplay_blocked_platform_disables_autoplay() {
        let mut factory = SessionFactory::default();
        let mut opts = options();
        opts.autoplay = true;
        opts.audio = AudioOption::Flag(true);
        let caps = PlatformCapabilities {
            allows_audio_autoplay: false,
            ..PlatformCapabilities::cooperative()
        };
        let parts = host().with_audio(SimulatedAudio::new(10.0)).parts(caps);
        let session = factory.create(opts, parts).unwrap();

        assert!(!session.options().autoplay);
        assert_eq!(session.state(), PlaybackState::Idle);
    }

    #[test]
    fn cached_poster_sizes_next_session() {
        let mut factory = SessionFactory::default();
        let mut opts = options();
        opts.thumbnail = Some("poster.jpg".into());

        let first_host = host();
        let mut first = factory.create(opts.clone(), first_host.parts(Default::default())).unwrap();
        let poster = factory.poster_loaded(PosterImage::new("poster.jpg", 400, 400));
        first.on_poster_loaded(poster);
        assert_eq!(first.geometry(), Some(OutputGeometry::new(800.0, 800.0)));

        let second_host = host();
        let second = factory.create(opts, second_host.parts(Default::default())).unwrap();
        assert_eq!(second.geometry(), Some(OutputGeometry::new(800.0, 800.0)));
        assert_eq!(second_host.surface.posters_drawn(), 1);

        let mut other = options();
        other.thumbnail = Some("other.jpg".into());
        let third = factory.create(other, host().parts(Default::default())).unwrap();
        assert_eq!(third.geometry(), Some(OutputGeometry::new(800.0, 450.0)));
        assert_eq!(factory.posters().current(), Some("other.jpg"));
    }

    #[test]
    fn sessions_share_the_factory_log() {
        let mut factory = SessionFactory::default();
        let mut session = factory.create(options(), host().parts(Default::default())).unwrap();
        session.unbind();
        assert_eq!(factory.diagnostics().kinds(), vec![DiagnosticEventKind::SessionUnbound]);
    }
}
