// SPDX-License-Identifier: MPL-2.0
use std::rc::Rc;

use canvas_video::config::{self, AudioOption, PlayerOptions};
use canvas_video::domain::geometry::SourceSize;
use canvas_video::domain::video::PlaybackState;
use canvas_video::error::{ConfigError, Error};
use canvas_video::platform::PlatformCapabilities;
use canvas_video::video_player::headless::{
    HeadlessHost, ManualClock, SimulatedAudio, SimulatedMedia,
};
use canvas_video::video_player::SessionFactory;
use tempfile::tempdir;

fn host() -> HeadlessHost {
    HeadlessHost::new(
        SimulatedMedia::new(10.0, SourceSize::new(1280, 720)),
        Rc::new(ManualClock::new()),
    )
}

#[test]
fn test_saved_options_drive_a_session() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("player.toml");

    let options = PlayerOptions {
        autoplay: true,
        loop_playback: true,
        frames_per_second: 30.0,
        ..PlayerOptions::new("#video", "#canvas")
    };
    config::save_to_path(&options, &path).expect("Failed to write config file");

    let loaded = config::load_from_path(&path).expect("Failed to load config from path");
    assert_eq!(loaded, options);

    let mut factory = SessionFactory::default();
    let session = factory
        .create(loaded, host().parts(PlatformCapabilities::cooperative()))
        .expect("Failed to create session");
    assert_eq!(session.state(), PlaybackState::Playing);
    assert!(session.options().loop_playback);

    dir.close().expect("Failed to close temporary directory");
}

#[test]
fn test_hand_written_toml_uses_player_keys() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("player.toml");
    std::fs::write(
        &path,
        r##"
video_selector = "#clip"
canvas_selector = "#surface"
audio = "#soundtrack"
loop = true
reset_on_last_frame = false
thumbnail = "poster.jpg"
"##,
    )
    .expect("Failed to write config file");

    let options = config::load_from_path(&path).expect("Failed to load config");
    assert_eq!(options.audio, AudioOption::Selector("#soundtrack".into()));
    assert!(options.loop_playback);
    assert!(!options.reset_on_last_frame);
    assert_eq!(options.thumbnail.as_deref(), Some("poster.jpg"));
    assert!(options.hide_video, "unset keys keep their defaults");
}

#[test]
fn test_audio_selector_without_track_is_rejected() {
    let options = PlayerOptions {
        audio: AudioOption::Selector("#soundtrack".into()),
        ..PlayerOptions::new("#video", "#canvas")
    };
    let mut factory = SessionFactory::default();
    let result = factory.create(options.clone(), host().parts(Default::default()));
    assert!(matches!(result, Err(Error::Setup(ConfigError::MissingAudio))));

    let parts = host()
        .with_audio(SimulatedAudio::new(10.0))
        .parts(Default::default());
    let session = factory.create(options, parts).expect("Failed to create session");
    assert!(session.has_audio());
}

#[test]
fn test_rejection_message_names_the_option() {
    let mut factory = SessionFactory::default();
    let error = factory
        .create(PlayerOptions::default(), host().parts(Default::default()))
        .expect_err("options without selectors must be rejected");
    assert_eq!(
        error.to_string(),
        "Setup Error: No \"video_selector\" property, or the element is not found"
    );
}
