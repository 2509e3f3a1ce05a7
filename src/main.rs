// SPDX-License-Identifier: MPL-2.0
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use canvas_video::config::{self, PlayerOptions};
use canvas_video::domain::geometry::SourceSize;
use canvas_video::error::{Error, Result};
use canvas_video::platform::PlatformCapabilities;
use canvas_video::video_player::headless::{
    self, FixedViewport, HeadlessHost, ManualClock, SimulatedAudio, SimulatedMedia,
};
use canvas_video::video_player::{Clock, PlayerEvent, PosterImage, SessionFactory, SystemClock};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Simulated canvas video playback

USAGE:
  canvas_video [OPTIONS]

OPTIONS:
  --config PATH         Player options (TOML); defaults to the user config
  --duration SECS       Media duration [default: 10]
  --size WxH            Natural frame size [default: 1920x1080]
  --container WxH       Container size [default: 800x450]
  --max-width PX        Container max-width
  --max-height PX       Container max-height
  --fps N               Override frames_per_second
  --loop                Loop playback
  --audio-offset SECS   Attach an audio track starting this far off
  --poster PATH         Decode an image and use it as the thumbnail
  --user-agent UA       Derive platform capabilities from a user agent
  --cooperative         Use the display-refresh scheduler
  --native              Fall back to native playback
  --run-for SECS        How long to run [default: duration + 1]
  --virtual             Run on virtual time instead of the wall clock
  -h, --help            Print help
";

struct Args {
    config: Option<PathBuf>,
    duration: f64,
    size: (u32, u32),
    container: (u32, u32),
    max_width: Option<u32>,
    max_height: Option<u32>,
    fps: Option<f64>,
    looped: bool,
    audio_offset: Option<f64>,
    poster: Option<PathBuf>,
    capabilities: PlatformCapabilities,
    run_for: Option<f64>,
    virtual_time: bool,
}

fn parse_size(s: &str) -> std::result::Result<(u32, u32), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WxH, got {s:?}"))?;
    let w = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let h = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    Ok((w, h))
}

fn parse_args() -> std::result::Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(None);
    }

    let user_agent: Option<String> = args.opt_value_from_str("--user-agent")?;
    let cooperative = args.contains("--cooperative");
    let native = args.contains("--native");
    let capabilities = match (user_agent, native, cooperative) {
        (Some(ua), _, _) => PlatformCapabilities::from_user_agent(&ua),
        (None, true, _) => PlatformCapabilities::native(),
        (None, false, true) => PlatformCapabilities::cooperative(),
        (None, false, false) => PlatformCapabilities::default(),
    };

    let parsed = Args {
        config: args.opt_value_from_str("--config")?,
        duration: args.opt_value_from_str("--duration")?.unwrap_or(10.0),
        size: args
            .opt_value_from_fn("--size", parse_size)?
            .unwrap_or((1920, 1080)),
        container: args
            .opt_value_from_fn("--container", parse_size)?
            .unwrap_or((800, 450)),
        max_width: args.opt_value_from_str("--max-width")?,
        max_height: args.opt_value_from_str("--max-height")?,
        fps: args.opt_value_from_str("--fps")?,
        looped: args.contains("--loop"),
        audio_offset: args.opt_value_from_str("--audio-offset")?,
        poster: args.opt_value_from_str("--poster")?,
        capabilities,
        run_for: args.opt_value_from_str("--run-for")?,
        virtual_time: args.contains("--virtual"),
    };

    let rest = args.finish();
    if !rest.is_empty() {
        tracing::warn!(?rest, "ignoring unexpected arguments");
    }
    Ok(Some(parsed))
}

fn load_options(args: &Args) -> Result<PlayerOptions> {
    let mut options = match &args.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load()?,
    };
    options
        .video_selector
        .get_or_insert_with(|| "#video".to_owned());
    options
        .canvas_selector
        .get_or_insert_with(|| "#canvas".to_owned());
    if let Some(fps) = args.fps {
        options.frames_per_second = fps;
    }
    if args.looped {
        options.loop_playback = true;
    }
    if args.audio_offset.is_some() {
        options.audio = config::AudioOption::Flag(true);
    }
    if let Some(path) = &args.poster {
        options.thumbnail = Some(path.display().to_string());
    }
    Ok(options)
}

fn print_event(event: &PlayerEvent) {
    match event {
        PlayerEvent::Update {
            current_time,
            duration,
        } => tracing::trace!(current_time, duration, "update"),
        other => println!("{other:?}"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let Some(args) = parse_args()? else {
        return Ok(());
    };
    let options = load_options(&args)?;

    let manual_clock = ManualClock::new();
    let clock: Rc<dyn Clock> = if args.virtual_time {
        Rc::new(manual_clock.clone())
    } else {
        Rc::new(SystemClock)
    };

    let media = SimulatedMedia::new(args.duration, SourceSize::new(args.size.0, args.size.1));
    let mut viewport = FixedViewport::new(args.container.0, args.container.1);
    if let Some(max_width) = args.max_width {
        viewport = viewport.with_max_width(max_width);
    }
    if let Some(max_height) = args.max_height {
        viewport = viewport.with_max_height(max_height);
    }
    let mut host = HeadlessHost::new(media, clock).with_viewport(viewport);
    if let Some(offset) = args.audio_offset {
        let audio = SimulatedAudio::new(args.duration);
        audio.set_position(offset);
        host = host.with_audio(audio);
    }

    let mut factory = SessionFactory::default();
    let mut session = factory.create(options, host.parts(args.capabilities))?;
    session.set_listener(print_event);

    if let Some(path) = &args.poster {
        let bytes = std::fs::read(path).map_err(Error::from)?;
        let poster = PosterImage::decode(path.display().to_string(), &bytes)?;
        let poster = factory.poster_loaded(poster);
        session.on_poster_loaded(poster);
    }

    session.on_media_ready();
    tracing::info!(
        strategy = ?session.strategy(),
        geometry = ?session.geometry(),
        "session ready"
    );

    session.play();
    let span = Duration::try_from_secs_f64(args.run_for.unwrap_or(args.duration + 1.0))
        .unwrap_or(Duration::ZERO);
    let dispatched = if args.virtual_time {
        headless::run_virtual(&mut session, &host.queue, &manual_clock, span)
    } else {
        headless::run_realtime(&mut session, &host.queue, span).await
    };

    tracing::info!(
        dispatched,
        frames = host.surface.frames_drawn(),
        position = session.current_time(),
        state = ?session.state(),
        "run finished"
    );
    for event in factory.diagnostics().events() {
        tracing::info!(kind = ?event.kind, "diagnostic");
    }

    session.unbind();
    Ok(())
}
