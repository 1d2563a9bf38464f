use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use dico_audio::{
    AudioManager, KiraDriver, KiraSound, LoadHandle, LoadStatus, MusicLoader, MusicSource,
    decode_music,
};
use dico_bin::{AppConfig, Autoplay, CONFIG_FILE, SessionController};
use dico_chart::Chart;
use dico_render::{DrawStats, ParticleEffects};
use dico_timing::SystemTimeProvider;

#[derive(Parser, Debug)]
#[command(name = "dico", about = "Headless rhythm session runner")]
struct Args {
    /// Path to the config JSON file.
    #[arg(long, env = "DICO_CONFIG", default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Chart file path or URL (overrides config).
    #[arg(long, env = "DICO_CHART")]
    chart: Option<String>,

    /// Music file path or URL (overrides config).
    #[arg(long, env = "DICO_MUSIC")]
    music: Option<String>,

    /// Frame rate of the headless loop.
    #[arg(long)]
    fps: Option<u32>,

    /// Tap every note automatically.
    #[arg(long)]
    autoplay: bool,

    /// Autoplay timing offset in seconds.
    #[arg(long, allow_negative_numbers = true)]
    offset: Option<f64>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(chart) = &self.chart {
            config.chart.source = Some(chart.clone());
        }
        if let Some(music) = &self.music {
            config.audio.music = Some(music.clone());
        }
        if let Some(fps) = self.fps {
            config.session.fps = fps;
        }
        if self.autoplay {
            config.session.autoplay = true;
        }
        if let Some(offset) = self.offset {
            config.session.autoplay_offset = offset;
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Decode a one-shot sound effect. Missing or broken files leave it silent.
fn load_stinger(location: Option<&str>) -> Option<KiraSound> {
    let location = location?;
    let source = MusicSource::parse(location);
    match source.read_bytes().and_then(decode_music) {
        Ok(sound) => Some(sound),
        Err(e) => {
            log::warn!("Stinger {source} unavailable: {e}");
            None
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    log::info!("dico starting");

    let mut config = AppConfig::load_from(&args.config)?;
    args.apply(&mut config);

    let chart = Arc::new(Chart::load_or_fallback(config.chart.chart_source().as_ref()));

    let mut audio = if config.audio.enabled {
        AudioManager::new(KiraDriver::new(), config.audio.clone())
    } else {
        log::info!("audio disabled, running on the wall clock");
        AudioManager::disabled(config.audio.clone())
    };
    audio.set_stingers(
        load_stinger(config.audio.tap_sound.as_deref()),
        load_stinger(config.audio.great_sound.as_deref()),
    );

    let mut loader = MusicLoader::new(decode_music);
    let mut pending: Option<LoadHandle<KiraSound>> = config
        .audio
        .music
        .as_deref()
        .filter(|_| config.audio.enabled)
        .map(|m| loader.request(MusicSource::parse(m)));

    let render = config.render;
    let mut effects = ParticleEffects::new(0x00d1_c0);
    effects.set_target(render.width * 0.5, render.height * render.hit_line);

    let mut session = SessionController::new(
        Arc::clone(&chart),
        SystemTimeProvider::new(),
        audio,
        effects,
        DrawStats::new(),
        &config,
    )?;

    // Launching from the command line counts as the user gesture.
    session.on_user_gesture();
    session.start();

    let mut autoplay = config
        .session
        .autoplay
        .then(|| Autoplay::new(&chart, config.session.autoplay_offset));
    let interval = Duration::from_secs_f64(config.frame_interval());

    while session.is_playing() {
        match pending.as_ref().map(LoadHandle::poll) {
            Some(LoadStatus::Ready(sound)) => {
                session.load_music(KiraSound::clone(&sound));
                pending = None;
            }
            Some(LoadStatus::Failed(e)) => {
                log::warn!("Music unavailable, continuing silent: {e}");
                pending = None;
            }
            Some(LoadStatus::Pending(_)) | None => {}
        }

        let report = session.frame();
        if report.ended {
            break;
        }
        if let Some(auto) = autoplay.as_mut() {
            for _ in 0..auto.due(report.song_time) {
                session.tap_center();
            }
        }
        std::thread::sleep(interval);
    }

    let summary = match session.result() {
        Some(summary) => summary,
        None => session.end(),
    };
    log::info!(
        "{:.1} primitives per frame on average",
        session.gfx().average_primitives()
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
