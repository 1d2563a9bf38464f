use std::sync::Arc;

use anyhow::{Result, bail};
use dico_audio::{AudioBackend, AudioManager};
use dico_chart::Chart;
use dico_input::{Input, KeyBindings, KeyCommand, PointerEvent, SurfaceRect, Tap, TouchEvent};
use dico_play::{Judge, JudgeSnapshot, ResultSummary, Tier, Verdict, resonance_tier};
use dico_render::{Effects, FrameStats, RenderBackend, Renderer};
use dico_timing::{Clock, TimeProvider};
use serde::Serialize;

use crate::app_config::AppConfig;

/// Effects intensity above which the heartbeat fires.
const HEARTBEAT_LEVEL: f64 = 0.65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Playing,
    Result,
}

/// What one call to [`SessionController::frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    pub song_time: f64,
    /// Notes auto-missed this frame.
    pub missed: usize,
    pub stats: FrameStats,
    pub ended: bool,
}

/// Owns and wires one play session: clock, audio, judge, renderer, input and
/// effects. All state lives on the caller's thread; taps and frames
/// interleave freely.
pub struct SessionController<T, B, E, G>
where
    T: TimeProvider,
    B: AudioBackend,
    E: Effects,
    G: RenderBackend,
{
    chart: Arc<Chart>,
    clock: Clock<T>,
    audio: AudioManager<B>,
    judge: Judge,
    renderer: Renderer,
    input: Input,
    keys: KeyBindings,
    effects: E,
    gfx: G,
    phase: SessionPhase,
    song_time: f64,
    last_verdict: Option<Verdict>,
    result: Option<ResultSummary>,
    res_tier: u8,
    heartbeat_on: bool,
    draw_warned: bool,
}

impl<T, B, E, G> SessionController<T, B, E, G>
where
    T: TimeProvider,
    B: AudioBackend,
    E: Effects,
    G: RenderBackend,
{
    /// Wire a session for `chart`. Fails only when the surface cannot be
    /// initialized at all.
    pub fn new(
        chart: Arc<Chart>,
        time: T,
        audio: AudioManager<B>,
        effects: E,
        mut gfx: G,
        config: &AppConfig,
    ) -> Result<Self> {
        let render = config.render;
        if !(render.width >= 1.0 && render.height >= 1.0) {
            bail!(
                "cannot initialize: surface size {}x{} is not drawable",
                render.width,
                render.height
            );
        }
        let mut renderer = Renderer::new(Arc::clone(&chart), render);
        renderer.resize(&mut gfx, render.width, render.height, render.device_pixel_ratio)?;

        Ok(Self {
            clock: Clock::for_chart(time, &chart),
            judge: Judge::with_config(Arc::clone(&chart), config.judge),
            input: Input::new(SurfaceRect::sized(render.width, render.height)),
            keys: config.session.keys.clone(),
            chart,
            audio,
            renderer,
            effects,
            gfx,
            phase: SessionPhase::Idle,
            song_time: 0.0,
            last_verdict: None,
            result: None,
            res_tier: 0,
            heartbeat_on: false,
            draw_warned: false,
        })
    }

    pub fn chart(&self) -> &Arc<Chart> {
        &self.chart
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    /// Song time as of the last frame or tap.
    pub fn song_time(&self) -> f64 {
        self.song_time
    }

    pub fn judge(&self) -> &Judge {
        &self.judge
    }

    pub fn snapshot(&self) -> JudgeSnapshot {
        self.judge.snapshot()
    }

    pub fn last_verdict(&self) -> Option<Verdict> {
        self.last_verdict
    }

    pub fn result(&self) -> Option<ResultSummary> {
        self.result
    }

    pub fn audio(&self) -> &AudioManager<B> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager<B> {
        &mut self.audio
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn gfx(&self) -> &G {
        &self.gfx
    }

    pub fn gfx_mut(&mut self) -> &mut G {
        &mut self.gfx
    }

    pub fn time_label(&self) -> String {
        self.clock.format_time(self.song_time)
    }

    /// Begin a fresh run. No-op while already playing.
    pub fn start(&mut self) {
        if self.phase == SessionPhase::Playing {
            return;
        }
        self.audio.unlock();
        self.judge.reset();
        self.renderer.reset();
        self.clock.restart(&mut self.audio);
        self.song_time = self.clock.song_time(&self.audio);
        self.phase = SessionPhase::Playing;
        self.last_verdict = None;
        self.result = None;
        self.res_tier = 0;
        self.heartbeat_on = false;
        log::info!(
            "session start: {} ({} notes, audio {})",
            self.chart.title(),
            self.chart.len(),
            if self.audio.is_playing() { "on" } else { "off" }
        );
    }

    /// Halt the frame loop and the music together.
    pub fn stop(&mut self) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        self.clock.stop(&mut self.audio);
        self.song_time = self.clock.song_time(&self.audio);
        self.phase = SessionPhase::Idle;
        log::info!("session stopped at {}", self.time_label());
    }

    /// Finish the run and produce its summary.
    pub fn end(&mut self) -> ResultSummary {
        if self.phase == SessionPhase::Playing {
            self.clock.stop(&mut self.audio);
        }
        self.judge.finish();
        let summary = ResultSummary::from_snapshot(&self.judge.snapshot());
        self.result = Some(summary);
        self.phase = SessionPhase::Result;
        log::info!(
            "result: score {} max combo {} resonance {}% ({} hit / {} miss)",
            summary.score,
            summary.max_combo,
            summary.resonance_percent,
            summary.hit_count,
            summary.miss_count
        );
        summary
    }

    pub fn restart(&mut self) {
        self.stop();
        self.start();
    }

    /// Install decoded music. A running session jumps the track to the
    /// current song time so judgment stays continuous.
    pub fn load_music(&mut self, music: B::Sound) {
        self.audio.load_music(music);
        if self.phase == SessionPhase::Playing {
            self.resync_audio();
        }
    }

    fn resync_audio(&mut self) {
        let now = self.clock.song_time(&self.audio);
        self.clock.seek(&mut self.audio, now);
        if self.audio.is_playing() {
            log::info!("music following song time from {now:.3}s");
        }
    }

    /// Retry audio unlock from an input handler. When it succeeds mid-run
    /// the music picks up at the current song time.
    pub fn on_user_gesture(&mut self) -> bool {
        let was_unlocked = self.audio.is_unlocked();
        if !self.audio.unlock() {
            return false;
        }
        if !was_unlocked && self.phase == SessionPhase::Playing {
            self.resync_audio();
        }
        true
    }

    /// New surface geometry. Note state is kept.
    pub fn resize(&mut self, rect: SurfaceRect, dpr: f32) -> Result<()> {
        if rect.is_empty() {
            bail!("cannot resize to an empty surface");
        }
        self.renderer.resize(&mut self.gfx, rect.width, rect.height, dpr)?;
        self.input.set_rect(rect);
        Ok(())
    }

    /// Advance one display frame.
    pub fn frame(&mut self) -> FrameReport {
        if self.phase != SessionPhase::Playing {
            return FrameReport {
                song_time: self.song_time,
                ended: self.phase == SessionPhase::Result,
                ..Default::default()
            };
        }

        self.audio.update();
        let now = self.clock.song_time(&self.audio);
        let dt = (now - self.song_time).max(0.0) as f32;
        self.song_time = now;

        let missed = self.judge.sweep_miss(now);
        self.renderer.sync_judge_cursor(self.judge.cursor());
        self.update_effects(dt);

        let stats = match self
            .renderer
            .draw_with_effects(&mut self.gfx, now, &self.effects)
        {
            Ok(stats) => stats,
            Err(e) => {
                if !self.draw_warned {
                    log::warn!("Frame draw failed, continuing without visuals: {e}");
                    self.draw_warned = true;
                }
                FrameStats::default()
            }
        };

        let ended = self.clock.is_ended(now);
        if ended {
            self.end();
        }
        FrameReport {
            song_time: now,
            missed,
            stats,
            ended,
        }
    }

    fn update_effects(&mut self, dt: f32) {
        let level = self.judge.state().resonance / 100.0;
        self.effects.set_intensity(level);
        if level > HEARTBEAT_LEVEL {
            if !self.heartbeat_on {
                self.effects.heartbeat();
                self.heartbeat_on = true;
            }
        } else {
            self.heartbeat_on = false;
        }
        self.effects.update(dt);
    }

    /// Judge a tap at surface position `tap`.
    pub fn on_tap(&mut self, tap: Tap) -> Verdict {
        if self.phase != SessionPhase::Playing {
            return Verdict::empty();
        }
        self.audio.play_tap();
        self.effects.burst(tap.x, tap.y);

        let now = self.clock.song_time(&self.audio);
        self.song_time = now;
        let verdict = self.judge.hit(now);
        if matches!(verdict.tier, Tier::Perfect | Tier::Great) {
            self.audio.play_great();
            self.effects.stream(tap.x, tap.y);
        }
        self.renderer.sync_judge_cursor(self.judge.cursor());

        let tier = resonance_tier(self.judge.state().combo);
        if tier == 2 && self.res_tier < 2 {
            self.effects.divine();
        }
        self.res_tier = tier;

        log::debug!(
            "tap at {now:.3}s -> {} (distance {:?})",
            verdict.tier.name(),
            verdict.distance
        );
        self.last_verdict = Some(verdict);
        verdict
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> Option<Verdict> {
        let tap = self.input.on_pointer_down(event)?;
        self.on_user_gesture();
        Some(self.on_tap(tap))
    }

    pub fn on_touch_start(&mut self, event: &TouchEvent) -> Verdict {
        let tap = self.input.on_touch_start(event);
        self.on_user_gesture();
        self.on_tap(tap)
    }

    pub fn tap_center(&mut self) -> Verdict {
        let tap = self.input.sim_tap_center();
        self.on_tap(tap)
    }

    /// Apply a key press by name. Returns the command it mapped to.
    pub fn on_key(&mut self, name: &str) -> Option<KeyCommand> {
        let command = self.keys.command_for(name)?;
        match command {
            KeyCommand::TapCenter => {
                self.tap_center();
            }
            KeyCommand::Start => {
                self.on_user_gesture();
                self.start();
            }
            KeyCommand::Stop => self.stop(),
        }
        Some(command)
    }
}
