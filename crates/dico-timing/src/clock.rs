use dico_chart::Chart;

use crate::time::TimeProvider;
use crate::transport::{MusicTransport, PlayRequest};

/// Raw transport movement below this is treated as a stalled audio clock.
pub const STALL_EPSILON: f64 = 1e-4;

/// Longest wall-clock extrapolation (seconds) while a transport exists but
/// its position is not moving.
pub const STALL_EXTRAPOLATION_CAP: f64 = 3.0;

/// Session length estimate: 60 s for an empty chart, otherwise four seconds
/// past the last note with a 20 s floor.
pub fn duration_guess(chart: &Chart) -> f64 {
    match chart.last_note_time() {
        None => 60.0,
        Some(last) => (last + 4.0).max(20.0),
    }
}

/// Format song time as `mm:ss`.
pub fn format_time(song_time: f64) -> String {
    let secs = if song_time.is_finite() {
        song_time.max(0.0).floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Unified song clock.
///
/// Song time is the transport position minus the chart offset, clamped at 0.
/// While the transport moves it is authoritative; while it is stalled (just
/// after start/resume) or missing entirely, time is extrapolated from the
/// wall clock. Song time never goes backward while running, only on an
/// explicit restart or seek.
pub struct Clock<T: TimeProvider> {
    time: T,
    offset: f64,
    duration: f64,
    running: bool,
    paused: bool,
    last_song_time: f64,
    /// Wall-clock anchor (us) for extrapolation.
    base_us: i64,
    /// Song time at `base_us`.
    base_song_time: f64,
    last_raw: Option<f64>,
    stall_frames: u32,
    pending_seek: Option<f64>,
}

impl<T: TimeProvider> Clock<T> {
    pub fn new(time: T, offset: f64, duration: f64) -> Self {
        Self {
            time,
            offset,
            duration,
            running: false,
            paused: false,
            last_song_time: 0.0,
            base_us: 0,
            base_song_time: 0.0,
            last_raw: None,
            stall_frames: 0,
            pending_seek: None,
        }
    }

    pub fn for_chart(time: T, chart: &Chart) -> Self {
        Self::new(time, chart.offset(), duration_guess(chart))
    }

    fn raw(transport: &dyn MusicTransport) -> Option<f64> {
        transport.music_time().filter(|t| t.is_finite())
    }

    fn to_song_time(&self, raw: f64) -> f64 {
        (raw - self.offset).max(0.0)
    }

    fn mark_base(&mut self, song_time: f64) {
        self.base_us = self.time.now_us();
        self.base_song_time = song_time;
        self.stall_frames = 0;
    }

    /// Re-read the transport after it was (re)started and anchor there.
    fn anchor(&mut self, transport: &dyn MusicTransport, fallback: f64) {
        let raw = Self::raw(transport);
        self.last_raw = raw;
        let song_time = raw.map_or(fallback, |r| self.to_song_time(r));
        self.last_song_time = song_time;
        self.mark_base(song_time);
    }

    /// Begin a run. With `reset` the transport and song time go back to 0.
    pub fn start(&mut self, transport: &mut dyn MusicTransport, reset: bool) {
        self.paused = false;
        self.running = true;

        let (request, fallback) = match self.pending_seek.take() {
            Some(t) => (PlayRequest::At(t + self.offset), t),
            None if reset => (PlayRequest::Reset, 0.0),
            None => (PlayRequest::Resume, self.last_song_time),
        };
        if !transport.play(request) {
            log::debug!("clock started without audio, using wall clock");
        }
        self.anchor(transport, fallback);
        log::debug!("clock start at {:.3}s (reset={reset})", self.last_song_time);
    }

    pub fn restart(&mut self, transport: &mut dyn MusicTransport) {
        self.pending_seek = None;
        self.start(transport, true);
    }

    /// Freeze song time and pause the transport, keeping its position.
    pub fn pause(&mut self, transport: &mut dyn MusicTransport) {
        if !self.running {
            return;
        }
        let now = self.song_time(transport);
        self.running = false;
        self.paused = true;
        transport.stop(false);
        self.last_song_time = now;
    }

    pub fn resume(&mut self, transport: &mut dyn MusicTransport) {
        if self.running {
            return;
        }
        self.paused = false;
        self.running = true;
        let request = match self.pending_seek.take() {
            Some(t) => PlayRequest::At(t + self.offset),
            None => PlayRequest::Resume,
        };
        transport.play(request);
        let fallback = self.last_song_time;
        self.anchor(transport, fallback);
    }

    /// Halt the run and rewind the transport. The final song time stays
    /// readable until the next start.
    pub fn stop(&mut self, transport: &mut dyn MusicTransport) {
        let now = self.song_time(transport);
        self.running = false;
        self.paused = false;
        self.pending_seek = None;
        transport.stop(true);
        self.last_raw = Self::raw(transport);
        self.last_song_time = now;
    }

    /// Jump to `song_time`. Takes effect immediately while running, or on the
    /// next start/resume otherwise.
    pub fn seek(&mut self, transport: &mut dyn MusicTransport, song_time: f64) {
        let target = if song_time.is_finite() {
            song_time.max(0.0)
        } else {
            0.0
        };
        self.last_song_time = target;
        if self.running {
            transport.play(PlayRequest::At(target + self.offset));
            self.anchor(transport, target);
        } else {
            self.pending_seek = Some(target);
        }
    }

    /// Current song time in seconds, always `>= 0`.
    pub fn song_time(&mut self, transport: &dyn MusicTransport) -> f64 {
        if !self.running {
            return self.last_song_time;
        }

        let cap = match Self::raw(transport) {
            Some(raw) => {
                let moved = self
                    .last_raw
                    .is_none_or(|last| (raw - last).abs() > STALL_EPSILON);
                if moved {
                    let from_audio = self.to_song_time(raw);
                    self.last_raw = Some(raw);
                    self.last_song_time = self.last_song_time.max(from_audio);
                    let now = self.last_song_time;
                    self.mark_base(now);
                    return now;
                }
                self.stall_frames += 1;
                if self.stall_frames == 1 {
                    log::debug!("audio clock stalled at {raw:.3}s, extrapolating");
                }
                STALL_EXTRAPOLATION_CAP
            }
            None => f64::INFINITY,
        };

        let dt = (self.time.now_us() - self.base_us) as f64 / 1_000_000.0;
        let extrapolated = self.base_song_time + dt.clamp(0.0, cap);
        self.last_song_time = self.last_song_time.max(extrapolated);
        self.last_song_time
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Frames in a row the transport has not moved.
    pub fn stall_frames(&self) -> u32 {
        self.stall_frames
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_ended(&self, song_time: f64) -> bool {
        song_time >= self.duration
    }

    pub fn format_time(&self, song_time: f64) -> String {
        format_time(song_time)
    }
}
