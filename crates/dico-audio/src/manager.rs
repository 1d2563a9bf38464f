use dico_timing::{MusicTransport, PlayRequest};

use crate::audio_config::AudioConfig;
use crate::backend::AudioBackend;

/// Owns music playback and tracks play/pause offsets.
///
/// Without a backend (or before one could be unlocked) every playback call
/// is a no-op and [`MusicTransport::music_time`] reports `None`, which keeps
/// the song clock on wall-clock time. The same holds whenever no track is
/// playing.
pub struct AudioManager<B: AudioBackend> {
    backend: Option<B>,
    config: AudioConfig,
    music: Option<B::Sound>,
    duration: f64,
    tap: Option<B::Sound>,
    great: Option<B::Sound>,
    start_offset: f64,
    paused_at: f64,
    playing: bool,
    unlocked: bool,
    unlock_warned: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B, config: AudioConfig) -> Self {
        Self::build(Some(backend), config)
    }

    /// Manager for hosts without any audio capability.
    pub fn disabled(config: AudioConfig) -> Self {
        Self::build(None, config)
    }

    fn build(backend: Option<B>, config: AudioConfig) -> Self {
        Self {
            backend,
            config,
            music: None,
            duration: 0.0,
            tap: None,
            great: None,
            start_offset: 0.0,
            paused_at: 0.0,
            playing: false,
            unlocked: false,
            unlock_warned: false,
        }
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> Option<&mut B> {
        self.backend.as_mut()
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Start the output device. Idempotent; a failure is logged once and can
    /// be retried on the next user gesture.
    pub fn unlock(&mut self) -> bool {
        if self.unlocked {
            return true;
        }
        let Some(backend) = self.backend.as_mut() else {
            return false;
        };
        match backend.resume() {
            Ok(()) => {
                self.unlocked = backend.is_running();
                if self.unlocked {
                    log::debug!("audio unlocked");
                }
            }
            Err(e) => {
                if !self.unlock_warned {
                    log::warn!("Audio unavailable, continuing on wall clock: {e}");
                    self.unlock_warned = true;
                }
            }
        }
        self.unlocked
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Install decoded music. Playback state resets to the top.
    pub fn load_music(&mut self, music: B::Sound) {
        self.stop(true);
        self.duration = B::duration(&music);
        self.music = Some(music);
        log::debug!("music buffer duration {:.3}s", self.duration);
    }

    pub fn has_music(&self) -> bool {
        self.music.is_some()
    }

    pub fn set_stingers(&mut self, tap: Option<B::Sound>, great: Option<B::Sound>) {
        self.tap = tap;
        self.great = great;
    }

    /// Begin playback from `offset` seconds. Returns false (and stays idle)
    /// when there is no buffer or no device.
    pub fn start(&mut self, offset: f64) -> bool {
        self.play(PlayRequest::At(offset))
    }

    fn play(&mut self, request: PlayRequest) -> bool {
        if !self.unlock() {
            return false;
        }
        if self.music.is_none() {
            log::debug!("play requested before music was decoded");
            return false;
        }
        if self.playing && request == PlayRequest::Resume {
            return true;
        }

        let offset = match request {
            PlayRequest::At(t) if t.is_finite() => t,
            PlayRequest::At(_) | PlayRequest::Reset => 0.0,
            PlayRequest::Resume => self.paused_at,
        }
        .max(0.0);

        self.halt();
        let volume = self.config.master_volume;
        let (Some(backend), Some(music)) = (self.backend.as_mut(), self.music.as_ref()) else {
            return false;
        };
        if let Err(e) = backend.play_music(music, offset, volume) {
            log::warn!("Music playback failed: {e}");
            return false;
        }
        self.start_offset = offset;
        self.paused_at = offset;
        self.playing = true;
        true
    }

    fn halt(&mut self) {
        if self.playing {
            self.paused_at = self.current_time();
        }
        self.playing = false;
        if let Some(backend) = self.backend.as_mut() {
            backend.stop_music();
        }
    }

    /// Halt playback. Without `reset` the position is kept for a later resume.
    pub fn stop(&mut self, reset: bool) {
        self.halt();
        if reset {
            self.paused_at = 0.0;
            self.start_offset = 0.0;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Elapsed playback time in seconds: the live position while playing, the
    /// frozen offset otherwise. Never negative, clamped to the track length.
    pub fn current_time(&self) -> f64 {
        if !self.playing {
            return self.paused_at;
        }
        let position = self
            .backend
            .as_ref()
            .and_then(|b| b.music_position())
            .filter(|p| p.is_finite())
            .unwrap_or(self.paused_at);
        let upper = if self.duration > 0.0 {
            self.duration
        } else {
            position
        };
        position.clamp(0.0, upper.max(0.0))
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Detect the track running out on its own. Call once per frame.
    pub fn update(&mut self) {
        if !self.playing {
            return;
        }
        let finished = self.backend.as_ref().is_some_and(|b| !b.is_music_playing());
        if finished && self.current_time() + 0.01 >= self.duration {
            self.playing = false;
            self.paused_at = self.duration;
            log::debug!("music reached end at {:.3}s", self.duration);
        }
    }

    pub fn play_tap(&mut self) {
        let volume = self.config.tap_volume;
        self.play_stinger(StingerKind::Tap, volume);
    }

    pub fn play_great(&mut self) {
        let volume = self.config.great_volume;
        self.play_stinger(StingerKind::Great, volume);
    }

    fn play_stinger(&mut self, kind: StingerKind, volume: f64) {
        if !self.unlocked {
            return;
        }
        let sound = match kind {
            StingerKind::Tap => self.tap.as_ref(),
            StingerKind::Great => self.great.as_ref(),
        };
        let (Some(backend), Some(sound)) = (self.backend.as_mut(), sound) else {
            return;
        };
        if let Err(e) = backend.play_effect(sound, volume * self.config.master_volume) {
            log::debug!("stinger failed: {e}");
        }
    }
}

#[derive(Clone, Copy)]
enum StingerKind {
    Tap,
    Great,
}

impl<B: AudioBackend> MusicTransport for AudioManager<B> {
    fn play(&mut self, request: PlayRequest) -> bool {
        AudioManager::play(self, request)
    }

    fn stop(&mut self, reset: bool) {
        AudioManager::stop(self, reset)
    }

    /// Only a live track is a time source. A track that ended on its own
    /// hands the clock back to wall-clock extrapolation.
    fn music_time(&self) -> Option<f64> {
        (self.unlocked && self.playing).then(|| self.current_time())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use dico_timing::MockTimeProvider;

    use super::*;
    use crate::mock::{MockAudio, MockAudioEvent, MockMusic};

    fn manager_with_music(tp: &Rc<MockTimeProvider>) -> AudioManager<MockAudio> {
        let mut manager = AudioManager::new(MockAudio::new(Rc::clone(tp)), AudioConfig::default());
        manager.load_music(MockMusic::new("song", 30.0));
        manager
    }

    #[test]
    fn start_without_buffer_stays_idle() {
        let tp = Rc::new(MockTimeProvider::new());
        let mut manager = AudioManager::new(MockAudio::new(Rc::clone(&tp)), AudioConfig::default());
        assert!(!manager.start(0.0));
        assert!(!manager.is_playing());
        assert_eq!(manager.current_time(), 0.0);
        assert_eq!(MusicTransport::music_time(&manager), None);
    }

    #[test]
    fn disabled_manager_is_noop() {
        let mut manager: AudioManager<MockAudio> = AudioManager::disabled(AudioConfig::default());
        assert!(!manager.unlock());
        assert!(!manager.start(1.0));
        manager.stop(true);
        manager.play_tap();
        assert_eq!(manager.current_time(), 0.0);
    }

    #[test]
    fn current_time_tracks_playback() {
        let tp = Rc::new(MockTimeProvider::new());
        let mut manager = manager_with_music(&tp);
        assert!(manager.start(2.0));
        tp.advance_secs(1.5);
        assert!((manager.current_time() - 3.5).abs() < 1e-9);
    }

    #[test]
    fn stop_remembers_position_unless_reset() {
        let tp = Rc::new(MockTimeProvider::new());
        let mut manager = manager_with_music(&tp);
        manager.start(0.0);
        tp.advance_secs(4.0);
        manager.stop(false);
        tp.advance_secs(10.0);
        assert!((manager.current_time() - 4.0).abs() < 1e-9);

        assert!(MusicTransport::play(&mut manager, PlayRequest::Resume));
        tp.advance_secs(1.0);
        assert!((manager.current_time() - 5.0).abs() < 1e-9);

        manager.stop(true);
        assert_eq!(manager.current_time(), 0.0);
    }

    #[test]
    fn resume_while_playing_is_noop() {
        let tp = Rc::new(MockTimeProvider::new());
        let mut manager = manager_with_music(&tp);
        manager.start(0.0);
        tp.advance_secs(1.0);
        assert!(MusicTransport::play(&mut manager, PlayRequest::Resume));
        let plays = manager
            .backend()
            .unwrap()
            .events()
            .iter()
            .filter(|e| matches!(e, MockAudioEvent::PlayMusic { .. }))
            .count();
        assert_eq!(plays, 1);
    }

    #[test]
    fn current_time_clamps_to_duration() {
        let tp = Rc::new(MockTimeProvider::new());
        let mut manager = manager_with_music(&tp);
        manager.start(29.0);
        tp.advance_secs(5.0);
        assert_eq!(manager.current_time(), 30.0);
        manager.update();
        assert!(!manager.is_playing());
        assert_eq!(manager.current_time(), 30.0);
        assert_eq!(MusicTransport::music_time(&manager), None);
    }

    #[test]
    fn unlock_is_idempotent() {
        let tp = Rc::new(MockTimeProvider::new());
        let mut manager = manager_with_music(&tp);
        assert!(manager.unlock());
        assert!(manager.unlock());
        let resumes = manager
            .backend()
            .unwrap()
            .events()
            .iter()
            .filter(|e| **e == MockAudioEvent::Resume)
            .count();
        assert_eq!(resumes, 1);
    }

    #[test]
    fn blocked_unlock_can_be_retried() {
        let tp = Rc::new(MockTimeProvider::new());
        let mut manager = AudioManager::new(MockAudio::blocked(Rc::clone(&tp)), AudioConfig::default());
        manager.load_music(MockMusic::new("song", 30.0));
        assert!(!manager.unlock());
        assert!(!manager.start(0.0));
        assert_eq!(MusicTransport::music_time(&manager), None);

        manager.backend_mut().unwrap().set_blocked(false);
        assert!(manager.unlock());
        assert!(manager.start(0.0));
        assert_eq!(MusicTransport::music_time(&manager), Some(0.0));
    }

    #[test]
    fn stingers_use_configured_volume() {
        let tp = Rc::new(MockTimeProvider::new());
        let mut manager = manager_with_music(&tp);
        manager.set_stingers(
            Some(MockMusic::new("tap", 0.2)),
            Some(MockMusic::new("great", 0.4)),
        );
        // Locked: silently skipped.
        manager.play_tap();
        assert!(manager.backend().unwrap().events().is_empty());

        manager.unlock();
        manager.play_tap();
        manager.play_great();
        let effects: Vec<_> = manager
            .backend()
            .unwrap()
            .events()
            .iter()
            .filter_map(|e| match e {
                MockAudioEvent::Effect { name, volume } => Some((name.clone(), *volume)),
                _ => None,
            })
            .collect();
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0].0, "tap");
        assert!((effects[0].1 - 0.6 * 0.95).abs() < 1e-9);
        assert_eq!(effects[1].0, "great");
    }
}
