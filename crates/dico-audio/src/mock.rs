use std::rc::Rc;

use anyhow::{Result, anyhow};
use dico_timing::{MockTimeProvider, TimeProvider};

use crate::backend::AudioBackend;

/// Decoded sound stand-in.
#[derive(Debug, Clone, PartialEq)]
pub struct MockMusic {
    pub name: String,
    pub duration: f64,
}

impl MockMusic {
    pub fn new(name: &str, duration: f64) -> Self {
        Self {
            name: name.to_string(),
            duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MockAudioEvent {
    Resume,
    PlayMusic { name: String, offset: f64 },
    StopMusic,
    Effect { name: String, volume: f64 },
}

/// Backend whose music position advances with a shared mock clock:
/// `offset + (now - started_at)`, clamped to the sound's duration.
pub struct MockAudio {
    time: Rc<MockTimeProvider>,
    running: bool,
    fail_resume: bool,
    /// Position stays put while set, imitating a stalled device clock.
    stalled: bool,
    music: Option<(MockMusic, f64, i64)>,
    events: Vec<MockAudioEvent>,
}

impl MockAudio {
    pub fn new(time: Rc<MockTimeProvider>) -> Self {
        Self {
            time,
            running: false,
            fail_resume: false,
            stalled: false,
            music: None,
            events: Vec::new(),
        }
    }

    /// A backend whose device never comes up.
    pub fn blocked(time: Rc<MockTimeProvider>) -> Self {
        Self {
            fail_resume: true,
            ..Self::new(time)
        }
    }

    pub fn set_blocked(&mut self, blocked: bool) {
        self.fail_resume = blocked;
    }

    pub fn set_stalled(&mut self, stalled: bool) {
        self.stalled = stalled;
    }

    pub fn events(&self) -> &[MockAudioEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn elapsed(&self, started_us: i64) -> f64 {
        (self.time.now_us() - started_us) as f64 / 1_000_000.0
    }
}

impl AudioBackend for MockAudio {
    type Sound = MockMusic;

    fn resume(&mut self) -> Result<()> {
        if self.fail_resume {
            return Err(anyhow!("autoplay blocked"));
        }
        if !self.running {
            self.running = true;
            self.events.push(MockAudioEvent::Resume);
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn play_music(&mut self, sound: &MockMusic, offset: f64, _volume: f64) -> Result<()> {
        if !self.running {
            return Err(anyhow!("audio device not started"));
        }
        self.events.push(MockAudioEvent::PlayMusic {
            name: sound.name.clone(),
            offset,
        });
        self.music = Some((sound.clone(), offset, self.time.now_us()));
        Ok(())
    }

    fn stop_music(&mut self) {
        if self.music.take().is_some() {
            self.events.push(MockAudioEvent::StopMusic);
        }
    }

    fn music_position(&self) -> Option<f64> {
        self.music.as_ref().map(|(sound, offset, started)| {
            if self.stalled {
                *offset
            } else {
                (offset + self.elapsed(*started)).min(sound.duration)
            }
        })
    }

    fn is_music_playing(&self) -> bool {
        self.music
            .as_ref()
            .is_some_and(|(sound, offset, started)| offset + self.elapsed(*started) < sound.duration)
    }

    fn play_effect(&mut self, sound: &MockMusic, volume: f64) -> Result<()> {
        if !self.running {
            return Err(anyhow!("audio device not started"));
        }
        self.events.push(MockAudioEvent::Effect {
            name: sound.name.clone(),
            volume,
        });
        Ok(())
    }

    fn duration(sound: &MockMusic) -> f64 {
        sound.duration
    }
}
