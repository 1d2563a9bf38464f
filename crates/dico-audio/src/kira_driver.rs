use std::io::Cursor;

use anyhow::{Result, anyhow};
use kira::sound::PlaybackState;
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::{AudioManager, AudioManagerSettings, Decibels, DefaultBackend, Tween};

use crate::backend::AudioBackend;

/// Decoded sound as played by [`KiraDriver`].
pub type KiraSound = StaticSoundData;

/// Decode an encoded music file (wav/ogg/mp3/flac) into playable data.
/// Thread-safe; used by the background loader.
pub fn decode_music(bytes: Vec<u8>) -> Result<KiraSound> {
    StaticSoundData::from_cursor(Cursor::new(bytes))
        .map_err(|e| anyhow!("Failed to decode music: {e}"))
}

fn to_decibels(volume: f64) -> Decibels {
    if volume <= 0.0 {
        Decibels::SILENCE
    } else {
        Decibels((20.0 * volume.min(1.0).log10()) as f32)
    }
}

/// Audio backend on kira. The output device is opened lazily on the first
/// `resume`, so constructing the driver never touches hardware.
#[derive(Default)]
pub struct KiraDriver {
    manager: Option<AudioManager<DefaultBackend>>,
    music: Option<StaticSoundHandle>,
}

impl KiraDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn manager_mut(&mut self) -> Result<&mut AudioManager<DefaultBackend>> {
        self.manager
            .as_mut()
            .ok_or_else(|| anyhow!("audio device not started"))
    }
}

impl AudioBackend for KiraDriver {
    type Sound = StaticSoundData;

    fn resume(&mut self) -> Result<()> {
        if self.manager.is_none() {
            let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
                .map_err(|e| anyhow!("Failed to create audio manager: {e}"))?;
            self.manager = Some(manager);
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.manager.is_some()
    }

    fn play_music(&mut self, sound: &StaticSoundData, offset: f64, volume: f64) -> Result<()> {
        self.stop_music();
        let data = sound
            .start_position(offset.max(0.0))
            .volume(to_decibels(volume));
        let handle = self
            .manager_mut()?
            .play(data)
            .map_err(|e| anyhow!("Failed to play music: {e:?}"))?;
        self.music = Some(handle);
        Ok(())
    }

    fn stop_music(&mut self) {
        if let Some(mut handle) = self.music.take() {
            handle.stop(Tween::default());
        }
    }

    fn music_position(&self) -> Option<f64> {
        self.music.as_ref().map(|h| h.position())
    }

    fn is_music_playing(&self) -> bool {
        self.music
            .as_ref()
            .is_some_and(|h| h.state() == PlaybackState::Playing)
    }

    fn play_effect(&mut self, sound: &StaticSoundData, volume: f64) -> Result<()> {
        let data = sound.volume(to_decibels(volume));
        self.manager_mut()?
            .play(data)
            .map_err(|e| anyhow!("Failed to play effect: {e:?}"))?;
        Ok(())
    }

    fn duration(sound: &StaticSoundData) -> f64 {
        sound.duration().as_secs_f64()
    }
}
