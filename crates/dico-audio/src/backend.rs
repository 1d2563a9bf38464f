use anyhow::Result;

/// Abstraction over audio output devices.
/// Implementations: KiraDriver (kira), MockAudio (testing).
pub trait AudioBackend {
    /// Decoded, playable audio.
    type Sound: Clone;

    /// Bring the output device up. Must be safe to call repeatedly.
    fn resume(&mut self) -> Result<()>;

    fn is_running(&self) -> bool;

    /// Start the music voice at `offset` seconds, replacing any previous one.
    fn play_music(&mut self, sound: &Self::Sound, offset: f64, volume: f64) -> Result<()>;

    fn stop_music(&mut self);

    /// Position of the music voice in seconds, `None` when nothing is playing.
    fn music_position(&self) -> Option<f64>;

    /// Whether the music voice is still producing audio.
    fn is_music_playing(&self) -> bool;

    /// Fire-and-forget one-shot effect.
    fn play_effect(&mut self, sound: &Self::Sound, volume: f64) -> Result<()>;

    fn duration(sound: &Self::Sound) -> f64;
}
