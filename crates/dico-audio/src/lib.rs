//! Music playback for the dico engine.
//!
//! - [`AudioBackend`]: device-level playback seam
//! - [`KiraDriver`]: production backend on kira
//! - [`AudioManager`]: play/pause offsets, unlock, stingers; feeds the song clock
//! - [`MusicLoader`]: background fetch + decode with request coalescing

mod audio_config;
mod backend;
mod kira_driver;
mod loader;
mod manager;
#[cfg(any(test, feature = "test-support"))]
mod mock;
mod source;

pub use audio_config::AudioConfig;
pub use backend::AudioBackend;
pub use kira_driver::{KiraDriver, KiraSound, decode_music};
pub use loader::{LoadHandle, LoadStage, LoadStatus, MusicLoader};
pub use manager::AudioManager;
#[cfg(any(test, feature = "test-support"))]
pub use mock::{MockAudio, MockAudioEvent, MockMusic};
pub use source::MusicSource;
