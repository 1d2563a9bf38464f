use serde::{Deserialize, Serialize};

/// Audio settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Disable to run silently on the wall clock.
    pub enabled: bool,
    /// Music file path or URL.
    pub music: Option<String>,
    /// Tap stinger path.
    pub tap_sound: Option<String>,
    /// Stinger for GREAT/PERFECT hits.
    pub great_sound: Option<String>,
    /// Master volume (0.0 - 1.0).
    pub master_volume: f64,
    pub tap_volume: f64,
    pub great_volume: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            music: None,
            tap_sound: None,
            great_sound: None,
            master_volume: 0.95,
            tap_volume: 0.6,
            great_volume: 0.7,
        }
    }
}
