use std::fs;
use std::path::Path;

use anyhow::{Result, anyhow};
use dico_audio::AudioConfig;
use dico_chart::ChartSource;
use dico_input::KeyBindings;
use dico_play::JudgeConfig;
use dico_render::RenderConfig;
use serde::{Deserialize, Serialize};

/// Config file read when no path is given.
pub const CONFIG_FILE: &str = "dico.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Chart file path or http(s) URL. The fallback chart is used when unset.
    pub source: Option<String>,
}

impl ChartSettings {
    pub fn chart_source(&self) -> Option<ChartSource> {
        self.source
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(ChartSource::parse)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Frame rate of the headless loop.
    pub fps: u32,
    pub autoplay: bool,
    /// Added to every autoplay tap, in seconds.
    pub autoplay_offset: f64,
    pub keys: KeyBindings,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            fps: 60,
            autoplay: false,
            autoplay_offset: 0.0,
            keys: KeyBindings::default(),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub chart: ChartSettings,
    pub audio: AudioConfig,
    pub judge: JudgeConfig,
    pub render: RenderConfig,
    pub session: SessionSettings,
}

impl AppConfig {
    /// Loads config from a specified path.
    /// Returns default config if file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config {}: {e}", path.display()))?;
        let config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Saves config to a specified path, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Frame interval in seconds; a zero fps falls back to 60.
    pub fn frame_interval(&self) -> f64 {
        let fps = match self.session.fps {
            0 => SessionSettings::default().fps,
            fps => fps,
        };
        1.0 / f64::from(fps)
    }
}
