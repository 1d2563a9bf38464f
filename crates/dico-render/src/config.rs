use serde::{Deserialize, Serialize};

/// Progress thresholds at which notes switch to richer drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodThresholds {
    /// From here on: glow + image core.
    pub mid: f64,
    /// From here on: full skin with sparkles and streak.
    pub near: f64,
}

impl Default for LodThresholds {
    fn default() -> Self {
        Self {
            mid: 0.45,
            near: 0.8,
        }
    }
}

/// Parameters of the tarot note skin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteSkin {
    pub width: f32,
    pub height: f32,
    pub glow: f32,
    pub pulse: f32,
    /// 0 disables sparkles.
    pub spark: f32,
    /// Radius of the cheap far-distance dot.
    pub dot_radius: f32,
}

impl Default for NoteSkin {
    fn default() -> Self {
        Self {
            width: 44.0,
            height: 64.0,
            glow: 1.6,
            pulse: 1.15,
            spark: 1.1,
            dot_radius: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
    /// Seconds a note stays drawn after passing the hit line.
    pub trailing_grace: f64,
    pub spawn_y: f32,
    /// Hit line position as a fraction of view height.
    pub hit_line: f32,
    pub lod: LodThresholds,
    pub skin: NoteSkin,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 844.0,
            device_pixel_ratio: 1.0,
            trailing_grace: 0.25,
            spawn_y: -24.0,
            hit_line: 0.62,
            lod: LodThresholds::default(),
            skin: NoteSkin::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"width": 800, "lod": {"near": 0.9}}"#).unwrap();
        assert_eq!(config.width, 800.0);
        assert_eq!(config.height, 844.0);
        assert_eq!(config.lod.near, 0.9);
        assert_eq!(config.lod.mid, 0.45);
        assert_eq!(config.trailing_grace, 0.25);
    }
}
