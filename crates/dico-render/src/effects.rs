use anyhow::Result;

use crate::backend::RenderBackend;

/// Hit-feedback capability. The session picks an implementation at
/// construction time and calls it with verdict-driven events.
pub trait Effects {
    /// Particle burst at a tap position.
    fn burst(&mut self, x: f32, y: f32);
    /// Particle stream from a position toward the hit zone.
    fn stream(&mut self, x: f32, y: f32);
    fn heartbeat(&mut self);
    /// Full-screen flourish.
    fn divine(&mut self);
    /// Accepts 0..1 or 0..100; stored as 0..1.
    fn set_intensity(&mut self, value: f64);

    /// Advance animations by `dt` seconds.
    fn update(&mut self, _dt: f32) {}

    /// Draw on top of the notes, inside the current frame.
    fn draw(&self, _gfx: &mut dyn RenderBackend) -> Result<()> {
        Ok(())
    }
}

/// Clamp intensity into 0..1, reading values above 1 as percentages.
pub fn normalize_intensity(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let v = if value > 1.0001 { value / 100.0 } else { value };
    v.clamp(0.0, 1.0)
}

/// Effects sink that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEffects;

impl Effects for NullEffects {
    fn burst(&mut self, _x: f32, _y: f32) {}
    fn stream(&mut self, _x: f32, _y: f32) {}
    fn heartbeat(&mut self) {}
    fn divine(&mut self) {}
    fn set_intensity(&mut self, _value: f64) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectEvent {
    Burst { x: f32, y: f32 },
    Stream { x: f32, y: f32 },
    Heartbeat,
    Divine,
    Intensity(f64),
}

/// Records every call, for tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingEffects {
    pub events: Vec<EffectEvent>,
}

impl RecordingEffects {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effects for RecordingEffects {
    fn burst(&mut self, x: f32, y: f32) {
        self.events.push(EffectEvent::Burst { x, y });
    }

    fn stream(&mut self, x: f32, y: f32) {
        self.events.push(EffectEvent::Stream { x, y });
    }

    fn heartbeat(&mut self) {
        self.events.push(EffectEvent::Heartbeat);
    }

    fn divine(&mut self) {
        self.events.push(EffectEvent::Divine);
    }

    fn set_intensity(&mut self, value: f64) {
        self.events
            .push(EffectEvent::Intensity(normalize_intensity(value)));
    }
}
