use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::backend::{BlendMode, Color, RenderBackend};
use crate::effects::{Effects, normalize_intensity};

const POOL_LIMIT: usize = 80;
const RES_COLOR: Color = Color::rgba8(0, 240, 255, 0.95);

#[derive(Debug, Clone, Copy)]
struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    size: f32,
    life: f32,
    max_life: f32,
}

/// Pooled particle effects drawn through a [`RenderBackend`].
///
/// At most 80 particles are alive; extra spawns are dropped.
pub struct ParticleEffects {
    particles: Vec<Particle>,
    rng: StdRng,
    intensity: f64,
    target: (f32, f32),
    /// Remaining seconds of the heartbeat ring and divine flash.
    heartbeat: f32,
    divine: f32,
}

impl ParticleEffects {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(POOL_LIMIT),
            rng: StdRng::seed_from_u64(seed),
            intensity: 0.0,
            target: (0.0, 0.0),
            heartbeat: 0.0,
            divine: 0.0,
        }
    }

    /// Where stream particles fly to (the hit zone).
    pub fn set_target(&mut self, x: f32, y: f32) {
        self.target = (x, y);
    }

    pub fn live_count(&self) -> usize {
        self.particles.len()
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    fn spawn(&mut self, p: Particle) {
        if self.particles.len() < POOL_LIMIT {
            self.particles.push(p);
        }
    }
}

impl Effects for ParticleEffects {
    fn burst(&mut self, x: f32, y: f32) {
        let count = 10 + (14.0 * self.intensity) as usize;
        for _ in 0..count {
            let ang = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.gen_range(80.0..260.0);
            let life = self.rng.gen_range(0.35..0.7);
            let size = self.rng.gen_range(3.0..7.0);
            self.spawn(Particle {
                x,
                y,
                vx: ang.cos() * speed,
                vy: ang.sin() * speed,
                size,
                life,
                max_life: life,
            });
        }
    }

    fn stream(&mut self, x: f32, y: f32) {
        let (tx, ty) = self.target;
        let life = 0.45;
        for i in 0..6 {
            let jitter = self.rng.gen_range(-12.0..12.0);
            self.spawn(Particle {
                x: x + jitter,
                y: y + i as f32 * 4.0,
                vx: (tx - x) / life,
                vy: (ty - y) / life,
                size: 4.0,
                life,
                max_life: life,
            });
        }
    }

    fn heartbeat(&mut self) {
        self.heartbeat = 0.4;
    }

    fn divine(&mut self) {
        self.divine = 1.0;
    }

    fn set_intensity(&mut self, value: f64) {
        self.intensity = normalize_intensity(value);
    }

    fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
        self.heartbeat = (self.heartbeat - dt).max(0.0);
        self.divine = (self.divine - dt).max(0.0);
    }

    fn draw(&self, gfx: &mut dyn RenderBackend) -> Result<()> {
        for p in &self.particles {
            let a = p.life / p.max_life;
            gfx.fill_circle(p.x, p.y, p.size * (0.5 + 0.5 * a), RES_COLOR.fade(a), BlendMode::Screen)?;
        }
        if self.heartbeat > 0.0 {
            let (x, y) = self.target;
            let t = 1.0 - self.heartbeat / 0.4;
            gfx.radial_glow(x, y, 40.0 + 80.0 * t, RES_COLOR.fade(1.0 - t), BlendMode::Screen)?;
        }
        if self.divine > 0.0 {
            let (x, y) = self.target;
            gfx.radial_glow(x, y, 600.0, Color::WHITE.fade(self.divine), BlendMode::Screen)?;
        }
        Ok(())
    }
}
