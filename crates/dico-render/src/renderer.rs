use std::sync::Arc;

use anyhow::Result;
use dico_chart::Chart;

use crate::backend::{RenderBackend, TextureId};
use crate::config::RenderConfig;
use crate::effects::Effects;
use crate::skin;

/// Drawing fidelity picked from a note's progress toward the hit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lod {
    Far,
    Mid,
    Near,
}

/// Placement of one visible note for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteSprite {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub alpha: f32,
    /// 0 at spawn, 1 on the hit line.
    pub progress: f32,
    pub lod: Lod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub visible: usize,
    pub far: usize,
    pub mid: usize,
    pub near: usize,
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Maps chart notes to screen space each frame.
///
/// Culling uses a forward-only start index: notes older than the trailing
/// grace are never looked at again, and notes below the judge cursor are
/// skipped, so a frame costs O(visible) rather than O(chart).
pub struct Renderer {
    chart: Arc<Chart>,
    config: RenderConfig,
    approach: f64,
    view_w: f32,
    view_h: f32,
    dpr: f32,
    visible_start: usize,
    consumed: usize,
    note_texture: Option<TextureId>,
    sprites: Vec<NoteSprite>,
}

impl Renderer {
    pub fn new(chart: Arc<Chart>, config: RenderConfig) -> Self {
        let approach = chart.approach_seconds();
        let mut renderer = Self {
            chart,
            config,
            approach,
            view_w: 1.0,
            view_h: 1.0,
            dpr: 1.0,
            visible_start: 0,
            consumed: 0,
            note_texture: None,
            sprites: Vec::with_capacity(64),
        };
        renderer.set_view(config.width, config.height, config.device_pixel_ratio);
        renderer
    }

    fn set_view(&mut self, width: f32, height: f32, dpr: f32) {
        let sane = |v: f32, min: f32| if v.is_finite() { v.max(min) } else { min };
        self.view_w = sane(width, 1.0);
        self.view_h = sane(height, 1.0);
        self.dpr = if dpr.is_finite() { dpr.clamp(1.0, 2.0) } else { 1.0 };
    }

    /// Apply a new view size. Note cursors are untouched.
    pub fn resize(&mut self, gfx: &mut dyn RenderBackend, width: f32, height: f32, dpr: f32) -> Result<()> {
        self.set_view(width, height, dpr);
        let (w, h) = self.backing_size();
        log::debug!("render resize {}x{} @{} -> {w}x{h}px", self.view_w, self.view_h, self.dpr);
        gfx.resize(w, h, self.dpr)
    }

    /// Backing store size in pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.view_w * self.dpr).floor() as u32,
            (self.view_h * self.dpr).floor() as u32,
        )
    }

    pub fn view_size(&self) -> (f32, f32) {
        (self.view_w, self.view_h)
    }

    pub fn dpr(&self) -> f32 {
        self.dpr
    }

    pub fn hit_line_y(&self) -> f32 {
        self.view_h * self.config.hit_line
    }

    pub fn lane_x(&self) -> f32 {
        self.view_w * 0.5
    }

    pub fn set_note_texture(&mut self, texture: Option<TextureId>) {
        self.note_texture = texture;
    }

    /// Notes below `cursor` are resolved and no longer drawn.
    pub fn sync_judge_cursor(&mut self, cursor: usize) {
        self.consumed = self.consumed.max(cursor);
    }

    pub fn visible_start(&self) -> usize {
        self.visible_start
    }

    /// Rewind culling for a restarted session.
    pub fn reset(&mut self) {
        self.visible_start = 0;
        self.consumed = 0;
        self.sprites.clear();
    }

    fn lod_for(&self, progress: f64) -> Lod {
        if progress >= self.config.lod.near {
            Lod::Near
        } else if progress >= self.config.lod.mid {
            Lod::Mid
        } else {
            Lod::Far
        }
    }

    /// Compute sprites for `song_time` without drawing.
    pub fn layout(&mut self, song_time: f64) -> &[NoteSprite] {
        let notes = self.chart.notes();
        let min_time = song_time - self.config.trailing_grace;
        while self.visible_start < notes.len() && notes[self.visible_start].t < min_time {
            self.visible_start += 1;
        }

        let x = self.lane_x();
        let hit_y = self.hit_line_y();
        self.sprites.clear();
        let start = self.visible_start.max(self.consumed);
        for (index, note) in notes.iter().enumerate().skip(start) {
            let dt = note.t - song_time;
            if dt > self.approach {
                break;
            }
            if dt < -self.config.trailing_grace {
                continue;
            }
            let progress = 1.0 - (dt / self.approach).clamp(0.0, 1.0);
            let p = progress as f32;
            let lod = self.lod_for(progress);
            self.sprites.push(NoteSprite {
                index,
                x,
                y: lerp(self.config.spawn_y, hit_y, p),
                scale: 0.8 + 0.6 * p,
                alpha: (0.25 + 0.75 * p).clamp(0.0, 1.0),
                progress: p,
                lod,
            });
        }
        &self.sprites
    }

    /// Clear and draw every visible note for `song_time`.
    pub fn draw(&mut self, gfx: &mut dyn RenderBackend, song_time: f64) -> Result<FrameStats> {
        self.draw_frame(gfx, song_time, None)
    }

    /// Like [`Renderer::draw`], with `effects` layered over the notes.
    pub fn draw_with_effects(
        &mut self,
        gfx: &mut dyn RenderBackend,
        song_time: f64,
        effects: &dyn Effects,
    ) -> Result<FrameStats> {
        self.draw_frame(gfx, song_time, Some(effects))
    }

    fn draw_frame(
        &mut self,
        gfx: &mut dyn RenderBackend,
        song_time: f64,
        effects: Option<&dyn Effects>,
    ) -> Result<FrameStats> {
        self.layout(song_time);
        let clock = song_time as f32;
        let mut stats = FrameStats {
            visible: self.sprites.len(),
            ..Default::default()
        };

        gfx.begin_frame()?;
        gfx.clear()?;
        for sprite in &self.sprites {
            match sprite.lod {
                Lod::Far => {
                    stats.far += 1;
                    skin::draw_far(gfx, &self.config.skin, sprite)?;
                }
                Lod::Mid => {
                    stats.mid += 1;
                    skin::draw_mid(gfx, &self.config.skin, sprite, clock, self.note_texture)?;
                }
                Lod::Near => {
                    stats.near += 1;
                    skin::draw_near(gfx, &self.config.skin, sprite, clock, self.note_texture)?;
                }
            }
        }
        if let Some(effects) = effects {
            effects.draw(gfx)?;
        }
        gfx.end_frame()?;
        Ok(stats)
    }
}
