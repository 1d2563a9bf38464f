//! Tarot pink-gold note skin, split by level of detail.

use std::f32::consts::TAU;

use anyhow::Result;

use crate::backend::{BlendMode, Color, DstRect, RenderBackend, TextureId};
use crate::config::NoteSkin;
use crate::renderer::NoteSprite;

const GLOW_RADIUS: f32 = 56.0;
const GLOW: Color = Color::rgba8(255, 220, 240, 0.6);
const CORE_FALLBACK: Color = Color::rgba8(255, 220, 240, 0.75);
const HIGHLIGHT: Color = Color::rgba8(255, 255, 255, 0.55);
const SPARK_PINK: Color = Color::rgba8(255, 200, 240, 1.0);
const SPARK_GOLD: Color = Color::rgba8(255, 235, 200, 1.0);
const STREAK_CORE: Color = Color::rgba8(255, 255, 255, 0.85);
const STREAK_GOLD: Color = Color::rgba8(255, 225, 170, 0.8);
const DOT: Color = Color::rgba8(255, 255, 255, 0.95);

/// Skin progress is pushed slightly forward so the core reads solid early.
fn skin_progress(p: f32) -> f32 {
    (p * 1.05 + 0.03).clamp(0.0, 1.0)
}

/// Far notes: a single dot.
pub(crate) fn draw_far(gfx: &mut dyn RenderBackend, skin: &NoteSkin, s: &NoteSprite) -> Result<()> {
    gfx.fill_circle(
        s.x,
        s.y,
        skin.dot_radius * s.scale,
        DOT.fade(s.alpha),
        BlendMode::Alpha,
    )
}

fn draw_glow(gfx: &mut dyn RenderBackend, skin: &NoteSkin, s: &NoteSprite, pp: f32, clock: f32) -> Result<()> {
    let pulse = (0.72 + 0.28 * (clock * 6.0 + pp * 1.2).sin()) * skin.pulse;
    let a = s.alpha * (0.28 + pp * 0.60) * skin.glow * pulse;
    gfx.radial_glow(s.x, s.y, GLOW_RADIUS, GLOW.fade(a), BlendMode::Screen)
}

fn core_rect(skin: &NoteSkin, s: &NoteSprite, pp: f32) -> DstRect {
    let grow = 0.94 + pp * 0.20;
    DstRect::centered(s.x, s.y, skin.width * grow, skin.height * grow)
}

fn draw_core(
    gfx: &mut dyn RenderBackend,
    skin: &NoteSkin,
    s: &NoteSprite,
    pp: f32,
    texture: Option<TextureId>,
) -> Result<()> {
    let dst = core_rect(skin, s, pp);
    let a = s.alpha * (0.94 + pp * 0.18);
    match texture {
        Some(tex) => gfx.draw_sprite(tex, dst, Color::WHITE.fade(a), BlendMode::Alpha),
        // Image not loaded yet.
        None => gfx.fill_rect(dst, CORE_FALLBACK.fade(a), BlendMode::Alpha),
    }
}

/// Mid notes: glow and image core.
pub(crate) fn draw_mid(
    gfx: &mut dyn RenderBackend,
    skin: &NoteSkin,
    s: &NoteSprite,
    clock: f32,
    texture: Option<TextureId>,
) -> Result<()> {
    let pp = skin_progress(s.progress);
    draw_glow(gfx, skin, s, pp, clock)?;
    draw_core(gfx, skin, s, pp, texture)
}

fn draw_sparkles(gfx: &mut dyn RenderBackend, skin: &NoteSkin, s: &NoteSprite, pp: f32, clock: f32) -> Result<()> {
    if skin.spark <= 0.0 {
        return Ok(());
    }
    let a = s.alpha * (0.18 + pp * 0.40) * skin.spark;
    let r = 28.0 + pp * 12.0;
    for i in 0..6 {
        let fi = i as f32;
        let ang = (clock * (1.1 + fi * 0.08) + fi * 1.3) % TAU;
        let sx = s.x + ang.cos() * r;
        let sy = s.y + ang.sin() * (r * 0.7);
        let size = 1.2 + (i % 3) as f32 * 0.6;
        let color = if i % 2 == 1 { SPARK_GOLD } else { SPARK_PINK };
        gfx.fill_rect(DstRect { x: sx, y: sy, w: size, h: size }, color.fade(a), BlendMode::Screen)?;
        if i % 3 == 0 {
            let cross = STREAK_CORE.fade(a);
            gfx.line((sx - 3.0, sy), (sx + 3.0, sy), 1.1, cross, BlendMode::Screen)?;
            gfx.line((sx, sy - 3.0), (sx, sy + 3.0), 1.1, cross, BlendMode::Screen)?;
        }
    }
    Ok(())
}

fn draw_streak(gfx: &mut dyn RenderBackend, s: &NoteSprite, pp: f32) -> Result<()> {
    let from = (s.x, s.y - 18.0);
    let to = (s.x, s.y - 86.0);
    gfx.line(from, to, 2.4, STREAK_CORE.fade(s.alpha * (0.20 + pp * 0.30)), BlendMode::Screen)?;
    gfx.line(from, to, 4.2, STREAK_GOLD.fade(s.alpha * (0.16 + pp * 0.22)), BlendMode::Screen)
}

/// Near notes: the full skin.
pub(crate) fn draw_near(
    gfx: &mut dyn RenderBackend,
    skin: &NoteSkin,
    s: &NoteSprite,
    clock: f32,
    texture: Option<TextureId>,
) -> Result<()> {
    let pp = skin_progress(s.progress);
    draw_glow(gfx, skin, s, pp, clock)?;
    draw_core(gfx, skin, s, pp, texture)?;
    let dst = core_rect(skin, s, pp);
    gfx.fill_rect(dst, HIGHLIGHT.fade(s.alpha * (0.22 + pp * 0.35)), BlendMode::Screen)?;
    draw_sparkles(gfx, skin, s, pp, clock)?;
    draw_streak(gfx, s, pp)
}
