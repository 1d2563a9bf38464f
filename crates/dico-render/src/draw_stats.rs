use anyhow::Result;

use crate::backend::{BlendMode, Color, DstRect, RenderBackend, TextureId};

/// Backend that only counts primitives. Used by headless runs to report
/// draw cost without a window.
#[derive(Debug, Default, Clone)]
pub struct DrawStats {
    pub frames: u64,
    pub primitives: u64,
    pub max_primitives_per_frame: u64,
    current: u64,
    size_px: (u32, u32),
}

impl DrawStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size_px(&self) -> (u32, u32) {
        self.size_px
    }

    pub fn average_primitives(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.primitives as f64 / self.frames as f64
        }
    }

    fn count(&mut self) -> Result<()> {
        self.current += 1;
        Ok(())
    }
}

impl RenderBackend for DrawStats {
    fn begin_frame(&mut self) -> Result<()> {
        self.current = 0;
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        self.frames += 1;
        self.primitives += self.current;
        self.max_primitives_per_frame = self.max_primitives_per_frame.max(self.current);
        Ok(())
    }

    fn resize(&mut self, width_px: u32, height_px: u32, _dpr: f32) -> Result<()> {
        self.size_px = (width_px, height_px);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        Ok(())
    }

    fn fill_circle(&mut self, _: f32, _: f32, _: f32, _: Color, _: BlendMode) -> Result<()> {
        self.count()
    }

    fn radial_glow(&mut self, _: f32, _: f32, _: f32, _: Color, _: BlendMode) -> Result<()> {
        self.count()
    }

    fn fill_rect(&mut self, _: DstRect, _: Color, _: BlendMode) -> Result<()> {
        self.count()
    }

    fn draw_sprite(&mut self, _: TextureId, _: DstRect, _: Color, _: BlendMode) -> Result<()> {
        self.count()
    }

    fn line(&mut self, _: (f32, f32), _: (f32, f32), _: f32, _: Color, _: BlendMode) -> Result<()> {
        self.count()
    }
}
