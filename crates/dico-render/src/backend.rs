use anyhow::Result;

/// Texture handle for referencing loaded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Blend mode for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Alpha,
    /// Lightening blend used for glows and sparkles.
    Screen,
}

/// Color with RGBA components (0.0..=1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a)
    }

    /// Same color with alpha multiplied by `factor` (clamped to 0..=1).
    pub fn fade(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Destination rectangle in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DstRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl DstRect {
    pub fn centered(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
            w,
            h,
        }
    }
}

/// Abstraction over 2D drawing surfaces.
/// Coordinates are in view units; the backend applies the pixel ratio.
/// Implementations: CommandRecorder (testing), DrawStats (headless).
pub trait RenderBackend {
    fn begin_frame(&mut self) -> Result<()>;
    fn end_frame(&mut self) -> Result<()>;

    /// Backing store changed size (pixels) with the given pixel ratio.
    fn resize(&mut self, width_px: u32, height_px: u32, dpr: f32) -> Result<()>;

    fn clear(&mut self) -> Result<()>;

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color, blend: BlendMode)
    -> Result<()>;

    /// Radial gradient from `color` at the center to transparent at `radius`.
    fn radial_glow(&mut self, x: f32, y: f32, radius: f32, color: Color, blend: BlendMode)
    -> Result<()>;

    fn fill_rect(&mut self, dst: DstRect, color: Color, blend: BlendMode) -> Result<()>;

    fn draw_sprite(&mut self, texture: TextureId, dst: DstRect, color: Color, blend: BlendMode)
    -> Result<()>;

    fn line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
        blend: BlendMode,
    ) -> Result<()>;
}
