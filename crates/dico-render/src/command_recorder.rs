use anyhow::Result;

use crate::backend::{BlendMode, Color, DstRect, RenderBackend, TextureId};

/// Recorded draw command for testing.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginFrame,
    EndFrame,
    Resize {
        width_px: u32,
        height_px: u32,
        dpr: f32,
    },
    Clear,
    FillCircle {
        x: f32,
        y: f32,
        radius: f32,
        color: Color,
        blend: BlendMode,
    },
    RadialGlow {
        x: f32,
        y: f32,
        radius: f32,
        color: Color,
        blend: BlendMode,
    },
    FillRect {
        dst: DstRect,
        color: Color,
        blend: BlendMode,
    },
    DrawSprite {
        texture: TextureId,
        dst: DstRect,
        color: Color,
        blend: BlendMode,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
        blend: BlendMode,
    },
}

/// A RenderBackend that records draw commands for assertions.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
    size_px: (u32, u32),
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded commands.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Clear recorded commands.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn size_px(&self) -> (u32, u32) {
        self.size_px
    }

    /// Commands between the last BeginFrame/EndFrame pair.
    pub fn last_frame(&self) -> &[DrawCommand] {
        let Some(begin) = self
            .commands
            .iter()
            .rposition(|c| *c == DrawCommand::BeginFrame)
        else {
            return &[];
        };
        let end = self.commands[begin..]
            .iter()
            .position(|c| *c == DrawCommand::EndFrame)
            .map_or(self.commands.len(), |i| begin + i);
        &self.commands[begin + 1..end]
    }
}

impl RenderBackend for CommandRecorder {
    fn begin_frame(&mut self) -> Result<()> {
        self.commands.push(DrawCommand::BeginFrame);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        self.commands.push(DrawCommand::EndFrame);
        Ok(())
    }

    fn resize(&mut self, width_px: u32, height_px: u32, dpr: f32) -> Result<()> {
        self.size_px = (width_px, height_px);
        self.commands.push(DrawCommand::Resize {
            width_px,
            height_px,
            dpr,
        });
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.commands.push(DrawCommand::Clear);
        Ok(())
    }

    fn fill_circle(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        color: Color,
        blend: BlendMode,
    ) -> Result<()> {
        self.commands.push(DrawCommand::FillCircle {
            x,
            y,
            radius,
            color,
            blend,
        });
        Ok(())
    }

    fn radial_glow(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        color: Color,
        blend: BlendMode,
    ) -> Result<()> {
        self.commands.push(DrawCommand::RadialGlow {
            x,
            y,
            radius,
            color,
            blend,
        });
        Ok(())
    }

    fn fill_rect(&mut self, dst: DstRect, color: Color, blend: BlendMode) -> Result<()> {
        self.commands.push(DrawCommand::FillRect { dst, color, blend });
        Ok(())
    }

    fn draw_sprite(
        &mut self,
        texture: TextureId,
        dst: DstRect,
        color: Color,
        blend: BlendMode,
    ) -> Result<()> {
        self.commands.push(DrawCommand::DrawSprite {
            texture,
            dst,
            color,
            blend,
        });
        Ok(())
    }

    fn line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
        blend: BlendMode,
    ) -> Result<()> {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
            blend,
        });
        Ok(())
    }
}
