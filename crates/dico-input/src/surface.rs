use serde::{Deserialize, Serialize};

/// Bounding rectangle of the tap surface in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for SurfaceRect {
    fn default() -> Self {
        Self::sized(390.0, 844.0)
    }
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A rect anchored at the client origin.
    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width * 0.5, self.height * 0.5)
    }

    /// Client coordinates relative to the top-left corner.
    pub fn to_local(&self, client_x: f32, client_y: f32) -> (f32, f32) {
        (client_x - self.left, client_y - self.top)
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}
