use crate::event::{PointerButton, PointerEvent, Tap, TouchEvent};
use crate::surface::SurfaceRect;

/// Maps raw pointer and touch events onto the tap surface.
///
/// Coordinates are taken relative to the last rect passed to
/// [`Input::set_rect`]; hosts must call it again after every resize or
/// layout change. Simultaneous pointers are not deduplicated.
#[derive(Debug, Clone, Default)]
pub struct Input {
    rect: SurfaceRect,
    taps: u64,
}

impl Input {
    pub fn new(rect: SurfaceRect) -> Self {
        Self { rect, taps: 0 }
    }

    pub fn rect(&self) -> SurfaceRect {
        self.rect
    }

    /// Recompute the cached bounding rect.
    pub fn set_rect(&mut self, rect: SurfaceRect) {
        if rect != self.rect {
            log::debug!(
                "input rect {}x{} at ({}, {})",
                rect.width,
                rect.height,
                rect.left,
                rect.top
            );
        }
        self.rect = rect;
    }

    /// Number of taps produced so far.
    pub fn tap_count(&self) -> u64 {
        self.taps
    }

    fn emit(&mut self, x: f32, y: f32) -> Tap {
        self.taps += 1;
        Tap { x, y }
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> Option<Tap> {
        if event.button != PointerButton::Primary {
            return None;
        }
        let (x, y) = self.rect.to_local(event.client_x, event.client_y);
        Some(self.emit(x, y))
    }

    pub fn on_touch_start(&mut self, event: &TouchEvent) -> Tap {
        let (x, y) = match event.points.first() {
            Some(p) => self.rect.to_local(p.client_x, p.client_y),
            None => self.rect.center(),
        };
        self.emit(x, y)
    }

    /// A tap at the surface center, for keyboard play and autoplay.
    pub fn sim_tap_center(&mut self) -> Tap {
        let (x, y) = self.rect.center();
        self.emit(x, y)
    }
}
