/// Mouse/pen button that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client_x: f32,
    pub client_y: f32,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn primary(client_x: f32, client_y: f32) -> Self {
        Self {
            client_x,
            client_y,
            button: PointerButton::Primary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub client_x: f32,
    pub client_y: f32,
}

/// A touch-start event. Only the first changed point is used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchEvent {
    pub points: Vec<TouchPoint>,
}

impl TouchEvent {
    pub fn at(client_x: f32, client_y: f32) -> Self {
        Self {
            points: vec![TouchPoint { client_x, client_y }],
        }
    }
}

/// A tap in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub x: f32,
    pub y: f32,
}
