pub mod event;
pub mod input;
pub mod key_config;
pub mod surface;

pub use event::{PointerButton, PointerEvent, Tap, TouchEvent, TouchPoint};
pub use input::Input;
pub use key_config::{KeyBindings, KeyCommand, KeyName};
pub use surface::SurfaceRect;
