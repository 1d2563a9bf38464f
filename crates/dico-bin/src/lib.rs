//! Session wiring and headless runner for the dico engine.

pub mod app_config;
pub mod autoplay;
pub mod session;

pub use app_config::{AppConfig, CONFIG_FILE, ChartSettings, SessionSettings};
pub use autoplay::Autoplay;
pub use session::{FrameReport, SessionController, SessionPhase};
