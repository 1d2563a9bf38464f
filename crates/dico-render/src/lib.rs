//! Note rendering for the dico engine.
//!
//! - [`Renderer`]: maps (note time, song time) to screen position, scale and
//!   alpha, with forward-only culling and distance-based level of detail
//! - [`RenderBackend`]: drawing seam; [`CommandRecorder`] records for tests,
//!   [`DrawStats`] counts for headless runs
//! - [`Effects`]: capability interface for hit feedback

mod backend;
mod command_recorder;
mod config;
mod draw_stats;
mod effects;
mod particles;
mod renderer;
mod skin;

pub use backend::{BlendMode, Color, DstRect, RenderBackend, TextureId};
pub use command_recorder::{CommandRecorder, DrawCommand};
pub use config::{LodThresholds, NoteSkin, RenderConfig};
pub use draw_stats::DrawStats;
pub use effects::{EffectEvent, Effects, NullEffects, RecordingEffects, normalize_intensity};
pub use particles::ParticleEffects;
pub use renderer::{FrameStats, Lod, NoteSprite, Renderer};
