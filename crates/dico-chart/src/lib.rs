//! Chart model for the dico timing engine.
//!
//! A [`Chart`] is an immutable, time-ordered list of [`Note`]s plus the
//! offset and approach settings needed to judge and draw them. Charts are
//! loaded once per session (file, URL or inline JSON) and fall back to a
//! generated BPM grid when the asset is unavailable.

mod chart;
mod document;
mod fallback;
mod loader;
mod location;
mod note;

pub use chart::{Chart, DEFAULT_APPROACH_SECONDS};
pub use document::{ChartDocument, ChartMeta, NoteEntry, ScrollSettings};
pub use fallback::{FALLBACK_BPM, FALLBACK_TITLE, fallback_chart};
pub use loader::ChartSource;
pub use location::Location;
pub use note::{Note, NoteKind};
