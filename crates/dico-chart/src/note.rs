use serde::{Deserialize, Serialize};

/// Interaction kind of a note.
///
/// Judgment math does not depend on the kind; unknown kinds from newer
/// documents deserialize as [`NoteKind::Other`] and are judged like taps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    #[default]
    Tap,
    #[serde(other)]
    Other,
}

/// A single timed target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Target time in seconds since song start (non-negative).
    pub t: f64,
    pub kind: NoteKind,
}

impl Note {
    pub fn tap(t: f64) -> Self {
        Self {
            t,
            kind: NoteKind::Tap,
        }
    }
}
