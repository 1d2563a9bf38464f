use anyhow::{Result, anyhow};

use crate::document::{ChartDocument, ChartMeta, NoteEntry, ScrollSettings};
use crate::note::Note;

/// Approach time used when a chart omits or mangles `scroll.approach`.
pub const DEFAULT_APPROACH_SECONDS: f64 = 1.25;

/// Immutable, time-ordered note list for one track.
///
/// Ordering is enforced at construction: notes with a non-finite time are
/// dropped, negative times clamp to zero and the rest are stable-sorted by
/// `t`. Play-time code can therefore rely on `notes[i].t <= notes[i + 1].t`.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    notes: Vec<Note>,
    offset: f64,
    approach_seconds: f64,
    meta: ChartMeta,
}

impl Chart {
    pub fn new(notes: Vec<Note>, offset: f64, approach_seconds: f64) -> Self {
        Self::with_meta(notes, offset, approach_seconds, ChartMeta::default())
    }

    pub fn with_meta(
        notes: Vec<Note>,
        offset: f64,
        approach_seconds: f64,
        meta: ChartMeta,
    ) -> Self {
        let mut notes: Vec<Note> = notes
            .into_iter()
            .filter(|n| n.t.is_finite())
            .map(|n| Note {
                t: n.t.max(0.0),
                ..n
            })
            .collect();
        notes.sort_by(|a, b| a.t.total_cmp(&b.t));

        let approach_seconds = if approach_seconds.is_finite() && approach_seconds > 0.0 {
            approach_seconds
        } else {
            DEFAULT_APPROACH_SECONDS
        };
        let offset = if offset.is_finite() { offset } else { 0.0 };

        Self {
            notes,
            offset,
            approach_seconds,
            meta,
        }
    }

    pub fn from_document(doc: ChartDocument) -> Self {
        let total = doc.notes.len();
        let notes: Vec<Note> = doc
            .notes
            .into_iter()
            .filter_map(|entry| {
                entry.t.map(|t| Note {
                    t,
                    kind: entry.kind,
                })
            })
            .collect();
        if notes.len() < total {
            log::debug!("dropped {} note(s) without a time", total - notes.len());
        }
        Self::with_meta(
            notes,
            doc.offset,
            doc.scroll.approach.unwrap_or(DEFAULT_APPROACH_SECONDS),
            doc.meta,
        )
    }

    pub fn to_document(&self) -> ChartDocument {
        ChartDocument {
            meta: self.meta.clone(),
            offset: self.offset,
            scroll: ScrollSettings {
                approach: Some(self.approach_seconds),
            },
            notes: self
                .notes
                .iter()
                .map(|n| NoteEntry {
                    t: Some(n.t),
                    kind: n.kind,
                })
                .collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: ChartDocument =
            serde_json::from_str(json).map_err(|e| anyhow!("Failed to parse chart JSON: {e}"))?;
        Ok(Self::from_document(doc))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_document())
            .map_err(|e| anyhow!("Failed to serialize chart: {e}"))
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Seconds subtracted from raw playback time before comparing to note times.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn approach_seconds(&self) -> f64 {
        self.approach_seconds
    }

    pub fn meta(&self) -> &ChartMeta {
        &self.meta
    }

    pub fn title(&self) -> &str {
        &self.meta.title
    }

    pub fn last_note_time(&self) -> Option<f64> {
        self.notes.last().map(|n| n.t)
    }
}
