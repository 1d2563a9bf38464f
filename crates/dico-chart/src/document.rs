use serde::{Deserialize, Serialize};

use crate::note::NoteKind;

/// On-disk chart layout: `{ meta, offset, scroll: { approach }, notes: [{ t, type }] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartDocument {
    pub meta: ChartMeta,
    pub offset: f64,
    pub scroll: ScrollSettings,
    pub notes: Vec<NoteEntry>,
}

/// Descriptive chart metadata. Unrecognized keys are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartMeta {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bpm: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollSettings {
    /// Seconds a note is visible before reaching the target line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approach: Option<f64>,
}

/// A raw note entry. `t` may be missing in hand-written files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteEntry {
    pub t: Option<f64>,
    #[serde(rename = "type")]
    pub kind: NoteKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_document() {
        let json = r#"{
            "meta": { "title": "Test", "bpm": 120, "artist": "someone" },
            "offset": 0.1,
            "scroll": { "approach": 1.5 },
            "notes": [ { "t": 1.0, "type": "tap" }, { "t": 2.0 } ]
        }"#;
        let doc: ChartDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.meta.title, "Test");
        assert_eq!(doc.meta.bpm, Some(120.0));
        assert_eq!(
            doc.meta.extra.get("artist").and_then(|v| v.as_str()),
            Some("someone")
        );
        assert_eq!(doc.offset, 0.1);
        assert_eq!(doc.scroll.approach, Some(1.5));
        assert_eq!(doc.notes.len(), 2);
        assert_eq!(doc.notes[1].kind, NoteKind::Tap);
    }

    #[test]
    fn empty_object_uses_defaults() {
        let doc: ChartDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, ChartDocument::default());
    }
}
