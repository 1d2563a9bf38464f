use crate::chart::{Chart, DEFAULT_APPROACH_SECONDS};
use crate::document::ChartMeta;
use crate::note::Note;

pub const FALLBACK_BPM: f64 = 145.0;
pub const FALLBACK_TITLE: &str = "DiCo ARU Phase1 (fallback)";

const FIRST_NOTE: f64 = 1.2;
const TOTAL_SECONDS: f64 = 60.0;

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Deterministic chart substituted when the real one cannot be loaded.
///
/// A tap every second beat at 145 BPM from 1.2 s to 60 s, with an
/// off-beat double every sixteen beats.
pub fn fallback_chart() -> Chart {
    let beat = 60.0 / FALLBACK_BPM;
    let mut notes = Vec::new();
    let mut t = FIRST_NOTE;
    let mut i: u32 = 0;
    while t < TOTAL_SECONDS {
        if i % 2 == 0 {
            notes.push(Note::tap(round3(t)));
        }
        if i % 16 == 8 {
            notes.push(Note::tap(round3(t + beat * 0.5)));
        }
        t += beat;
        i += 1;
    }

    let meta = ChartMeta {
        title: FALLBACK_TITLE.to_string(),
        bpm: Some(FALLBACK_BPM),
        ..Default::default()
    };
    Chart::with_meta(notes, 0.0, DEFAULT_APPROACH_SECONDS, meta)
}
