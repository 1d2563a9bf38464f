use serde::Serialize;

use crate::judge::JudgeSnapshot;

/// Resonance may arrive as 0..1 or 0..100; returns a rounded 0..=100 percent.
/// Values up to 1.0 are read as fractions.
pub fn normalize_percent(resonance: f64) -> u32 {
    if !resonance.is_finite() {
        return 0;
    }
    let r = if resonance <= 1.0001 {
        resonance * 100.0
    } else {
        resonance
    };
    r.round().clamp(0.0, 100.0) as u32
}

/// Map a raw score onto 0..=1.
///
/// Prefers a max-combo proxy (`max_combo * 120`) once it reaches 240, then a
/// log curve saturating at 6000 points, then resonance.
pub fn normalize_score01(score: u64, max_combo: u32, resonance_percent: u32) -> f64 {
    let proxy_max = u64::from(max_combo) * 120;
    if proxy_max >= 240 {
        return (score as f64 / proxy_max as f64).clamp(0.0, 1.0);
    }
    if score > 0 {
        let p = (1.0 + score as f64).log10() / (1.0 + 6000.0_f64).log10();
        return p.clamp(0.0, 1.0);
    }
    (f64::from(resonance_percent) / 100.0).clamp(0.0, 1.0)
}

/// Visual tier for the current combo: 0 cyan, 1 violet, 2 pink-gold.
pub fn resonance_tier(combo: u32) -> u8 {
    if combo >= 50 {
        2
    } else if combo >= 30 {
        1
    } else {
        0
    }
}

/// End-of-run summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResultSummary {
    pub score: u64,
    pub max_combo: u32,
    pub resonance_percent: u32,
    pub hit_count: u32,
    pub miss_count: u32,
    pub total_notes: usize,
    /// `hit / (hit + miss)`, 0 when nothing was resolved.
    pub accuracy: f64,
    pub score01: f64,
}

impl ResultSummary {
    pub fn from_snapshot(snap: &JudgeSnapshot) -> Self {
        let resolved = snap.hit_count + snap.miss_count;
        let accuracy = if resolved == 0 {
            0.0
        } else {
            f64::from(snap.hit_count) / f64::from(resolved)
        };
        let resonance_percent = snap.resonance_percent;
        Self {
            score: snap.score,
            max_combo: snap.max_combo,
            resonance_percent,
            hit_count: snap.hit_count,
            miss_count: snap.miss_count,
            total_notes: snap.total_notes,
            accuracy,
            score01: normalize_score01(snap.score, snap.max_combo, resonance_percent),
        }
    }
}
