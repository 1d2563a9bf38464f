use std::sync::Arc;

use dico_chart::Chart;
use serde::{Deserialize, Serialize};

use crate::scoring::ScoringRules;
use crate::window::{JudgeWindow, Tier};

/// What a tap that matches no note does to the combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyTapPolicy {
    /// Free tap: nothing changes.
    #[default]
    Ignore,
    /// Resets the combo, no score or resonance effect.
    BreakCombo,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    pub window: JudgeWindow,
    pub scoring: ScoringRules,
    pub empty_tap: EmptyTapPolicy,
}

/// Session lifecycle of the judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JudgePhase {
    #[default]
    Idle,
    Active,
    Ended,
}

/// Mutable judgment state for one session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct JudgeState {
    /// Index of the next unresolved note. Never decreases.
    pub cursor: usize,
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    /// 0..=100.
    pub resonance: f64,
    pub hit_count: u32,
    pub miss_count: u32,
}

/// Outcome of one tap, handed to presentation code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    pub tier: Tier,
    /// Seconds between the tap and the matched note.
    pub distance: Option<f64>,
    pub note_time: Option<f64>,
    #[serde(skip)]
    pub note_index: Option<usize>,
}

impl Verdict {
    pub fn empty() -> Self {
        Self {
            tier: Tier::Empty,
            distance: None,
            note_time: None,
            note_index: None,
        }
    }
}

/// Read-only view for UI and result screens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JudgeSnapshot {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub resonance: f64,
    pub resonance_percent: u32,
    pub hit_count: u32,
    pub miss_count: u32,
    pub resolved: usize,
    pub total_notes: usize,
}

/// Classifies taps against a chart.
///
/// Notes are resolved strictly in order by advancing `cursor`; the only
/// mutation path is [`Judge::resolve_next`], so an index can never be judged
/// twice. `sweep_miss` runs at the start of every `hit`, so a tap is never
/// matched against a note that should already have timed out.
pub struct Judge {
    chart: Arc<Chart>,
    config: JudgeConfig,
    state: JudgeState,
    phase: JudgePhase,
}

impl Judge {
    pub fn new(chart: Arc<Chart>) -> Self {
        Self::with_config(chart, JudgeConfig::default())
    }

    pub fn with_config(chart: Arc<Chart>, config: JudgeConfig) -> Self {
        if !config.window.is_ordered() {
            log::warn!("judge windows are not ordered: {:?}", config.window);
        }
        Self {
            chart,
            config,
            state: JudgeState::default(),
            phase: JudgePhase::Idle,
        }
    }

    pub fn chart(&self) -> &Arc<Chart> {
        &self.chart
    }

    pub fn config(&self) -> &JudgeConfig {
        &self.config
    }

    pub fn state(&self) -> &JudgeState {
        &self.state
    }

    pub fn phase(&self) -> JudgePhase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    /// Activate an idle or ended judge. An active judge keeps its state.
    pub fn begin(&mut self) {
        if self.phase != JudgePhase::Active {
            self.reset();
        }
    }

    /// Zero the state and become active.
    pub fn reset(&mut self) {
        self.state = JudgeState::default();
        self.phase = JudgePhase::Active;
        log::debug!("judge reset ({} notes)", self.chart.len());
    }

    /// Stop accepting taps; the final state stays readable.
    pub fn finish(&mut self) {
        if self.phase == JudgePhase::Active {
            self.phase = JudgePhase::Ended;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state.cursor >= self.chart.len()
    }

    fn add_resonance(&mut self, amount: f64) {
        self.state.resonance = (self.state.resonance + amount).clamp(0.0, 100.0);
    }

    /// Resolve the note at `cursor` with `tier` and advance past it.
    fn resolve_next(&mut self, tier: Tier) {
        debug_assert!(self.state.cursor < self.chart.len());
        self.state.cursor += 1;
        let rules = self.config.scoring;
        if tier.continues_combo() {
            let s = &mut self.state;
            s.hit_count += 1;
            s.combo += 1;
            s.max_combo = s.max_combo.max(s.combo);
            s.score += rules.score_for(tier, s.combo);
        } else {
            self.state.combo = 0;
            self.state.miss_count += 1;
        }
        self.add_resonance(rules.resonance_for(tier));
    }

    /// Auto-miss every note that is more than the miss window behind
    /// `song_time`. Returns how many notes were missed.
    pub fn sweep_miss(&mut self, song_time: f64) -> usize {
        if self.phase != JudgePhase::Active {
            return 0;
        }
        let window = self.config.window;
        let mut missed = 0;
        while let Some(note) = self.chart.notes().get(self.state.cursor) {
            let late = song_time - note.t;
            if late > 0.0 && !window.in_miss_window(late) {
                self.resolve_next(Tier::Miss);
                missed += 1;
            } else {
                break;
            }
        }
        if missed > 0 {
            log::debug!("auto-missed {missed} note(s) at {song_time:.3}s");
        }
        missed
    }

    /// Nearest of `{cursor, cursor + 1}`; ties go to the earlier note.
    fn nearest(&self, song_time: f64) -> Option<(usize, f64)> {
        let notes = self.chart.notes();
        let a = self.state.cursor;
        let first = notes.get(a)?;
        let mut best = (a, (song_time - first.t).abs());
        if let Some(second) = notes.get(a + 1) {
            let d = (song_time - second.t).abs();
            if d < best.1 {
                best = (a + 1, d);
            }
        }
        self.config.window.in_miss_window(best.1).then_some(best)
    }

    /// Judge a tap at `song_time`.
    pub fn hit(&mut self, song_time: f64) -> Verdict {
        if self.phase != JudgePhase::Active {
            return Verdict::empty();
        }
        self.sweep_miss(song_time);

        let Some((index, distance)) = self.nearest(song_time) else {
            if self.config.empty_tap == EmptyTapPolicy::BreakCombo {
                self.state.combo = 0;
            }
            return Verdict::empty();
        };
        let tier = self.config.window.judge(distance).unwrap_or(Tier::Miss);

        // Tapping ahead skips the current note: it counts as missed.
        while self.state.cursor < index {
            self.resolve_next(Tier::Miss);
        }
        self.resolve_next(tier);

        Verdict {
            tier,
            distance: Some(distance),
            note_time: Some(self.chart.notes()[index].t),
            note_index: Some(index),
        }
    }

    pub fn snapshot(&self) -> JudgeSnapshot {
        let s = &self.state;
        JudgeSnapshot {
            score: s.score,
            combo: s.combo,
            max_combo: s.max_combo,
            resonance: s.resonance,
            resonance_percent: s.resonance.round().clamp(0.0, 100.0) as u32,
            hit_count: s.hit_count,
            miss_count: s.miss_count,
            resolved: s.cursor,
            total_notes: self.chart.len(),
        }
    }
}
