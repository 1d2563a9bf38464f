use serde::{Deserialize, Serialize};

use crate::window::Tier;

/// Score and resonance deltas per tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub perfect_score: u64,
    pub great_score: u64,
    pub good_score: u64,
    /// Extra PERFECT points per combo step beyond the first hit.
    pub perfect_combo_bonus: u64,
    pub perfect_resonance: f64,
    pub great_resonance: f64,
    pub good_resonance: f64,
    /// Subtracted on every miss.
    pub miss_penalty: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            perfect_score: 120,
            great_score: 90,
            good_score: 40,
            perfect_combo_bonus: 0,
            perfect_resonance: 1.8,
            great_resonance: 1.2,
            good_resonance: 0.6,
            miss_penalty: 2.0,
        }
    }
}

impl ScoringRules {
    /// Points for a hit of `tier` that brought the combo to `combo`.
    pub fn score_for(&self, tier: Tier, combo: u32) -> u64 {
        match tier {
            Tier::Perfect => {
                self.perfect_score
                    + self.perfect_combo_bonus * u64::from(combo.saturating_sub(1))
            }
            Tier::Great => self.great_score,
            Tier::Good => self.good_score,
            Tier::Miss | Tier::Empty => 0,
        }
    }

    pub fn resonance_for(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Perfect => self.perfect_resonance,
            Tier::Great => self.great_resonance,
            Tier::Good => self.good_resonance,
            Tier::Miss => -self.miss_penalty,
            Tier::Empty => 0.0,
        }
    }
}
