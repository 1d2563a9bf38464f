use serde::{Deserialize, Serialize};

/// Classification of a tap's timing accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Perfect,
    Great,
    Good,
    /// Matched a note, but only inside the loose window.
    Miss,
    /// Matched nothing.
    Empty,
}

impl Tier {
    /// Returns true if this tier continues combo.
    pub fn continues_combo(self) -> bool {
        matches!(self, Self::Perfect | Self::Great | Self::Good)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Perfect => "PERFECT",
            Self::Great => "GREAT",
            Self::Good => "GOOD",
            Self::Miss => "MISS",
            Self::Empty => "EMPTY",
        }
    }
}

/// Hit windows in seconds (absolute distance to the note).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeWindow {
    pub perfect: f64,
    pub great: f64,
    pub good: f64,
    pub miss: f64,
}

impl Default for JudgeWindow {
    fn default() -> Self {
        Self {
            perfect: 0.055,
            great: 0.095,
            good: 0.140,
            miss: 0.190,
        }
    }
}

/// Slack on every window edge. Tap and note times are both rounded, so an
/// early tap exactly on a boundary can land a few ulps past it.
const BOUNDARY_EPSILON: f64 = 1e-9;

fn within(distance: f64, limit: f64) -> bool {
    distance <= limit + BOUNDARY_EPSILON
}

impl JudgeWindow {
    /// Tier for a tap `distance` seconds from its note, or `None` when the
    /// note is outside every window. Boundaries are inclusive.
    pub fn judge(&self, distance: f64) -> Option<Tier> {
        if within(distance, self.perfect) {
            Some(Tier::Perfect)
        } else if within(distance, self.great) {
            Some(Tier::Great)
        } else if within(distance, self.good) {
            Some(Tier::Good)
        } else if self.in_miss_window(distance) {
            Some(Tier::Miss)
        } else {
            None
        }
    }

    /// True while a note `distance` seconds away can still be matched.
    pub fn in_miss_window(&self, distance: f64) -> bool {
        within(distance, self.miss)
    }

    /// Windows must be non-decreasing for the ladder above to make sense.
    pub fn is_ordered(&self) -> bool {
        0.0 <= self.perfect
            && self.perfect <= self.great
            && self.great <= self.good
            && self.good <= self.miss
    }
}
