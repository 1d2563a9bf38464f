//! Tap judgment for the dico engine.
//!
//! The [`Judge`] walks a chart with a monotonic cursor: each note is resolved
//! exactly once, either by a tap ([`Tier::Perfect`]..[`Tier::Miss`]) or by the
//! miss sweep once it ages past the loosest window.

mod judge;
mod result;
mod scoring;
mod window;

pub use judge::{EmptyTapPolicy, Judge, JudgeConfig, JudgePhase, JudgeSnapshot, JudgeState, Verdict};
pub use result::{ResultSummary, normalize_percent, normalize_score01, resonance_tier};
pub use scoring::ScoringRules;
pub use window::{JudgeWindow, Tier};
