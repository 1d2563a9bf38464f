use std::sync::Arc;

use dico_chart::{Chart, Note};
use dico_play::{Judge, JudgeConfig, ResultSummary, ScoringRules, Tier};
use proptest::prelude::*;

fn judge_for(times: &[f64]) -> Judge {
    judge_with(times, JudgeConfig::default())
}

fn judge_with(times: &[f64], config: JudgeConfig) -> Judge {
    let chart = Chart::new(times.iter().map(|&t| Note::tap(t)).collect(), 0.0, 1.25);
    let mut judge = Judge::with_config(Arc::new(chart), config);
    judge.reset();
    judge
}

/// Tier for a single late tap `distance` seconds after a note at t = 0.
fn tier_at(distance: f64) -> Tier {
    judge_for(&[0.0]).hit(distance).tier
}

#[test]
fn window_boundaries() {
    assert_eq!(tier_at(0.055), Tier::Perfect);
    assert_eq!(tier_at(0.0551), Tier::Great);
    assert_eq!(tier_at(0.095), Tier::Great);
    assert_eq!(tier_at(0.0951), Tier::Good);
    assert_eq!(tier_at(0.140), Tier::Good);
    assert_eq!(tier_at(0.1401), Tier::Miss);
    assert_eq!(tier_at(0.190), Tier::Miss);
    assert_eq!(tier_at(0.1901), Tier::Empty);
}

#[test]
fn early_taps_on_boundaries_keep_their_tier() {
    let cases = [
        (1.0, 0.945, Tier::Perfect),
        (2.0, 1.905, Tier::Great),
        (3.0, 2.86, Tier::Good),
        (2.0, 1.81, Tier::Miss),
        // Late controls at non-zero note times.
        (2.0, 2.055, Tier::Perfect),
        (1.0, 1.14, Tier::Good),
    ];
    for (note, tap, want) in cases {
        let verdict = judge_for(&[note]).hit(tap);
        assert_eq!(verdict.tier, want, "note {note} tap {tap}");
        assert_eq!(verdict.note_index, Some(0));
    }
}

#[test]
fn early_tap_past_miss_boundary_is_empty() {
    let mut judge = judge_for(&[1.0]);
    assert_eq!(judge.hit(0.8099).tier, Tier::Empty);
    assert_eq!(judge.cursor(), 0);
    assert_eq!(judge.hit(0.81).tier, Tier::Miss);
    assert_eq!(judge.cursor(), 1);
}

#[test]
fn early_tap_outside_window_is_empty_without_state_change() {
    let mut judge = judge_for(&[1.0]);
    let before = *judge.state();
    let v = judge.hit(0.8);
    assert_eq!(v.tier, Tier::Empty);
    assert_eq!(v.distance, None);
    assert_eq!(v.note_time, None);
    assert_eq!(*judge.state(), before);
}

#[test]
fn auto_miss_without_taps() {
    let mut judge = judge_for(&[1.0]);
    assert_eq!(judge.sweep_miss(1.19), 0);
    assert_eq!(judge.sweep_miss(1.191), 1);
    let s = judge.state();
    assert_eq!(s.miss_count, 1);
    assert_eq!(s.combo, 0);
    assert_eq!(s.cursor, 1);
    // Nothing left to sweep.
    assert_eq!(judge.sweep_miss(100.0), 0);
}

#[test]
fn skip_ahead_misses_the_skipped_note() {
    let mut judge = judge_for(&[1.0, 1.25]);
    let v = judge.hit(1.26);
    assert_eq!(v.tier, Tier::Perfect);
    assert_eq!(v.note_time, Some(1.25));
    let s = judge.state();
    assert_eq!(s.cursor, 2);
    assert_eq!(s.miss_count, 1);
    assert_eq!(s.hit_count, 1);
    assert_eq!(s.combo, 1);
}

#[test]
fn tap_nearer_the_next_note_skips_the_current_one() {
    let mut judge = judge_for(&[1.0, 1.1]);
    let v = judge.hit(1.09);
    assert_eq!(v.note_index, Some(1));
    assert_eq!(v.tier, Tier::Perfect);
    let s = judge.state();
    assert_eq!(s.cursor, 2);
    assert_eq!(s.miss_count, 1);
    assert_eq!(s.combo, 1);
}

#[test]
fn resonance_clamps_high() {
    let config = JudgeConfig {
        scoring: ScoringRules {
            great_resonance: 99.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut judge = judge_with(&[1.0, 2.0], config);
    assert_eq!(judge.hit(1.07).tier, Tier::Great);
    assert_eq!(judge.state().resonance, 99.0);
    assert_eq!(judge.hit(2.0).tier, Tier::Perfect);
    assert_eq!(judge.state().resonance, 100.0);
}

#[test]
fn resonance_clamps_low() {
    let config = JudgeConfig {
        scoring: ScoringRules {
            good_resonance: 1.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut judge = judge_with(&[1.0, 2.0], config);
    assert_eq!(judge.hit(1.12).tier, Tier::Good);
    assert_eq!(judge.state().resonance, 1.0);
    assert_eq!(judge.hit(2.17).tier, Tier::Miss);
    assert_eq!(judge.state().resonance, 0.0);
}

#[test]
fn restart_is_idempotent() {
    let mut judge = judge_for(&[1.0, 2.0, 3.0]);
    judge.hit(1.0);
    judge.sweep_miss(5.0);

    judge.reset();
    let once = (*judge.state(), judge.phase());
    judge.reset();
    let twice = (*judge.state(), judge.phase());
    assert_eq!(once, twice);
    assert_eq!(once.0.cursor, 0);
    assert_eq!(once.0.score, 0);
}

#[test]
fn concrete_session() {
    let mut judge = judge_for(&[1.0, 2.0, 3.0]);

    let v = judge.hit(1.02);
    assert_eq!(v.tier, Tier::Perfect);
    assert!((v.distance.unwrap() - 0.02).abs() < 1e-9);
    assert_eq!(judge.state().score, 120);
    assert_eq!(judge.state().combo, 1);
    assert!((judge.state().resonance - 1.8).abs() < 1e-9);

    // Note@2.0 is 0.3 s stale and note@3.0 is 0.7 s away: nothing matches.
    // The pre-classification sweep has already retired note@2.0.
    let v = judge.hit(2.3);
    assert_eq!(v.tier, Tier::Empty);
    assert_eq!(v.distance, None);
    assert_eq!(judge.state().score, 120);
    assert_eq!(judge.state().miss_count, 1);
    assert_eq!(judge.state().combo, 0);

    judge.sweep_miss(3.2);
    let s = judge.state();
    assert_eq!(s.miss_count, 2);
    assert_eq!(s.combo, 0);
    assert_eq!(s.cursor, 3);
    assert_eq!(s.score, 120);
    assert_eq!(s.max_combo, 1);
}

#[test]
fn empty_tap_keeps_combo() {
    let mut judge = judge_for(&[1.0, 3.0]);
    judge.hit(1.02);
    assert_eq!(judge.hit(2.0).tier, Tier::Empty);
    assert_eq!(judge.state().combo, 1);
    assert_eq!(judge.state().score, 120);
}

#[test]
fn tap_after_all_notes_is_empty() {
    let mut judge = judge_for(&[1.0]);
    judge.hit(1.0);
    assert!(judge.is_complete());
    assert_eq!(judge.hit(1.01).tier, Tier::Empty);
    assert_eq!(judge.state().cursor, 1);
}

#[test]
fn summary_from_session() {
    let mut judge = judge_for(&[1.0, 2.0, 3.0, 4.0]);
    judge.hit(1.0);
    judge.hit(2.0);
    judge.hit(3.0);
    judge.sweep_miss(10.0);
    let summary = ResultSummary::from_snapshot(&judge.snapshot());
    assert_eq!(summary.score, 360);
    assert_eq!(summary.max_combo, 3);
    assert_eq!(summary.hit_count, 3);
    assert_eq!(summary.miss_count, 1);
    assert!((summary.accuracy - 0.75).abs() < 1e-12);
}

#[derive(Debug, Clone)]
enum Op {
    Tap(f64),
    Sweep(f64),
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        (0.0f64..0.4, any::<bool>()).prop_map(|(dt, tap)| if tap { Op::Tap(dt) } else { Op::Sweep(dt) }),
        1..120,
    )
}

proptest! {
    #[test]
    fn cursor_is_monotonic_and_each_note_resolved_once(
        mut times in prop::collection::vec(0.0f64..20.0, 0..60),
        steps in ops(),
    ) {
        times.sort_by(f64::total_cmp);
        let mut judge = judge_for(&times);
        let mut song_time = 0.0;
        let mut last_cursor = 0;

        for op in steps {
            let verdict = match op {
                Op::Tap(dt) => {
                    song_time += dt;
                    Some(judge.hit(song_time))
                }
                Op::Sweep(dt) => {
                    song_time += dt;
                    judge.sweep_miss(song_time);
                    None
                }
            };
            let s = *judge.state();
            prop_assert!(s.cursor >= last_cursor);
            prop_assert!(s.cursor <= times.len());
            // Every index below the cursor was resolved exactly once.
            prop_assert_eq!((s.hit_count + s.miss_count) as usize, s.cursor);
            prop_assert!((0.0..=100.0).contains(&s.resonance));
            prop_assert!(s.combo <= s.max_combo);
            if let Some(v) = verdict {
                if let Some(i) = v.note_index {
                    prop_assert!(i >= last_cursor);
                    prop_assert_eq!(s.cursor, i + 1);
                }
            }
            last_cursor = s.cursor;
        }
    }
}
