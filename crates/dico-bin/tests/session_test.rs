use std::rc::Rc;
use std::sync::Arc;

use dico_audio::{AudioConfig, AudioManager, MockAudio, MockAudioEvent, MockMusic};
use dico_bin::{AppConfig, SessionController, SessionPhase};
use dico_chart::{Chart, Note};
use dico_input::{KeyCommand, PointerButton, PointerEvent, SurfaceRect};
use dico_play::Tier;
use dico_render::{CommandRecorder, DrawCommand, EffectEvent, RecordingEffects};
use dico_timing::MockTimeProvider;

type TestSession =
    SessionController<Rc<MockTimeProvider>, MockAudio, RecordingEffects, CommandRecorder>;

fn chart(times: &[f64]) -> Arc<Chart> {
    Arc::new(Chart::new(
        times.iter().map(|&t| Note::tap(t)).collect(),
        0.0,
        1.25,
    ))
}

fn build(times: &[f64], backend: MockAudio, tp: &Rc<MockTimeProvider>) -> TestSession {
    let config = AppConfig::default();
    let audio = AudioManager::new(backend, AudioConfig::default());
    SessionController::new(
        chart(times),
        Rc::clone(tp),
        audio,
        RecordingEffects::new(),
        CommandRecorder::new(),
        &config,
    )
    .unwrap()
}

fn silent_session(times: &[f64]) -> (Rc<MockTimeProvider>, TestSession) {
    let tp = Rc::new(MockTimeProvider::new());
    let session = build(times, MockAudio::new(Rc::clone(&tp)), &tp);
    (tp, session)
}

fn at(tp: &MockTimeProvider, secs: f64) {
    tp.set_time((secs * 1_000_000.0).round() as i64);
}

fn music_plays(session: &TestSession) -> Vec<f64> {
    session
        .audio()
        .backend()
        .unwrap()
        .events()
        .iter()
        .filter_map(|e| match e {
            MockAudioEvent::PlayMusic { offset, .. } => Some(*offset),
            _ => None,
        })
        .collect()
}

fn count(session: &TestSession, wanted: EffectEvent) -> usize {
    session
        .effects()
        .events
        .iter()
        .filter(|e| **e == wanted)
        .count()
}

#[test]
fn three_note_run() {
    let (tp, mut session) = silent_session(&[1.0, 2.0, 3.0]);
    session.start();

    at(&tp, 1.02);
    let v = session.tap_center();
    assert_eq!(v.tier, Tier::Perfect);
    assert!((v.distance.unwrap() - 0.02).abs() < 1e-6);
    let snap = session.snapshot();
    assert_eq!((snap.score, snap.combo), (120, 1));
    assert!((snap.resonance - 1.8).abs() < 1e-9);

    at(&tp, 2.3);
    let v = session.tap_center();
    assert_eq!(v.tier, Tier::Empty);
    assert_eq!(session.last_verdict(), Some(v));
    assert_eq!(session.snapshot().score, 120);

    at(&tp, 3.2);
    let report = session.frame();
    assert!(!report.ended);
    let snap = session.snapshot();
    assert_eq!(snap.miss_count, 2);
    assert_eq!(snap.combo, 0);
    assert_eq!(snap.score, 120);
    assert_eq!(snap.resolved, 3);
}

#[test]
fn idle_session_ignores_taps_and_frames() {
    let (tp, mut session) = silent_session(&[1.0]);
    at(&tp, 1.0);
    assert_eq!(session.tap_center().tier, Tier::Empty);
    let report = session.frame();
    assert_eq!(report.stats.visible, 0);
    assert!(!report.ended);
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[test]
fn music_drives_song_time() {
    let tp = Rc::new(MockTimeProvider::new());
    let mut session = build(&[5.0], MockAudio::new(Rc::clone(&tp)), &tp);
    session.load_music(MockMusic::new("song", 60.0));
    session.start();
    assert_eq!(music_plays(&session), vec![0.0]);

    at(&tp, 1.5);
    let report = session.frame();
    assert!((report.song_time - 1.5).abs() < 1e-9);
    assert!(session.audio().is_playing());
}

#[test]
fn blocked_audio_falls_back_then_resyncs() {
    let tp = Rc::new(MockTimeProvider::new());
    let mut session = build(&[5.0], MockAudio::blocked(Rc::clone(&tp)), &tp);
    session.load_music(MockMusic::new("song", 60.0));
    session.start();
    assert!(music_plays(&session).is_empty());

    at(&tp, 2.0);
    assert!((session.frame().song_time - 2.0).abs() < 1e-9);

    session
        .audio_mut()
        .backend_mut()
        .unwrap()
        .set_blocked(false);
    assert!(session.on_user_gesture());
    let plays = music_plays(&session);
    assert_eq!(plays.len(), 1);
    assert!((plays[0] - 2.0).abs() < 1e-9);

    at(&tp, 2.5);
    assert!((session.frame().song_time - 2.5).abs() < 1e-9);

    // Already unlocked: no second resync.
    assert!(session.on_user_gesture());
    assert_eq!(music_plays(&session).len(), 1);
}

#[test]
fn music_arriving_mid_run_joins_at_song_time() {
    let (tp, mut session) = silent_session(&[5.0]);
    session.start();
    at(&tp, 3.0);
    session.frame();
    session.load_music(MockMusic::new("late", 60.0));
    let plays = music_plays(&session);
    assert_eq!(plays.len(), 1);
    assert!((plays[0] - 3.0).abs() < 1e-9);
}

#[test]
fn session_ends_at_duration_guess() {
    let (tp, mut session) = silent_session(&[1.0]);
    session.start();
    at(&tp, 19.9);
    assert!(!session.frame().ended);
    at(&tp, 20.0);
    let report = session.frame();
    assert!(report.ended);
    assert_eq!(session.phase(), SessionPhase::Result);

    let summary = session.result().unwrap();
    assert_eq!(summary.miss_count, 1);
    assert_eq!(summary.total_notes, 1);

    // Frozen after the end.
    at(&tp, 25.0);
    let report = session.frame();
    assert!(report.ended);
    assert_eq!(report.song_time, 20.0);
}

#[test]
fn stop_halts_clock_and_music() {
    let tp = Rc::new(MockTimeProvider::new());
    let mut session = build(&[1.0, 2.0], MockAudio::new(Rc::clone(&tp)), &tp);
    session.load_music(MockMusic::new("song", 60.0));
    session.start();
    at(&tp, 0.5);
    session.frame();
    session.stop();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(!session.audio().is_playing());
    let events = session.audio().backend().unwrap().events();
    assert_eq!(events.last(), Some(&MockAudioEvent::StopMusic));

    at(&tp, 1.0);
    assert_eq!(session.tap_center().tier, Tier::Empty);
    assert_eq!(session.snapshot().resolved, 0);
}

#[test]
fn restart_clears_the_previous_run() {
    let (tp, mut session) = silent_session(&[1.0, 2.0, 3.0]);
    session.start();
    at(&tp, 1.0);
    session.tap_center();
    at(&tp, 2.5);
    session.frame();
    assert!(session.renderer().visible_start() > 0);

    tp.set_time(10_000_000);
    session.restart();
    let snap = session.snapshot();
    assert_eq!((snap.score, snap.combo, snap.resolved), (0, 0, 0));
    assert_eq!(snap.resonance, 0.0);
    assert_eq!(session.renderer().visible_start(), 0);
    assert_eq!(session.song_time(), 0.0);

    tp.set_time(11_000_000);
    assert_eq!(session.tap_center().tier, Tier::Perfect);
}

#[test]
fn great_hits_trigger_stingers_and_stream() {
    let tp = Rc::new(MockTimeProvider::new());
    let mut session = build(&[1.0, 2.0, 4.0], MockAudio::new(Rc::clone(&tp)), &tp);
    session.audio_mut().set_stingers(
        Some(MockMusic::new("tap", 0.2)),
        Some(MockMusic::new("great", 0.4)),
    );
    session.start();

    at(&tp, 1.0);
    session.tap_center();
    at(&tp, 2.12);
    assert_eq!(session.tap_center().tier, Tier::Good);

    let stingers: Vec<String> = session
        .audio()
        .backend()
        .unwrap()
        .events()
        .iter()
        .filter_map(|e| match e {
            MockAudioEvent::Effect { name, .. } => Some(name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(stingers, vec!["tap", "great", "tap"]);

    let center = EffectEvent::Burst { x: 195.0, y: 422.0 };
    assert_eq!(count(&session, center), 2);
    assert_eq!(count(&session, EffectEvent::Stream { x: 195.0, y: 422.0 }), 1);
}

#[test]
fn pointer_and_keys_route_through_input() {
    let (tp, mut session) = silent_session(&[1.0, 2.0]);
    assert_eq!(session.on_key("Enter"), Some(KeyCommand::Start));
    assert!(session.is_playing());

    at(&tp, 1.0);
    let right_click = PointerEvent {
        client_x: 10.0,
        client_y: 10.0,
        button: PointerButton::Secondary,
    };
    assert_eq!(session.on_pointer_down(&right_click), None);
    let v = session.on_pointer_down(&PointerEvent::primary(10.0, 20.0)).unwrap();
    assert_eq!(v.tier, Tier::Perfect);
    assert_eq!(
        session.effects().events.first(),
        Some(&EffectEvent::Burst { x: 10.0, y: 20.0 })
    );

    at(&tp, 2.0);
    assert_eq!(session.on_key("Space"), Some(KeyCommand::TapCenter));
    assert_eq!(session.snapshot().combo, 2);

    assert_eq!(session.on_key("KeyQ"), None);
    assert_eq!(session.on_key("Escape"), Some(KeyCommand::Stop));
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[test]
fn resize_moves_center_and_keeps_notes() {
    let (tp, mut session) = silent_session(&[1.0, 2.0]);
    session.start();
    at(&tp, 1.5);
    session.frame();
    let start = session.renderer().visible_start();

    session
        .resize(SurfaceRect::new(0.0, 0.0, 200.0, 400.0), 2.0)
        .unwrap();
    assert_eq!(session.renderer().visible_start(), start);
    assert!(session.gfx().commands().contains(&DrawCommand::Resize {
        width_px: 400,
        height_px: 800,
        dpr: 2.0
    }));

    at(&tp, 2.0);
    session.tap_center();
    assert!(
        session
            .effects()
            .events
            .contains(&EffectEvent::Burst { x: 100.0, y: 200.0 })
    );
    assert!(session.resize(SurfaceRect::sized(0.0, 10.0), 1.0).is_err());
}

#[test]
fn frames_draw_visible_notes() {
    let (tp, mut session) = silent_session(&[2.0]);
    session.start();
    at(&tp, 1.0);
    let report = session.frame();
    assert_eq!(report.stats.visible, 1);
    assert_eq!(session.gfx().last_frame()[0], DrawCommand::Clear);

    // A judged note leaves the screen right away.
    at(&tp, 2.0);
    session.tap_center();
    assert_eq!(session.frame().stats.visible, 0);
}

#[test]
fn resonance_effects_fire_once() {
    let times: Vec<f64> = (0..60).map(|i| 1.0 + i as f64 * 0.5).collect();
    let (tp, mut session) = silent_session(&times);
    session.start();
    for &t in &times {
        at(&tp, t);
        assert_eq!(session.tap_center().tier, Tier::Perfect);
        session.frame();
    }
    assert_eq!(session.snapshot().combo, 60);
    assert_eq!(count(&session, EffectEvent::Heartbeat), 1);
    assert_eq!(count(&session, EffectEvent::Divine), 1);
}

#[test]
fn zero_sized_surface_cannot_initialize() {
    let tp = Rc::new(MockTimeProvider::new());
    let mut config = AppConfig::default();
    config.render.width = 0.0;
    let audio = AudioManager::new(MockAudio::new(Rc::clone(&tp)), AudioConfig::default());
    let result = SessionController::new(
        chart(&[1.0]),
        Rc::clone(&tp),
        audio,
        RecordingEffects::new(),
        CommandRecorder::new(),
        &config,
    );
    let err = result.err().unwrap();
    assert!(err.to_string().contains("cannot initialize"));
}

#[test]
fn end_without_playing_reports_current_state() {
    let (_tp, mut session) = silent_session(&[1.0]);
    let summary = session.end();
    assert_eq!(summary.score, 0);
    assert_eq!(session.phase(), SessionPhase::Result);
}
