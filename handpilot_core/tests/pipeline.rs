use std::sync::atomic::AtomicBool;

use handpilot_core::debounce::Hold;
use handpilot_core::mocks::{
    RecordingTransport, ScriptedSource, TransportLog, tilted_hand, upright_hand,
};
use handpilot_core::{
    Command, FrameCfg, FrameReport, FrameStatus, GestureCfg, GesturePilot, PilotCfg, PilotError,
    RunEnd, RunParams, Turn, build_pilot, run,
};
use handpilot_traits::{Landmark, ManualClock, Observation};
use rstest::rstest;

type TestPilot = GesturePilot<ScriptedSource, RecordingTransport>;

fn frame() -> FrameCfg {
    FrameCfg::default()
}

fn forward() -> Observation {
    Observation::Hand(upright_hand(&frame(), 640, 100))
}

fn backward() -> Observation {
    Observation::Hand(upright_hand(&frame(), 640, 560))
}

fn tilted(deg: f32) -> Observation {
    Observation::Hand(tilted_hand(&frame(), deg))
}

fn pilot_with(cfg: PilotCfg, frames: Vec<Observation>) -> (TestPilot, TransportLog, ManualClock) {
    let clock = ManualClock::new();
    let transport = RecordingTransport::new();
    let log = transport.log();
    let pilot = build_pilot(
        ScriptedSource::new(frames),
        transport,
        cfg,
        Some(Box::new(clock.clone())),
    )
    .expect("pilot build");
    (pilot, log, clock)
}

fn pilot(frames: Vec<Observation>) -> (TestPilot, TransportLog, ManualClock) {
    pilot_with(PilotCfg::default(), frames)
}

fn step(p: &mut TestPilot) -> FrameReport {
    match p.step().expect("step") {
        FrameStatus::Processed(r) => r,
        FrameStatus::Closed => panic!("source closed early"),
    }
}

#[test]
fn debounced_sequence_dispatches_forward_then_left() {
    let frames = vec![
        Observation::NoHand,
        forward(),
        forward(),
        forward(),
        tilted(-60.0),
        tilted(-60.0),
    ];
    let (mut p, log, clock) = pilot(frames);
    let mut delivered = Vec::new();
    for _ in 0..6 {
        clock.advance_ms(100);
        if let Some(c) = step(&mut p).delivered() {
            delivered.push(c);
        }
    }
    assert_eq!(delivered, vec![Command::Forward, Command::Left]);
    assert_eq!(log.sent(), vec![('f', 160), ('l', 160)]);

    assert!(p.shutdown());
    assert_eq!(log.codes(), "fls");
    assert_eq!(log.sent().last(), Some(&('s', 0)));
}

#[test]
fn session_never_opens_with_a_stop() {
    let (mut p, log, clock) = pilot(vec![Observation::NoHand; 5]);
    for _ in 0..5 {
        clock.advance_ms(100);
        let r = step(&mut p);
        assert_eq!(r.raw_command, Command::Stop);
        assert_eq!(r.hold, Some(Hold::Unchanged));
    }
    assert!(log.sent().is_empty());
}

#[test]
fn first_motion_waits_for_the_cooldown() {
    let (mut p, log, clock) = pilot(vec![forward(), forward()]);
    clock.advance_ms(10);
    let r = step(&mut p);
    assert!(matches!(r.hold, Some(Hold::Cooldown { .. })));
    clock.advance_ms(40);
    assert_eq!(step(&mut p).delivered(), Some(Command::Forward));
    assert_eq!(log.codes(), "f");
}

#[test]
fn refused_command_is_retried_on_a_later_frame() {
    let frames = vec![tilted(-25.0), backward(), backward(), backward()];
    let (mut p, log, clock) = pilot(frames);

    // t=100: left delivered
    clock.advance_ms(100);
    let r = step(&mut p);
    assert_eq!(r.raw_command, Command::Left);
    assert_eq!(r.turn, Some(Turn::Left));
    assert_eq!(r.delivered(), Some(Command::Left));

    // t=120: majority changes but the cooldown holds it
    clock.advance_ms(20);
    let r = step(&mut p);
    assert_eq!(r.raw_command, Command::Backward);
    assert_eq!(r.majority, Command::Backward);
    assert!(matches!(r.hold, Some(Hold::Cooldown { .. })));
    assert!(r.dispatch.is_none());

    // t=160: attempt fails, nothing advances
    clock.advance_ms(40);
    log.fail_next(1);
    let r = step(&mut p);
    let d = r.dispatch.expect("attempted");
    assert_eq!(d.command, Command::Backward);
    assert!(!d.delivered);
    assert_eq!(r.active, Command::Left);
    assert_eq!(p.last_emitted(), Command::Left);

    // t=170: retried and accepted
    clock.advance_ms(10);
    let r = step(&mut p);
    assert_eq!(r.delivered(), Some(Command::Backward));
    assert_eq!(r.active, Command::Backward);
    assert_eq!(log.codes(), "lb");
    assert_eq!(p.dispatch_stats().failed, 1);
    assert_eq!(p.dispatch_stats().delivered, 2);
}

#[test]
fn no_hand_votes_stop_and_freezes_the_angle() {
    let (mut p, _log, clock) = pilot(vec![
        tilted(30.0),
        Observation::NoHand,
        Observation::NoHand,
    ]);
    clock.advance_ms(100);
    let first = step(&mut p);
    let angle = first.hand.expect("hand").smoothed_angle;
    for _ in 0..2 {
        clock.advance_ms(100);
        let r = step(&mut p);
        assert!(r.hand.is_none());
        assert_eq!(r.raw_command, Command::Stop);
        assert_eq!(p.smoothed_angle(), Some(angle));
    }
    assert_eq!(p.state().angles().len(), 1);
}

#[rstest]
#[case::too_few_points(vec![Landmark::new(0.5, 0.5, 0.0); 5])]
#[case::nan_anchor({
    let mut pts = upright_hand(&FrameCfg::default(), 640, 100);
    pts[9].y = f32::NAN;
    pts
})]
fn malformed_landmarks_count_as_no_hand(#[case] pts: Vec<Landmark>) {
    let (mut p, _log, _clock) = pilot(vec![]);
    let r = p.step_landmarks(Some(pts.as_slice())).expect("step");
    assert!(r.hand.is_none());
    assert_eq!(r.raw_command, Command::Stop);
    assert_eq!(p.hand_frames(), 0);
}

#[test]
fn far_out_of_frame_landmarks_do_not_abort_the_loop() {
    let (mut p, log, clock) = pilot(vec![]);
    let mut pts = upright_hand(&frame(), 640, 100);
    pts[0].x = 1e7;
    pts[9].x = -1e7;
    for _ in 0..3 {
        clock.advance_ms(100);
        let r = p.step_landmarks(Some(pts.as_slice())).expect("step");
        assert!(r.hand.is_some_and(|h| h.raw_angle.is_finite()));
        // anchors outside both zones, tilt past the deadzone
        assert_ne!(r.raw_command, Command::Forward);
    }
    assert!(log.codes().chars().all(|c| c != 'f'));
}

#[test]
fn nothing_is_sent_after_the_final_stop() {
    let (mut p, log, clock) = pilot(vec![]);
    assert!(p.shutdown());
    let pts = upright_hand(&frame(), 640, 100);
    for _ in 0..3 {
        clock.advance_ms(100);
        let err = p.step_landmarks(Some(pts.as_slice())).expect_err("shut down");
        assert!(matches!(
            err.downcast_ref::<PilotError>(),
            Some(PilotError::State(_))
        ));
    }
    assert_eq!(log.sent(), vec![('s', 0)]);
}

#[rstest]
#[case(false, Command::Right)]
#[case(true, Command::Left)]
fn mirroring_swaps_turn_direction(#[case] mirror: bool, #[case] expected: Command) {
    let cfg = PilotCfg {
        frame: FrameCfg {
            mirror,
            ..FrameCfg::default()
        },
        ..PilotCfg::default()
    };
    let (mut p, _log, clock) = pilot_with(cfg, vec![tilted(35.0)]);
    clock.advance_ms(100);
    assert_eq!(step(&mut p).raw_command, expected);
}

#[test]
fn wider_deadzone_keeps_small_tilts_neutral() {
    let cfg = PilotCfg {
        gesture: GestureCfg {
            deadzone_deg: 45.0,
            ..GestureCfg::default()
        },
        ..PilotCfg::default()
    };
    let (mut p, _log, clock) = pilot_with(cfg, vec![tilted(35.0)]);
    clock.advance_ms(100);
    let r = step(&mut p);
    assert_eq!(r.raw_command, Command::Stop);
    assert_eq!(r.turn, None);
}

#[test]
fn stop_is_sent_once_at_speed_zero() {
    let (mut p, log, _clock) = pilot(vec![]);
    assert!(p.shutdown());
    assert!(!p.shutdown());
    assert!(p.is_shut_down());
    drop(p);
    assert_eq!(log.sent(), vec![('s', 0)]);
}

#[test]
fn dropping_a_running_pilot_stops_the_vehicle() {
    let (mut p, log, clock) = pilot(vec![forward()]);
    clock.advance_ms(100);
    step(&mut p);
    drop(p);
    assert_eq!(log.sent(), vec![('f', 160), ('s', 0)]);
}

#[test]
fn failed_final_stop_is_not_an_error() {
    let (mut p, log, _clock) = pilot(vec![]);
    log.fail_always(true);
    assert!(!p.shutdown());
    drop(p);
    assert!(log.sent().is_empty());
}

#[test]
fn capture_failure_is_typed_and_still_stops() {
    let clock = ManualClock::new();
    let transport = RecordingTransport::new();
    let log = transport.log();
    let src = ScriptedSource::new([forward()]).then_fail("camera unplugged");
    let mut p = build_pilot(
        src,
        transport,
        PilotCfg::default(),
        Some(Box::new(clock.clone())),
    )
    .expect("pilot build");
    clock.advance_ms(100);

    let err = run(&mut p, RunParams::default(), &AtomicBool::new(false), |_| {})
        .expect_err("capture should fail");
    match err.downcast_ref::<PilotError>() {
        Some(PilotError::Capture(msg)) => assert!(msg.contains("unplugged")),
        other => panic!("expected Capture, got {other:?}"),
    }
    assert_eq!(log.codes(), "fs");
    assert!(p.step().is_err(), "no steps after shutdown");
}

#[test]
fn run_honours_frame_limit_and_interrupt() {
    let (mut p, log, _clock) = pilot(vec![Observation::NoHand; 10]);
    let params = RunParams {
        max_frames: Some(3),
        frame_period: None,
    };
    let mut seen = 0;
    let s = run(&mut p, params, &AtomicBool::new(false), |_| seen += 1).expect("run");
    assert_eq!(s.end, RunEnd::FrameLimit);
    assert_eq!((s.frames, seen), (3, 3));
    assert!(s.final_stop_delivered);
    assert_eq!(log.codes(), "s");

    let (mut p, _log, _clock) = pilot(vec![Observation::NoHand; 10]);
    let s = run(&mut p, RunParams::default(), &AtomicBool::new(true), |_| {}).expect("run");
    assert_eq!(s.end, RunEnd::Interrupted);
    assert_eq!(s.frames, 0);
}

#[test]
fn replay_end_closes_the_run() {
    let (mut p, _log, clock) = pilot(vec![forward(), forward()]);
    clock.advance_ms(100);
    let s = run(&mut p, RunParams::default(), &AtomicBool::new(false), |_| {}).expect("run");
    assert_eq!(s.end, RunEnd::SourceClosed);
    assert_eq!(s.hand_frames, 2);
    assert_eq!(s.last_command, Command::Forward);
}
