//! End-to-end pipeline tests
//!
//! JSON frames through the reader, engine and dispatcher into a recording
//! sink, plus the cross-frame behaviors of the control state machine.

use std::sync::Arc;
use std::time::Duration;

use air_gesture::control::MouseButton;
use air_gesture::dispatch::{Command, Dispatcher, LevelSink, RecordingSink, SimulatedLevels};
use air_gesture::ingest::FrameReader;
use air_gesture::utils::{metric_names, MetricsCollector};
use air_gesture::{
    classify, Config, Frame, GestureEngine, GestureLabel, HandObservation, Handedness,
    LandmarkRole as R, LandmarkSet, Point3, ThresholdProfile,
};
use proptest::prelude::*;

// ── Fixture poses ──────────────────────────────────────────

/// Relaxed hand: every finger tip level with its PIP, thumb well clear of
/// the tips, index/middle gap between the together and apart thresholds.
fn neutral() -> Vec<Point3> {
    let layout: [(f64, f64); 21] = [
        (0.50, 0.90),
        (0.40, 0.85),
        (0.35, 0.80),
        (0.30, 0.75),
        (0.25, 0.75),
        (0.45, 0.70),
        (0.45, 0.60),
        (0.45, 0.60),
        (0.45, 0.60),
        (0.51, 0.70),
        (0.51, 0.60),
        (0.51, 0.60),
        (0.51, 0.60),
        (0.57, 0.70),
        (0.57, 0.60),
        (0.57, 0.60),
        (0.57, 0.60),
        (0.63, 0.72),
        (0.63, 0.62),
        (0.63, 0.62),
        (0.63, 0.62),
    ];
    layout
        .iter()
        .map(|&(x, y)| Point3::new(x, y, 0.0))
        .collect()
}

fn set_tip(points: &mut [Point3], pip: R, tip: R, dy: f64) {
    points[tip.index()].y = points[pip.index()].y + dy;
}

/// `raised[i]` raises finger i (index, middle, ring, pinky); others fold
fn fingers(raised: [bool; 4]) -> Vec<Point3> {
    let mut points = neutral();
    let joints = [
        (R::IndexFingerPip, R::IndexFingerTip),
        (R::MiddleFingerPip, R::MiddleFingerTip),
        (R::RingFingerPip, R::RingFingerTip),
        (R::PinkyPip, R::PinkyTip),
    ];
    for ((pip, tip), up) in joints.into_iter().zip(raised) {
        set_tip(&mut points, pip, tip, if up { -0.12 } else { 0.12 });
    }
    points
}

fn spread(mut points: Vec<Point3>) -> Vec<Point3> {
    points[R::MiddleFingerTip.index()].x = points[R::IndexFingerTip.index()].x + 0.2;
    points
}

fn pinch(mut points: Vec<Point3>) -> Vec<Point3> {
    let tip = points[R::IndexFingerTip.index()];
    points[R::ThumbTip.index()] = Point3::new(tip.x - 0.01, tip.y, 0.0);
    points
}

fn translate(points: Vec<Point3>, dx: f64, dy: f64) -> Vec<Point3> {
    points
        .into_iter()
        .map(|p| Point3::new(p.x + dx, p.y + dy, p.z))
        .collect()
}

fn right(points: Vec<Point3>) -> HandObservation {
    HandObservation::new(Handedness::Right, LandmarkSet::new(points))
}

fn left(points: Vec<Point3>) -> HandObservation {
    HandObservation::new(Handedness::Left, LandmarkSet::new(points))
}

fn every_frame_config() -> Config {
    let mut config = Config::default();
    config.ingest.process_every_nth = 1;
    config
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn count(commands: &[Command], wanted: Command) -> usize {
    commands.iter().filter(|c| **c == wanted).count()
}

// ── Classification ─────────────────────────────────────────

#[test]
fn test_index_only_is_index_up() {
    let hand = LandmarkSet::new(fingers([true, false, false, false]));
    assert_eq!(
        classify(&hand, &ThresholdProfile::standard()),
        Some(GestureLabel::IndexUp)
    );
}

#[test]
fn test_index_up_outranks_pinch() {
    let hand = LandmarkSet::new(pinch(fingers([true, false, false, false])));
    assert_eq!(
        classify(&hand, &ThresholdProfile::standard()),
        Some(GestureLabel::IndexUp)
    );
}

#[test]
fn test_fist_is_five_fingers_down() {
    let hand = LandmarkSet::new(fingers([false; 4]));
    assert_eq!(
        classify(&hand, &ThresholdProfile::standard()),
        Some(GestureLabel::FiveFingersDown)
    );
}

#[test]
fn test_relaxed_hand_has_no_label() {
    let hand = LandmarkSet::new(neutral());
    assert_eq!(classify(&hand, &ThresholdProfile::standard()), None);
}

// ── Cross-frame control ────────────────────────────────────

#[test]
fn test_one_click_per_apart_entry() {
    let mut engine = GestureEngine::new(&every_frame_config()).unwrap();
    let frames = [
        spread(neutral()),
        pinch(spread(neutral())),
        pinch(spread(neutral())),
        neutral(),
        spread(neutral()),
        pinch(spread(neutral())),
    ];

    let clicks: Vec<usize> = frames
        .into_iter()
        .enumerate()
        .map(|(i, points)| {
            let report = engine.process_frame(&Frame::new(vec![right(points)]), ms(i as u64 * 33));
            count(
                &report.commands,
                Command::Click {
                    button: MouseButton::Left,
                },
            )
        })
        .collect();

    assert_eq!(clicks, vec![0, 1, 0, 0, 0, 1]);
}

#[test]
fn test_cursor_converges_on_still_hand() {
    let mut config = every_frame_config();
    config.screen.width = 1000;
    config.screen.height = 500;
    let mut engine = GestureEngine::new(&config).unwrap();

    let mut points = fingers([true, true, false, false]);
    points[R::IndexFingerTip.index()] = Point3::new(0.25, 0.25, 0.0);
    points[R::MiddleFingerTip.index()] = Point3::new(0.31, 0.25, 0.0);

    let mut last = None;
    for i in 0..50 {
        let report = engine.process_frame(&Frame::new(vec![right(points.clone())]), ms(i * 33));
        if let Some(Command::MoveCursor { x, y }) = report.commands.first() {
            last = Some((*x, *y));
        }
    }
    assert_eq!(last, Some((250, 125)));
}

#[test]
fn test_task_view_cooldown() {
    let mut engine = GestureEngine::new(&every_frame_config()).unwrap();
    let palm = Frame::new(vec![left(fingers([true; 4]))]);

    let triggered: Vec<usize> = [0, 500, 1999, 2001, 2500, 4002]
        .into_iter()
        .map(|t| count(&engine.process_frame(&palm, ms(t)).commands, Command::TriggerTaskView))
        .collect();

    assert_eq!(triggered, vec![1, 0, 0, 1, 0, 1]);
}

#[test]
fn test_left_index_up_raises_volume() {
    let mut engine = GestureEngine::new(&every_frame_config()).unwrap();
    let report = engine.process_frame(
        &Frame::new(vec![left(fingers([true, false, false, false]))]),
        ms(0),
    );
    assert_eq!(report.commands, vec![Command::AdjustVolume { delta: 0.05 }]);
}

#[test]
fn test_right_pinky_raises_brightness() {
    let mut engine = GestureEngine::new(&every_frame_config()).unwrap();
    let mut points = neutral();
    set_tip(&mut points, R::PinkyPip, R::PinkyTip, -0.12);
    let report = engine.process_frame(&Frame::new(vec![right(points)]), ms(0));
    assert_eq!(report.commands, vec![Command::AdjustBrightness { delta: 10 }]);
}

#[test]
fn test_namaste_stops_processing() {
    let mut engine = GestureEngine::new(&every_frame_config()).unwrap();
    let close = Frame::new(vec![
        right(translate(neutral(), -0.02, 0.0)),
        left(translate(neutral(), 0.02, 0.0)),
    ]);

    let report = engine.process_frame(&close, ms(0));
    assert!(report.exit_requested);
    assert_eq!(count(&report.commands, Command::RequestExit), 1);

    let after = engine.process_frame(&close, ms(33));
    assert!(!after.processed);
    assert!(after.commands.is_empty());
}

#[test]
fn test_hands_far_apart_do_not_exit() {
    let mut engine = GestureEngine::new(&every_frame_config()).unwrap();
    let frame = Frame::new(vec![
        right(translate(neutral(), -0.2, 0.0)),
        left(translate(neutral(), 0.2, 0.0)),
    ]);
    assert!(!engine.process_frame(&frame, ms(0)).exit_requested);
}

#[test]
fn test_default_gate_processes_even_frames() {
    let mut engine = GestureEngine::new(&Config::default()).unwrap();
    let index_up = Frame::new(vec![left(fingers([true, false, false, false]))]);

    let emitted: Vec<bool> = (0..6)
        .map(|i| !engine.process_frame(&index_up, ms(i * 33)).commands.is_empty())
        .collect();
    assert_eq!(emitted, vec![false, true, false, true, false, true]);
}

// ── Ingestion to delivery ──────────────────────────────────

#[tokio::test]
async fn test_json_frames_to_sink() {
    let frames = vec![
        Frame::new(vec![right(spread(neutral()))]).with_timestamp_ms(0),
        Frame::new(vec![right(pinch(spread(neutral())))]).with_timestamp_ms(33),
        Frame::new(vec![left(fingers([true; 4]))]).with_timestamp_ms(66),
    ];
    let mut input: Vec<String> = frames
        .iter()
        .map(|f| serde_json::to_string(f).unwrap())
        .collect();
    input.insert(1, "{ not a frame".to_string());
    let input = input.join("\n");

    let metrics = Arc::new(MetricsCollector::new());
    let mut engine = GestureEngine::new(&every_frame_config())
        .unwrap()
        .with_metrics(metrics.clone());
    let recorder = RecordingSink::new();
    let sink = LevelSink::new(SimulatedLevels::new(0.5, 50), recorder.clone())
        .with_metrics(metrics.clone());
    let mut dispatcher = Dispatcher::new(Box::new(sink), metrics.clone());
    let mut reader = FrameReader::new(input.as_bytes()).with_metrics(metrics.clone());

    while let Some(frame) = reader.next_frame().await.unwrap() {
        let now = ms(frame.timestamp_ms.unwrap_or_default());
        let report = engine.process_frame(&frame, now);
        dispatcher.dispatch(&report.commands);
    }
    dispatcher.flush().unwrap();

    assert_eq!(
        recorder.commands(),
        vec![
            Command::Click {
                button: MouseButton::Left
            },
            Command::TriggerTaskView,
            Command::AdjustVolume { delta: -0.05 },
        ]
    );
    assert_eq!(metrics.counter(metric_names::FRAMES_MALFORMED), 1);
    assert_eq!(metrics.counter(metric_names::FRAMES_PROCESSED), 3);
    assert_eq!(metrics.get_gauge(metric_names::VOLUME_LEVEL), Some(0.45));
}

proptest! {
    #[test]
    fn prop_cursor_stays_on_screen(
        moves in prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1..20)
    ) {
        let mut config = every_frame_config();
        config.screen.width = 800;
        config.screen.height = 600;
        let mut engine = GestureEngine::new(&config).unwrap();

        for (i, (dx, dy)) in moves.into_iter().enumerate() {
            let points = translate(fingers([true, true, false, false]), dx, dy);
            let report = engine.process_frame(&Frame::new(vec![right(points)]), ms(i as u64 * 33));
            let moved = report.commands.iter().find_map(|c| match c {
                Command::MoveCursor { x, y } => Some((*x, *y)),
                _ => None,
            });
            let (x, y) = moved.expect("two fingers up always moves the cursor");
            prop_assert!(x < 800);
            prop_assert!(y < 600);
        }
    }

    #[test]
    fn prop_labels_are_deterministic(dy in -0.3f64..0.3) {
        let hand = LandmarkSet::new(translate(fingers([true, true, false, false]), 0.0, dy));
        let profile = ThresholdProfile::standard();
        prop_assert_eq!(classify(&hand, &profile), classify(&hand, &profile));
    }
}
