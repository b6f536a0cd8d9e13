// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the headless polling loop

use posegrid::TrackingError;
use posegrid::display::DisplayState;
use posegrid::headless::{self, HeadlessOptions, StopReason};
use posegrid::tracking::{
    OrbitParams, OrbitSource, PoseRecorder, PoseSample, ReplaySource, ReturnCode, SessionConfig,
    TrackingSample, TrackingSession, Translation,
};
use posegrid::{CanvasPosition, WorldFrame};
use std::sync::atomic::AtomicBool;
use std::time::Duration;

fn write_recording(path: &std::path::Path, points: &[(f64, f64)]) {
    let mut recorder = PoseRecorder::create(path).unwrap();
    for &(x, y) in points {
        let sample = TrackingSample {
            pose: PoseSample {
                translation: Translation::new(x, y, 0.0),
                ..Default::default()
            },
            imu: None,
        };
        recorder.record(&sample).unwrap();
    }
    recorder.finish().unwrap();
}

fn orbit_session() -> TrackingSession {
    let source = OrbitSource::new(OrbitParams::default(), Duration::from_millis(1));
    TrackingSession::open(Box::new(source), SessionConfig::default()).unwrap()
}

fn options(ticks: Option<u64>) -> HeadlessOptions {
    HeadlessOptions {
        interval: Duration::from_millis(1),
        ticks,
        ..Default::default()
    }
}

#[test]
fn test_stops_at_tick_limit() {
    let mut session = orbit_session();
    let mut display = DisplayState::new(WorldFrame::default(), 10);
    let mut out = Vec::new();

    let report = headless::run(
        &mut session,
        &mut display,
        &options(Some(3)),
        &AtomicBool::new(false),
        &mut out,
    )
    .unwrap();

    assert_eq!(report.stop, StopReason::TickLimit);
    assert_eq!(report.polled, 3);
    assert_eq!(report.recorded, None);
    assert!(session.is_open());

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Polling orbit every 1 ms"));
    assert!(text.contains("[3] "));
    assert!(!text.contains("[4] "));
}

#[test]
fn test_stop_flag_ends_polling() {
    let mut session = orbit_session();
    let mut display = DisplayState::new(WorldFrame::default(), 10);
    let mut out = Vec::new();

    let report = headless::run(
        &mut session,
        &mut display,
        &options(None),
        &AtomicBool::new(true),
        &mut out,
    )
    .unwrap();

    assert_eq!(report.stop, StopReason::Interrupted);
    assert_eq!(report.polled, 0);
    assert!(String::from_utf8(out).unwrap().contains("Stopping early..."));
}

#[test]
fn test_end_of_stream_still_writes_recording_and_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.jsonl");
    let record = dir.path().join("out").join("copy.jsonl");
    let snapshot = dir.path().join("last.png");
    write_recording(&input, &[(0.0, 0.0), (1.0, 0.0)]);
    std::fs::create_dir_all(record.parent().unwrap()).unwrap();

    let source = ReplaySource::from_path(&input);
    let mut session = TrackingSession::open(Box::new(source), SessionConfig::default()).unwrap();
    let mut display = DisplayState::new(WorldFrame::default(), 10);
    let run_options = HeadlessOptions {
        record: Some(record.clone()),
        snapshot: Some(snapshot.clone()),
        ..options(Some(10))
    };
    let mut out = Vec::new();

    let report = headless::run(
        &mut session,
        &mut display,
        &run_options,
        &AtomicBool::new(false),
        &mut out,
    )
    .unwrap();

    assert_eq!(
        report.stop,
        StopReason::Failed(TrackingError::GrabFailed(ReturnCode::EndOfStream))
    );
    assert_eq!(report.polled, 2);
    assert_eq!(report.recorded, Some(2));

    // The copy is complete and flushed
    let copied = std::fs::read_to_string(&record).unwrap();
    assert_eq!(copied.lines().count(), 2);

    // Snapshot shows the last sample
    assert_eq!(display.position(), Some(CanvasPosition::new(300, 200)));
    let png = image::open(&snapshot).unwrap().to_rgb8();
    assert_eq!(png.dimensions(), (500, 400));
    assert_eq!(*png.get_pixel(300, 200), image::Rgb([255, 0, 0]));

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Recorded 2 samples"));
    assert!(text.contains("Frame saved"));
}
