use std::fs::File;
use std::io::Write;

use handpilot_config::{LandmarkRow, ReplayFrame, frames_from_rows, load_landmark_csv};
use rstest::rstest;
use tempfile::tempdir;

fn row(frame: u64, landmark: Option<usize>, x: f32, y: f32) -> LandmarkRow {
    LandmarkRow {
        frame,
        landmark,
        x: landmark.map(|_| x),
        y: landmark.map(|_| y),
        z: None,
    }
}

#[rstest]
fn groups_rows_into_frames() {
    let rows = vec![
        row(0, None, 0.0, 0.0),
        row(1, Some(0), 0.5, 0.9),
        row(1, Some(1), 0.55, 0.8),
        row(3, None, 0.0, 0.0),
    ];
    let frames = frames_from_rows(&rows).unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(
        frames[0],
        ReplayFrame {
            frame: 0,
            landmarks: None
        }
    );
    assert_eq!(
        frames[1].landmarks,
        Some(vec![[0.5, 0.9, 0.0], [0.55, 0.8, 0.0]])
    );
    assert_eq!(frames[2].frame, 3);
    assert!(frames[2].landmarks.is_none());
}

#[rstest]
fn rejects_decreasing_frames() {
    let rows = vec![row(2, None, 0.0, 0.0), row(1, None, 0.0, 0.0)];
    let err = frames_from_rows(&rows).expect_err("out of order");
    assert!(format!("{err}").contains("non-decreasing"));
}

#[rstest]
fn rejects_skipped_landmark_index() {
    let rows = vec![row(0, Some(0), 0.1, 0.1), row(0, Some(2), 0.2, 0.2)];
    let err = frames_from_rows(&rows).expect_err("gap in indices");
    assert!(format!("{err}").contains("expected landmark 1"));
}

#[rstest]
fn rejects_mixed_no_hand_and_landmarks() {
    let rows = vec![row(0, Some(0), 0.1, 0.1), row(0, None, 0.0, 0.0)];
    let err = frames_from_rows(&rows).expect_err("mixed frame");
    assert!(format!("{err}").contains("mixes"));
}

#[rstest]
fn loads_csv_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("replay.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "frame,landmark,x,y,z").unwrap();
    writeln!(f, "0,,,,").unwrap();
    writeln!(f, "1,0,0.50,0.90,0.0").unwrap();
    writeln!(f, "1,1,0.52,0.85,-0.02").unwrap();
    drop(f);

    let frames = load_landmark_csv(&path).unwrap();
    assert_eq!(frames.len(), 2);
    assert!(frames[0].landmarks.is_none());
    let pts = frames[1].landmarks.as_ref().unwrap();
    assert_eq!(pts.len(), 2);
    assert!((pts[1][2] + 0.02).abs() < 1e-6);
}

#[rstest]
fn rejects_bad_headers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "frame,idx,x,y,z").unwrap();
    writeln!(f, "0,0,0.1,0.1,0.0").unwrap();
    drop(f);

    let err = load_landmark_csv(&path).expect_err("bad header");
    assert!(format!("{err}").contains("must have headers"));
}

#[rstest]
fn reports_row_number_for_garbage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "frame,landmark,x,y,z").unwrap();
    writeln!(f, "0,0,0.1,0.1,0.0").unwrap();
    writeln!(f, "one,0,0.1,0.1,0.0").unwrap();
    drop(f);

    let err = load_landmark_csv(&path).expect_err("garbage row");
    assert!(format!("{err}").contains("invalid CSV row 3"));
}
