#![no_main]
use handpilot_config::{LandmarkRow, frames_from_rows};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: Vec<(u16, Option<u8>, Option<f32>, Option<f32>)>| {
    let rows: Vec<LandmarkRow> = input
        .into_iter()
        .map(|(frame, landmark, x, y)| LandmarkRow {
            frame: u64::from(frame),
            landmark: landmark.map(usize::from),
            x,
            y,
            z: None,
        })
        .collect();
    if let Ok(frames) = frames_from_rows(&rows) {
        // grouping never invents or drops landmark rows
        let points: usize = frames
            .iter()
            .map(|f| f.landmarks.as_ref().map_or(0, Vec::len))
            .sum();
        assert_eq!(points, rows.iter().filter(|r| r.landmark.is_some()).count());
    }
});
