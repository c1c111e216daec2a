//! Geometry extraction: palm orientation and zone anchors from one landmark frame.
//!
//! The orientation is the direction from the middle-finger base to the wrist,
//! rotated so an upright hand reads 0°. Positive angles mean the fingers lean
//! toward the right of the (displayed) image.

use handpilot_traits::Landmark;

use crate::config::FrameCfg;

/// Number of landmarks in the hand model.
pub const LANDMARK_COUNT: usize = 21;

/// Fewest landmarks that still contain every index the pipeline reads.
pub const MIN_LANDMARKS: usize = LandmarkIdx::RingFingerMcp as usize + 1;

/// Landmark indices of the 21-point hand model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum LandmarkIdx {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// A validated set of hand landmarks for one video frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    points: Vec<Landmark>,
}

impl LandmarkFrame {
    /// Returns `None` ("no hand") when the set is too short or any landmark the
    /// pipeline reads is not finite.
    pub fn new(points: Vec<Landmark>) -> Option<Self> {
        if points.len() < MIN_LANDMARKS {
            return None;
        }
        let required = [
            LandmarkIdx::Wrist,
            LandmarkIdx::MiddleFingerMcp,
            LandmarkIdx::RingFingerMcp,
        ];
        let finite = required.iter().all(|&i| {
            let p = points[i as usize];
            p.x.is_finite() && p.y.is_finite()
        });
        finite.then_some(Self { points })
    }

    pub fn from_slice(points: &[Landmark]) -> Option<Self> {
        Self::new(points.to_vec())
    }

    /// Horizontal flip, as if the camera image had been mirrored.
    pub fn mirrored(mut self) -> Self {
        for p in &mut self.points {
            p.x = 1.0 - p.x;
        }
        self
    }

    #[inline]
    pub fn get(&self, idx: LandmarkIdx) -> Option<Landmark> {
        self.points.get(idx as usize).copied()
    }

    // Only valid for indices below MIN_LANDMARKS, which `new` guarantees.
    #[inline]
    fn required(&self, idx: LandmarkIdx) -> Landmark {
        self.points[idx as usize]
    }
}

/// Integer pixel position in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Scale a normalized landmark to pixels, truncating toward zero.
    pub fn from_normalized(lm: Landmark, frame: &FrameCfg) -> Self {
        Self {
            x: (lm.x * frame.width as f32) as i32,
            y: (lm.y * frame.height as f32) as i32,
        }
    }
}

/// Index, middle and ring fingertip positions relative to the wrist
/// (normalized units, including depth).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingertipOffsets {
    pub index: [f32; 3],
    pub middle: [f32; 3],
    pub ring: [f32; 3],
}

/// Everything the classifier needs from one landmark frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandGeometry {
    /// Palm orientation in degrees, (-180, 180].
    pub raw_angle: f32,
    pub wrist: PixelPoint,
    pub middle_base: PixelPoint,
    pub ring_base: PixelPoint,
    /// `None` when the detector reported fewer than 21 points.
    pub fingertips: Option<FingertipOffsets>,
}

/// Wrap any finite angle into (-180, 180]. Non-finite input maps to 0.
#[inline]
pub fn normalize_angle(deg: f32) -> f32 {
    if !deg.is_finite() {
        return 0.0;
    }
    let a = deg % 360.0;
    if a <= -180.0 {
        a + 360.0
    } else if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

/// Orientation of the segment middle-base → wrist, 0° for an upright hand.
pub fn orientation_deg(wrist: PixelPoint, middle_base: PixelPoint) -> f32 {
    // widened: saturated pixels must not overflow the difference
    let dy = (i64::from(wrist.y) - i64::from(middle_base.y)) as f32;
    let dx = (i64::from(wrist.x) - i64::from(middle_base.x)) as f32;
    normalize_angle(dy.atan2(dx).to_degrees() - 90.0)
}

fn offset(tip: Landmark, wrist: Landmark) -> [f32; 3] {
    [tip.x - wrist.x, tip.y - wrist.y, tip.z - wrist.z]
}

pub fn extract(frame: &LandmarkFrame, dims: &FrameCfg) -> HandGeometry {
    let wrist_lm = frame.required(LandmarkIdx::Wrist);
    let wrist = PixelPoint::from_normalized(wrist_lm, dims);
    let middle_base = PixelPoint::from_normalized(frame.required(LandmarkIdx::MiddleFingerMcp), dims);
    let ring_base = PixelPoint::from_normalized(frame.required(LandmarkIdx::RingFingerMcp), dims);

    let fingertips = match (
        frame.get(LandmarkIdx::IndexFingerTip),
        frame.get(LandmarkIdx::MiddleFingerTip),
        frame.get(LandmarkIdx::RingFingerTip),
    ) {
        (Some(i), Some(m), Some(r)) => Some(FingertipOffsets {
            index: offset(i, wrist_lm),
            middle: offset(m, wrist_lm),
            ring: offset(r, wrist_lm),
        }),
        _ => None,
    };

    HandGeometry {
        raw_angle: orientation_deg(wrist, middle_base),
        wrist,
        middle_base,
        ring_base,
        fingertips,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> FrameCfg {
        FrameCfg {
            width: 1280,
            height: 720,
            mirror: false,
        }
    }

    fn frame_with(wrist: (f32, f32), middle: (f32, f32), ring: (f32, f32)) -> LandmarkFrame {
        let mut pts = vec![Landmark::default(); LANDMARK_COUNT];
        pts[0] = Landmark::new(wrist.0, wrist.1, 0.0);
        pts[9] = Landmark::new(middle.0, middle.1, 0.0);
        pts[13] = Landmark::new(ring.0, ring.1, 0.0);
        LandmarkFrame::new(pts).expect("valid frame")
    }

    #[test]
    fn upright_hand_is_zero_degrees() {
        let g = extract(&frame_with((0.5, 0.8), (0.5, 0.5), (0.55, 0.5)), &dims());
        assert!(g.raw_angle.abs() < 1e-4, "angle {}", g.raw_angle);
        assert_eq!(g.wrist, PixelPoint::new(640, 576));
        assert_eq!(g.middle_base, PixelPoint::new(640, 360));
    }

    #[test]
    fn leaning_right_is_positive() {
        // middle base up and to the right of the wrist, 45° in pixel space
        let w = PixelPoint::new(600, 500);
        let m = PixelPoint::new(700, 400);
        assert!((orientation_deg(w, m) - 45.0).abs() < 1e-3);
        assert!((orientation_deg(m, PixelPoint::new(800, 500)) + 45.0).abs() < 1e-3);
    }

    #[test]
    fn upside_down_hand_is_180() {
        let w = PixelPoint::new(640, 100);
        let m = PixelPoint::new(640, 300);
        assert!((orientation_deg(w, m) - 180.0).abs() < 1e-3);
    }

    #[test]
    fn short_or_non_finite_sets_are_not_a_hand() {
        assert!(LandmarkFrame::new(vec![Landmark::default(); MIN_LANDMARKS - 1]).is_none());
        assert!(LandmarkFrame::new(vec![Landmark::default(); MIN_LANDMARKS]).is_some());
        let mut pts = vec![Landmark::default(); LANDMARK_COUNT];
        pts[9].x = f32::NAN;
        assert!(LandmarkFrame::new(pts).is_none());
    }

    #[test]
    fn fingertips_need_the_full_hand() {
        let short = LandmarkFrame::new(vec![Landmark::default(); MIN_LANDMARKS]).unwrap();
        assert!(extract(&short, &dims()).fingertips.is_none());

        let mut pts = vec![Landmark::default(); LANDMARK_COUNT];
        pts[0] = Landmark::new(0.5, 0.9, 0.0);
        pts[8] = Landmark::new(0.4, 0.4, -0.1);
        let tips = extract(&LandmarkFrame::new(pts).unwrap(), &dims())
            .fingertips
            .expect("offsets");
        assert!((tips.index[0] + 0.1).abs() < 1e-6);
        assert!((tips.index[1] + 0.5).abs() < 1e-6);
        assert!((tips.index[2] + 0.1).abs() < 1e-6);
    }

    #[test]
    fn mirroring_flips_the_turn_direction() {
        let f = frame_with((0.45, 0.8), (0.55, 0.5), (0.6, 0.5));
        let a = extract(&f, &dims()).raw_angle;
        let b = extract(&f.clone().mirrored(), &dims()).raw_angle;
        assert!(a > 0.0 && b < 0.0);
        assert!((a + b).abs() < 0.5);
    }

    #[test]
    fn far_out_of_frame_anchors_do_not_overflow() {
        let w = PixelPoint::new(i32::MAX, 0);
        let m = PixelPoint::new(i32::MIN, 0);
        assert!((orientation_deg(w, m) + 90.0).abs() < 1e-3);

        let f = frame_with((1e7, 0.5), (-1e7, 0.5), (0.5, 0.5));
        let g = extract(&f, &dims());
        assert_eq!(g.wrist.x, i32::MAX);
        assert_eq!(g.middle_base.x, i32::MIN);
        assert!(g.raw_angle.is_finite());
    }

    #[test]
    fn normalize_edges() {
        assert_eq!(normalize_angle(180.0), 180.0);
        assert_eq!(normalize_angle(-180.0), 180.0);
        assert_eq!(normalize_angle(-270.0), 90.0);
        assert_eq!(normalize_angle(540.0), 180.0);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }
}
