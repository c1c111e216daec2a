pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// One detected hand landmark.
///
/// `x` and `y` are normalized to the image (0.0..=1.0), `z` is depth relative
/// to the wrist as reported by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// What a landmark source saw for one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// Landmarks of the first detected hand, in detector index order.
    Hand(Vec<Landmark>),
    /// A frame was captured but no hand was found in it.
    NoHand,
    /// The source has no more frames (end of a replay, closed stream).
    Closed,
}

/// Produces one observation per video frame (camera + hand detector).
///
/// An `Err` means the capture itself failed; the control loop treats that as fatal.
pub trait LandmarkSource {
    fn next_frame(&mut self) -> Result<Observation, Box<dyn std::error::Error + Send + Sync>>;
}

/// Delivers a single motion command to the vehicle.
///
/// `code` is the one-character wire code (`f`, `b`, `l`, `r`, `s`).
pub trait Transport {
    fn send(
        &mut self,
        code: char,
        speed: u32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Where commands go, for log context.
    fn target(&self) -> String {
        String::from("<unnamed transport>")
    }
}

impl<T: LandmarkSource + ?Sized> LandmarkSource for Box<T> {
    fn next_frame(&mut self) -> Result<Observation, Box<dyn std::error::Error + Send + Sync>> {
        (**self).next_frame()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(
        &mut self,
        code: char,
        speed: u32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).send(code, speed)
    }

    fn target(&self) -> String {
        (**self).target()
    }
}
