//! Code detection interface and geometry types.
//!
//! Detection and decoding are delegated to an external vision library; this
//! module fixes only the shape the scan loop depends on: one call returns all
//! regions found in a frame, and decoding is attempted independently per
//! region.

mod qr;

pub use qr::QrDecoder;

use crate::camera::Frame;

/// A 2D point in frame pixel coordinates.
///
/// Coordinates are signed: a corner of a partially visible code may be
/// extrapolated outside the frame bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Four corner points bounding one detected code region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quad {
    /// Corners in detection order (top-left first for QR codes).
    pub corners: [Point; 4],
}

impl Quad {
    pub fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }

    /// Iterate the four edges as corner pairs, wrapping around.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        (0..4).map(move |i| (self.corners[i], self.corners[(i + 1) % 4]))
    }
}

/// Per-frame code detection and decoding.
///
/// `detect_all` returns every code-like region found in one frame, in the
/// order the detector reports them. `decode` is then attempted per region;
/// `None` is not an error - it means a region looked code-like but did not
/// decode cleanly. Such regions still get an overlay but produce no record.
pub trait CodeDetector {
    /// Find all code regions in the frame. May be empty.
    fn detect_all(&mut self, frame: &Frame) -> Vec<Quad>;

    /// Attempt to decode the payload of one detected region.
    ///
    /// Returns `None` on decode failure. A returned payload is non-empty.
    fn decode(&mut self, frame: &Frame, quad: &Quad) -> Option<String>;
}
