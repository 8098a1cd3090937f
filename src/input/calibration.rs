//! Calibration tables mapping window height to control pixel positions
//!
//! The target's UI does not scale linearly with window height, so click
//! planners sample measured anchor tables instead of hard-coded formulas.
//! Anchor tables are configuration data; between anchors the value is
//! linearly interpolated, outside them the nearest end segment is continued.

use serde::{Deserialize, Serialize};

/// One measured anchor: at `window_height`, the control sits `pixels` from
/// its reference edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub window_height: i32,
    pub pixels: f64,
}

impl CalibrationPoint {
    pub const fn new(window_height: i32, pixels: f64) -> Self {
        CalibrationPoint {
            window_height,
            pixels,
        }
    }
}

/// A piecewise-linear calibration curve over window height.
///
/// Construction rejects empty tables everywhere, including deserialization,
/// so [`Calibration::sample`] always has an anchor to work with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CalibrationPoint>", into = "Vec<CalibrationPoint>")]
pub struct Calibration {
    points: Vec<CalibrationPoint>,
}

impl TryFrom<Vec<CalibrationPoint>> for Calibration {
    type Error = String;

    /// Anchor order is preserved as given; configuration validation rejects
    /// unsorted tables rather than silently reordering them.
    fn try_from(points: Vec<CalibrationPoint>) -> Result<Self, Self::Error> {
        if points.is_empty() {
            return Err("calibration requires at least one anchor".to_string());
        }
        Ok(Calibration { points })
    }
}

impl From<Calibration> for Vec<CalibrationPoint> {
    fn from(calibration: Calibration) -> Self {
        calibration.points
    }
}

impl Calibration {
    /// Builds a curve from anchors, sorting them by window height.
    /// At least one anchor is required.
    pub fn new(mut points: Vec<CalibrationPoint>) -> Self {
        assert!(!points.is_empty(), "calibration requires at least one anchor");
        points.sort_by_key(|point| point.window_height);
        Calibration { points }
    }

    pub fn anchors(&self) -> &[CalibrationPoint] {
        &self.points
    }

    /// Samples the curve at `window_height`.
    ///
    /// Exact anchor heights return the measured value; heights between
    /// anchors interpolate linearly; heights outside the table extrapolate
    /// along the nearest end segment (a single-anchor table is constant).
    pub fn sample(&self, window_height: i32) -> f64 {
        let points = &self.points;
        if points.len() == 1 {
            return points[0].pixels;
        }

        let h = window_height as f64;
        let segment = match points.iter().position(|p| p.window_height >= window_height) {
            Some(0) => (&points[0], &points[1]),
            Some(i) => (&points[i - 1], &points[i]),
            None => (&points[points.len() - 2], &points[points.len() - 1]),
        };
        let (lo, hi) = segment;
        if lo.window_height == hi.window_height {
            return lo.pixels;
        }
        let t = (h - lo.window_height as f64) / (hi.window_height - lo.window_height) as f64;
        lo.pixels + t * (hi.pixels - lo.pixels)
    }
}
