//! Planar geometry on image-space keypoints.
//!
//! All coordinates are 2-D image pixels with `y` growing downward. Conversion
//! to metric units goes through a single [`Calibration`] constant, which is a
//! deliberate approximation: no depth reconstruction is attempted.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const INCHES_PER_METER: f64 = 39.37;

/// Default pixels-per-meter when the caller supplies no calibration
pub const DEFAULT_PIXELS_PER_METER: f64 = 100.0;

/// Pixel to metric conversion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pixels_per_meter: f64,
}

impl Calibration {
    pub fn new(pixels_per_meter: f64) -> Result<Self> {
        if !pixels_per_meter.is_finite() || pixels_per_meter <= 0.0 {
            return Err(Error::Calibration(format!(
                "pixels per meter must be positive, got {pixels_per_meter}"
            )));
        }
        Ok(Self { pixels_per_meter })
    }

    pub fn pixels_per_meter(&self) -> f64 {
        self.pixels_per_meter
    }

    pub fn px_to_meters(&self, px: f64) -> f64 {
        px / self.pixels_per_meter
    }

    pub fn px_to_inches(&self, px: f64) -> f64 {
        self.px_to_meters(px) * INCHES_PER_METER
    }

    pub fn inches_to_px(&self, inches: f64) -> f64 {
        inches / INCHES_PER_METER * self.pixels_per_meter
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            pixels_per_meter: DEFAULT_PIXELS_PER_METER,
        }
    }
}

/// Speed and heading of a point between two frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion2D {
    /// Meters per second
    pub speed: f64,
    /// Unit displacement direction, or zero when stationary
    pub direction: Vector2<f64>,
}

/// Angle at `vertex` formed by `p1` and `p3`, in degrees within [0, 180].
///
/// Returns `None` when either arm has zero length.
pub fn angle(p1: &Point2<f64>, vertex: &Point2<f64>, p3: &Point2<f64>) -> Option<f64> {
    angle_between(&(p1 - vertex), &(p3 - vertex))
}

/// Unsigned angle between two vectors in degrees
pub fn angle_between(v1: &Vector2<f64>, v2: &Vector2<f64>) -> Option<f64> {
    let norms = v1.norm() * v2.norm();
    if norms < 1e-10 {
        return None;
    }
    let cos = (v1.dot(v2) / norms).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Velocity of a point between two frames `dt_ms` apart.
///
/// Returns `None` when `dt_ms` is not positive.
pub fn velocity(
    prev: &Point2<f64>,
    curr: &Point2<f64>,
    dt_ms: f64,
    calibration: &Calibration,
) -> Option<Motion2D> {
    if dt_ms.is_nan() || dt_ms <= 0.0 {
        return None;
    }

    let displacement = curr - prev;
    let distance_px = displacement.norm();
    let speed = calibration.px_to_meters(distance_px) / (dt_ms / 1000.0);
    let direction = if distance_px > 0.0 {
        displacement / distance_px
    } else {
        Vector2::zeros()
    };

    Some(Motion2D { speed, direction })
}

/// Orientation of the line from `a` to `b` in degrees, (-180, 180]
pub fn line_orientation(a: &Point2<f64>, b: &Point2<f64>) -> Option<f64> {
    let v = b - a;
    if v.norm() < 1e-10 {
        return None;
    }
    Some(v.y.atan2(v.x).to_degrees())
}

/// Smallest absolute difference between two line orientations, in [0, 90].
///
/// Lines are undirected, so 170° and -10° describe the same line.
pub fn line_separation(a_deg: f64, b_deg: f64) -> f64 {
    let diff = (a_deg - b_deg).rem_euclid(180.0);
    diff.min(180.0 - diff)
}
