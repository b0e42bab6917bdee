//! # Spherical initial bearing
//!
//! Initial great-circle bearing between two points on a sphere, used as the qibla direction.
//!
//! Canonical formula:
//!
//! ```text
//! x = sin Δλ · cos φ₂
//! y = cos φ₁ · sin φ₂ − sin φ₁ · cos φ₂ · cos Δλ
//! θ = atan2(x, y)   normalized to [0°, 360°)
//! ```
//!
//! A second form is common in qibla literature, with `x = sin Δλ` and
//! `y = cos φ₁ · tan φ₂ − sin φ₁ · cos Δλ`. It is the canonical pair divided by `cos φ₂`, which
//! is positive for any target off the poles, so both give the same atan2. Only the canonical
//! form is implemented: it stays defined when the target is a pole.

use serde::Serialize;

use crate::constants::{Degree, Radian};
use crate::conversion::{deg_to_rad, normalize_deg_0_360, rad_to_deg};
use crate::geo_point::GeoPoint;

/// Below this magnitude both atan2 arguments are treated as zero (coincident points).
const COINCIDENT_EPS: f64 = 1e-15;

/// Intermediate quantities of the bearing formula, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BearingTrace {
    /// φ₁, latitude of the origin
    pub phi1: Radian,
    /// φ₂, latitude of the target
    pub phi2: Radian,
    /// Δλ = λ₂ − λ₁
    pub delta_lambda: Radian,
    pub x: f64,
    pub y: f64,
    /// atan2(x, y), in (−π, π]
    pub raw_rad: Radian,
    /// `raw_rad` in degrees, before normalization
    pub raw_deg: Degree,
    /// Final bearing in [0, 360)
    pub bearing_deg: Degree,
}

/// Compute the bearing together with its intermediate terms.
///
/// Coincident points give `x = y = 0`; the bearing is then the sentinel `0°`.
pub fn bearing_trace(from: &GeoPoint, to: &GeoPoint) -> BearingTrace {
    let phi1 = from.latitude_rad();
    let phi2 = to.latitude_rad();
    let delta_lambda = deg_to_rad(to.longitude() - from.longitude());

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    let (raw_rad, raw_deg, bearing_deg) = if x.abs() < COINCIDENT_EPS && y.abs() < COINCIDENT_EPS
    {
        (0.0, 0.0, 0.0)
    } else {
        let raw_rad = x.atan2(y);
        let raw_deg = rad_to_deg(raw_rad);
        (raw_rad, raw_deg, normalize_deg_0_360(raw_deg))
    };

    BearingTrace {
        phi1,
        phi2,
        delta_lambda,
        x,
        y,
        raw_rad,
        raw_deg,
        bearing_deg,
    }
}

/// Initial bearing from `from` to `to`, clockwise from true North, in `[0, 360)`.
///
/// ```
/// use qibla::bearing::initial_bearing;
/// use qibla::geo_point::{GeoPoint, KAABA};
///
/// let jakarta = GeoPoint::from_decimal(-6.166666666666667, 106.81666666666666).unwrap();
/// let qibla = initial_bearing(&jakarta, &KAABA);
/// assert!((qibla - 295.15).abs() < 0.1);
/// ```
pub fn initial_bearing(from: &GeoPoint, to: &GeoPoint) -> Degree {
    bearing_trace(from, to).bearing_deg
}
