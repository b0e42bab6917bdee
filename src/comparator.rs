//! # Bearing comparison
//!
//! Relates the qibla bearing to the Sun: the shadow of a vertical stick points away from the
//! Sun, so when the Sun stands on the qibla great circle (its azimuth equals the qibla bearing)
//! every shadow points exactly away from the qibla.

use serde::Serialize;

use crate::constants::Degree;
use crate::conversion::normalize_deg_0_360;

/// Direction of the shadow cast by a vertical object, in `[0, 360)`.
pub fn shadow_bearing(solar_azimuth: Degree) -> Degree {
    normalize_deg_0_360(solar_azimuth + 180.0)
}

/// Smallest angle between two bearings, in `[0, 180]`.
///
/// Both inputs are normalized first, so `angular_difference(-10.0, 350.0)` is `0`.
///
/// ```
/// use qibla::comparator::angular_difference;
///
/// assert_eq!(angular_difference(10.0, 350.0), 20.0);
/// ```
pub fn angular_difference(a: Degree, b: Degree) -> Degree {
    let diff = (normalize_deg_0_360(a) - normalize_deg_0_360(b)).abs();
    diff.min(360.0 - diff)
}

/// Sun and shadow directions relative to the qibla.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BearingComparison {
    pub shadow_azimuth_deg: Degree,
    pub sun_qibla_diff_deg: Degree,
    pub shadow_qibla_diff_deg: Degree,
}

impl BearingComparison {
    /// Arguments
    /// ---------
    /// * `qibla_bearing`: qibla direction, degrees from true North
    /// * `solar_azimuth`: Sun azimuth, degrees from true North
    pub fn new(qibla_bearing: Degree, solar_azimuth: Degree) -> Self {
        let shadow_azimuth_deg = shadow_bearing(solar_azimuth);
        BearingComparison {
            shadow_azimuth_deg,
            sun_qibla_diff_deg: angular_difference(solar_azimuth, qibla_bearing),
            shadow_qibla_diff_deg: angular_difference(shadow_azimuth_deg, qibla_bearing),
        }
    }
}
