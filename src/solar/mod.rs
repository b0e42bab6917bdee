//! # Solar ephemeris
//!
//! Topocentric position of the Sun (azimuth/elevation) for an observer on the Earth at a UTC
//! epoch.
//!
//! The capability is expressed by the [`SolarEphemeris`] trait so that the engine can be driven
//! by any solar theory (or by a deterministic double in tests). The crate ships one
//! implementation, [`MeeusSun`], a low-precision analytical theory accurate to about 0.01° in
//! azimuth over several centuries around J2000.
//!
//! ## Frames
//!
//! ```text
//! geocentric ecliptic of date ──(ε)──▶ equatorial of date ──(GAST)──▶ Earth-fixed
//!                                                         − observer ──▶ East/North/Up
//! ```
//!
//! The final projection on the local East-North-Up basis is done in [`topocentric_position`].
//!
//! ## Refraction
//!
//! Positions are geometric by default. [`Refraction::Standard`] adds the Sæmundsson mean
//! atmospheric refraction (10 °C, 1010 hPa) for elevations above −1°.

pub mod meeus;
pub mod nutation;

use hifitime::Epoch;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Meter, ERAU};
use crate::conversion::{normalize_deg_0_360, rad_to_deg};
use crate::geo_point::GeoPoint;
use crate::qibla_errors::EphemerisError;

pub use meeus::{ApparentSun, MeeusSun};

/// Topocentric position of the Sun.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarPosition {
    /// Clockwise from true North, in `[0, 360)`
    pub azimuth_deg: Degree,
    /// Above the horizon, in `[-90, 90]`
    pub elevation_deg: Degree,
}

/// Atmospheric refraction model applied to the geometric elevation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Refraction {
    /// Geometric (airless) elevation
    #[default]
    None,
    /// Sæmundsson mean refraction
    Standard,
}

impl Refraction {
    /// Apply the refraction model to a geometric elevation.
    ///
    /// Arguments
    /// ---------
    /// * `elevation`: geometric elevation in degrees
    ///
    /// Return
    /// ------
    /// * the apparent elevation in degrees, never above 90°
    pub fn apply(&self, elevation: Degree) -> Degree {
        match self {
            Refraction::None => elevation,
            Refraction::Standard => {
                if elevation <= -1.0 {
                    return elevation;
                }
                // Sæmundsson (1986), arcminutes
                let arg = (elevation + 10.3 / (elevation + 5.11)).to_radians();
                let correction = 1.02 / arg.tan() / 60.0;
                (elevation + correction.max(0.0)).min(90.0)
            }
        }
    }
}

/// Source of topocentric solar positions.
///
/// Implementors must be deterministic: the same inputs always give the same output.
pub trait SolarEphemeris: Send + Sync {
    /// Position of the Sun seen from `point`, `elevation_m` meters above the ellipsoid, at the
    /// UTC epoch `utc`.
    ///
    /// Errors
    /// ------
    /// * [`EphemerisError::UnsupportedDate`] outside of the supported date range
    /// * [`EphemerisError::InvalidElevation`] for a non-finite observer elevation
    fn solar_position(
        &self,
        point: &GeoPoint,
        elevation_m: Meter,
        utc: &Epoch,
    ) -> Result<SolarPosition, EphemerisError>;
}

/// Observer position in the Earth-fixed frame, in AU.
///
/// See also
/// --------
/// * [`GeoPoint::parallax`] for the (ρ·cosφ′, ρ·sinφ′) pair.
pub fn observer_fixed_position(point: &GeoPoint, elevation_m: Meter) -> Vector3<f64> {
    let (rho_cos_phi, rho_sin_phi) = point.parallax(elevation_m);
    let lon = point.longitude_rad();

    Vector3::new(
        ERAU * rho_cos_phi * lon.cos(),
        ERAU * rho_cos_phi * lon.sin(),
        ERAU * rho_sin_phi,
    )
}

/// Project the body position, given in the Earth-fixed frame (AU), onto the local horizon of the
/// observer.
///
/// Arguments
/// ---------
/// * `body_fixed`: geocentric position of the body, Earth-fixed frame
/// * `point`, `elevation_m`: observer location
///
/// Return
/// ------
/// * the geometric azimuth/elevation of the body
pub fn topocentric_position(
    body_fixed: &Vector3<f64>,
    point: &GeoPoint,
    elevation_m: Meter,
) -> SolarPosition {
    let line_of_sight = body_fixed - observer_fixed_position(point, elevation_m);

    let (sin_lat, cos_lat) = point.latitude_rad().sin_cos();
    let (sin_lon, cos_lon) = point.longitude_rad().sin_cos();

    let east = Vector3::new(-sin_lon, cos_lon, 0.0);
    let north = Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
    let up = Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);

    let e = line_of_sight.dot(&east);
    let n = line_of_sight.dot(&north);
    let u = line_of_sight.dot(&up) / line_of_sight.norm();

    SolarPosition {
        azimuth_deg: normalize_deg_0_360(rad_to_deg(e.atan2(n))),
        elevation_deg: rad_to_deg(u.clamp(-1.0, 1.0).asin()),
    }
}

#[cfg(test)]
mod solar_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_refraction_model() {
        assert_eq!(Refraction::None.apply(10.0), 10.0);
        assert_eq!(Refraction::Standard.apply(-5.0), -5.0);

        // about 34' at the horizon, 5' at 10°
        assert_relative_eq!(Refraction::Standard.apply(0.0), 0.483, epsilon = 1e-3);
        assert_relative_eq!(Refraction::Standard.apply(10.0), 10.0 + 5.3 / 60.0, epsilon = 5e-3);
        assert!(Refraction::Standard.apply(89.95) <= 90.0);
        assert_eq!(Refraction::default(), Refraction::None);
    }

    #[test]
    fn test_topocentric_zenith_and_horizon() {
        let point = GeoPoint::from_decimal(0.0, 0.0).unwrap();

        // straight above the observer
        let zenith = topocentric_position(&Vector3::new(1.0, 0.0, 0.0), &point, 0.0);
        assert_relative_eq!(zenith.elevation_deg, 90.0, epsilon = 1e-9);

        // far away along the North pole axis: due North, on the horizon
        let north = topocentric_position(&Vector3::new(0.0, 0.0, 1.0), &point, 0.0);
        assert_relative_eq!(north.azimuth_deg, 0.0, epsilon = 1e-9);
        assert_relative_eq!(north.elevation_deg, 0.0, epsilon = 1e-2);

        let east = topocentric_position(&Vector3::new(0.0, 1.0, 0.0), &point, 0.0);
        assert_relative_eq!(east.azimuth_deg, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_observer_position() {
        let point = GeoPoint::from_decimal(0.0, 90.0).unwrap();
        let pos = observer_fixed_position(&point, 0.0);
        assert_relative_eq!(pos.x, 0.0, epsilon = 1e-15);
        assert_relative_eq!(pos.y, ERAU, epsilon = 1e-15);
        assert_relative_eq!(pos.z, 0.0, epsilon = 1e-15);
    }
}
