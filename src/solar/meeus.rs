//! Low-precision analytical Sun (Meeus, *Astronomical Algorithms*, 2nd ed., ch. 25).
//!
//! Geometric mean longitude, mean anomaly and equation of the center give the true longitude;
//! nutation and aberration give the apparent longitude. The apparent Sun is then turned into a
//! geocentric equatorial-of-date vector, rotated to the Earth-fixed frame with the Greenwich
//! apparent sidereal time and observed from the topocentric station.

use hifitime::Epoch;
use log::trace;
use nalgebra::{Rotation3, Vector3};
use serde::Serialize;

use super::nutation::{equation_of_equinoxes, moon_node_longitude, true_obliquity};
use super::{topocentric_position, Refraction, SolarEphemeris, SolarPosition};
use crate::constants::{Degree, Meter, Radian, RADEG};
use crate::conversion::{normalize_deg_0_360, rad_to_deg};
use crate::geo_point::GeoPoint;
use crate::qibla_errors::EphemerisError;
use crate::time::{check_supported_epoch, gmst, julian_centuries_tt};

/// Geocentric apparent coordinates of the Sun, equator and equinox of date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApparentSun {
    pub right_ascension_deg: Degree,
    pub declination_deg: Degree,
    /// Sun-Earth distance, in AU
    pub distance_au: f64,
    /// Apparent ecliptic longitude λ
    pub ecliptic_longitude_deg: Degree,
}

/// Internal state shared by the geocentric and topocentric computations.
struct GeocentricSun {
    apparent: ApparentSun,
    /// apparent longitude, radians
    lambda: Radian,
    /// true obliquity, radians
    epsilon: Radian,
}

impl GeocentricSun {
    /// Position vector in the equatorial frame of date, in AU.
    fn equatorial_vector(&self) -> Vector3<f64> {
        let r = self.apparent.distance_au;
        let (sin_l, cos_l) = self.lambda.sin_cos();
        let (sin_e, cos_e) = self.epsilon.sin_cos();
        Vector3::new(r * cos_l, r * cos_e * sin_l, r * sin_e * sin_l)
    }
}

/// Low-precision solar theory, ~0.01° over 1950–2050 and a few arcminutes over the full
/// supported date range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeeusSun {
    refraction: Refraction,
}

impl MeeusSun {
    pub fn new(refraction: Refraction) -> Self {
        MeeusSun { refraction }
    }

    pub fn refraction(&self) -> Refraction {
        self.refraction
    }

    /// Geocentric apparent right ascension, declination and distance of the Sun.
    ///
    /// Arguments
    /// ---------
    /// * `utc`: the epoch, any time scale (converted to TT internally)
    ///
    /// Errors
    /// ------
    /// * [`EphemerisError::UnsupportedDate`] outside of 1582-10-15 .. 9999-12-31
    pub fn apparent_sun(&self, utc: &Epoch) -> Result<ApparentSun, EphemerisError> {
        check_supported_epoch(utc)?;
        Ok(geocentric_sun(julian_centuries_tt(utc)).apparent)
    }
}

fn geocentric_sun(t: f64) -> GeocentricSun {
    // geometric mean longitude, mean anomaly, eccentricity of the Earth orbit
    let l0 = 280.46646 + t * (36000.76983 + 0.0003032 * t);
    let m = (357.52911 + t * (35999.05029 - 0.0001537 * t)) * RADEG;
    let e = 0.016708634 - t * (0.000042037 + 0.0000001267 * t);

    // equation of the center
    let c = (1.914602 - t * (0.004817 + 0.000014 * t)) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin();

    let true_longitude = l0 + c;
    let true_anomaly = m + c * RADEG;
    let distance_au = 1.000001018 * (1.0 - e * e) / (1.0 + e * true_anomaly.cos());

    // aberration (−20.4898″ / R ≈ 0.00569°) and nutation of the longitude
    let omega = moon_node_longitude(t);
    let lambda = (true_longitude - 0.00569 - 0.00478 * omega.sin()) * RADEG;

    let epsilon = true_obliquity(t);

    let (sin_l, cos_l) = lambda.sin_cos();
    let right_ascension = (epsilon.cos() * sin_l).atan2(cos_l);
    let declination = (epsilon.sin() * sin_l).asin();

    GeocentricSun {
        apparent: ApparentSun {
            right_ascension_deg: normalize_deg_0_360(rad_to_deg(right_ascension)),
            declination_deg: rad_to_deg(declination),
            distance_au,
            ecliptic_longitude_deg: normalize_deg_0_360(rad_to_deg(lambda)),
        },
        lambda,
        epsilon,
    }
}

/// Greenwich apparent sidereal time, in radians, with UT1 taken as UTC.
fn apparent_sidereal_time(utc: &Epoch) -> Radian {
    gmst(utc.to_mjd_utc_days()) + equation_of_equinoxes(julian_centuries_tt(utc))
}

impl SolarEphemeris for MeeusSun {
    fn solar_position(
        &self,
        point: &GeoPoint,
        elevation_m: Meter,
        utc: &Epoch,
    ) -> Result<SolarPosition, EphemerisError> {
        if !elevation_m.is_finite() {
            return Err(EphemerisError::InvalidElevation(elevation_m));
        }
        check_supported_epoch(utc)?;

        let sun = geocentric_sun(julian_centuries_tt(utc));
        let gast = apparent_sidereal_time(utc);

        // Earth rotation: equatorial of date → Earth-fixed
        let earth_rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), -gast);
        let sun_fixed = earth_rotation * sun.equatorial_vector();

        let geometric = topocentric_position(&sun_fixed, point, elevation_m);
        let elevation_deg = self.refraction.apply(geometric.elevation_deg);

        trace!(
            "sun at {utc}: ra = {:.4}°, dec = {:.4}°, az = {:.4}°, el = {:.4}°",
            sun.apparent.right_ascension_deg,
            sun.apparent.declination_deg,
            geometric.azimuth_deg,
            elevation_deg
        );

        Ok(SolarPosition {
            azimuth_deg: geometric.azimuth_deg,
            elevation_deg,
        })
    }
}
