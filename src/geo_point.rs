//! # Geographic angles and points
//!
//! [`GeoAngle`] is a signed decimal-degree value attached to its axis; [`GeoPoint`] pairs a
//! latitude with a longitude. Both are immutable once built and are validated at construction,
//! so downstream numeric code (bearing, geodesic, solar) never sees a NaN or an out-of-range
//! coordinate.
//!
//! The fixed reference point of the engine, the Kaaba, is the constant [`KAABA`].
//!
//! ## Units
//!
//! - Latitudes and longitudes: **degrees**, North and East positive.
//! - Heights: **meters** above the WGS84 ellipsoid.
//! - Parallax coordinates (ρ·cosφ′, ρ·sinφ′): **Earth equatorial radii**.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Meter, Radian, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS};
use crate::conversion::{
    decimal_to_dms, dms_to_decimal_on_axis, parse_dms, Axis, Direction, Dms,
};
use crate::qibla_errors::CoordinateError;

/// Signed decimal-degree angle on a given axis (negative = South/West).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoAngle {
    decimal: Degree,
    axis: Axis,
}

impl GeoAngle {
    /// Build an angle from its DMS magnitude and hemisphere.
    ///
    /// Errors
    /// ------
    /// * [`CoordinateError`] when the direction does not match `axis` or a component is out of
    ///   range, see [`dms_to_decimal_on_axis`].
    pub fn from_dms(dms: &Dms, direction: Direction, axis: Axis) -> Result<Self, CoordinateError> {
        let decimal = dms_to_decimal_on_axis(dms, direction, axis)?;
        Ok(GeoAngle { decimal, axis })
    }

    /// Build an angle from signed decimal degrees.
    pub fn from_decimal(decimal: Degree, axis: Axis) -> Result<Self, CoordinateError> {
        if !decimal.is_finite() || decimal.abs() > axis.limit() {
            return Err(CoordinateError::OutOfRange(format!(
                "{axis} {decimal}° is not within ±{}°",
                axis.limit()
            )));
        }
        Ok(GeoAngle { decimal, axis })
    }

    /// Parse the `"D° M’ S” DIR"` transport format on a known axis.
    pub fn parse(text: &str, axis: Axis) -> Result<Self, CoordinateError> {
        let (dms, direction) = parse_dms(text)?;
        GeoAngle::from_dms(&dms, direction, axis)
    }

    pub fn decimal(&self) -> Degree {
        self.decimal
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn to_radians(&self) -> Radian {
        self.decimal.to_radians()
    }

    /// Hemisphere of the angle.
    pub fn direction(&self) -> Direction {
        Direction::for_value(self.axis, self.decimal)
    }

    /// Unsigned DMS triple of the angle together with its hemisphere.
    pub fn to_dms(&self) -> (Dms, Direction) {
        let (degrees, minutes, seconds) = decimal_to_dms(self.decimal);
        (Dms::new(degrees, minutes, seconds), self.direction())
    }
}

impl fmt::Display for GeoAngle {
    /// Seconds are rounded to the hundredth and carried into minutes/degrees, so that
    /// `106.81666666666666` prints as `106° 49’ 0.00”` rather than `106° 48’ 60.00”`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hundredths = (self.decimal.abs() * 360_000.0).round() as u64;
        let dms = Dms::new(
            (hundredths / 360_000) as u32,
            ((hundredths / 6_000) % 60) as u32,
            (hundredths % 6_000) as f64 / 100.0,
        );
        write!(f, "{dms} {}", self.direction())
    }
}

/// A point on the Earth given by geodetic latitude and longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    latitude: Degree,
    longitude: Degree,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: Degree,
    longitude: Degree,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = CoordinateError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::from_decimal(raw.latitude, raw.longitude)
    }
}

/// The Kaaba, Masjid al-Haram: 21°25′21.2″N, 39°49′34.2″E.
pub const KAABA: GeoPoint = GeoPoint {
    latitude: 21.0 + 25.0 / 60.0 + 21.2 / 3600.0,
    longitude: 39.0 + 49.0 / 60.0 + 34.2 / 3600.0,
};

impl GeoPoint {
    /// Build a point from signed decimal degrees.
    ///
    /// Errors
    /// ------
    /// * [`CoordinateError::OutOfRange`] for non-finite values, |latitude| > 90 or
    ///   |longitude| > 180.
    pub fn from_decimal(latitude: Degree, longitude: Degree) -> Result<Self, CoordinateError> {
        let lat = GeoAngle::from_decimal(latitude, Axis::Latitude)?;
        let lon = GeoAngle::from_decimal(longitude, Axis::Longitude)?;
        GeoPoint::from_angles(lat, lon)
    }

    /// Build a point from two angles, checking each sits on the right axis.
    pub fn from_angles(latitude: GeoAngle, longitude: GeoAngle) -> Result<Self, CoordinateError> {
        if latitude.axis() != Axis::Latitude {
            return Err(CoordinateError::InvalidDirection {
                direction: latitude.direction(),
                axis: Axis::Latitude,
            });
        }
        if longitude.axis() != Axis::Longitude {
            return Err(CoordinateError::InvalidDirection {
                direction: longitude.direction(),
                axis: Axis::Longitude,
            });
        }
        Ok(GeoPoint {
            latitude: latitude.decimal(),
            longitude: longitude.decimal(),
        })
    }

    /// Parse a latitude/longitude pair written in the `"D° M’ S” DIR"` format.
    ///
    /// ```
    /// use qibla::geo_point::GeoPoint;
    ///
    /// let jakarta = GeoPoint::from_dms_strings("6° 10’ 0.0” S", "106° 49’ 0.0” E").unwrap();
    /// assert!(jakarta.latitude() < 0.0);
    /// ```
    pub fn from_dms_strings(lat_dms: &str, lon_dms: &str) -> Result<Self, CoordinateError> {
        let latitude = GeoAngle::parse(lat_dms, Axis::Latitude)?;
        let longitude = GeoAngle::parse(lon_dms, Axis::Longitude)?;
        GeoPoint::from_angles(latitude, longitude)
    }

    pub fn latitude(&self) -> Degree {
        self.latitude
    }

    pub fn longitude(&self) -> Degree {
        self.longitude
    }

    pub fn latitude_rad(&self) -> Radian {
        self.latitude.to_radians()
    }

    pub fn longitude_rad(&self) -> Radian {
        self.longitude.to_radians()
    }

    pub fn latitude_angle(&self) -> GeoAngle {
        GeoAngle {
            decimal: self.latitude,
            axis: Axis::Latitude,
        }
    }

    pub fn longitude_angle(&self) -> GeoAngle {
        GeoAngle {
            decimal: self.longitude,
            axis: Axis::Longitude,
        }
    }

    /// Normalized parallax coordinates (ρ·cosφ′, ρ·sinφ′) of an observer standing `height`
    /// meters above the ellipsoid at this point.
    ///
    /// See also
    /// --------
    /// * [`lat_alt_to_parallax`] – the underlying conversion.
    pub fn parallax(&self, height: Meter) -> (f64, f64) {
        lat_alt_to_parallax(self.latitude_rad(), height)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude_angle(), self.longitude_angle())
    }
}

/// Convert geodetic latitude and height into normalized parallax coordinates on the Earth.
///
/// Arguments
/// ---------
/// * `lat` - Geodetic latitude of the observer in **radians**.
/// * `height` - Observer's altitude above the reference ellipsoid in **meters**.
///
/// Returns
/// -------
/// A tuple `(rho_cos_phi, rho_sin_phi)` in units of the equatorial radius:
///
/// ```text
/// u = atan( (sin φ * (b/a)) / cos φ )
/// ρ_sinφ = (b/a) * sin u + (h/a) * sin φ
/// ρ_cosφ = cos u + (h/a) * cos φ
/// ```
pub fn lat_alt_to_parallax(lat: Radian, height: Meter) -> (f64, f64) {
    let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

    // parametric latitude
    let u = (lat.sin() * axis_ratio).atan2(lat.cos());

    let rho_sin_phi = axis_ratio * u.sin() + (height / EARTH_MAJOR_AXIS) * lat.sin();
    let rho_cos_phi = u.cos() + (height / EARTH_MAJOR_AXIS) * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}
