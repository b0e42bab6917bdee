use thiserror::Error;

use crate::conversion::{Axis, Direction};

/// Failures raised while turning raw coordinates into a [`GeoPoint`](crate::geo_point::GeoPoint).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("Malformed DMS coordinate: {0:?}")]
    Malformed(String),

    #[error("Direction {direction} does not belong to the {axis} axis")]
    InvalidDirection { direction: Direction, axis: Axis },

    #[error("Coordinate component out of range: {0}")]
    OutOfRange(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeodesicError {
    #[error("Vincenty inverse did not converge after {iterations} iterations")]
    DidNotConverge { iterations: usize },

    #[error("Points are (nearly) antipodal, the Vincenty inverse is unstable")]
    NearAntipodal,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Date outside of the supported range: {0}")]
    UnsupportedDate(String),

    #[error("Invalid date-time: {0}")]
    InvalidDateTime(String),

    #[error("Invalid UTC offset: {0} hours")]
    InvalidUtcOffset(f64),

    #[error("Invalid observer elevation: {0} m")]
    InvalidElevation(f64),

    #[error("Unable to resolve the UTC offset at latitude {latitude}, longitude {longitude}")]
    UnresolvedTimezone { latitude: f64, longitude: f64 },
}

#[derive(Error, Debug)]
pub enum QiblaError {
    #[error("Invalid coordinate: {0}")]
    Coordinate(#[from] CoordinateError),

    #[error("Geodesic failure: {0}")]
    Geodesic(#[from] GeodesicError),

    #[error("Ephemeris failure: {0}")]
    Ephemeris(#[from] EphemerisError),

    #[error("Invalid engine configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Flat tag of a [`QiblaError`], suitable for an outer transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCoordinate,
    GeodesicDidNotConverge,
    GeodesicNearAntipodal,
    EphemerisUnsupportedDate,
    EphemerisUnresolvedTimezone,
    InvalidInstant,
    InvalidConfig,
}

impl QiblaError {
    /// Tag of the failure, independent of its message.
    pub fn kind(&self) -> ErrorKind {
        use QiblaError::*;
        match self {
            Coordinate(_) => ErrorKind::InvalidCoordinate,
            Geodesic(GeodesicError::DidNotConverge { .. }) => ErrorKind::GeodesicDidNotConverge,
            Geodesic(GeodesicError::NearAntipodal) => ErrorKind::GeodesicNearAntipodal,
            Ephemeris(EphemerisError::UnsupportedDate(_)) => ErrorKind::EphemerisUnsupportedDate,
            Ephemeris(EphemerisError::UnresolvedTimezone { .. }) => {
                ErrorKind::EphemerisUnresolvedTimezone
            }
            Ephemeris(_) => ErrorKind::InvalidInstant,
            Config(_) => ErrorKind::InvalidConfig,
        }
    }
}

impl PartialEq for QiblaError {
    fn eq(&self, other: &Self) -> bool {
        use QiblaError::*;
        match (self, other) {
            (Coordinate(a), Coordinate(b)) => a == b,
            (Geodesic(a), Geodesic(b)) => a == b,
            (Ephemeris(a), Ephemeris(b)) => a == b,

            // toml errors are not comparable: same variant is enough
            (Config(_), Config(_)) => true,

            _ => false,
        }
    }
}
