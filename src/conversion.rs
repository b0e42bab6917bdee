//! # Angle representation and conversion
//!
//! Degrees/minutes/seconds (DMS) ↔ decimal degrees ↔ radians, normalization of bearings into
//! `[0, 360)`, and parsing of the `"D° M’ S” DIR"` strings consumed by the engine facade.
//!
//! Sign convention: decimal degrees are **negative for South and West**. DMS triples carry the
//! magnitude only; the sign travels with a [`Direction`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Radian, RADEG};
use crate::qibla_errors::CoordinateError;

/// Geographic axis an angle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Largest admissible magnitude in degrees on this axis.
    pub fn limit(&self) -> Degree {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

/// Hemisphere letter of a DMS coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    S,
    E,
    W,
}

impl Direction {
    /// Axis on which this direction is meaningful (N/S → latitude, E/W → longitude).
    pub fn axis(&self) -> Axis {
        match self {
            Direction::N | Direction::S => Axis::Latitude,
            Direction::E | Direction::W => Axis::Longitude,
        }
    }

    /// `true` for the hemispheres counted negatively (South and West).
    pub fn is_negative(&self) -> bool {
        matches!(self, Direction::S | Direction::W)
    }

    /// Hemisphere letter of a signed decimal value on the given axis.
    ///
    /// Zero is reported as North/East.
    pub fn for_value(axis: Axis, decimal: Degree) -> Direction {
        match (axis, decimal < 0.0) {
            (Axis::Latitude, false) => Direction::N,
            (Axis::Latitude, true) => Direction::S,
            (Axis::Longitude, false) => Direction::E,
            (Axis::Longitude, true) => Direction::W,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Direction::N => "N",
            Direction::S => "S",
            Direction::E => "E",
            Direction::W => "W",
        };
        write!(f, "{letter}")
    }
}

impl FromStr for Direction {
    type Err = CoordinateError;

    /// Case-insensitive parse of a single hemisphere letter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(Direction::N),
            "S" => Ok(Direction::S),
            "E" => Ok(Direction::E),
            "W" => Ok(Direction::W),
            _ => Err(CoordinateError::Malformed(s.to_string())),
        }
    }
}

/// Unsigned degrees/minutes/seconds triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dms {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl Dms {
    pub fn new(degrees: u32, minutes: u32, seconds: f64) -> Self {
        Dms {
            degrees,
            minutes,
            seconds,
        }
    }

    /// Unsigned decimal magnitude of the triple.
    pub fn magnitude(&self) -> Degree {
        self.degrees as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}° {}’ {:.2}”", self.degrees, self.minutes, self.seconds)
    }
}

/// Convert a DMS triple and its hemisphere into signed decimal degrees.
///
/// Arguments
/// ---------
/// * `degrees`, `minutes`, `seconds`: unsigned components of the angle
/// * `direction`: hemisphere letter, South and West yield a negative value
///
/// Return
/// ------
/// * `degrees + minutes/60 + seconds/3600`, negated for S/W
///
/// The axis is not checked here, see [`dms_to_decimal_on_axis`].
pub fn dms_to_decimal(degrees: u32, minutes: u32, seconds: f64, direction: Direction) -> Degree {
    let decimal = Dms::new(degrees, minutes, seconds).magnitude();
    if direction.is_negative() {
        -decimal
    } else {
        decimal
    }
}

/// Checked variant of [`dms_to_decimal`].
///
/// Errors
/// ------
/// * [`CoordinateError::InvalidDirection`] if `direction` does not belong to `axis`
/// * [`CoordinateError::OutOfRange`] if minutes or seconds are outside `[0, 60)`, or if the
///   magnitude exceeds 90° (latitude) / 180° (longitude)
pub fn dms_to_decimal_on_axis(
    dms: &Dms,
    direction: Direction,
    axis: Axis,
) -> Result<Degree, CoordinateError> {
    if direction.axis() != axis {
        return Err(CoordinateError::InvalidDirection { direction, axis });
    }
    if dms.minutes >= 60 {
        return Err(CoordinateError::OutOfRange(format!(
            "minutes must be below 60, got {}",
            dms.minutes
        )));
    }
    if !(0.0..60.0).contains(&dms.seconds) {
        return Err(CoordinateError::OutOfRange(format!(
            "seconds must be in [0, 60), got {}",
            dms.seconds
        )));
    }

    let magnitude = dms.magnitude();
    if magnitude > axis.limit() {
        return Err(CoordinateError::OutOfRange(format!(
            "{axis} magnitude {magnitude}° exceeds {}°",
            axis.limit()
        )));
    }

    Ok(dms_to_decimal(
        dms.degrees,
        dms.minutes,
        dms.seconds,
        direction,
    ))
}

/// Split the magnitude of a decimal angle into a DMS triple.
///
/// `degrees = ⌊|x|⌋`, `minutes = ⌊frac·60⌋`, `seconds` the remaining fraction of a minute times
/// 60. The sign is dropped; use [`Direction::for_value`] to recover the hemisphere.
pub fn decimal_to_dms(decimal: Degree) -> (u32, u32, f64) {
    let absolute = decimal.abs();
    let degrees = absolute.floor();
    let minutes_not_truncated = (absolute - degrees) * 60.0;
    let minutes = minutes_not_truncated.floor();
    let seconds = (minutes_not_truncated - minutes) * 60.0;
    (degrees as u32, minutes as u32, seconds)
}

/// Bring an angle in degrees into `[0, 360)`.
///
/// Idempotent. Non-finite values are returned unchanged.
pub fn normalize_deg_0_360(x: Degree) -> Degree {
    if !x.is_finite() {
        return x;
    }
    let r = x.rem_euclid(360.0);
    // rem_euclid may round tiny negative inputs up to exactly 360
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

#[inline]
pub fn deg_to_rad(x: Degree) -> Radian {
    x * RADEG
}

#[inline]
pub fn rad_to_deg(x: Radian) -> Degree {
    x / RADEG
}

static DMS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*(\d+)\s*(?:[°º]\s*|\s+)(\d+)\s*(?:['’′]\s*|\s+)(\d+(?:\.\d+)?|\.\d+)\s*(?:["”″]\s*|\s+)([NSEWnsew])\s*$"#,
    )
    .expect("static DMS pattern is valid")
});

/// Parse a coordinate written as `"D° M’ S” DIR"`.
///
/// Arguments
/// ---------
/// * `text`: the coordinate, e.g. `"6° 10’ 0.0” S"`. Unit marks may be the typographic ones
///   (`°`, `’`, `”`), the ASCII ones (`'`, `"`) or omitted when components are space separated.
///   The direction letter is case-insensitive.
///
/// Return
/// ------
/// * the unsigned [`Dms`] triple and its [`Direction`]; range and axis checks are left to
///   [`dms_to_decimal_on_axis`]
pub fn parse_dms(text: &str) -> Result<(Dms, Direction), CoordinateError> {
    let malformed = || CoordinateError::Malformed(text.to_string());
    let caps = DMS_PATTERN.captures(text).ok_or_else(malformed)?;

    let degrees: u32 = caps[1].parse().map_err(|_| malformed())?;
    let minutes: u32 = caps[2].parse().map_err(|_| malformed())?;
    let seconds: f64 = caps[3].parse().map_err(|_| malformed())?;
    let direction: Direction = caps[4].parse()?;

    Ok((Dms::new(degrees, minutes, seconds), direction))
}

#[cfg(test)]
mod conversion_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dms_to_decimal() {
        assert_eq!(dms_to_decimal(6, 10, 0.0, Direction::S), -6.166666666666667);
        assert_eq!(
            dms_to_decimal(106, 49, 0.0, Direction::E),
            106.81666666666666
        );
        assert_relative_eq!(
            dms_to_decimal(21, 25, 21.2, Direction::N),
            21.422555555555558,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            dms_to_decimal(39, 49, 34.2, Direction::W),
            -39.82616666666667,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_dms_to_decimal_on_axis() {
        let dms = Dms::new(6, 10, 0.0);
        assert_eq!(
            dms_to_decimal_on_axis(&dms, Direction::E, Axis::Latitude),
            Err(CoordinateError::InvalidDirection {
                direction: Direction::E,
                axis: Axis::Latitude
            })
        );
        assert!(matches!(
            dms_to_decimal_on_axis(&Dms::new(10, 60, 0.0), Direction::N, Axis::Latitude),
            Err(CoordinateError::OutOfRange(_))
        ));
        assert!(matches!(
            dms_to_decimal_on_axis(&Dms::new(10, 0, 60.0), Direction::N, Axis::Latitude),
            Err(CoordinateError::OutOfRange(_))
        ));
        assert!(matches!(
            dms_to_decimal_on_axis(&Dms::new(90, 0, 0.5), Direction::S, Axis::Latitude),
            Err(CoordinateError::OutOfRange(_))
        ));
        assert_eq!(
            dms_to_decimal_on_axis(&Dms::new(180, 0, 0.0), Direction::W, Axis::Longitude),
            Ok(-180.0)
        );
    }

    #[test]
    fn test_decimal_to_dms() {
        let (d, m, s) = decimal_to_dms(-6.166666666666667);
        assert_eq!((d, m), (6, 10));
        assert_relative_eq!(s, 0.0, epsilon = 1e-9);

        let (d, m, s) = decimal_to_dms(21.422555555555558);
        assert_eq!((d, m), (21, 25));
        assert_relative_eq!(s, 21.2, epsilon = 1e-9);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_deg_0_360(-65.0), 295.0);
        assert_eq!(normalize_deg_0_360(360.0), 0.0);
        assert_eq!(normalize_deg_0_360(725.5), 5.5);
        assert_eq!(normalize_deg_0_360(-1e-18), 0.0);
        assert_eq!(normalize_deg_0_360(123.25), 123.25);
        assert!(normalize_deg_0_360(f64::NAN).is_nan());
    }

    #[test]
    fn test_parse_dms() {
        assert_eq!(
            parse_dms("6° 10’ 0.0” S"),
            Ok((Dms::new(6, 10, 0.0), Direction::S))
        );
        assert_eq!(
            parse_dms("106° 49’ 0.0” E"),
            Ok((Dms::new(106, 49, 0.0), Direction::E))
        );
        assert_eq!(
            parse_dms("21°25'21.2\"n"),
            Ok((Dms::new(21, 25, 21.2), Direction::N))
        );
        assert_eq!(
            parse_dms("  39 49 34.2 w "),
            Ok((Dms::new(39, 49, 34.2), Direction::W))
        );
        assert_eq!(
            parse_dms("6° 10’ S"),
            Err(CoordinateError::Malformed("6° 10’ S".into()))
        );
        assert!(parse_dms("6° 10’ 0.0” X").is_err());
        assert!(parse_dms("-6° 10’ 0.0” S").is_err());
        assert!(parse_dms("").is_err());
    }

    #[test]
    fn test_direction_for_value() {
        assert_eq!(Direction::for_value(Axis::Latitude, -0.5), Direction::S);
        assert_eq!(Direction::for_value(Axis::Latitude, 0.0), Direction::N);
        assert_eq!(Direction::for_value(Axis::Longitude, -120.0), Direction::W);
        assert_eq!(Direction::for_value(Axis::Longitude, 39.8), Direction::E);
        assert_eq!("w".parse::<Direction>(), Ok(Direction::W));
    }
}
