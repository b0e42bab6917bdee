//! # Time handling
//!
//! Local wall-clock parsing, the [`Instant`] pairing of a local time with its UTC offset, and the
//! sidereal/dynamical time quantities needed by the solar ephemeris.
//!
//! Local times are stored as "naive" [`Epoch`]s: an epoch in the UTC time scale whose calendar
//! fields are the local wall-clock fields. [`Instant::utc`] removes the offset to obtain the true
//! UTC epoch.

use std::sync::LazyLock;

use hifitime::{Epoch, Unit};
use regex::Regex;

use crate::constants::{
    Hours, DAYS_PER_JULIAN_CENTURY, DPI, JD2000, MAX_UTC_OFFSET, MJD, SECONDS_PER_DAY, T2000,
};
use crate::qibla_errors::EphemerisError;

/// First day of the Gregorian calendar, start of the supported range.
const FIRST_SUPPORTED_DAY: (i32, u8, u8) = (1582, 10, 15);

/// Last supported year (inclusive).
const LAST_SUPPORTED_YEAR: i32 = 9999;

static DATETIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{4})[/-](\d{1,2})[/-](\d{1,2})(?:\s+|T)(\d{1,2}):(\d{1,2})(?::(\d{1,2}))?\s*$")
        .expect("static date-time pattern")
});

/// Parse a local wall-clock date-time.
///
/// Accepted formats are `YYYY/MM/DD HH:MM:SS`, the same with `-` as date separator, and `T` in
/// place of the blank (`2024-05-27T16:18:00`). Seconds may be omitted.
///
/// Arguments
/// ---------
/// * `text`: the local date-time
///
/// Return
/// ------
/// * a naive [`Epoch`] carrying the local calendar fields
///
/// Errors
/// ------
/// * [`EphemerisError::InvalidDateTime`] for malformed text or impossible calendar fields
/// * [`EphemerisError::UnsupportedDate`] before 1582-10-15 or after 9999-12-31
pub fn parse_local_datetime(text: &str) -> Result<Epoch, EphemerisError> {
    let caps = DATETIME_PATTERN
        .captures(text)
        .ok_or_else(|| EphemerisError::InvalidDateTime(text.to_string()))?;

    let field = |idx: usize| -> Result<u32, EphemerisError> {
        caps.get(idx)
            .map_or(Ok(0), |m| m.as_str().parse::<u32>())
            .map_err(|_| EphemerisError::InvalidDateTime(text.to_string()))
    };

    let year = field(1)? as i32;
    let month = field(2)?;
    let day = field(3)?;
    let hour = field(4)?;
    let minute = field(5)?;
    let second = field(6)?;

    if hour > 23 || minute > 59 || second > 59 {
        return Err(EphemerisError::InvalidDateTime(text.to_string()));
    }
    check_supported_day(year, month as u8, day as u8)?;

    Epoch::maybe_from_gregorian_utc(
        year,
        month as u8,
        day as u8,
        hour as u8,
        minute as u8,
        second as u8,
        0,
    )
    .map_err(|e| EphemerisError::InvalidDateTime(format!("{text}: {e}")))
}

/// Format an epoch as `YYYY/MM/DD HH:MM:SS` (UTC calendar fields, sub-seconds dropped).
pub fn format_datetime(epoch: &Epoch) -> String {
    let (year, month, day, hour, minute, second, _) = epoch.to_gregorian_utc();
    format!("{year:04}/{month:02}/{day:02} {hour:02}:{minute:02}:{second:02}")
}

fn check_supported_day(year: i32, month: u8, day: u8) -> Result<(), EphemerisError> {
    if (year, month, day) < FIRST_SUPPORTED_DAY || year > LAST_SUPPORTED_YEAR {
        return Err(EphemerisError::UnsupportedDate(format!(
            "{year:04}/{month:02}/{day:02}"
        )));
    }
    Ok(())
}

/// Reject UTC epochs outside of the supported range.
pub fn check_supported_epoch(utc: &Epoch) -> Result<(), EphemerisError> {
    let (year, month, day, ..) = utc.to_gregorian_utc();
    check_supported_day(year, month, day)
}

/// Validate a UTC offset: finite and within ±14 hours.
pub fn check_utc_offset(offset: Hours) -> Result<Hours, EphemerisError> {
    if !offset.is_finite() || offset.abs() > MAX_UTC_OFFSET {
        return Err(EphemerisError::InvalidUtcOffset(offset));
    }
    Ok(offset)
}

/// A local wall-clock time together with its offset from UTC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instant {
    /// Naive local epoch (calendar fields are local)
    pub local: Epoch,
    /// Offset from UTC in hours, East positive (e.g. `7.0` for Jakarta, `5.5` for India)
    pub utc_offset_hours: Hours,
}

impl Instant {
    pub fn new(local: Epoch, utc_offset_hours: Hours) -> Result<Self, EphemerisError> {
        Ok(Instant {
            local,
            utc_offset_hours: check_utc_offset(utc_offset_hours)?,
        })
    }

    /// Parse the local time with [`parse_local_datetime`] and attach the offset.
    pub fn parse(local_time: &str, utc_offset_hours: Hours) -> Result<Self, EphemerisError> {
        Instant::new(parse_local_datetime(local_time)?, utc_offset_hours)
    }

    /// Rebuild the local instant corresponding to `utc` at the given offset.
    ///
    /// `Instant::from_utc(i.utc(), i.utc_offset_hours)` gives back `i`.
    pub fn from_utc(utc: Epoch, utc_offset_hours: Hours) -> Result<Self, EphemerisError> {
        let offset = check_utc_offset(utc_offset_hours)?;
        Ok(Instant {
            local: utc + offset * Unit::Hour,
            utc_offset_hours: offset,
        })
    }

    /// The UTC epoch: local time minus the offset.
    pub fn utc(&self) -> Epoch {
        self.local - self.utc_offset_hours * Unit::Hour
    }
}

/// Julian centuries of TT elapsed since J2000.0.
pub fn julian_centuries_tt(epoch: &Epoch) -> f64 {
    (epoch.to_jde_tt_days() - JD2000) / DAYS_PER_JULIAN_CENTURY
}

/// Greenwich Mean Sidereal Time, in radians within `[0, 2π)`.
///
/// IAU 1982 polynomial for GMST at 0h UT1, plus the sidereal rotation over the elapsed
/// fraction of the day.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date, UT1 scale (UTC is used as a stand-in by this crate)
///
/// Return
/// ------
/// * GMST in radians
///
/// See also
/// --------
/// * Explanatory Supplement to the Astronomical Almanac (1992).
pub fn gmst(tjm: MJD) -> f64 {
    // GMST at 0h UT1, seconds
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // sidereal day / solar day
    const RAP: f64 = 1.00273790934;

    let day = tjm.floor();
    let t = (day - T2000) / DAYS_PER_JULIAN_CENTURY;

    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / SECONDS_PER_DAY;
    let angle = gmst0 + tjm.fract() * DPI * RAP;

    let wrapped = angle.rem_euclid(DPI);
    if wrapped >= DPI {
        0.0
    } else {
        wrapped
    }
}
