//! # Constants and type definitions for `qibla`
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate, together with the fixed reference point (the Kaaba) and
//! the default parameters of the engine.
//!
//! ## Overview
//!
//! - Geodetic constants of the WGS84 ellipsoid
//! - Astronomical constants (AU, J2000 epoch, Julian century)
//! - Unit conversions (degrees ↔ radians, arcseconds ↔ radians)
//! - Core type aliases used across the crate
//! - The Kaaba coordinates in degrees/minutes/seconds
//! - Iteration budget and tolerance of the Vincenty solver

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of days in a Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Julian Date of J2000.0
pub const JD2000: f64 = 2_451_545.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Earth equatorial radius in meters (WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Inverse flattening of the WGS84 ellipsoid
pub const WGS84_INVERSE_FLATTENING: f64 = 298.257223563;

/// Flattening of the WGS84 ellipsoid
pub const WGS84_FLATTENING: f64 = 1.0 / WGS84_INVERSE_FLATTENING;

/// Earth polar radius in meters (WGS84), b = (1 − f)·a
pub const EARTH_MINOR_AXIS: f64 = (1.0 - WGS84_FLATTENING) * EARTH_MAJOR_AXIS;

/// Earth radius expressed in astronomical units
pub const ERAU: f64 = (EARTH_MAJOR_AXIS / 1000.) / AU;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Offset from UTC in (possibly fractional) hours
pub type Hours = f64;
/// Modified Julian Date (days)
pub type MJD = f64;

// -------------------------------------------------------------------------------------------------
// Reference point and engine defaults
// -------------------------------------------------------------------------------------------------

/// Kaaba latitude as (degrees, minutes, seconds), north.
pub const KAABA_LATITUDE_DMS: (u32, u32, f64) = (21, 25, 21.2);

/// Kaaba longitude as (degrees, minutes, seconds), east.
pub const KAABA_LONGITUDE_DMS: (u32, u32, f64) = (39, 49, 34.2);

/// Observer height above sea level used when a request does not provide one.
pub const DEFAULT_OBSERVER_ELEVATION: Meter = 8.0;

/// Hard cap on the number of Vincenty iterations.
pub const VINCENTY_MAX_ITERATIONS: usize = 1000;

/// Convergence threshold on successive λ values (radians).
pub const VINCENTY_TOLERANCE: f64 = 1e-12;

/// Below this value cos²α (or sin σ) is treated as zero by the Vincenty solver.
pub const VINCENTY_DEGENERACY_EPS: f64 = 1e-12;

/// Largest admissible UTC offset magnitude, in hours.
pub const MAX_UTC_OFFSET: Hours = 14.0;
