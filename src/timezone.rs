//! # UTC offset resolution
//!
//! When a request gives a local time without its UTC offset, the engine asks a
//! [`UtcOffsetResolver`] for it. A real geographic timezone database is an outer concern; the
//! crate provides simple resolvers only:
//!
//! - [`FixedOffset`]: always the same offset,
//! - [`NauticalOffset`]: nautical time zones, `round(longitude / 15)` hours,
//! - [`Unresolved`]: always fails, so that a missing offset is reported instead of guessed.

use hifitime::Epoch;

use crate::constants::Hours;
use crate::geo_point::GeoPoint;
use crate::qibla_errors::EphemerisError;
use crate::time::check_utc_offset;

/// Resolve the UTC offset in force at a location and local time.
pub trait UtcOffsetResolver: Send + Sync {
    /// Offset from UTC, in hours, East positive.
    ///
    /// Errors
    /// ------
    /// * [`EphemerisError::UnresolvedTimezone`] when no offset can be determined
    fn resolve(&self, point: &GeoPoint, local: &Epoch) -> Result<Hours, EphemerisError>;
}

/// Same offset everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedOffset(pub Hours);

impl UtcOffsetResolver for FixedOffset {
    fn resolve(&self, _point: &GeoPoint, _local: &Epoch) -> Result<Hours, EphemerisError> {
        check_utc_offset(self.0)
    }
}

/// Nautical time zone from the longitude alone (no political boundaries, no daylight saving).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NauticalOffset;

impl UtcOffsetResolver for NauticalOffset {
    fn resolve(&self, point: &GeoPoint, _local: &Epoch) -> Result<Hours, EphemerisError> {
        Ok((point.longitude() / 15.0).round())
    }
}

/// Never resolves: an explicit offset is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Unresolved;

impl UtcOffsetResolver for Unresolved {
    fn resolve(&self, point: &GeoPoint, _local: &Epoch) -> Result<Hours, EphemerisError> {
        Err(EphemerisError::UnresolvedTimezone {
            latitude: point.latitude(),
            longitude: point.longitude(),
        })
    }
}
