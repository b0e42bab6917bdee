//! Qibla direction, geodesic distance to the Kaaba and Sun position for any observer on Earth.
//!
//! Start with [`engine::QiblaEngine`]; the numeric building blocks ([`bearing`], [`geodesic`],
//! [`solar`], [`comparator`]) can also be used on their own.

pub mod bearing;
pub mod comparator;
pub mod constants;
pub mod conversion;
pub mod engine;
pub mod geo_point;
pub mod geodesic;
pub mod qibla_errors;
pub mod solar;
pub mod time;
pub mod timezone;
