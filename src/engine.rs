//! # QiblaEngine: one call from DMS coordinates to a full qibla report
//!
//! The [`QiblaEngine`] wires together the numeric building blocks of the crate:
//!
//! 1. **Coordinate parsing**: DMS strings → [`GeoPoint`] ([`conversion`](crate::conversion)).
//! 2. **Qibla direction**: spherical initial bearing to the reference point
//!    ([`bearing`](crate::bearing)).
//! 3. **Distance**: Vincenty inverse on the configured ellipsoid ([`geodesic`](crate::geodesic)).
//! 4. **Sun**: optional, when the request carries a local time. The UTC offset is taken from the
//!    request or asked to the [`UtcOffsetResolver`], then the [`SolarEphemeris`] gives the
//!    topocentric Sun and the [`comparator`](crate::comparator) relates it to the qibla.
//!
//! Every failure aborts the whole computation with a [`QiblaError`]; no default value is ever
//! substituted for a failed step.
//!
//! ## Typical usage
//!
//! ```rust
//! use qibla::engine::{ComputeRequest, EngineConfig, QiblaEngine};
//!
//! let engine = QiblaEngine::new(EngineConfig::default());
//! let request = ComputeRequest::new("6° 10’ 0.0” S", "106° 49’ 0.0” E")
//!     .with_instant("2024/05/27 16:18:00", Some(7.0));
//!
//! let report = engine.compute(&request).unwrap();
//! assert!((report.qibla_bearing_deg - 295.146).abs() < 1e-3);
//! assert!(report.solar.unwrap().sun_qibla_diff_deg < 0.1);
//! ```
//!
//! ## Configuration
//!
//! [`EngineConfig`] is a plain struct with sensible defaults (Kaaba, WGS84, 8 m, no
//! refraction). It can also be read from TOML with [`EngineConfig::from_toml_str`]:
//!
//! ```toml
//! default_elevation_m = 20.0
//! refraction = "standard"
//!
//! [reference]
//! latitude = 21.4225
//! longitude = 39.8262
//! ```

use log::{debug, trace};
use serde::de::Error as _;
use serde::{Deserialize, Serialize};

use crate::comparator::BearingComparison;
use crate::constants::{Degree, Hours, Kilometer, Meter, DEFAULT_OBSERVER_ELEVATION};
use crate::geo_point::{GeoPoint, KAABA};
use crate::geodesic::{geodesic_between, Ellipsoid};
use crate::qibla_errors::{EphemerisError, QiblaError};
use crate::solar::{MeeusSun, Refraction, SolarEphemeris};
use crate::time::{format_datetime, parse_local_datetime, Instant};
use crate::timezone::{UtcOffsetResolver, Unresolved};

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Point the qibla bearing and distance are computed against
    pub reference: GeoPoint,
    /// Ellipsoid used by the distance solver
    pub ellipsoid: Ellipsoid,
    /// Observer height above the ellipsoid when the request gives none, in meters
    pub default_elevation_m: Meter,
    /// Refraction model of the built-in ephemeris
    pub refraction: Refraction,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            reference: KAABA,
            ellipsoid: Ellipsoid::WGS84,
            default_elevation_m: DEFAULT_OBSERVER_ELEVATION,
            refraction: Refraction::None,
        }
    }
}

impl EngineConfig {
    /// Read a configuration from a TOML document; missing keys keep their default value.
    ///
    /// Errors
    /// ------
    /// * [`QiblaError::Config`] for malformed TOML, an invalid reference point, a degenerate
    ///   ellipsoid or a non-finite default elevation
    pub fn from_toml_str(content: &str) -> Result<Self, QiblaError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), toml::de::Error> {
        let ellipsoid = &self.ellipsoid;
        if !(ellipsoid.semi_major_axis.is_finite() && ellipsoid.semi_major_axis > 0.0) {
            return Err(toml::de::Error::custom(format!(
                "ellipsoid semi-major axis must be positive, got {}",
                ellipsoid.semi_major_axis
            )));
        }
        if !(0.0..1.0).contains(&ellipsoid.flattening) {
            return Err(toml::de::Error::custom(format!(
                "ellipsoid flattening must be in [0, 1), got {}",
                ellipsoid.flattening
            )));
        }
        if !self.default_elevation_m.is_finite() {
            return Err(toml::de::Error::custom(format!(
                "default elevation must be finite, got {}",
                self.default_elevation_m
            )));
        }
        Ok(())
    }
}

/// Observer coordinates in the `"D° M’ S” DIR"` transport format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverInput {
    pub lat_dms: String,
    pub lon_dms: String,
}

/// Local wall-clock time, with its UTC offset when known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstantInput {
    /// `YYYY/MM/DD HH:MM:SS`
    pub local_time: String,
    /// Hours East of UTC; `None` lets the engine's resolver decide
    #[serde(default)]
    pub utc_offset_hours: Option<Hours>,
}

/// One computation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeRequest {
    pub observer: ObserverInput,
    #[serde(default)]
    pub instant: Option<InstantInput>,
    #[serde(default)]
    pub observer_elevation_m: Option<Meter>,
}

impl ComputeRequest {
    pub fn new(lat_dms: impl Into<String>, lon_dms: impl Into<String>) -> Self {
        ComputeRequest {
            observer: ObserverInput {
                lat_dms: lat_dms.into(),
                lon_dms: lon_dms.into(),
            },
            instant: None,
            observer_elevation_m: None,
        }
    }

    pub fn with_instant(
        mut self,
        local_time: impl Into<String>,
        utc_offset_hours: Option<Hours>,
    ) -> Self {
        self.instant = Some(InstantInput {
            local_time: local_time.into(),
            utc_offset_hours,
        });
        self
    }

    pub fn with_elevation(mut self, observer_elevation_m: Meter) -> Self {
        self.observer_elevation_m = Some(observer_elevation_m);
        self
    }
}

/// Sun-related part of a [`QiblaReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarReport {
    /// `YYYY/MM/DD HH:MM:SS`, UTC
    pub utc_time: String,
    pub azimuth_deg: Degree,
    pub elevation_deg: Degree,
    pub shadow_bearing_deg: Degree,
    pub sun_qibla_diff_deg: Degree,
    pub shadow_qibla_diff_deg: Degree,
}

/// Result of [`QiblaEngine::compute`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QiblaReport {
    pub observer: GeoPoint,
    /// Initial bearing to the reference point, clockwise from true North
    pub qibla_bearing_deg: Degree,
    pub distance_km: Kilometer,
    /// Present when the request carried a local time
    pub solar: Option<SolarReport>,
}

/// Qibla and Sun computation engine.
///
/// `E` is the solar theory, `Z` resolves missing UTC offsets. The default engine uses
/// [`MeeusSun`] and refuses requests without an explicit offset ([`Unresolved`]).
///
/// See also
/// --------
/// * [`QiblaEngine::with_ephemeris`], [`QiblaEngine::with_timezone`] to swap the capabilities.
#[derive(Debug, Clone)]
pub struct QiblaEngine<E: SolarEphemeris = MeeusSun, Z: UtcOffsetResolver = Unresolved> {
    config: EngineConfig,
    ephemeris: E,
    timezone: Z,
}

impl QiblaEngine {
    pub fn new(config: EngineConfig) -> Self {
        QiblaEngine {
            ephemeris: MeeusSun::new(config.refraction),
            timezone: Unresolved,
            config,
        }
    }
}

impl Default for QiblaEngine {
    fn default() -> Self {
        QiblaEngine::new(EngineConfig::default())
    }
}

impl<E: SolarEphemeris, Z: UtcOffsetResolver> QiblaEngine<E, Z> {
    /// Replace the solar theory. The `refraction` setting of the configuration only applies to
    /// the built-in [`MeeusSun`].
    pub fn with_ephemeris<E2: SolarEphemeris>(self, ephemeris: E2) -> QiblaEngine<E2, Z> {
        QiblaEngine {
            config: self.config,
            ephemeris,
            timezone: self.timezone,
        }
    }

    /// Replace the UTC offset resolver.
    pub fn with_timezone<Z2: UtcOffsetResolver>(self, timezone: Z2) -> QiblaEngine<E, Z2> {
        QiblaEngine {
            config: self.config,
            ephemeris: self.ephemeris,
            timezone,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline on a transport-level request.
    ///
    /// Arguments
    /// ---------
    /// * `request`: observer DMS strings, optional local time and observer elevation
    ///
    /// Return
    /// ------
    /// * the qibla bearing and distance, plus the Sun comparison if a time was given
    ///
    /// Errors
    /// ------
    /// * [`QiblaError::Coordinate`] for malformed or out-of-range DMS strings
    /// * [`QiblaError::Geodesic`] when the observer is (nearly) antipodal to the reference
    /// * [`QiblaError::Ephemeris`] for a bad local time, offset or elevation, an unsupported date,
    ///   or an offset the resolver cannot provide
    pub fn compute(&self, request: &ComputeRequest) -> Result<QiblaReport, QiblaError> {
        let result = self.compute_request(request);
        if let Err(err) = &result {
            debug!("qibla computation failed ({:?}): {err}", err.kind());
        }
        result
    }

    fn compute_request(&self, request: &ComputeRequest) -> Result<QiblaReport, QiblaError> {
        let observer =
            GeoPoint::from_dms_strings(&request.observer.lat_dms, &request.observer.lon_dms)?;

        let instant = request
            .instant
            .as_ref()
            .map(|input| self.resolve_instant(&observer, input))
            .transpose()?;

        self.compute_for_point(&observer, instant.as_ref(), request.observer_elevation_m)
    }

    fn resolve_instant(
        &self,
        observer: &GeoPoint,
        input: &InstantInput,
    ) -> Result<Instant, EphemerisError> {
        let local = parse_local_datetime(&input.local_time)?;
        let offset = match input.utc_offset_hours {
            Some(offset) => offset,
            None => self.timezone.resolve(observer, &local)?,
        };
        Instant::new(local, offset)
    }

    /// Same pipeline as [`compute`](Self::compute) for an already decoded observer.
    ///
    /// Arguments
    /// ---------
    /// * `observer`: the observer location
    /// * `instant`: local time and offset, `None` to skip the Sun
    /// * `elevation_m`: observer height above the ellipsoid, `None` for the configured default
    pub fn compute_for_point(
        &self,
        observer: &GeoPoint,
        instant: Option<&Instant>,
        elevation_m: Option<Meter>,
    ) -> Result<QiblaReport, QiblaError> {
        let elevation = elevation_m.unwrap_or(self.config.default_elevation_m);
        let geodesic = geodesic_between(observer, &self.config.reference, &self.config.ellipsoid)?;
        let qibla_bearing_deg = geodesic.initial_bearing_deg;

        let solar = match instant {
            Some(instant) => {
                let utc = instant.utc();
                let position = self.ephemeris.solar_position(observer, elevation, &utc)?;
                let comparison = BearingComparison::new(qibla_bearing_deg, position.azimuth_deg);

                Some(SolarReport {
                    utc_time: format_datetime(&utc),
                    azimuth_deg: position.azimuth_deg,
                    elevation_deg: position.elevation_deg,
                    shadow_bearing_deg: comparison.shadow_azimuth_deg,
                    sun_qibla_diff_deg: comparison.sun_qibla_diff_deg,
                    shadow_qibla_diff_deg: comparison.shadow_qibla_diff_deg,
                })
            }
            None => None,
        };

        trace!(
            "qibla from {observer}: bearing = {qibla_bearing_deg:.6}°, distance = {:.3} km",
            geodesic.distance_km()
        );

        Ok(QiblaReport {
            observer: *observer,
            qibla_bearing_deg,
            distance_km: geodesic.distance_km(),
            solar,
        })
    }
}

#[cfg(test)]
mod engine_test {
    use super::*;
    use crate::qibla_errors::ErrorKind;
    use crate::solar::SolarPosition;
    use crate::timezone::{FixedOffset, NauticalOffset};
    use approx::assert_relative_eq;
    use hifitime::Epoch;

    /// Sun always due West, 30° high.
    struct WesternSun;

    impl SolarEphemeris for WesternSun {
        fn solar_position(
            &self,
            _point: &GeoPoint,
            _elevation_m: Meter,
            _utc: &Epoch,
        ) -> Result<SolarPosition, EphemerisError> {
            Ok(SolarPosition {
                azimuth_deg: 270.0,
                elevation_deg: 30.0,
            })
        }
    }

    fn engine() -> QiblaEngine {
        QiblaEngine::new(EngineConfig::default())
    }

    fn jakarta() -> ComputeRequest {
        ComputeRequest::new("6° 10’ 0.0” S", "106° 49’ 0.0” E")
    }

    #[test]
    fn test_qibla_only() {
        let report = engine().compute(&jakarta()).unwrap();
        assert_relative_eq!(report.qibla_bearing_deg, 295.146083757961, epsilon = 1e-9);
        assert_relative_eq!(report.distance_km, 7917.374934697436, epsilon = 1e-6);
        assert!(report.solar.is_none());
    }

    #[test]
    fn test_jakarta_sun_on_qibla() {
        let request = jakarta().with_instant("2024/05/27 16:18:00", Some(7.0));
        let report = engine().compute(&request).unwrap();

        let solar = report.solar.unwrap();
        assert_eq!(solar.utc_time, "2024/05/27 09:18:00");
        assert_relative_eq!(solar.azimuth_deg, 295.1256, epsilon = 0.01);
        assert_relative_eq!(solar.elevation_deg, 18.80, epsilon = 0.02);
        assert!(solar.sun_qibla_diff_deg < 0.05);
        assert!(solar.shadow_qibla_diff_deg > 179.95);
        assert_relative_eq!(solar.shadow_bearing_deg, 115.1256, epsilon = 0.01);
    }

    #[test]
    fn test_swapped_capabilities() {
        let engine = engine()
            .with_ephemeris(WesternSun)
            .with_timezone(FixedOffset(7.0));
        let request = jakarta().with_instant("2024/05/27 16:18:00", None);

        let solar = engine.compute(&request).unwrap().solar.unwrap();
        assert_eq!(solar.utc_time, "2024/05/27 09:18:00");
        assert_eq!(solar.azimuth_deg, 270.0);
        assert_eq!(solar.shadow_bearing_deg, 90.0);
        assert_relative_eq!(solar.sun_qibla_diff_deg, 25.146083757961, epsilon = 1e-9);

        let nautical = self::engine().with_timezone(NauticalOffset);
        let solar = nautical.compute(&request).unwrap().solar.unwrap();
        assert_eq!(solar.utc_time, "2024/05/27 09:18:00");
    }

    #[test]
    fn test_error_tagging() {
        let engine = engine();

        let malformed = ComputeRequest::new("6 degrees south", "106° 49’ 0.0” E");
        assert_eq!(
            engine.compute(&malformed).unwrap_err().kind(),
            ErrorKind::InvalidCoordinate
        );

        let no_offset = jakarta().with_instant("2024/05/27 16:18:00", None);
        assert_eq!(
            engine.compute(&no_offset).unwrap_err().kind(),
            ErrorKind::EphemerisUnresolvedTimezone
        );

        let too_old = jakarta().with_instant("1500/01/01 12:00:00", Some(7.0));
        assert_eq!(
            engine.compute(&too_old).unwrap_err().kind(),
            ErrorKind::EphemerisUnsupportedDate
        );

        let bad_offset = jakarta().with_instant("2024/05/27 16:18:00", Some(15.0));
        assert_eq!(
            engine.compute(&bad_offset).unwrap_err().kind(),
            ErrorKind::InvalidInstant
        );

        let antipode = GeoPoint::from_decimal(-21.0, -140.0).unwrap();
        assert_eq!(
            engine.compute_for_point(&antipode, None, None).unwrap_err().kind(),
            ErrorKind::GeodesicNearAntipodal
        );
    }

    #[test]
    fn test_observer_at_reference() {
        let request = ComputeRequest::new("21° 25’ 21.2” N", "39° 49’ 34.2” E");
        let report = engine().compute(&request).unwrap();
        assert_eq!(report.observer, KAABA);
        assert_eq!(report.distance_km, 0.0);
        assert_eq!(report.qibla_bearing_deg, 0.0);
    }

    #[test]
    fn test_config_from_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            default_elevation_m = 20.0
            refraction = "standard"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_elevation_m, 20.0);
        assert_eq!(config.refraction, Refraction::Standard);
        assert_eq!(config.reference, KAABA);
        assert_eq!(config.ellipsoid, Ellipsoid::WGS84);

        let moved = EngineConfig::from_toml_str(
            r#"
            [reference]
            latitude = 0.0
            longitude = 0.0
            "#,
        )
        .unwrap();
        assert_eq!(moved.reference, GeoPoint::from_decimal(0.0, 0.0).unwrap());

        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_config_errors() {
        let bad_point = EngineConfig::from_toml_str(
            r#"
            [reference]
            latitude = 95.0
            longitude = 0.0
            "#,
        );
        assert_eq!(bad_point.unwrap_err().kind(), ErrorKind::InvalidConfig);

        let bad_ellipsoid = EngineConfig::from_toml_str(
            r#"
            [ellipsoid]
            semi_major_axis = 6378137.0
            flattening = 1.5
            "#,
        );
        assert_eq!(bad_ellipsoid.unwrap_err().kind(), ErrorKind::InvalidConfig);

        let bad_elevation = EngineConfig::from_toml_str("default_elevation_m = nan");
        assert_eq!(bad_elevation.unwrap_err().kind(), ErrorKind::InvalidConfig);

        let wrong_type = EngineConfig::from_toml_str("refraction = 3");
        assert_eq!(wrong_type.unwrap_err().kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_request_from_json() {
        let request: ComputeRequest = serde_json::from_str(
            r#"{
                "observer": {"lat_dms": "6° 10’ 0.0” S", "lon_dms": "106° 49’ 0.0” E"},
                "instant": {"local_time": "2024/05/27 16:18:00", "utc_offset_hours": 7.0}
            }"#,
        )
        .unwrap();
        assert_eq!(
            request,
            jakarta().with_instant("2024/05/27 16:18:00", Some(7.0))
        );

        let report = engine().compute(&request).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["solar"]["azimuth_deg"].is_f64());
        assert!(json["observer"]["latitude"].is_f64());
    }
}
