//! # Geodesic distance on an oblate ellipsoid (Vincenty inverse)
//!
//! Solves the inverse geodesic problem (two points → distance and azimuths) on an ellipsoid of
//! revolution with Vincenty's iterative method (Survey Review, 1975).
//!
//! ## Algorithm
//!
//! Reduced latitudes `U = atan((1 − f)·tan φ)`; the longitude difference on the auxiliary
//! sphere λ starts at `L = λ₂ − λ₁` and is refined by fixed-point iteration:
//!
//! ```text
//! sin σ   = √((cos U₂ sin λ)² + (cos U₁ sin U₂ − sin U₁ cos U₂ cos λ)²)
//! cos σ   = sin U₁ sin U₂ + cos U₁ cos U₂ cos λ
//! sin α   = cos U₁ cos U₂ sin λ / sin σ
//! cos 2σₘ = cos σ − 2 sin U₁ sin U₂ / cos²α
//! C       = f/16 · cos²α · (4 + f (4 − 3 cos²α))
//! λ'      = L + (1 − C) f sin α (σ + C sin σ (cos 2σₘ + C cos σ (−1 + 2 cos² 2σₘ)))
//! ```
//!
//! until `|λ' − λ| ≤ 1e-12`, with a hard budget of
//! [`VINCENTY_MAX_ITERATIONS`](crate::constants::VINCENTY_MAX_ITERATIONS). The distance is then
//! `s = b·A·(σ − Δσ)`.
//!
//! ## Degenerate inputs
//!
//! - Identical points short-circuit to a zero distance before iterating.
//! - Antipodal and near-antipodal pairs (sin σ → 0 with cos σ < 0, or |λ| > π) are reported as
//!   [`GeodesicError::NearAntipodal`]; no NaN or infinity ever leaves the solver.
//! - Lines on or grazing the equator have cos²α ≈ 0; cos 2σₘ is then taken as 0.

use std::f64::consts::PI;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::bearing::initial_bearing;
use crate::constants::{
    Degree, Kilometer, Meter, EARTH_MAJOR_AXIS, VINCENTY_DEGENERACY_EPS,
    VINCENTY_MAX_ITERATIONS, VINCENTY_TOLERANCE, WGS84_FLATTENING,
};
use crate::conversion::{deg_to_rad, normalize_deg_0_360, rad_to_deg};
use crate::geo_point::GeoPoint;
use crate::qibla_errors::GeodesicError;

/// Ellipsoid of revolution given by its equatorial radius and flattening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Equatorial radius `a`, in meters.
    pub semi_major_axis: Meter,
    /// Flattening `f = (a − b) / a`.
    pub flattening: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major_axis: EARTH_MAJOR_AXIS,
        flattening: WGS84_FLATTENING,
    };

    /// Polar radius `b = (1 − f)·a`, in meters.
    pub fn semi_minor_axis(&self) -> Meter {
        (1.0 - self.flattening) * self.semi_major_axis
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Ellipsoid::WGS84
    }
}

/// Full output of [`vincenty_inverse`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VincentyInverse {
    /// Ellipsoidal distance, in meters.
    pub distance_meters: Meter,
    /// Ellipsoidal azimuth at the first point, in `[0, 360)`.
    pub forward_azimuth_deg: Degree,
    /// Ellipsoidal azimuth at the second point (direction of travel on arrival), in `[0, 360)`.
    pub reverse_azimuth_deg: Degree,
    /// Number of λ updates performed (0 for identical points).
    pub iterations: usize,
}

impl VincentyInverse {
    fn zero() -> Self {
        VincentyInverse {
            distance_meters: 0.0,
            forward_azimuth_deg: 0.0,
            reverse_azimuth_deg: 0.0,
            iterations: 0,
        }
    }
}

/// Distance and initial bearing from one point to another.
///
/// The bearing is the spherical initial bearing of [`initial_bearing`]; the distance comes from
/// the ellipsoidal solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeodesicResult {
    pub distance_meters: Meter,
    pub initial_bearing_deg: Degree,
}

impl GeodesicResult {
    pub fn distance_km(&self) -> Kilometer {
        self.distance_meters / 1000.0
    }
}

/// Longitude difference `to − from` wrapped into `[-180, 180)`.
fn longitude_difference(from: &GeoPoint, to: &GeoPoint) -> Degree {
    (to.longitude() - from.longitude() + 180.0).rem_euclid(360.0) - 180.0
}

fn is_same_location(p1: &GeoPoint, p2: &GeoPoint) -> bool {
    p1.latitude() == p2.latitude()
        && (longitude_difference(p1, p2) == 0.0 || p1.latitude().abs() == 90.0)
}

/// Solve the inverse geodesic problem between `p1` and `p2`.
///
/// Arguments
/// ---------
/// * `p1`, `p2`: the two end points
/// * `ellipsoid`: reference ellipsoid, usually [`Ellipsoid::WGS84`]
///
/// Return
/// ------
/// * the distance in meters, both ellipsoidal azimuths and the number of iterations used
///
/// Errors
/// ------
/// * [`GeodesicError::NearAntipodal`] when the points are (nearly) antipodal and the iteration
///   becomes numerically unstable
/// * [`GeodesicError::DidNotConverge`] when the iteration budget is exhausted
pub fn vincenty_inverse(
    p1: &GeoPoint,
    p2: &GeoPoint,
    ellipsoid: &Ellipsoid,
) -> Result<VincentyInverse, GeodesicError> {
    vincenty_inverse_bounded(p1, p2, ellipsoid, VINCENTY_MAX_ITERATIONS)
}

/// [`vincenty_inverse`] with an explicit iteration budget.
pub fn vincenty_inverse_bounded(
    p1: &GeoPoint,
    p2: &GeoPoint,
    ellipsoid: &Ellipsoid,
    max_iterations: usize,
) -> Result<VincentyInverse, GeodesicError> {
    if is_same_location(p1, p2) {
        return Ok(VincentyInverse::zero());
    }

    let a = ellipsoid.semi_major_axis;
    let f = ellipsoid.flattening;
    let b = ellipsoid.semi_minor_axis();

    let l = deg_to_rad(longitude_difference(p1, p2));
    let u1 = ((1.0 - f) * p1.latitude_rad().tan()).atan();
    let u2 = ((1.0 - f) * p2.latitude_rad().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;

    for iteration in 1..=max_iterations {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;

        if sin_sigma < VINCENTY_DEGENERACY_EPS {
            if cos_sigma > 0.0 {
                // distinct inputs closer than the solver resolution
                return Ok(VincentyInverse {
                    iterations: iteration,
                    ..VincentyInverse::zero()
                });
            }
            debug!("vincenty: sin σ vanished at iteration {iteration}, antipodal points");
            return Err(GeodesicError::NearAntipodal);
        }

        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;

        // geodesic along (or grazing) the equator
        let cos_2sigma_m = if cos_sq_alpha.abs() < VINCENTY_DEGENERACY_EPS {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };

        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if lambda.abs() > PI {
            debug!("vincenty: |λ| exceeded π at iteration {iteration}, near-antipodal points");
            return Err(GeodesicError::NearAntipodal);
        }

        if (lambda - lambda_prev).abs() <= VINCENTY_TOLERANCE {
            let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma.powi(2))
                                * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));

            let distance_meters = b * big_a * (sigma - delta_sigma);

            // azimuths use the converged λ
            let (sin_lambda, cos_lambda) = lambda.sin_cos();
            let alpha1 = (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
            let alpha2 =
                (cos_u1 * sin_lambda).atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_lambda);

            trace!("vincenty: converged after {iteration} iterations, s = {distance_meters} m");

            return Ok(VincentyInverse {
                distance_meters,
                forward_azimuth_deg: normalize_deg_0_360(rad_to_deg(alpha1)),
                reverse_azimuth_deg: normalize_deg_0_360(rad_to_deg(alpha2)),
                iterations: iteration,
            });
        }
    }

    debug!("vincenty: no convergence within {max_iterations} iterations");
    Err(GeodesicError::DidNotConverge {
        iterations: max_iterations,
    })
}

/// Distance (Vincenty) and initial bearing (spherical) from `from` to `to`.
pub fn geodesic_between(
    from: &GeoPoint,
    to: &GeoPoint,
    ellipsoid: &Ellipsoid,
) -> Result<GeodesicResult, GeodesicError> {
    let solution = vincenty_inverse(from, to, ellipsoid)?;
    Ok(GeodesicResult {
        distance_meters: solution.distance_meters,
        initial_bearing_deg: initial_bearing(from, to),
    })
}
