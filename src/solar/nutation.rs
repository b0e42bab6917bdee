//! Obliquity of the ecliptic and low-precision nutation.
//!
//! Nutation keeps only the four largest terms of the IAU 1980 series (Meeus, ch. 22), which is
//! accurate to about 0.5″ in Δψ and 0.1″ in Δε. All functions take `t`, the Julian centuries of
//! TT since J2000.0 (see [`julian_centuries_tt`](crate::time::julian_centuries_tt)).

use crate::constants::{ArcSec, Radian, RADEG, RADSEC};

/// Mean obliquity of the ecliptic (IAU 1980), in radians.
pub fn mean_obliquity(t: f64) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Longitude of the ascending node of the lunar mean orbit, in radians.
pub fn moon_node_longitude(t: f64) -> Radian {
    (125.04452 - 1934.136261 * t) * RADEG
}

/// Nutation in longitude and obliquity `(Δψ, Δε)`, in arcseconds.
///
/// Arguments
/// ---------
/// * `t`: Julian centuries (TT) since J2000.0
///
/// Return
/// ------
/// * `(Δψ, Δε)` in arcseconds
pub fn nutation(t: f64) -> (ArcSec, ArcSec) {
    let omega = moon_node_longitude(t);
    // mean longitudes of the Sun and the Moon
    let l_sun = (280.4665 + 36000.7698 * t) * RADEG;
    let l_moon = (218.3165 + 481267.8813 * t) * RADEG;

    let dpsi = -17.20 * omega.sin() - 1.32 * (2.0 * l_sun).sin() - 0.23 * (2.0 * l_moon).sin()
        + 0.21 * (2.0 * omega).sin();
    let deps = 9.20 * omega.cos() + 0.57 * (2.0 * l_sun).cos() + 0.10 * (2.0 * l_moon).cos()
        - 0.09 * (2.0 * omega).cos();

    (dpsi, deps)
}

/// True obliquity ε = ε₀ + Δε, in radians.
pub fn true_obliquity(t: f64) -> Radian {
    let (_, deps) = nutation(t);
    mean_obliquity(t) + deps * RADSEC
}

/// Equation of the equinoxes Δψ·cos ε, in radians (GAST − GMST).
pub fn equation_of_equinoxes(t: f64) -> Radian {
    let (dpsi, _) = nutation(t);
    dpsi * RADSEC * true_obliquity(t).cos()
}
