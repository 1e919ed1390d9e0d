//! Geodesic math: angle conversion, point displacement and great-circle distance.
//!
//! Two Earth models are in play. Short displacements and the k-NN search window
//! use a sphere of mean radius [`EARTH_RADIUS_M`]; long displacements solve the
//! direct geodesic problem on the WGS-84 ellipsoid ([`WGS84_SEMI_MAJOR_AXIS_M`],
//! [`WGS84_FLATTENING`]). Distances come from the `geo` crate's haversine.

use crate::error::{GeoClusterError, Result};
use geo::{Distance, Haversine};
use geocluster_types::direction::Direction;
use geocluster_types::point::{GeoPoint, Point};
use std::f64::consts::PI;

/// Mean Earth radius for the spherical projection, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// WGS-84 semi-major axis, in meters.
pub const WGS84_SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;

/// WGS-84 flattening.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// Displacements at or beyond this distance need the ellipsoidal solver.
pub const SHORT_DISTANCE_LIMIT_M: f64 = 500_000.0;

/// Bearing increment applied by each retry of the ellipsoidal solver, in radians.
pub const BEARING_ADJUSTMENT_RAD: f64 = 0.0001;

/// Number of bearing-nudged attempts before the ellipsoidal solver gives up.
pub const MAX_CONVERGENCE_ATTEMPTS: usize = 200;

/// Successive sigma iterates closer than this are considered converged.
const CONVERGENCE_THRESHOLD: f64 = 1e-12;

/// Refinements allowed within one attempt before it is declared failed.
const MAX_INNER_ITERATIONS: usize = 1_000;

/// Degrees to radians.
#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Radians to degrees.
#[inline]
pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Bearing in radians, clockwise from north.
#[inline]
pub fn bearing_to_radians(direction: Direction) -> f64 {
    to_radians(direction.degrees())
}

/// Wrap a longitude into `(-180, 180]`. In-range values are returned untouched.
pub fn normalize_longitude(lon: f64) -> f64 {
    if !lon.is_finite() || (lon > -180.0 && lon <= 180.0) {
        return lon;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 { wrapped + 360.0 } else { wrapped }
}

/// Great-circle (haversine) distance between two points in meters.
///
/// Symmetric, and zero exactly when both points share coordinates.
///
/// # Examples
///
/// ```
/// use geocluster::compute::geodesic::great_circle_distance;
/// use geocluster::GeoPoint;
///
/// let london = GeoPoint::new("london", 51.5074, -0.1278);
/// let paris = GeoPoint::new("paris", 48.8566, 2.3522);
///
/// let d = great_circle_distance(&london, &paris);
/// assert!((d - 343_500.0).abs() < 1_000.0);
/// ```
pub fn great_circle_distance<A, B>(a: &A, b: &B) -> f64
where
    A: Point + ?Sized,
    B: Point + ?Sized,
{
    Haversine.distance(a.to_geo(), b.to_geo())
}

/// Move `origin` by `distance_m` along `bearing` on a spherical Earth.
///
/// Accurate for distances below [`SHORT_DISTANCE_LIMIT_M`], but the limit is not
/// enforced here; [`move_point`] does the dispatching. The result keeps the
/// origin's identity.
///
/// # Examples
///
/// ```
/// use geocluster::compute::geodesic::move_point_short;
/// use geocluster::{Direction, GeoPoint, Point};
///
/// let origin = GeoPoint::new("origin", 51.0, 0.0);
/// let moved = move_point_short(&origin, 10_000.0, Direction::NORTH);
/// assert!((moved.lat() - 51.09).abs() < 0.01);
/// ```
pub fn move_point_short<P: Point + ?Sized>(
    origin: &P,
    distance_m: f64,
    bearing: Direction,
) -> GeoPoint {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing_to_radians(bearing);

    let lat1 = to_radians(origin.lat());
    let lon1 = to_radians(origin.lon());

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(
        origin.id(),
        to_degrees(lat2),
        normalize_longitude(to_degrees(lon2)),
    )
}

/// Move `origin` by `distance_m` along `bearing` on the WGS-84 ellipsoid.
///
/// Solves the direct problem with Vincenty's iteration. When an attempt does
/// not converge the bearing is nudged by [`BEARING_ADJUSTMENT_RAD`] and the
/// solve is retried, up to [`MAX_CONVERGENCE_ATTEMPTS`] times.
///
/// # Errors
///
/// [`GeoClusterError::Convergence`] once every attempt has failed.
pub fn move_point_long<P: Point + ?Sized>(
    origin: &P,
    distance_m: f64,
    bearing: Direction,
) -> Result<GeoPoint> {
    let initial_bearing = bearing_to_radians(bearing);
    let lat = to_radians(origin.lat());
    let lon = to_radians(origin.lon());

    let mut theta = initial_bearing;
    for attempt in 0..MAX_CONVERGENCE_ATTEMPTS {
        if let Some((lat2, lon2)) = solve_direct(lat, lon, distance_m, theta) {
            if attempt > 0 {
                log::debug!(
                    "Vincenty converged for {} after {} bearing adjustments",
                    origin.id(),
                    attempt
                );
            }
            return Ok(GeoPoint::new(origin.id(), lat2, normalize_longitude(lon2)));
        }

        theta = initial_bearing + (attempt + 1) as f64 * BEARING_ADJUSTMENT_RAD;
    }

    log::warn!(
        "Vincenty failed to converge for {} ({} m at {})",
        origin.id(),
        distance_m,
        bearing
    );
    Err(GeoClusterError::Convergence {
        attempts: MAX_CONVERGENCE_ATTEMPTS,
    })
}

/// Move `origin` by `distance_m` along `bearing`.
///
/// Distances below [`SHORT_DISTANCE_LIMIT_M`] use the spherical projection.
/// Longer moves are rejected: the ellipsoidal path is available as
/// [`move_point_long`] but is not dispatched to until it has been validated.
///
/// # Errors
///
/// [`GeoClusterError::UnsupportedOperation`] when `distance_m` is 500 km or more.
pub fn move_point<P: Point + ?Sized>(
    origin: &P,
    distance_m: f64,
    bearing: Direction,
) -> Result<GeoPoint> {
    if distance_m < SHORT_DISTANCE_LIMIT_M {
        return Ok(move_point_short(origin, distance_m, bearing));
    }

    Err(GeoClusterError::UnsupportedOperation(format!(
        "moving {} m exceeds the {} m short-distance limit; long-distance moves are disabled",
        distance_m, SHORT_DISTANCE_LIMIT_M
    )))
}

/// One Vincenty direct solve. Inputs in radians, output `(lat, lon)` in degrees.
///
/// Returns `None` when sigma does not settle within the iteration budget.
fn solve_direct(lat: f64, lon: f64, distance_m: f64, bearing: f64) -> Option<(f64, f64)> {
    let a = WGS84_SEMI_MAJOR_AXIS_M;
    let f = WGS84_FLATTENING;
    let b = a * (1.0 - f);

    let tan_u1 = (1.0 - f) * lat.tan();
    let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
    let sin_u1 = tan_u1 * cos_u1;
    let cos_bearing = bearing.cos();
    let sin_bearing = bearing.sin();

    let u1 = ((1.0 - f) * lat.tan()).atan();
    let sigma1 = u1.tan().atan2(bearing.cos());
    let sin_alpha = u1.cos() * bearing.sin();
    let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
    let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let mut sigma = distance_m / (b * big_a);
    let mut sigma_p = 2.0 * PI;
    let mut cos_2sigma_m = 0.0;
    let mut sin_sigma = 0.0;
    let mut cos_sigma = 0.0;
    let mut iterations = 0;

    while (sigma - sigma_p).abs() > CONVERGENCE_THRESHOLD {
        if iterations == MAX_INNER_ITERATIONS {
            return None;
        }
        iterations += 1;

        cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        sin_sigma = sigma.sin();
        cos_sigma = sigma.cos();
        let delta_sigma = big_b
            * sin_sigma
            * (cos_2sigma_m
                + big_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                        - big_b / 6.0
                            * cos_2sigma_m
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));
        sigma_p = sigma;
        sigma = distance_m / (b * big_a) + delta_sigma;
    }

    // NaN never compares greater than the threshold, so it falls out of the loop
    if !sigma.is_finite() || (sigma - sigma_p).abs() > CONVERGENCE_THRESHOLD {
        return None;
    }

    let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_bearing;
    let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_bearing)
        .atan2((1.0 - f) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());
    let lambda = (sin_sigma * sin_bearing).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_bearing);
    let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
    let l = lambda
        - (1.0 - c)
            * f
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

    let lat2 = to_degrees(lat2);
    let lon2 = to_degrees(lon + l);
    if !lat2.is_finite() || !lon2.is_finite() {
        return None;
    }

    Some((lat2, lon2))
}
