//! Identity-carrying geographic points.
//!
//! [`Point`] is the capability the index works against: an identity string plus
//! a latitude/longitude pair in degrees. [`GeoPoint`] is the concrete value type
//! used for query origins, displaced points and serialized results.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Anything that can be placed in a geo index.
///
/// Implementations must be immutable: moving a point produces a new value.
/// Latitude is expected in `[-90, 90]` and longitude in `(-180, 180]`.
pub trait Point {
    /// Identity, unique within one index's current contents.
    fn id(&self) -> &str;

    /// Latitude in degrees.
    fn lat(&self) -> f64;

    /// Longitude in degrees.
    fn lon(&self) -> f64;

    /// Convert into a `geo::Point` (x = longitude, y = latitude).
    #[inline]
    fn to_geo(&self) -> geo::Point<f64> {
        geo::Point::new(self.lon(), self.lat())
    }
}

impl<P: Point + ?Sized> Point for &P {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn lat(&self) -> f64 {
        (**self).lat()
    }

    fn lon(&self) -> f64 {
        (**self).lon()
    }
}

impl<P: Point + ?Sized> Point for Arc<P> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn lat(&self) -> f64 {
        (**self).lat()
    }

    fn lon(&self) -> f64 {
        (**self).lon()
    }
}

/// A named latitude/longitude pair.
///
/// Serializes as exactly `{ "id", "lat", "lon" }`.
///
/// # Examples
///
/// ```
/// use geocluster_types::point::{GeoPoint, Point};
///
/// let stockholm = GeoPoint::new("stockholm", 59.3293, 18.0686);
/// assert_eq!(stockholm.id(), "stockholm");
/// assert_eq!(stockholm.lat(), 59.3293);
/// assert_eq!(stockholm.lon(), 18.0686);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    id: String,
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Create a new point. Note the argument order: latitude before longitude.
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
        }
    }

    /// Copy the identity and coordinates of any [`Point`].
    pub fn from_point<P: Point + ?Sized>(point: &P) -> Self {
        Self::new(point.id(), point.lat(), point.lon())
    }

    /// Same coordinates under a different identity.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self { id: id.into(), ..self }
    }

    /// Whether latitude and longitude are finite and within their valid ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && self.lon > -180.0
            && self.lon <= 180.0
    }
}

impl Point for GeoPoint {
    #[inline]
    fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    fn lon(&self) -> f64 {
        self.lon
    }
}

impl From<&GeoPoint> for geo::Point<f64> {
    fn from(point: &GeoPoint) -> Self {
        point.to_geo()
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        point.to_geo()
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:.6}, {:.6})", self.id, self.lat, self.lon)
    }
}
