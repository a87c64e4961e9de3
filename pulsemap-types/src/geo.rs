//! Geographic point used for feature geometries and camera targets.

use serde::{Deserialize, Serialize};

use crate::error::PulseTypesError;

/// 2d point on the surface of the Earth, in degrees.
///
/// The point is serialized as a GeoJSON position: `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude.
    pub const fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Creates a point from longitude and latitude, in the order GeoJSON uses.
    pub const fn lonlat(lon: f64, lat: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// GeoJSON position of the point: `[lon, lat]`.
    pub fn to_position(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    /// Linear interpolation between `self` (`k == 0`) and `other` (`k == 1`).
    pub fn interpolate(&self, other: &GeoPoint, k: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * k,
            lon: self.lon + (other.lon - self.lon) * k,
        }
    }

    /// Returns true if both coordinates are finite and within the valid degree ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl TryFrom<Vec<f64>> for GeoPoint {
    type Error = PulseTypesError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        if value.len() < 2 {
            Err(PulseTypesError::Conversion(
                "point must contain at least 2 dimensions".to_string(),
            ))
        } else {
            Ok(GeoPoint::lonlat(value[0], value[1]))
        }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(value: GeoPoint) -> Self {
        value.to_position()
    }
}

/// Creates a new [`GeoPoint`] from latitude and longitude values (in degrees).
///
/// ```
/// use pulsemap_types::latlon;
///
/// let point = latlon!(38.0, 52.0);
/// assert_eq!(point.lat(), 38.0);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        $crate::geo::GeoPoint::latlon($lat, $lon)
    };
}
