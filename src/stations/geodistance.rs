//! Great-circle distances between coordinates.

use crate::spatial::LatLon;
use haversine::{distance, Location as HaversineLocation, Units};

/// Mean Earth radius used for all distances, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers spanned by one degree of latitude on the sphere of [`EARTH_RADIUS_KM`].
pub(crate) const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// Haversine distance in kilometers between two `(latitude, longitude)` pairs in degrees.
///
/// NaN coordinates propagate to a NaN distance; callers exclude such stations
/// beforehand.
///
/// # Examples
///
/// ```
/// use meteo_spatial::{distance_km, LatLon};
///
/// let hosterwitz = LatLon(51.0221, 13.8470);
/// let klotzsche = LatLon(51.1278, 13.7543);
/// assert!((distance_km(hosterwitz, klotzsche) - 13.4195).abs() < 1e-3);
/// ```
pub fn distance_km(from: LatLon, to: LatLon) -> f64 {
    distance(
        HaversineLocation {
            latitude: from.0,
            longitude: from.1,
        },
        HaversineLocation {
            latitude: to.0,
            longitude: to.1,
        },
        Units::Kilometers,
    )
}
