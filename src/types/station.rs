//! Defines the weather station record returned by a station directory, together with
//! the implementations needed to index stations spatially with the `rstar` crate.

use crate::spatial::LatLon;
use crate::types::date_range::DateRange;
use chrono::NaiveDate;
use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

/// A single weather station as listed by a [`crate::StationDirectory`].
///
/// Identity is the `station_id`. A station is immutable for the lifetime of a request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Station {
    /// The stable provider identifier (e.g. `"01048"` for Dresden-Klotzsche).
    pub station_id: String,
    /// Human readable station name.
    pub name: String,
    /// Latitude in decimal degrees (positive for North, negative for South).
    pub latitude: f64,
    /// Longitude in decimal degrees (positive for East, negative for West).
    pub longitude: f64,
    /// Elevation above sea level in meters.
    pub elevation: f64,
    /// First day the station reported data, if known.
    #[serde(default)]
    pub active_from: Option<NaiveDate>,
    /// Last day the station reported data, if known.
    #[serde(default)]
    pub active_to: Option<NaiveDate>,
}

impl Station {
    /// Creates a station without a known activity period.
    pub fn new(
        station_id: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        elevation: f64,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            name: name.into(),
            latitude,
            longitude,
            elevation,
            active_from: None,
            active_to: None,
        }
    }

    /// Sets the activity period of the station.
    pub fn with_activity(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.active_from = from;
        self.active_to = to;
        self
    }

    pub fn location(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }

    /// Whether both coordinates are usable for distance computations.
    pub fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Whether the station's activity period overlaps the given range.
    ///
    /// Unknown bounds are treated as open, so a station without any activity
    /// information is always considered active.
    pub fn is_active_during(&self, range: &DateRange) -> bool {
        let starts_in_time = self
            .active_from
            .map_or(true, |from| from <= range.end().date_naive());
        let still_active = self
            .active_to
            .map_or(true, |to| to >= range.start().date_naive());
        starts_in_time && still_active
    }
}

// --- R-Tree Implementations ---

/// Treats a station as a point in (latitude, longitude) space.
impl RTreeObject for Station {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.latitude, self.longitude])
    }
}

/// Squared Euclidean distance in degree space.
///
/// Only used by the R-tree to prune candidates; actual distances are great-circle
/// distances computed by [`crate::stations::geodistance::distance_km`].
impl PointDistance for Station {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.latitude - point[0];
        let dy = self.longitude - point[1];
        dx * dx + dy * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn range(start_year: i32, end_year: i32) -> DateRange {
        DateRange::new(
            Utc.with_ymd_and_hms(start_year, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(end_year, 12, 31, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_activity_overlap() {
        let station = Station::new("01050", "Dresden-Hosterwitz", 51.0221, 13.8470, 114.0)
            .with_activity(NaiveDate::from_ymd_opt(1900, 1, 1), NaiveDate::from_ymd_opt(1945, 6, 30));

        assert!(station.is_active_during(&range(1934, 1965)));
        assert!(station.is_active_during(&range(1945, 1945)));
        assert!(!station.is_active_during(&range(1946, 1965)));
        assert!(!station.is_active_during(&range(1850, 1899)));
    }

    #[test]
    fn test_open_activity_bounds() {
        let station = Station::new("01048", "Dresden-Klotzsche", 51.1278, 13.7543, 227.0);
        assert!(station.is_active_during(&range(1700, 1701)));

        let ended = station.with_activity(None, NaiveDate::from_ymd_opt(2000, 1, 1));
        assert!(ended.is_active_during(&range(1700, 1701)));
        assert!(!ended.is_active_during(&range(2001, 2002)));
    }

    #[test]
    fn test_invalid_coordinates() {
        let mut station = Station::new("x", "x", f64::NAN, 13.0, 0.0);
        assert!(!station.has_valid_coordinates());
        station.latitude = 91.0;
        assert!(!station.has_valid_coordinates());
        station.latitude = 51.0;
        assert!(station.has_valid_coordinates());
    }

    #[test]
    fn test_deserialize_without_activity() {
        let json = r#"{"station_id":"01051","name":"Dresden-Strehlen","latitude":50.98,"longitude":13.85,"elevation":119.0}"#;
        let station: Station = serde_json::from_str(json).unwrap();
        assert_eq!(station.station_id, "01051");
        assert!(station.active_from.is_none());
        assert!(station.active_to.is_none());
    }
}
