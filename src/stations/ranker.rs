//! Orders stations by great-circle distance to a target point.
//!
//! Stations are indexed in an R-tree over raw (latitude, longitude) degrees. When a
//! maximum radius is given, the tree prunes everything outside a conservative circle
//! in degree space before the exact haversine distance is computed. A bounded
//! binary heap keeps the `max_count` closest stations. A station id listed more than
//! once is ranked by its copy nearest to the target.

use crate::spatial::LatLon;
use crate::stations::geodistance::{distance_km, KM_PER_DEGREE};
use crate::types::station::Station;
use log::debug;
use ordered_float::OrderedFloat;
use rstar::RTree;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

/// Widening applied to the degree-space search circle so that rounding never prunes
/// a station that lies exactly on the radius.
const SEARCH_MARGIN: f64 = 1.01;

/// A station together with its distance to the request target.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub station: Station,
    pub distance_km: f64,
}

/// Stations sorted ascending by distance, ties broken by `station_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn station_ids(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .map(|c| c.station.station_id.as_str())
            .collect()
    }

    pub fn distance_of(&self, station_id: &str) -> Option<f64> {
        self.candidates
            .iter()
            .find(|c| c.station.station_id == station_id)
            .map(|c| c.distance_km)
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

// Heap entry: ordered by distance, then station id.
struct StationCandidate<'a> {
    distance_km: OrderedFloat<f64>,
    station: &'a Station,
}

impl PartialEq for StationCandidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for StationCandidate<'_> {}
impl PartialOrd for StationCandidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for StationCandidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_km
            .cmp(&other.distance_km)
            .then_with(|| self.station.station_id.cmp(&other.station.station_id))
    }
}

/// Spatial index over one request's station list.
#[derive(Debug, Clone)]
pub struct StationRanker {
    rtree: RTree<Station>,
}

impl StationRanker {
    /// Indexes the given stations, dropping those without usable coordinates.
    pub fn new(stations: impl IntoIterator<Item = Station>) -> Self {
        let mut skipped = 0usize;
        let stations: Vec<Station> = stations
            .into_iter()
            .filter(|station| {
                let valid = station.has_valid_coordinates();
                if !valid {
                    skipped += 1;
                }
                valid
            })
            .collect();
        if skipped > 0 {
            debug!("Skipped {} stations without usable coordinates", skipped);
        }
        StationRanker {
            rtree: RTree::bulk_load(stations),
        }
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    /// Returns the stations around `target`, closest first.
    ///
    /// Stations farther than `max_distance_km` are dropped and at most `max_count`
    /// stations are returned. Never fails: no qualifying station yields an empty set.
    pub fn rank(
        &self,
        target: LatLon,
        max_count: Option<usize>,
        max_distance_km: Option<f64>,
    ) -> CandidateSet {
        if max_count == Some(0) || !target.is_valid() {
            return CandidateSet::default();
        }

        let within_radius = |station: &'_ Station| -> Option<f64> {
            let dist_km = distance_km(target, station.location());
            match max_distance_km {
                _ if !dist_km.is_finite() => None,
                Some(max_km) if dist_km > max_km => None,
                _ => Some(dist_km),
            }
        };

        let mut nearest: HashMap<&str, StationCandidate<'_>> = HashMap::new();
        let mut duplicates = 0usize;
        for station in self.prefilter(target, max_distance_km) {
            let Some(dist_km) = within_radius(station) else {
                continue;
            };
            let candidate = StationCandidate {
                distance_km: OrderedFloat(dist_km),
                station,
            };
            match nearest.entry(station.station_id.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(candidate);
                }
                Entry::Occupied(mut slot) => {
                    duplicates += 1;
                    if candidate < *slot.get() {
                        slot.insert(candidate);
                    }
                }
            }
        }
        if duplicates > 0 {
            debug!("Ignored {} farther copies of duplicate station ids", duplicates);
        }

        let mut heap: BinaryHeap<StationCandidate<'_>> = BinaryHeap::new();
        for candidate in nearest.into_values() {
            heap.push(candidate);
            if let Some(limit) = max_count {
                if heap.len() > limit {
                    // Drop the currently farthest station.
                    heap.pop();
                }
            }
        }

        let candidates = heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| Candidate {
                station: c.station.to_owned(),
                distance_km: c.distance_km.into_inner(),
            })
            .collect();
        CandidateSet { candidates }
    }

    /// Iterates over the stations that may lie within `max_distance_km`.
    ///
    /// Falls back to a full scan when no radius is given or the search circle would
    /// wrap around a pole or the antimeridian.
    fn prefilter(
        &self,
        target: LatLon,
        max_distance_km: Option<f64>,
    ) -> Box<dyn Iterator<Item = &Station> + '_> {
        let Some(max_km) = max_distance_km else {
            return Box::new(self.rtree.iter());
        };
        let d_lat = max_km / KM_PER_DEGREE * SEARCH_MARGIN;
        let outer_lat = target.0.abs() + d_lat;
        if outer_lat >= 89.0 {
            return Box::new(self.rtree.iter());
        }
        let d_lon = d_lat / outer_lat.to_radians().cos();
        if target.1 - d_lon < -180.0 || target.1 + d_lon > 180.0 {
            return Box::new(self.rtree.iter());
        }
        let squared_radius = d_lat * d_lat + d_lon * d_lon;
        Box::new(
            self.rtree
                .locate_within_distance([target.0, target.1], squared_radius),
        )
    }
}

/// Ranks `stations` around `target` in one go.
///
/// Convenience wrapper around [`StationRanker`] for callers that rank a station list
/// only once.
pub fn rank(
    target: LatLon,
    stations: &[Station],
    max_count: Option<usize>,
    max_distance_km: Option<f64>,
) -> CandidateSet {
    StationRanker::new(stations.iter().cloned()).rank(target, max_count, max_distance_km)
}
