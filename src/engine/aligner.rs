//! Merges per-station observation series into one `(date, parameter)` grid.

use crate::stations::ranker::CandidateSet;
use crate::types::observation::{Observation, Reading};
use crate::types::parameter::Parameter;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

/// A `(date, parameter)` key.
pub type CellKey = (DateTime<Utc>, Parameter);

/// One station's contribution to a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellEntry {
    pub station_id: String,
    pub distance_km: f64,
    /// Never [`Reading::Absent`]: stations without a report have no entry.
    pub reading: Reading,
}

/// Date × parameter grid of station readings.
///
/// Each cell lists its entries in candidate order (ascending distance, then station
/// id). A cell exists only if at least one station reported it. Cells iterate in
/// `(date, parameter)` order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentGrid {
    cells: BTreeMap<CellKey, Vec<CellEntry>>,
}

impl AlignmentGrid {
    pub fn cells(&self) -> impl Iterator<Item = (&CellKey, &[CellEntry])> {
        self.cells.iter().map(|(key, entries)| (key, entries.as_slice()))
    }

    pub fn cell(&self, date: DateTime<Utc>, parameter: &Parameter) -> Option<&[CellEntry]> {
        self.cells
            .get(&(date, parameter.clone()))
            .map(Vec::as_slice)
    }

    /// The reading of `station_id` in a cell, [`Reading::Absent`] if it reported nothing.
    pub fn reading(&self, date: DateTime<Utc>, parameter: &Parameter, station_id: &str) -> Reading {
        self.cell(date, parameter)
            .and_then(|entries| entries.iter().find(|e| e.station_id == station_id))
            .map_or(Reading::Absent, |e| e.reading)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Drops entries farther than the limit of their cell's parameter, and cells left
    /// without entries.
    pub fn retain_within(&mut self, limit_km: impl Fn(&Parameter) -> f64) {
        self.cells.retain(|(_, parameter), entries| {
            let limit = limit_km(parameter);
            entries.retain(|entry| entry.distance_km <= limit);
            !entries.is_empty()
        });
    }
}

/// Builds the grid from the candidates and whatever observations were collected.
///
/// Stations are visited in candidate order, so the arrival order of
/// `values_by_station` does not matter. Stations without collected values and
/// observations of stations outside the candidate set are ignored. If a station
/// reports the same cell twice, its first report wins.
pub fn align(
    candidates: &CandidateSet,
    values_by_station: &HashMap<String, Vec<Observation>>,
) -> AlignmentGrid {
    let mut cells: BTreeMap<CellKey, Vec<CellEntry>> = BTreeMap::new();
    for candidate in candidates {
        let station_id = &candidate.station.station_id;
        let Some(observations) = values_by_station.get(station_id) else {
            continue;
        };
        for observation in observations {
            let entries = cells
                .entry((observation.date, observation.parameter.clone()))
                .or_default();
            // A station's entries are contiguous at the tail while it is being visited.
            if entries.last().is_some_and(|e| &e.station_id == station_id) {
                continue;
            }
            entries.push(CellEntry {
                station_id: station_id.clone(),
                distance_km: candidate.distance_km,
                reading: observation.reading(),
            });
        }
    }
    AlignmentGrid { cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::LatLon;
    use crate::stations::ranker::rank;
    use crate::types::station::Station;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1950, 1, d, 0, 0, 0).unwrap()
    }

    fn candidates() -> CandidateSet {
        let stations = vec![
            Station::new("near", "near", 51.0, 13.0, 0.0),
            Station::new("mid", "mid", 51.1, 13.0, 0.0),
            Station::new("far", "far", 51.3, 13.0, 0.0),
        ];
        rank(LatLon(51.0, 13.0), &stations, None, None)
    }

    fn obs(station: &str, d: u32, value: Option<f64>) -> Observation {
        Observation::new(station, day(d), Parameter::TEMPERATURE_AIR_MEAN_200, value)
    }

    fn values(observations: Vec<Observation>) -> HashMap<String, Vec<Observation>> {
        let mut by_station: HashMap<String, Vec<Observation>> = HashMap::new();
        for o in observations {
            by_station.entry(o.station_id.clone()).or_default().push(o);
        }
        by_station
    }

    #[test]
    fn test_cells_keep_distance_order() {
        let grid = align(
            &candidates(),
            &values(vec![
                obs("far", 1, Some(3.0)),
                obs("near", 1, Some(1.0)),
                obs("mid", 1, None),
            ]),
        );
        let cell = grid.cell(day(1), &Parameter::TEMPERATURE_AIR_MEAN_200).unwrap();
        let ids: Vec<&str> = cell.iter().map(|e| e.station_id.as_str()).collect();
        assert_eq!(ids, ["near", "mid", "far"]);
        assert!(cell.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn test_absent_and_missing_are_distinguished() {
        let grid = align(
            &candidates(),
            &values(vec![obs("near", 1, None), obs("far", 2, Some(2.0))]),
        );
        let param = Parameter::TEMPERATURE_AIR_MEAN_200;

        assert_eq!(grid.reading(day(1), &param, "near"), Reading::Missing);
        assert_eq!(grid.reading(day(1), &param, "far"), Reading::Absent);
        assert_eq!(grid.reading(day(2), &param, "far"), Reading::Present(2.0));
        // no placeholder cells
        assert!(grid.cell(day(3), &param).is_none());
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let grid = align(
            &candidates(),
            &values(vec![obs("near", 1, Some(1.0)), obs("near", 1, Some(9.0))]),
        );
        let cell = grid.cell(day(1), &Parameter::TEMPERATURE_AIR_MEAN_200).unwrap();
        assert_eq!(cell.len(), 1);
        assert_eq!(cell[0].reading, Reading::Present(1.0));
    }

    #[test]
    fn test_unknown_stations_are_ignored() {
        let grid = align(&candidates(), &values(vec![obs("elsewhere", 1, Some(1.0))]));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_retain_within_drops_far_entries_and_empty_cells() {
        let mut grid = align(
            &candidates(),
            &values(vec![
                obs("near", 1, Some(1.0)),
                obs("far", 1, Some(3.0)),
                obs("far", 2, Some(3.0)),
            ]),
        );
        grid.retain_within(|_| 15.0);

        let cell = grid.cell(day(1), &Parameter::TEMPERATURE_AIR_MEAN_200).unwrap();
        assert_eq!(cell.len(), 1);
        assert_eq!(cell[0].station_id, "near");
        assert!(grid.cell(day(2), &Parameter::TEMPERATURE_AIR_MEAN_200).is_none());
    }
}
