//! Distance-weighted interpolation over the alignment grid.

use crate::engine::aligner::{AlignmentGrid, CellEntry};
use crate::engine::assembler::SpatialRow;
use crate::settings::{InterpolationSettings, ZERO_DISTANCE_KM};
use log::debug;

/// Blends the nearest present readings of every cell.
///
/// Per cell, up to `max_neighbors` stations with a present reading (and within
/// `max_distance_km`, if set) are used. Cells with fewer than `min_neighbors` such
/// stations produce no row. If the nearest station sits on the target, its reading
/// is taken as is.
///
/// `settings` are expected to be validated.
pub fn interpolate(grid: &AlignmentGrid, settings: &InterpolationSettings) -> Vec<SpatialRow> {
    grid.cells()
        .filter_map(|((date, parameter), entries)| {
            let neighbors: Vec<(&CellEntry, f64)> = entries
                .iter()
                .filter(|e| settings.max_distance_km.map_or(true, |max| e.distance_km <= max))
                .filter_map(|e| e.reading.value().map(|value| (e, value)))
                .take(settings.max_neighbors)
                .collect();
            if neighbors.len() < settings.min_neighbors {
                return None;
            }

            let (nearest, nearest_value) = *neighbors.first()?;
            let (value, taken) = if nearest.distance_km <= ZERO_DISTANCE_KM {
                (nearest_value, &neighbors[..1])
            } else {
                let (weighted_sum, weight_sum) =
                    neighbors.iter().fold((0.0, 0.0), |(sum, weights), (e, v)| {
                        let w = settings.weighting.weight(e.distance_km);
                        (sum + w * v, weights + w)
                    });
                (weighted_sum / weight_sum, neighbors.as_slice())
            };
            if !value.is_finite() {
                debug!("Dropping {parameter} at {date}: weights do not yield a finite value");
                return None;
            }

            let taken_station_ids: Vec<String> =
                taken.iter().map(|(e, _)| e.station_id.clone()).collect();
            let station_id = match taken_station_ids.as_slice() {
                [only] => Some(only.clone()),
                _ => None,
            };
            Some(SpatialRow {
                date: *date,
                parameter: parameter.clone(),
                value,
                distance_km: nearest.distance_km,
                station_id,
                taken_station_ids,
            })
        })
        .collect()
}
