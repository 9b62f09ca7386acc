use crate::engine::aligner::AlignmentGrid;
use crate::engine::assembler::SpatialRow;

/// Picks the nearest present reading of every cell.
///
/// Cells where every station is missing produce no row. Rows come out in
/// `(date, parameter)` order.
pub fn summarize(grid: &AlignmentGrid) -> Vec<SpatialRow> {
    grid.cells()
        .filter_map(|((date, parameter), entries)| {
            let entry = entries.iter().find(|e| e.reading.is_present())?;
            Some(SpatialRow {
                date: *date,
                parameter: parameter.clone(),
                value: entry.reading.value()?,
                distance_km: entry.distance_km,
                station_id: Some(entry.station_id.clone()),
                taken_station_ids: vec![entry.station_id.clone()],
            })
        })
        .collect()
}
