//! Builds the public result: typed rows plus a polars frame with a fixed schema.

use crate::types::parameter::Parameter;
use chrono::{DateTime, Utc};
use polars::prelude::*;

/// Column names of every result frame, in order.
pub const RESULT_COLUMNS: [&str; 5] = ["date", "parameter", "value", "distance", "station_id"];

/// One summarized or interpolated `(date, parameter)` cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialRow {
    pub date: DateTime<Utc>,
    pub parameter: Parameter,
    pub value: f64,
    /// Distance of the nearest contributing station, in km.
    pub distance_km: f64,
    /// Set when exactly one station contributed.
    pub station_id: Option<String>,
    /// Every contributing station, nearest first.
    pub taken_station_ids: Vec<String>,
}

/// Data types of [`RESULT_COLUMNS`], in order.
pub fn result_dtypes() -> Vec<DataType> {
    vec![
        DataType::Datetime(TimeUnit::Milliseconds, Some("UTC".into())),
        DataType::String,
        DataType::Float64,
        DataType::Float64,
        DataType::String,
    ]
}

/// Converts rows into a frame with [`RESULT_COLUMNS`] and [`result_dtypes`].
///
/// An empty slice yields a zero-row frame with the same schema.
pub fn assemble(rows: &[SpatialRow]) -> PolarsResult<DataFrame> {
    let millis: Vec<i64> = rows.iter().map(|r| r.date.timestamp_millis()).collect();
    let date = Series::new(RESULT_COLUMNS[0].into(), millis).cast(&result_dtypes()[0])?;
    let parameter = Series::new(
        RESULT_COLUMNS[1].into(),
        rows.iter().map(|r| r.parameter.as_str()).collect::<Vec<_>>(),
    );
    let value = Series::new(
        RESULT_COLUMNS[2].into(),
        rows.iter().map(|r| r.value).collect::<Vec<f64>>(),
    );
    let distance = Series::new(
        RESULT_COLUMNS[3].into(),
        rows.iter().map(|r| r.distance_km).collect::<Vec<f64>>(),
    );
    let station_id = Series::new(
        RESULT_COLUMNS[4].into(),
        rows.iter()
            .map(|r| r.station_id.as_deref())
            .collect::<Vec<Option<&str>>>(),
    );

    DataFrame::new(vec![
        date.into(),
        parameter.into(),
        value.into(),
        distance.into(),
        station_id.into(),
    ])
}

/// How a request terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The provider context does not support spatial requests.
    Ineligible { reason: String },
    /// The request was eligible, but no cell qualified.
    NoData,
    Ok,
}

/// Result of a summarize or interpolate call.
///
/// `rows` and `frame` hold the same data, sorted by `(date, parameter)`.
#[derive(Debug, Clone)]
pub struct SpatialResult {
    pub outcome: Outcome,
    pub rows: Vec<SpatialRow>,
    pub frame: DataFrame,
}

impl SpatialResult {
    pub fn ineligible(reason: impl Into<String>) -> PolarsResult<Self> {
        Ok(Self {
            outcome: Outcome::Ineligible {
                reason: reason.into(),
            },
            rows: Vec::new(),
            frame: assemble(&[])?,
        })
    }

    pub fn from_rows(mut rows: Vec<SpatialRow>) -> PolarsResult<Self> {
        rows.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.parameter.cmp(&b.parameter))
        });
        let outcome = if rows.is_empty() {
            Outcome::NoData
        } else {
            Outcome::Ok
        };
        let frame = assemble(&rows)?;
        Ok(Self {
            outcome,
            rows,
            frame,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_eligible(&self) -> bool {
        !matches!(self.outcome, Outcome::Ineligible { .. })
    }
}
