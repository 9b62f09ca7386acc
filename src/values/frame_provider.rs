//! A values provider backed by a long-format polars frame.
//!
//! The frame holds one row per observation with the columns `station_id`, `date`,
//! `parameter` and `value`. It may live in memory or be scanned lazily from a parquet
//! file, e.g. one previously exported by a provider adapter. Polars work runs on the
//! blocking pool.

use crate::types::date_range::DateRange;
use crate::types::observation::Observation;
use crate::types::parameter::Parameter;
use crate::types::provider::ProviderContext;
use crate::values::error::ValuesError;
use crate::values::provider::ValuesProvider;
use chrono::DateTime;
use log::debug;
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Columns an observation frame must provide.
pub const OBSERVATION_COLUMNS: [&str; 4] = ["station_id", "date", "parameter", "value"];

#[derive(Debug, Clone)]
enum FrameSource {
    Memory(DataFrame),
    Parquet(PathBuf),
}

#[derive(Debug, Clone)]
pub struct FrameValuesProvider {
    source: FrameSource,
}

impl FrameValuesProvider {
    /// Wraps an in-memory observation frame.
    ///
    /// # Errors
    ///
    /// Returns [`ValuesError::MissingColumn`] if one of [`OBSERVATION_COLUMNS`] is absent.
    pub fn new(frame: DataFrame) -> Result<Self, ValuesError> {
        for column in OBSERVATION_COLUMNS {
            frame
                .column(column)
                .map_err(|e| ValuesError::MissingColumn {
                    column: column.to_string(),
                    source: e,
                })?;
        }
        Ok(Self {
            source: FrameSource::Memory(frame),
        })
    }

    /// Reads observations from a parquet file, scanning it lazily on every fetch.
    ///
    /// Only the schema is read up front.
    pub fn from_parquet(path: impl AsRef<Path>) -> Result<Self, ValuesError> {
        let path = path.as_ref().to_path_buf();
        let schema = LazyFrame::scan_parquet(&path, Default::default())
            .and_then(|mut frame| frame.collect_schema())
            .map_err(|e| ValuesError::ParquetScan(path.clone(), e))?;
        for column in OBSERVATION_COLUMNS {
            if !schema.contains(column) {
                return Err(ValuesError::MissingColumn {
                    column: column.to_string(),
                    source: PolarsError::ColumnNotFound(
                        format!("{column} in '{}'", path.display()).into(),
                    ),
                });
            }
        }
        Ok(Self {
            source: FrameSource::Parquet(path),
        })
    }
}

impl FrameSource {
    fn lazy(&self) -> PolarsResult<LazyFrame> {
        let frame = match self {
            FrameSource::Memory(frame) => frame.clone().lazy(),
            FrameSource::Parquet(path) => LazyFrame::scan_parquet(path, Default::default())?,
        };
        // Normalize dtypes so the per-station filters can compare directly.
        Ok(frame.select([
            col("station_id").cast(DataType::String),
            col("date").cast(DataType::Datetime(TimeUnit::Milliseconds, None)),
            col("parameter").cast(DataType::String),
            col("value").cast(DataType::Float64),
        ]))
    }

    fn collect_station(&self, station_id: &str, date_range: &DateRange) -> PolarsResult<DataFrame> {
        self.lazy()?
            .filter(col("station_id").eq(lit(station_id.to_string())))
            .filter(
                col("date")
                    .gt_eq(lit(date_range.start().naive_utc()))
                    .and(col("date").lt_eq(lit(date_range.end().naive_utc()))),
            )
            .select([
                col("date").cast(DataType::Int64).alias("date_ms"),
                col("parameter"),
                col("value"),
            ])
            .collect()
    }
}

fn frame_to_observations(
    df: &DataFrame,
    station_id: &str,
    parameters: &[Parameter],
) -> Result<Vec<Observation>, ValuesError> {
    let frame_error = |e| ValuesError::Frame {
        station: station_id.to_string(),
        source: e,
    };
    let dates = df.column("date_ms").map_err(frame_error)?.i64().map_err(frame_error)?;
    let names = df.column("parameter").map_err(frame_error)?.str().map_err(frame_error)?;
    let values = df.column("value").map_err(frame_error)?.f64().map_err(frame_error)?;

    let mut observations = Vec::with_capacity(df.height());
    for ((millis, name), value) in dates.into_iter().zip(names).zip(values) {
        // Rows without a date or parameter cannot be placed in any cell.
        let (Some(millis), Some(name)) = (millis, name) else {
            continue;
        };
        let parameter = Parameter::new(name);
        if !parameters.contains(&parameter) {
            continue;
        }
        let date = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            ValuesError::InvalidTimestamp {
                station: station_id.to_string(),
                millis,
            }
        })?;
        observations.push(Observation::new(station_id, date, parameter, value));
    }
    Ok(observations)
}

impl ValuesProvider for FrameValuesProvider {
    type Error = ValuesError;

    async fn fetch_values(
        &self,
        _context: &ProviderContext,
        station_id: &str,
        parameters: &[Parameter],
        date_range: &DateRange,
    ) -> Result<Vec<Observation>, ValuesError> {
        let source = self.source.clone();
        let station = station_id.to_string();
        let range = *date_range;
        let df = tokio::task::spawn_blocking(move || {
            source
                .collect_station(&station, &range)
                .map_err(|e| ValuesError::Frame { station, source: e })
        })
        .await??;

        let observations = frame_to_observations(&df, station_id, parameters)?;
        debug!(
            "Loaded {} observations for station {} from frame",
            observations.len(),
            station_id
        );
        Ok(observations)
    }
}
