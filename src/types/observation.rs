use crate::types::parameter::Parameter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One `(station, date, parameter, value)` record as produced by a
/// [`crate::ValuesProvider`]. The engine never mutates observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub station_id: String,
    pub date: DateTime<Utc>,
    pub parameter: Parameter,
    /// `None` (or NaN) marks an explicit missing reading.
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(
        station_id: impl Into<String>,
        date: DateTime<Utc>,
        parameter: Parameter,
        value: Option<f64>,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            date,
            parameter,
            value,
        }
    }

    pub fn reading(&self) -> Reading {
        match self.value {
            Some(value) if value.is_finite() => Reading::Present(value),
            _ => Reading::Missing,
        }
    }
}

/// State of one station's contribution to one `(date, parameter)` cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// The station reported nothing for the cell.
    Absent,
    /// The station reported the cell, but without a usable value.
    Missing,
    Present(f64),
}

impl Reading {
    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Present(value) => Some(*value),
            Reading::Absent | Reading::Missing => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Reading::Present(_))
    }
}
