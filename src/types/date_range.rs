//! The inclusive time window a request asks observations for.

use crate::error::SpatialError;
use crate::types::into_utc_trait::IntoUtcDateTime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive `[start, end]` range of UTC timestamps.
///
/// Construction validates that `start <= end`, so every `DateRange` in circulation is
/// well formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Creates a new range from anything convertible to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidConfiguration`] if `start` lies after `end`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use meteo_spatial::DateRange;
    ///
    /// let range = DateRange::new(
    ///     NaiveDate::from_ymd_opt(1934, 1, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(1965, 12, 31).unwrap(),
    /// )
    /// .unwrap();
    /// assert!(range.start() < range.end());
    /// ```
    pub fn new(
        start: impl IntoUtcDateTime,
        end: impl IntoUtcDateTime,
    ) -> Result<Self, SpatialError> {
        let start = start.into_utc();
        let end = end.into_utc();
        if start > end {
            return Err(SpatialError::InvalidConfiguration {
                reason: format!("date range start {start} lies after end {end}"),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        self.start <= *date && *date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}
