//! Fixtures and helpers shared by the unit tests.

use crate::stations::directory::{StaticStationDirectory, StationDirectory};
use crate::types::date_range::DateRange;
use crate::types::observation::Observation;
use crate::types::parameter::Parameter;
use crate::types::provider::{ProviderContext, Resolution};
use crate::types::station::Station;
use crate::values::provider::{StaticValuesProvider, ValuesProvider};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;
use thiserror::Error;

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Records log lines per thread, so parallel tests do not see each other's output.
struct ThreadLocalLogger;

impl Log for ThreadLocalLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|records| {
            records
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: ThreadLocalLogger = ThreadLocalLogger;
static INSTALL: Once = Once::new();

/// Installs the capturing logger and clears this thread's records.
///
/// Only works with the current-thread runtime `#[tokio::test]` uses by default.
pub fn capture_logs() {
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
    RECORDS.with(|records| records.borrow_mut().clear());
}

/// Messages logged on this thread at exactly `level` since [`capture_logs`].
pub fn captured(level: Level) -> Vec<String> {
    RECORDS.with(|records| {
        records
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    })
}

pub const DRESDEN: crate::spatial::LatLon = crate::spatial::LatLon(51.0221, 13.8470);

pub fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn daily_climate_summary() -> ProviderContext {
    ProviderContext::dwd_observation(Resolution::Daily, "climate_summary")
}

pub fn dresden_range() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(1934, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(1965, 12, 31).unwrap(),
    )
    .unwrap()
}

/// Stations around Dresden-Hosterwitz, ascending distance: 01050 (0 km), 01051
/// (5.04 km), 03811 (about 9.5 km), 01048 (13.42 km), 10488 (Leipzig, beyond 40 km).
pub fn dresden_stations() -> Vec<Station> {
    vec![
        Station::new("01048", "Dresden-Klotzsche", 51.1278, 13.7543, 227.0),
        Station::new("01050", "Dresden-Hosterwitz", 51.0221, 13.8470, 114.0),
        Station::new("01051", "Dresden-Strehlen", 50.976788193094855, 13.8470, 119.0),
        Station::new("03811", "Pirna", 50.9625, 13.9444, 120.0),
        Station::new("10488", "Leipzig", 51.3151, 12.4462, 131.0),
        // only reported before the requested period
        Station::new("00001", "Dresden-Altstadt", 51.05, 13.74, 112.0)
            .with_activity(NaiveDate::from_ymd_opt(1880, 1, 1), NaiveDate::from_ymd_opt(1920, 12, 31)),
    ]
}

/// Daily mean temperatures in Kelvin.
///
/// 1934-01-01 is only usable at 01048, 1940-01-01 first at 01051 and 1950-01-01 at
/// 01050. On 1960-01-01 01050 is missing and the next three stations report.
pub fn dresden_observations() -> Vec<Observation> {
    let t = |station: &str, date: DateTime<Utc>, value: Option<f64>| {
        Observation::new(station, date, Parameter::TEMPERATURE_AIR_MEAN_200, value)
    };
    let mut observations = vec![
        t("01050", day(1934, 1, 1), None),
        t("03811", day(1934, 1, 1), Some(f64::NAN)),
        t("01048", day(1934, 1, 1), Some(273.65)),
        t("01051", day(1940, 1, 1), Some(267.65)),
        t("01048", day(1940, 1, 1), Some(268.15)),
        t("01050", day(1950, 1, 1), Some(270.45)),
        t("01051", day(1950, 1, 1), Some(271.15)),
        t("03811", day(1950, 1, 1), Some(270.95)),
        t("01048", day(1950, 1, 1), Some(269.65)),
        t("01050", day(1960, 1, 1), None),
        t("01051", day(1960, 1, 1), Some(272.15)),
        t("03811", day(1960, 1, 1), Some(271.65)),
        t("01048", day(1960, 1, 1), Some(270.65)),
        t("00001", day(1960, 1, 1), Some(250.0)),
        // outside the requested period
        t("01050", day(1970, 1, 1), Some(280.0)),
    ];
    for year in [1934, 1940, 1950, 1960] {
        observations.push(t("10488", day(year, 1, 1), Some(260.0)));
    }
    observations
}

#[derive(Debug, Error, PartialEq)]
#[error("station {0} is unavailable")]
pub struct Unavailable(pub String);

/// In-memory provider that counts calls and can fail for chosen stations.
pub struct RecordingProvider {
    inner: StaticValuesProvider,
    failing: HashSet<String>,
    pub calls: AtomicUsize,
}

impl RecordingProvider {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self {
            inner: StaticValuesProvider::new(observations),
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_for(mut self, station_id: &str) -> Self {
        self.failing.insert(station_id.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ValuesProvider for RecordingProvider {
    type Error = Unavailable;

    async fn fetch_values(
        &self,
        context: &ProviderContext,
        station_id: &str,
        parameters: &[Parameter],
        date_range: &DateRange,
    ) -> Result<Vec<Observation>, Unavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(station_id) {
            return Err(Unavailable(station_id.to_string()));
        }
        match self
            .inner
            .fetch_values(context, station_id, parameters, date_range)
            .await
        {
            Ok(observations) => Ok(observations),
            Err(never) => match never {},
        }
    }
}

/// In-memory directory that counts calls.
pub struct RecordingDirectory {
    inner: StaticStationDirectory,
    pub calls: AtomicUsize,
}

impl RecordingDirectory {
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            inner: StaticStationDirectory::new(stations),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StationDirectory for RecordingDirectory {
    type Error = std::convert::Infallible;

    async fn list_stations(
        &self,
        context: &ProviderContext,
    ) -> Result<Vec<Station>, std::convert::Infallible> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_stations(context).await
    }
}
