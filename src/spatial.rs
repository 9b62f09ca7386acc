//! The public summarize and interpolate workflows.
//!
//! A request runs through validation, the eligibility gate, the station directory,
//! the ranker, the values provider and finally the synchronous engine. All
//! configuration errors surface before the first collaborator call.

use crate::eligibility::{check, Eligibility};
use crate::engine::aligner::{align, AlignmentGrid};
use crate::engine::assembler::SpatialResult;
use crate::engine::interpolator::interpolate;
use crate::engine::summarizer::summarize;
use crate::error::SpatialError;
use crate::settings::{
    validate_distance, FetchSettings, InterpolationSettings, ParameterDistanceLimits, Weighting,
};
use crate::stations::directory::StationDirectory;
use crate::stations::ranker::StationRanker;
use crate::types::date_range::DateRange;
use crate::types::observation::Observation;
use crate::types::parameter::Parameter;
use crate::types::provider::ProviderContext;
use crate::values::provider::ValuesProvider;
use bon::bon;
use futures_util::{stream, StreamExt};
use log::{debug, info, warn};
use std::collections::HashMap;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use meteo_spatial::LatLon;
///
/// let hosterwitz = LatLon(51.0221, 13.8470);
/// assert_eq!(hosterwitz.0, 51.0221); // Latitude
/// assert!(hosterwitz.is_valid());
/// assert!(!LatLon(f64::NAN, 13.8470).is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    /// Whether both coordinates are finite and within their ranges.
    pub fn is_valid(&self) -> bool {
        self.0.is_finite()
            && self.1.is_finite()
            && (-90.0..=90.0).contains(&self.0)
            && (-180.0..=180.0).contains(&self.1)
    }
}

// Either the gate's rejection or the aligned grid.
enum Prepared {
    Ineligible(String),
    Grid(AlignmentGrid),
}

/// Runs spatial requests against one station directory and one values provider.
///
/// The client keeps no state between requests. Caching, if wanted, is injected by
/// wrapping the collaborators, e.g. in a [`crate::CachingValuesProvider`].
///
/// # Examples
///
/// ```rust
/// # use meteo_spatial::*;
/// # use chrono::{TimeZone, Utc};
/// # #[tokio::main]
/// # async fn main() -> Result<(), SpatialError> {
/// let date = Utc.with_ymd_and_hms(1950, 1, 1, 0, 0, 0).unwrap();
/// let client = SpatialClient::new(
///     StaticStationDirectory::new(vec![Station::new(
///         "01050", "Dresden-Hosterwitz", 51.0221, 13.8470, 114.0,
///     )]),
///     StaticValuesProvider::new(vec![Observation::new(
///         "01050", date, Parameter::TEMPERATURE_AIR_MEAN_200, Some(270.45),
///     )]),
/// );
///
/// let result = client
///     .summarize()
///     .location(LatLon(51.0221, 13.8470))
///     .context(&ProviderContext::dwd_observation(Resolution::Daily, "climate_summary"))
///     .parameters(&[Parameter::TEMPERATURE_AIR_MEAN_200])
///     .date_range(DateRange::new(date, date)?)
///     .call()
///     .await?;
///
/// assert_eq!(result.outcome, Outcome::Ok);
/// assert_eq!(result.rows[0].value, 270.45);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SpatialClient<D, V> {
    directory: D,
    provider: V,
    limits: ParameterDistanceLimits,
    fetch: FetchSettings,
    activity_filter: bool,
}

impl<D, V> SpatialClient<D, V> {
    /// Creates a client with default distance limits and fetch settings.
    pub fn new(directory: D, provider: V) -> Self {
        Self {
            directory,
            provider,
            limits: ParameterDistanceLimits::default(),
            fetch: FetchSettings::default(),
            activity_filter: true,
        }
    }

    pub fn with_distance_limits(mut self, limits: ParameterDistanceLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_fetch_settings(mut self, fetch: FetchSettings) -> Self {
        self.fetch = fetch;
        self
    }

    /// Whether stations whose activity period misses the date range are skipped.
    /// Enabled by default.
    pub fn with_activity_filter(mut self, enabled: bool) -> Self {
        self.activity_filter = enabled;
        self
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn provider(&self) -> &V {
        &self.provider
    }
}

#[bon]
impl<D, V> SpatialClient<D, V>
where
    D: StationDirectory + Sync,
    V: ValuesProvider + Sync,
{
    /// Returns, per `(date, parameter)`, the value of the nearest station that has one.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: **Required.** The target point.
    /// * `.context(&ProviderContext)`: **Required.** Provider, network, resolution and dataset.
    /// * `.parameters(&[Parameter])`: **Required.** At least one parameter.
    /// * `.date_range(DateRange)`: **Required.** Inclusive time window.
    /// * `.max_count(usize)`: Optional. Maximum number of candidate stations.
    /// * `.max_distance_km(f64)`: Optional. Caps every per-parameter distance limit.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidConfiguration`] for malformed arguments, before any
    /// collaborator is called. Collaborator failures are returned as
    /// [`SpatialError::StationDirectory`] or [`SpatialError::ValuesProvider`].
    ///
    /// An ineligible provider context or a request without qualifying data is not an
    /// error; see [`crate::Outcome`].
    #[builder]
    pub async fn summarize(
        &self,
        location: LatLon,
        context: &ProviderContext,
        parameters: &[Parameter],
        date_range: DateRange,
        max_count: Option<usize>,
        max_distance_km: Option<f64>,
    ) -> Result<SpatialResult, SpatialError> {
        let grid = match self
            .prepare(location, context, parameters, date_range, max_count, max_distance_km)
            .await?
        {
            Prepared::Ineligible(reason) => return Ok(SpatialResult::ineligible(reason)?),
            Prepared::Grid(grid) => grid,
        };

        let rows = summarize(&grid);
        info!("Summarized {} of {} cells", rows.len(), grid.len());
        Ok(SpatialResult::from_rows(rows)?)
    }

    /// Returns, per `(date, parameter)`, a distance-weighted blend of nearby stations.
    ///
    /// Takes the same arguments as [`SpatialClient::summarize`], plus:
    ///
    /// * `.min_neighbors(usize)`: Optional. Stations needed per cell, default 4.
    /// * `.max_neighbors(usize)`: Optional. Stations used per cell, default
    ///   `max(4, min_neighbors)`.
    /// * `.weighting(Weighting)`: Optional. Default [`Weighting::InverseDistance`].
    ///
    /// Cells with fewer than `min_neighbors` usable stations produce no row.
    #[builder]
    #[allow(clippy::too_many_arguments)]
    pub async fn interpolate(
        &self,
        location: LatLon,
        context: &ProviderContext,
        parameters: &[Parameter],
        date_range: DateRange,
        max_count: Option<usize>,
        max_distance_km: Option<f64>,
        min_neighbors: Option<usize>,
        max_neighbors: Option<usize>,
        weighting: Option<Weighting>,
    ) -> Result<SpatialResult, SpatialError> {
        let defaults = InterpolationSettings::default();
        let min_neighbors = min_neighbors.unwrap_or(defaults.min_neighbors);
        let settings = InterpolationSettings {
            min_neighbors,
            max_neighbors: max_neighbors.unwrap_or(defaults.max_neighbors.max(min_neighbors)),
            max_distance_km,
            weighting: weighting.unwrap_or_default(),
        };
        settings.validate()?;

        let grid = match self
            .prepare(location, context, parameters, date_range, max_count, max_distance_km)
            .await?
        {
            Prepared::Ineligible(reason) => return Ok(SpatialResult::ineligible(reason)?),
            Prepared::Grid(grid) => grid,
        };

        let rows = interpolate(&grid, &settings);
        info!("Interpolated {} of {} cells", rows.len(), grid.len());
        Ok(SpatialResult::from_rows(rows)?)
    }

    fn validate(
        &self,
        location: LatLon,
        parameters: &[Parameter],
        max_count: Option<usize>,
        max_distance_km: Option<f64>,
    ) -> Result<(), SpatialError> {
        if !location.is_valid() {
            return Err(SpatialError::invalid(format!(
                "target location ({}, {}) is not a valid coordinate",
                location.0, location.1
            )));
        }
        if parameters.is_empty() {
            return Err(SpatialError::invalid("at least one parameter is required"));
        }
        if max_count == Some(0) {
            return Err(SpatialError::invalid("max_count must be at least 1"));
        }
        if let Some(km) = max_distance_km {
            validate_distance("max_distance_km", km)?;
        }
        self.limits.validate()?;
        self.fetch.validate()
    }

    /// Shared front half of both workflows: everything up to the aligned grid.
    async fn prepare(
        &self,
        location: LatLon,
        context: &ProviderContext,
        parameters: &[Parameter],
        date_range: DateRange,
        max_count: Option<usize>,
        max_distance_km: Option<f64>,
    ) -> Result<Prepared, SpatialError> {
        self.validate(location, parameters, max_count, max_distance_km)?;

        if let Eligibility::Ineligible { reason } = check(context) {
            warn!("{}", reason);
            return Ok(Prepared::Ineligible(reason));
        }

        let stations = self
            .directory
            .list_stations(context)
            .await
            .map_err(|e| SpatialError::StationDirectory {
                context: context.to_string(),
                source: Box::new(e),
            })?;
        let listed = stations.len();
        let stations: Vec<_> = stations
            .into_iter()
            .filter(|station| !self.activity_filter || station.is_active_during(&date_range))
            .collect();
        if stations.len() < listed {
            debug!(
                "Skipped {} stations inactive during {}",
                listed - stations.len(),
                date_range
            );
        }

        // Per-parameter limits are enforced on the grid; the search radius only needs
        // to cover the widest one.
        let cap_km = max_distance_km.unwrap_or(f64::INFINITY);
        let radius_km = self.limits.widest(parameters).min(cap_km);
        let candidates = StationRanker::new(stations).rank(location, max_count, Some(radius_km));
        info!(
            "Found {} candidate stations within {:.1} km of ({}, {}) for {}",
            candidates.len(),
            radius_km,
            location.0,
            location.1,
            context
        );

        let date_range = &date_range;
        let mut fetches = stream::iter(candidates.iter().map(move |candidate| async move {
            let station_id = candidate.station.station_id.as_str();
            let result = self
                .provider
                .fetch_values(context, station_id, parameters, date_range)
                .await;
            (station_id, result)
        }))
        .buffered(self.fetch.concurrency);

        let mut values_by_station: HashMap<String, Vec<Observation>> = HashMap::new();
        while let Some((station_id, result)) = fetches.next().await {
            let mut observations = match result {
                Ok(observations) => observations,
                Err(e) if self.fetch.skip_failed_stations => {
                    warn!("Skipping station {}: {}", station_id, e);
                    continue;
                }
                Err(e) => {
                    return Err(SpatialError::ValuesProvider {
                        station: station_id.to_string(),
                        source: Box::new(e),
                    })
                }
            };
            let fetched = observations.len();
            observations
                .retain(|o| parameters.contains(&o.parameter) && date_range.contains(&o.date));
            if observations.len() < fetched {
                debug!(
                    "Ignored {} observations of station {} outside the request",
                    fetched - observations.len(),
                    station_id
                );
            }
            values_by_station.insert(station_id.to_string(), observations);
        }
        debug!("Collected values from {} stations", values_by_station.len());

        let mut grid = align(&candidates, &values_by_station);
        grid.retain_within(|parameter| self.limits.limit_for(parameter).min(cap_km));
        Ok(Prepared::Grid(grid))
    }
}
