//! The values provider collaborator and its in-memory adapter.

use crate::types::date_range::DateRange;
use crate::types::observation::Observation;
use crate::types::parameter::Parameter;
use crate::types::provider::ProviderContext;
use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;

/// Returns the observations of one station.
///
/// Implementations should only return observations for the requested parameters
/// and date range; the engine filters anything else out regardless.
pub trait ValuesProvider {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_values(
        &self,
        context: &ProviderContext,
        station_id: &str,
        parameters: &[Parameter],
        date_range: &DateRange,
    ) -> impl Future<Output = Result<Vec<Observation>, Self::Error>> + Send;
}

/// Observations held in memory, grouped by station.
#[derive(Debug, Clone, Default)]
pub struct StaticValuesProvider {
    by_station: HashMap<String, Vec<Observation>>,
}

impl StaticValuesProvider {
    pub fn new(observations: impl IntoIterator<Item = Observation>) -> Self {
        let mut by_station: HashMap<String, Vec<Observation>> = HashMap::new();
        for observation in observations {
            by_station
                .entry(observation.station_id.clone())
                .or_default()
                .push(observation);
        }
        Self { by_station }
    }
}

impl ValuesProvider for StaticValuesProvider {
    type Error = Infallible;

    async fn fetch_values(
        &self,
        _context: &ProviderContext,
        station_id: &str,
        parameters: &[Parameter],
        date_range: &DateRange,
    ) -> Result<Vec<Observation>, Infallible> {
        let Some(observations) = self.by_station.get(station_id) else {
            return Ok(Vec::new());
        };
        Ok(observations
            .iter()
            .filter(|o| parameters.contains(&o.parameter) && date_range.contains(&o.date))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::provider::Resolution;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_static_provider_filters() {
        let day = |d| Utc.with_ymd_and_hms(1950, 1, d, 0, 0, 0).unwrap();
        let provider = StaticValuesProvider::new(vec![
            Observation::new("01050", day(1), Parameter::TEMPERATURE_AIR_MEAN_200, Some(270.45)),
            Observation::new("01050", day(2), Parameter::TEMPERATURE_AIR_MEAN_200, Some(271.0)),
            Observation::new("01050", day(1), Parameter::WIND_SPEED, Some(3.0)),
            Observation::new("01048", day(1), Parameter::TEMPERATURE_AIR_MEAN_200, Some(269.0)),
        ]);
        let context = ProviderContext::dwd_observation(Resolution::Daily, "climate_summary");
        let range = DateRange::new(day(1), day(1)).unwrap();

        let values = provider
            .fetch_values(&context, "01050", &[Parameter::TEMPERATURE_AIR_MEAN_200], &range)
            .await
            .unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].value, Some(270.45));

        let unknown = provider
            .fetch_values(&context, "99999", &[Parameter::WIND_SPEED], &range)
            .await
            .unwrap();
        assert!(unknown.is_empty());
    }
}
