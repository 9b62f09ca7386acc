//! Identifies which provider, resolution and dataset a request targets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Temporal granularity of observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Minute1,
    Minute10,
    Hourly,
    SubDaily,
    Daily,
    Monthly,
    Annual,
}

impl Resolution {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Resolution::Minute1 => "minute_1",
            Resolution::Minute10 => "minute_10",
            Resolution::Hourly => "hourly",
            Resolution::SubDaily => "subdaily",
            Resolution::Daily => "daily",
            Resolution::Monthly => "monthly",
            Resolution::Annual => "annual",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The provider-specific context a request runs in.
///
/// Passed through to the station directory and values provider untouched; the engine
/// only inspects it through the eligibility policy. Names are stored lowercased however
/// the context is built, including when it is deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ContextFields")]
pub struct ProviderContext {
    provider: String,
    network: String,
    resolution: Resolution,
    dataset: String,
}

#[derive(Deserialize)]
struct ContextFields {
    provider: String,
    network: String,
    resolution: Resolution,
    dataset: String,
}

impl From<ContextFields> for ProviderContext {
    fn from(fields: ContextFields) -> Self {
        Self::new(fields.provider, fields.network, fields.resolution, fields.dataset)
    }
}

impl ProviderContext {
    pub fn new(
        provider: impl Into<String>,
        network: impl Into<String>,
        resolution: Resolution,
        dataset: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into().to_lowercase(),
            network: network.into().to_lowercase(),
            resolution,
            dataset: dataset.into().to_lowercase(),
        }
    }

    /// Shorthand for the DWD observation network.
    pub fn dwd_observation(resolution: Resolution, dataset: impl Into<String>) -> Self {
        Self::new("dwd", "observation", resolution, dataset)
    }

    /// Provider identity, e.g. `"dwd"` or `"eccc"`.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// The provider's product family, e.g. `"observation"` or `"mosmix"`.
    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Named group of parameters, e.g. `"climate_summary"`.
    pub fn dataset(&self) -> &str {
        &self.dataset
    }
}

impl fmt::Display for ProviderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.provider, self.network, self.resolution, self.dataset
        )
    }
}
