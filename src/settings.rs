//! Typed configuration for the summarize and interpolate workflows.
//!
//! Every struct has documented defaults and a `validate()` that rejects malformed
//! values with [`SpatialError::InvalidConfiguration`] before any I/O happens.

use crate::error::SpatialError;
use crate::types::parameter::Parameter;
use std::collections::HashMap;
use std::fmt;

/// Distance below which a station is considered to sit on the target point, in km.
pub const ZERO_DISTANCE_KM: f64 = 1e-6;

/// Distance limit applied to parameters without an explicit entry, in km.
pub const DEFAULT_DISTANCE_LIMIT_KM: f64 = 40.0;

/// How the weight of a neighbor is derived from its distance.
#[derive(Clone, Copy, Default)]
pub enum Weighting {
    /// `1 / d`
    #[default]
    InverseDistance,
    /// `1 / d²`
    InverseDistanceSquared,
    /// `1 / d^p`
    InversePower(f64),
    /// Any non-negative function of the distance in km.
    Custom(fn(f64) -> f64),
}

impl Weighting {
    /// Weight of a neighbor at `distance_km`. Only called for strictly positive distances.
    pub fn weight(&self, distance_km: f64) -> f64 {
        match self {
            Weighting::InverseDistance => 1.0 / distance_km,
            Weighting::InverseDistanceSquared => 1.0 / (distance_km * distance_km),
            Weighting::InversePower(power) => 1.0 / distance_km.powf(*power),
            Weighting::Custom(f) => f(distance_km),
        }
    }

    fn validate(&self) -> Result<(), SpatialError> {
        if let Weighting::InversePower(power) = self {
            if !power.is_finite() || *power <= 0.0 {
                return Err(SpatialError::invalid(format!(
                    "weighting power must be finite and positive, got {power}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weighting::InverseDistance => write!(f, "InverseDistance"),
            Weighting::InverseDistanceSquared => write!(f, "InverseDistanceSquared"),
            Weighting::InversePower(p) => write!(f, "InversePower({p})"),
            Weighting::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Neighbor policy for distance-weighted interpolation.
///
/// Defaults: `min_neighbors = 4`, `max_neighbors = 4`, `max_distance_km = None`,
/// `weighting = InverseDistance`.
#[derive(Debug, Clone, Copy)]
pub struct InterpolationSettings {
    pub min_neighbors: usize,
    pub max_neighbors: usize,
    /// Neighbors farther than this are ignored. Per-parameter limits still apply.
    pub max_distance_km: Option<f64>,
    pub weighting: Weighting,
}

impl Default for InterpolationSettings {
    fn default() -> Self {
        Self {
            min_neighbors: 4,
            max_neighbors: 4,
            max_distance_km: None,
            weighting: Weighting::default(),
        }
    }
}

impl InterpolationSettings {
    pub fn with_min_neighbors(mut self, n: usize) -> Self {
        self.min_neighbors = n;
        self
    }

    pub fn with_max_neighbors(mut self, n: usize) -> Self {
        self.max_neighbors = n;
        self
    }

    pub fn with_max_distance_km(mut self, km: f64) -> Self {
        self.max_distance_km = Some(km);
        self
    }

    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    pub fn validate(&self) -> Result<(), SpatialError> {
        if self.min_neighbors < 1 {
            return Err(SpatialError::invalid(format!(
                "min_neighbors must be at least 1, got {}",
                self.min_neighbors
            )));
        }
        if self.max_neighbors < self.min_neighbors {
            return Err(SpatialError::invalid(format!(
                "max_neighbors ({}) must not be smaller than min_neighbors ({})",
                self.max_neighbors, self.min_neighbors
            )));
        }
        if let Some(km) = self.max_distance_km {
            validate_distance("max_distance_km", km)?;
        }
        self.weighting.validate()
    }
}

/// Per-parameter maximum station distance.
///
/// Defaults: 40 km for `temperature_air_mean_200` and `wind_speed`, 20 km for
/// `precipitation_height`, and [`DEFAULT_DISTANCE_LIMIT_KM`] for anything else.
#[derive(Debug, Clone)]
pub struct ParameterDistanceLimits {
    limits: HashMap<Parameter, f64>,
    fallback_km: f64,
}

impl Default for ParameterDistanceLimits {
    fn default() -> Self {
        let limits = HashMap::from([
            (Parameter::TEMPERATURE_AIR_MEAN_200, 40.0),
            (Parameter::WIND_SPEED, 40.0),
            (Parameter::PRECIPITATION_HEIGHT, 20.0),
        ]);
        Self {
            limits,
            fallback_km: DEFAULT_DISTANCE_LIMIT_KM,
        }
    }
}

impl ParameterDistanceLimits {
    /// Limits without any per-parameter entry.
    pub fn uniform(km: f64) -> Self {
        Self {
            limits: HashMap::new(),
            fallback_km: km,
        }
    }

    pub fn with_limit(mut self, parameter: Parameter, km: f64) -> Self {
        self.limits.insert(parameter, km);
        self
    }

    pub fn limit_for(&self, parameter: &Parameter) -> f64 {
        self.limits
            .get(parameter)
            .copied()
            .unwrap_or(self.fallback_km)
    }

    /// The widest limit among `parameters`, used as the station search radius.
    pub fn widest(&self, parameters: &[Parameter]) -> f64 {
        parameters
            .iter()
            .map(|p| self.limit_for(p))
            .fold(0.0, f64::max)
    }

    pub fn validate(&self) -> Result<(), SpatialError> {
        validate_distance("default distance limit", self.fallback_km)?;
        for (parameter, km) in &self.limits {
            validate_distance(&format!("distance limit for '{parameter}'"), *km)?;
        }
        Ok(())
    }
}

/// How per-station values are fetched from the values provider.
///
/// Defaults: `concurrency = 4`, `skip_failed_stations = false`.
#[derive(Debug, Clone, Copy)]
pub struct FetchSettings {
    /// Maximum number of in-flight value requests.
    pub concurrency: usize,
    /// Log and skip stations whose fetch fails instead of failing the request.
    pub skip_failed_stations: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            concurrency: 4,
            skip_failed_stations: false,
        }
    }
}

impl FetchSettings {
    pub fn validate(&self) -> Result<(), SpatialError> {
        if self.concurrency < 1 {
            return Err(SpatialError::invalid("fetch concurrency must be at least 1"));
        }
        Ok(())
    }
}

pub(crate) fn validate_distance(name: &str, km: f64) -> Result<(), SpatialError> {
    if !km.is_finite() || km < 0.0 {
        return Err(SpatialError::invalid(format!(
            "{name} must be finite and non-negative, got {km}"
        )));
    }
    Ok(())
}
