//! Injectable caches for station listings and per-station values.
//!
//! Nothing is cached implicitly. A cache is created by the caller, handed to a
//! [`CachingValuesProvider`] or [`CachingStationDirectory`], and can be shared between
//! clients through an [`Arc`] and invalidated explicitly.

use crate::stations::directory::StationDirectory;
use crate::types::date_range::DateRange;
use crate::types::observation::Observation;
use crate::types::parameter::Parameter;
use crate::types::provider::ProviderContext;
use crate::types::station::Station;
use crate::values::provider::ValuesProvider;
use log::debug;
use std::collections::{hash_map::Entry, HashMap};
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A keyed cache guarded by an async mutex.
#[derive(Debug)]
pub struct Cache<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, V: Clone> Cache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Stores `value` unless another task stored a value for `key` first.
    ///
    /// Returns the value that ends up in the cache.
    pub async fn insert(&self, key: K, value: V) -> V {
        let mut entries = self.entries.lock().await;
        match entries.entry(key) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => entry.insert(value).clone(),
        }
    }

    /// Removes one entry. Returns whether it was present.
    pub async fn invalidate(&self, key: &K) -> bool {
        self.entries.lock().await.remove(key).is_some()
    }

    /// Removes every entry whose key matches `predicate`, returning how many were removed.
    pub async fn invalidate_where(&self, predicate: impl Fn(&K) -> bool) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|key, _| !predicate(key));
        before - entries.len()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

/// Identifies one values request.
///
/// Parameters are stored sorted and deduplicated, so the order in which a caller
/// lists them does not affect cache hits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValuesCacheKey {
    pub context: ProviderContext,
    pub station_id: String,
    pub parameters: Vec<Parameter>,
    pub date_range: DateRange,
}

impl ValuesCacheKey {
    pub fn new(
        context: &ProviderContext,
        station_id: &str,
        parameters: &[Parameter],
        date_range: &DateRange,
    ) -> Self {
        let mut parameters = parameters.to_vec();
        parameters.sort();
        parameters.dedup();
        Self {
            context: context.clone(),
            station_id: station_id.to_string(),
            parameters,
            date_range: *date_range,
        }
    }
}

pub type ValuesCache = Cache<ValuesCacheKey, Vec<Observation>>;

/// Station listings keyed by provider context.
pub type StationCache = Cache<ProviderContext, Vec<Station>>;

impl Cache<ValuesCacheKey, Vec<Observation>> {
    /// Drops every cached request of one station.
    pub async fn invalidate_station(&self, station_id: &str) -> usize {
        self.invalidate_where(|key| key.station_id == station_id)
            .await
    }
}

/// Serves values from a [`ValuesCache`] and falls back to the wrapped provider.
///
/// Failed fetches are not cached.
#[derive(Debug, Clone)]
pub struct CachingValuesProvider<P> {
    inner: P,
    cache: Arc<ValuesCache>,
}

impl<P> CachingValuesProvider<P> {
    pub fn new(inner: P, cache: Arc<ValuesCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<ValuesCache> {
        &self.cache
    }
}

impl<P: ValuesProvider + Sync> ValuesProvider for CachingValuesProvider<P> {
    type Error = P::Error;

    async fn fetch_values(
        &self,
        context: &ProviderContext,
        station_id: &str,
        parameters: &[Parameter],
        date_range: &DateRange,
    ) -> Result<Vec<Observation>, P::Error> {
        let key = ValuesCacheKey::new(context, station_id, parameters, date_range);
        if let Some(cached) = self.cache.get(&key).await {
            debug!("Values cache hit for station {}", station_id);
            return Ok(cached);
        }
        debug!("Values cache miss for station {}", station_id);

        // The lock is not held while the provider runs.
        let fetched = self
            .inner
            .fetch_values(context, station_id, parameters, date_range)
            .await?;
        Ok(self.cache.insert(key, fetched).await)
    }
}

/// Serves station listings from a [`StationCache`] and falls back to the wrapped directory.
#[derive(Debug, Clone)]
pub struct CachingStationDirectory<D> {
    inner: D,
    cache: Arc<StationCache>,
}

impl<D> CachingStationDirectory<D> {
    pub fn new(inner: D, cache: Arc<StationCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<StationCache> {
        &self.cache
    }
}

impl<D: StationDirectory + Sync> StationDirectory for CachingStationDirectory<D> {
    type Error = D::Error;

    async fn list_stations(&self, context: &ProviderContext) -> Result<Vec<Station>, D::Error> {
        if let Some(cached) = self.cache.get(context).await {
            debug!("Station cache hit for {}", context);
            return Ok(cached);
        }
        let stations = self.inner.list_stations(context).await?;
        Ok(self.cache.insert(context.clone(), stations).await)
    }
}
