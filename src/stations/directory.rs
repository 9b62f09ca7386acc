//! The station directory collaborator and the adapters shipped with the crate.

use crate::stations::error::StationDirectoryError;
use crate::types::provider::ProviderContext;
use crate::types::station::Station;
use async_compression::tokio::bufread::GzipDecoder;
use log::info;
use std::convert::Infallible;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, BufReader};

/// Lists the candidate stations of a provider.
///
/// Implementations own all I/O, retries and parsing. Errors are propagated to the
/// caller of [`crate::SpatialClient`] with their concrete type preserved as the
/// error source.
pub trait StationDirectory {
    type Error: std::error::Error + Send + Sync + 'static;

    fn list_stations(
        &self,
        context: &ProviderContext,
    ) -> impl Future<Output = Result<Vec<Station>, Self::Error>> + Send;
}

/// A fixed, in-memory list of stations, returned for every provider context.
#[derive(Debug, Clone, Default)]
pub struct StaticStationDirectory {
    stations: Vec<Station>,
}

impl StaticStationDirectory {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }
}

impl StationDirectory for StaticStationDirectory {
    type Error = Infallible;

    async fn list_stations(&self, _context: &ProviderContext) -> Result<Vec<Station>, Infallible> {
        Ok(self.stations.clone())
    }
}

/// Reads stations from a JSON array on disk, optionally gzip-compressed (`.gz`).
///
/// The file is read on every call; wrap the directory in a
/// [`crate::CachingStationDirectory`] to avoid repeated parsing.
#[derive(Debug, Clone)]
pub struct JsonStationDirectory {
    path: PathBuf,
}

impl JsonStationDirectory {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, StationDirectoryError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| StationDirectoryError::FileRead(self.path.clone(), e))?;

        let is_gzip = self
            .path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
        if !is_gzip {
            return Ok(bytes);
        }

        let mut decoder = GzipDecoder::new(BufReader::new(bytes.as_slice()));
        let mut decompressed = Vec::with_capacity(bytes.len() * 4);
        decoder
            .read_to_end(&mut decompressed)
            .await
            .map_err(|e| StationDirectoryError::Decompress(self.path.clone(), e))?;
        Ok(decompressed)
    }
}

impl StationDirectory for JsonStationDirectory {
    type Error = StationDirectoryError;

    async fn list_stations(
        &self,
        context: &ProviderContext,
    ) -> Result<Vec<Station>, StationDirectoryError> {
        let json = self.read_bytes().await?;
        let path = self.path.clone();
        let parse_start = std::time::Instant::now();
        let stations = tokio::task::spawn_blocking(move || {
            serde_json::from_slice::<Vec<Station>>(&json)
                .map_err(|e| StationDirectoryError::JsonParse(path, e))
        })
        .await??;
        info!(
            "Parsed {} stations for {} from {} in {:?}",
            stations.len(),
            context,
            self.path.display(),
            parse_start.elapsed()
        );
        Ok(stations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::provider::Resolution;
    use async_compression::tokio::write::GzipEncoder;
    use tokio::io::AsyncWriteExt;

    const STATIONS_JSON: &str = r#"[
        {"station_id":"01048","name":"Dresden-Klotzsche","latitude":51.1278,"longitude":13.7543,"elevation":227.0,"active_from":"1934-01-01","active_to":null},
        {"station_id":"01050","name":"Dresden-Hosterwitz","latitude":51.0221,"longitude":13.8470,"elevation":114.0}
    ]"#;

    fn context() -> ProviderContext {
        ProviderContext::dwd_observation(Resolution::Daily, "climate_summary")
    }

    #[tokio::test]
    async fn test_static_directory_returns_all() {
        let directory = StaticStationDirectory::new(vec![Station::new("a", "A", 1.0, 2.0, 3.0)]);
        let stations = directory.list_stations(&context()).await.unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].station_id, "a");
    }

    #[tokio::test]
    async fn test_json_directory_plain() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("stations.json");
        tokio::fs::write(&path, STATIONS_JSON).await?;

        let stations = JsonStationDirectory::new(&path)
            .list_stations(&context())
            .await?;
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].station_id, "01048");
        assert_eq!(
            stations[0].active_from,
            chrono::NaiveDate::from_ymd_opt(1934, 1, 1)
        );
        assert!(stations[1].active_to.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_json_directory_gzip() -> Result<(), Box<dyn std::error::Error>> {
        let mut encoder = GzipEncoder::new(Vec::new());
        encoder.write_all(STATIONS_JSON.as_bytes()).await?;
        encoder.shutdown().await?;
        let compressed = encoder.into_inner();

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("stations.json.gz");
        tokio::fs::write(&path, compressed).await?;

        let stations = JsonStationDirectory::new(&path)
            .list_stations(&context())
            .await?;
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[1].name, "Dresden-Hosterwitz");
        Ok(())
    }

    #[tokio::test]
    async fn test_json_directory_missing_file() {
        let result = JsonStationDirectory::new("/definitely/not/here.json")
            .list_stations(&context())
            .await;
        assert!(matches!(result, Err(StationDirectoryError::FileRead(..))));
    }

    #[tokio::test]
    async fn test_json_directory_malformed() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("broken.json");
        tokio::fs::write(&path, "[{\"station_id\": 1}]").await?;

        let result = JsonStationDirectory::new(&path)
            .list_stations(&context())
            .await;
        assert!(matches!(result, Err(StationDirectoryError::JsonParse(..))));
        Ok(())
    }
}
