use super::tle::{parse_catalog, TleRecord};
use crate::errors::NetworkError;
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_CATALOG_URL: &str = "https://celestrak.org/NORAD/elements/gp.php?GROUP=starlink&FORMAT=tle";
const CACHE_FILE: &str = "catalog_cache.tle";

/// Fetches the element catalog and keeps a copy on disk.
///
/// The cached copy is reused while it is younger than `max_age`. A failed download
/// is returned as is: there is no retry and no fallback to a stale copy.
pub struct CatalogManager {
    url: String,
    cache_path: PathBuf,
    max_age: Duration,
}

impl CatalogManager {
    /// Manager caching under the user cache directory (`<cache>/skyclear`).
    pub fn new(url: impl Into<String>, max_age_hours: i64) -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skyclear");
        Self::with_cache_dir(url, max_age_hours, cache_dir)
    }

    pub fn with_cache_dir(url: impl Into<String>, max_age_hours: i64, cache_dir: impl AsRef<Path>) -> Self {
        Self {
            url: url.into(),
            cache_path: cache_dir.as_ref().join(CACHE_FILE),
            max_age: Duration::hours(max_age_hours),
        }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Returns the catalog, downloading it only if the cache is missing or stale.
    pub fn load(&self) -> Result<Vec<TleRecord>, NetworkError> {
        let text = match self.cached_text()? {
            Some(text) => {
                debug!(path = %self.cache_path.display(), "using cached catalog");
                text
            }
            None => self.refresh()?,
        };
        let records = parse_catalog(&text);
        info!(objects = records.len(), "catalog loaded");
        Ok(records)
    }

    /// Downloads the catalog unconditionally and replaces the cached copy.
    pub fn refresh(&self) -> Result<String, NetworkError> {
        info!(url = %self.url, "downloading catalog");
        let client = reqwest::blocking::Client::new();
        let response = client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                status,
                url: self.url.clone(),
            });
        }

        let text = response.text()?;
        if let Some(dir) = self.cache_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.cache_path, &text)?;
        Ok(text)
    }

    /// Cached catalog text if the cache file exists and is fresh enough.
    fn cached_text(&self) -> Result<Option<String>, NetworkError> {
        let metadata = match fs::metadata(&self.cache_path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let modified: DateTime<Utc> = metadata.modified()?.into();
        if Utc::now() - modified > self.max_age {
            debug!(%modified, "catalog cache is stale");
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.cache_path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tle::tests::{ISS_LINE1, ISS_LINE2, ISS_NAME};

    // Nothing listens on the discard port, so a download attempt fails fast.
    const UNREACHABLE: &str = "http://127.0.0.1:9/catalog.tle";

    #[test]
    fn fresh_cache_is_used_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CatalogManager::with_cache_dir(UNREACHABLE, 24, dir.path());
        fs::write(manager.cache_path(), format!("{ISS_NAME}\n{ISS_LINE1}\n{ISS_LINE2}\n")).unwrap();

        let records = manager.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, ISS_NAME);
    }

    #[test]
    fn stale_cache_forces_a_download() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CatalogManager::with_cache_dir(UNREACHABLE, -1, dir.path());
        fs::write(manager.cache_path(), format!("{ISS_NAME}\n{ISS_LINE1}\n{ISS_LINE2}\n")).unwrap();

        assert!(matches!(manager.load(), Err(NetworkError::Request(_))));
    }

    #[test]
    fn missing_cache_and_network_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CatalogManager::with_cache_dir(UNREACHABLE, 24, dir.path().join("nested"));
        assert!(manager.load().is_err());
        assert!(!manager.cache_path().exists());
    }
}
