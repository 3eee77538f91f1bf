use tracing::{info, warn};

use super::model::AppEntry;
use crate::cache::{FetchSource, OfflineCache, Request};
use crate::error::{CacheError, CatalogFetchError};

#[derive(Debug)]
pub struct LoadedCatalog {
    pub entries: Vec<AppEntry>,
    pub source: FetchSource,
}

pub fn parse_entries(body: &[u8]) -> Result<Vec<AppEntry>, CatalogFetchError> {
    Ok(serde_json::from_slice(body)?)
}

/// Fetches the catalog document through the offline cache. A cached copy is
/// returned as-is while the cache refreshes it in the background.
pub fn load_catalog(cache: &OfflineCache, url: &str) -> Result<LoadedCatalog, CatalogFetchError> {
    let request = Request::get(url).with_header("Cache-Control", "no-store");
    let fetched = cache.fetch(request)?;

    if !fetched.response.is_success() {
        warn!(url, status = fetched.response.status, "catalog request failed");
        return Err(CacheError::Status {
            url: url.to_string(),
            status: fetched.response.status,
        }
        .into());
    }

    let entries = parse_entries(&fetched.response.body)?;
    info!(
        url,
        count = entries.len(),
        source = ?fetched.source,
        "catalog loaded"
    );
    Ok(LoadedCatalog {
        entries,
        source: fetched.source,
    })
}
