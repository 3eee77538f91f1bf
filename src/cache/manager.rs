//! Stale-while-revalidate front for GET requests.
//!
//! A cached response is handed back immediately and a background thread
//! refreshes it. Without a cached response the caller waits for the network.
//! Only 200 responses are ever written, and a failed refresh never touches
//! an existing entry.

use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::{debug, info, warn};

use super::store::CacheStore;
use super::transport::{Request, Response, Transport};
use crate::error::CacheError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Cache,
    Network,
}

#[derive(Debug)]
pub struct Fetched {
    pub response: Response,
    pub source: FetchSource,
    /// Background refresh started for a cache hit.
    pub revalidation: Option<JoinHandle<()>>,
}

impl Fetched {
    /// Blocks until the background refresh (if any) has finished.
    pub fn wait_revalidation(&mut self) {
        if let Some(handle) = self.revalidation.take() {
            if handle.join().is_err() {
                warn!("cache revalidation thread panicked");
            }
        }
    }
}

pub struct OfflineCache {
    store: Arc<CacheStore>,
    transport: Arc<dyn Transport>,
    precache: Vec<String>,
}

impl OfflineCache {
    pub fn new(store: CacheStore, transport: Arc<dyn Transport>, precache: Vec<String>) -> Self {
        Self {
            store: Arc::new(store),
            transport,
            precache,
        }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn fetch(&self, request: Request) -> Result<Fetched, CacheError> {
        if !request.is_get() {
            debug!(method = %request.method, url = %request.url, "bypassing cache");
            return Ok(Fetched {
                response: self.transport.send(&request)?,
                source: FetchSource::Network,
                revalidation: None,
            });
        }

        let identity = request.identity();
        if let Some(hit) = self.store.get(&identity) {
            debug!(identity = %identity, "serving from cache");
            let revalidation = self.spawn_revalidation(request);
            return Ok(Fetched {
                response: hit.response,
                source: FetchSource::Cache,
                revalidation,
            });
        }

        let response = self.transport.send(&request)?;
        store_if_success(&self.store, &identity, &response);
        Ok(Fetched {
            response,
            source: FetchSource::Network,
            revalidation: None,
        })
    }

    /// Write path used by both revalidation and precaching.
    pub fn store_response(&self, request: &Request, response: Response) -> Result<(), CacheError> {
        if !request.is_get() || !response.is_success() {
            return Ok(());
        }
        self.store.put(&request.identity(), response)
    }

    /// Fetches every precache resource and stores them only if all of them
    /// succeeded.
    pub fn install(&self) -> Result<usize, CacheError> {
        let mut fetched = Vec::with_capacity(self.precache.len());
        for url in &self.precache {
            let request = Request::get(url.clone());
            let response = self
                .transport
                .send(&request)
                .and_then(|res| {
                    if res.is_success() {
                        Ok(res)
                    } else {
                        Err(CacheError::Status {
                            url: url.clone(),
                            status: res.status,
                        })
                    }
                })
                .map_err(|e| CacheError::Precache {
                    url: url.clone(),
                    source: Box::new(e),
                })?;
            fetched.push((request, response));
        }

        let count = fetched.len();
        for (request, response) in fetched {
            self.store_response(&request, response)?;
        }
        info!(count, generation = %self.store.generation(), "precached shell resources");
        Ok(count)
    }

    /// Drops every other cache generation so only the current one remains.
    pub fn activate(&self) -> Result<Vec<String>, CacheError> {
        self.store.purge_other_generations()
    }

    fn spawn_revalidation(&self, request: Request) -> Option<JoinHandle<()>> {
        let store = Arc::clone(&self.store);
        let transport = Arc::clone(&self.transport);
        let spawned = std::thread::Builder::new()
            .name("cache-revalidate".into())
            .spawn(move || match transport.send(&request) {
                Ok(response) => store_if_success(&store, &request.identity(), &response),
                Err(e) => debug!(url = %request.url, error = %e, "revalidation failed, keeping cached copy"),
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "could not start cache revalidation");
                None
            }
        }
    }
}

fn store_if_success(store: &CacheStore, identity: &str, response: &Response) {
    if !response.is_success() {
        debug!(identity, status = response.status, "not caching response");
        return;
    }
    if let Err(e) = store.put(identity, response.clone()) {
        warn!(identity, error = %e, "cache write failed");
    }
}
