use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use contracts::domain::common::ResourceEndpoint;
use tokio::sync::OnceCell;

use crate::shared::api_client::ApiClient;
use crate::shared::config::{normalize_base_url, DiscoveryConfig};
use crate::shared::error::ApiError;
use crate::shared::http::Method;

/// Finds where each collection lives on the backend.
///
/// Configured paths win. Otherwise candidates are tried in order and the
/// first one answering 2xx is cached for the lifetime of the resolver.
/// Concurrent first callers for one collection share a single lookup run.
pub struct EndpointResolver {
    api: ApiClient,
    overrides: HashMap<String, String>,
    strict: bool,
    cache: Mutex<HashMap<&'static str, Arc<OnceCell<String>>>>,
}

impl EndpointResolver {
    pub fn new(api: ApiClient, overrides: HashMap<String, String>, discovery: &DiscoveryConfig) -> Self {
        let overrides = overrides
            .into_iter()
            .filter(|(_, path)| !path.trim().is_empty())
            .map(|(name, path)| (name, normalize_base_url(path.trim_start_matches('/'))))
            .collect();
        Self {
            api,
            overrides,
            strict: discovery.strict,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cell(&self, collection: &'static str) -> Result<Arc<OnceCell<String>>, ApiError> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| ApiError::Storage("endpoint cache poisoned".into()))?;
        Ok(cache.entry(collection).or_default().clone())
    }

    /// Path already chosen for a collection, if any
    pub fn cached(&self, collection: &str) -> Option<String> {
        if let Some(path) = self.overrides.get(collection) {
            return Some(path.clone());
        }
        let cache = self.cache.lock().ok()?;
        cache.get(collection).and_then(|cell| cell.get().cloned())
    }

    pub async fn resolve(&self, endpoint: &ResourceEndpoint) -> Result<String, ApiError> {
        self.resolve_with(endpoint, self.strict).await
    }

    /// Like [`resolve`](Self::resolve) but never falls back.
    pub async fn resolve_required(&self, endpoint: &ResourceEndpoint) -> Result<String, ApiError> {
        self.resolve_with(endpoint, true).await
    }

    async fn resolve_with(&self, endpoint: &ResourceEndpoint, strict: bool) -> Result<String, ApiError> {
        if let Some(path) = self.overrides.get(endpoint.collection) {
            return Ok(path.clone());
        }
        let cell = self.cell(endpoint.collection)?;
        cell.get_or_try_init(|| self.discover(endpoint, strict))
            .await
            .cloned()
    }

    /// Resolve every endpoint eagerly; the first failure aborts.
    pub async fn check(&self, endpoints: &[ResourceEndpoint]) -> Result<Vec<(&'static str, String)>, ApiError> {
        let mut resolved = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let path = self.resolve_required(endpoint).await?;
            tracing::info!("{} -> {}", endpoint.collection, path);
            resolved.push((endpoint.collection, path));
        }
        Ok(resolved)
    }

    async fn discover(&self, endpoint: &ResourceEndpoint, strict: bool) -> Result<String, ApiError> {
        let params: Vec<(String, String)> = endpoint
            .lookup_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        for candidate in endpoint.candidates {
            match self.api.send(Method::Get, candidate, &params, None).await {
                Ok(_) => {
                    tracing::info!("Endpoint for {}: {}", endpoint.collection, candidate);
                    return Ok(candidate.to_string());
                }
                Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized),
                Err(e) => {
                    tracing::debug!("Lookup {} for {} failed: {}", candidate, endpoint.collection, e);
                }
            }
        }

        let tried: Vec<String> = endpoint.candidates.iter().map(|c| c.to_string()).collect();
        if strict {
            return Err(ApiError::Discovery {
                resource: endpoint.collection.to_string(),
                tried,
            });
        }
        let fallback = endpoint.fallback();
        tracing::warn!(
            "No endpoint answered for {} (tried: {}), using {}",
            endpoint.collection,
            tried.join(", "),
            fallback
        );
        Ok(fallback.to_string())
    }
}
