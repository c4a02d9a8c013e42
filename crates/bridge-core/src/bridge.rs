//! The bridge: validate, call the backend, decode, map.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::base_url::BaseUrl;
use crate::config::BridgeConfig;
use crate::envelope::parse_response;
use crate::error::{BridgeError, Result};
use crate::mapping::{map_collections, map_document, map_search_results, map_stats};
use crate::request::BackendRequest;
use crate::traits::{Backend, BackendResponse};
use crate::types::{
    CollectionList, CollectionStats, FetchArgs, FetchedDocument, SearchArgs, SearchResults,
    StatsArgs,
};
use crate::validate::{validate_fetch, validate_search, validate_stats};

/// Tool operations over a vector-store backend.
///
/// Holds only immutable state, so one instance can serve any number of
/// concurrent calls. `B` may be `dyn Backend`.
pub struct Bridge<B: ?Sized> {
    /// Backend transport.
    backend: Arc<B>,

    /// Process-wide configuration.
    config: Arc<BridgeConfig>,

    /// Validated backend base URL.
    base_url: BaseUrl,
}

impl<B: ?Sized> Clone for Bridge<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            config: Arc::clone(&self.config),
            base_url: self.base_url.clone(),
        }
    }
}

impl<B: Backend + ?Sized> Bridge<B> {
    /// Create a bridge. Fails if the configuration does not validate.
    pub fn new(backend: Arc<B>, config: Arc<BridgeConfig>) -> Result<Self> {
        config.validate()?;
        let base_url = config.backend.base_url()?;

        Ok(Self {
            backend,
            config,
            base_url,
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Search a collection.
    pub async fn search(&self, args: SearchArgs) -> Result<SearchResults> {
        let request = validate_search(&args, &self.config.search)?;
        info!(
            collection = %request.collection,
            limit = request.limit,
            "search: {:?}",
            request.query
        );

        let response = self.call(BackendRequest::search(&request)).await?;
        let payload = parse_response(&response).inspect_err(|e| log_failure("search", e))?;
        let results = map_search_results(&payload, &request.collection, &self.base_url);

        debug!(hits = results.results.len(), "search complete");
        Ok(results)
    }

    /// Fetch one document by id.
    pub async fn fetch(&self, args: FetchArgs) -> Result<FetchedDocument> {
        let request = validate_fetch(&args, &self.config.search)?;
        info!(
            collection = %request.collection,
            "fetch: {}",
            request.document_id
        );

        let response = self.call(BackendRequest::fetch(&request)).await?;
        if response.status == 404 {
            let err = BridgeError::not_found(&request.collection, &request.document_id);
            log_failure("fetch", &err);
            return Err(err);
        }

        let payload = parse_response(&response).inspect_err(|e| log_failure("fetch", e))?;
        map_document(&payload, &request, &self.base_url).inspect_err(|e| log_failure("fetch", e))
    }

    /// List the backend's collections.
    pub async fn list_collections(&self) -> Result<CollectionList> {
        info!("list_collections");

        let response = self.call(BackendRequest::list_collections()).await?;
        let payload =
            parse_response(&response).inspect_err(|e| log_failure("list_collections", e))?;
        Ok(map_collections(&payload))
    }

    /// Statistics for one collection.
    pub async fn stats(&self, args: StatsArgs) -> Result<CollectionStats> {
        let request = validate_stats(&args, &self.config.search);
        info!(collection = %request.collection, "stats");

        let response = self.call(BackendRequest::stats(&request)).await?;
        let payload = parse_response(&response).inspect_err(|e| log_failure("stats", e))?;
        Ok(map_stats(payload, &request.collection))
    }

    async fn call(&self, request: BackendRequest) -> Result<BackendResponse> {
        let path = request.path();
        let response = self
            .backend
            .send(request)
            .await
            .inspect_err(|e| log_failure(path, e))?;
        debug!(path, status = response.status, "backend replied");
        Ok(response)
    }
}

fn log_failure(operation: &str, error: &BridgeError) {
    warn!(
        operation,
        code = error.error_code(),
        "backend call failed: {}",
        error
    );
}
