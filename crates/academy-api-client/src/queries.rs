//! Query and mutation layer.
//!
//! Wraps the accessors with the shared `QueryCache`: reads are keyed and
//! cached for their staleness window, and every successful mutation
//! invalidates the keys it makes stale.

use crate::cache::{KeyScope, QueryCache, QueryKey};
use crate::{ApiClient, CatalogListResult, CatalogRecord, ClientError};
use academy_core::models::{CatalogListParams, UploadPayload, UserProfile};
use academy_core::{AppError, ClientConfig};
use bytes::Bytes;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

fn required_id(id: &str) -> Result<&str, ClientError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::InvalidInput("Catalog id is required".to_string()).into());
    }
    Ok(id)
}

#[derive(Clone, Debug)]
pub struct CatalogQueries {
    client: ApiClient,
    cache: Arc<QueryCache>,
    profile_stale_time: Duration,
    query_stale_time: Duration,
}

impl CatalogQueries {
    pub fn new(client: ApiClient, cache: Arc<QueryCache>, config: &ClientConfig) -> Self {
        Self {
            client,
            cache,
            profile_stale_time: config.profile_stale_time,
            query_stale_time: config.query_stale_time,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Catalog list for `params`. Never fails (see `ApiClient::list_catalogs`).
    pub async fn catalogs(&self, params: &CatalogListParams) -> CatalogListResult {
        let client = &self.client;
        let result = self
            .cache
            .fetch(QueryKey::catalogs(params), self.query_stale_time, || async {
                Ok::<_, Infallible>(client.list_catalogs(params).await)
            })
            .await;
        match result {
            Ok(list) => list,
            Err(never) => match never {},
        }
    }

    /// Single catalog. A blank id is rejected without a request.
    pub async fn catalog(&self, id: &str) -> Result<CatalogRecord, ClientError> {
        let id = required_id(id)?;
        let client = &self.client;
        self.cache
            .fetch(QueryKey::catalog(id), self.query_stale_time, || {
                client.get_catalog(id)
            })
            .await
    }

    /// PDF bytes for viewing. Not cached.
    pub async fn catalog_file(&self, id: &str) -> Result<Bytes, ClientError> {
        self.client.get_catalog_file(id).await
    }

    /// Current user's profile, fresh for the profile staleness window.
    pub async fn profile(&self) -> Option<UserProfile> {
        let client = &self.client;
        let result = self
            .cache
            .fetch(QueryKey::Profile, self.profile_stale_time, || async {
                Ok::<_, Infallible>(client.get_profile().await)
            })
            .await;
        match result {
            Ok(profile) => profile,
            Err(never) => match never {},
        }
    }

    /// Upload, then invalidate every catalog list.
    pub async fn upload(&self, payload: &UploadPayload) -> Result<CatalogRecord, ClientError> {
        let record = self.client.upload_catalog(payload).await?;
        self.cache.invalidate(&KeyScope::CatalogLists);
        Ok(record)
    }

    /// Delete, then invalidate every catalog list and the catalog itself.
    /// A blank id is rejected without a request.
    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let id = required_id(id)?;
        self.client.delete_catalog(id).await?;
        self.cache.invalidate(&KeyScope::CatalogLists);
        self.cache
            .invalidate(&KeyScope::Exact(QueryKey::catalog(id)));
        Ok(())
    }
}
