//! HTTP client for the Academy catalog API.
//!
//! Provides a client bound to a base URL with per-request bearer-token
//! injection, typed resource accessors with response schema validation, an
//! explicit query cache with request coalescing, and a query/mutation layer
//! that keeps that cache consistent after uploads and deletes.

pub mod api;
pub mod cache;
pub mod error;
pub mod queries;
pub mod token;
pub mod viewer;

use academy_core::ClientConfig;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::sync::Arc;

pub use api::{CatalogListResult, CatalogRecord, ListSource};
pub use cache::{KeyScope, QueryCache, QueryKey};
pub use error::ClientError;
pub use queries::CatalogQueries;
pub use token::{IdentityClaims, StaticToken, TokenProvider};

/// HTTP client for the catalog API with optional token injection.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    /// Used for PDF downloads, which are not subject to the request timeout.
    file_client: Client,
    base_url: String,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token_provider", &self.token_provider.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Build a client for `config.api_url`. Never fails: a builder error
    /// falls back to a default client and is logged.
    pub fn new(config: &ClientConfig, token_provider: Option<Arc<dyn TokenProvider>>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Failed to configure HTTP client, using defaults");
                Client::new()
            });

        let file_client = Client::builder().build().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Failed to configure file HTTP client, using defaults");
            Client::new()
        });

        Self {
            client,
            file_client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token_provider,
        }
    }

    /// Client with a fixed bearer token from configuration, if any.
    pub fn from_config(config: &ClientConfig) -> Self {
        let provider = config
            .api_token
            .clone()
            .map(|token| Arc::new(StaticToken::new(token)) as Arc<dyn TokenProvider>);
        Self::new(config, provider)
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Current bearer token, if a provider is set and yields one.
    pub async fn current_token(&self) -> Option<String> {
        match &self.token_provider {
            Some(provider) => provider.token().await.filter(|t| !t.is_empty()),
            None => None,
        }
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.current_token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send with token injection; non-2xx statuses become `ClientError::Status`.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = self.authorize(request).await.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        Ok(response)
    }

    async fn read_json(response: Response) -> Result<Value, ClientError> {
        let body = response.bytes().await?;
        let value = serde_json::from_slice(&body).map_err(academy_core::SchemaError::from)?;
        Ok(value)
    }

    /// GET with optional query parameters. Returns the JSON body unvalidated.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ClientError> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, "GET");
        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    /// GET raw bytes through the timeout-free file client, with auth.
    pub async fn get_bytes(&self, path: &str) -> Result<Bytes, ClientError> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, "GET (binary)");
        let response = self.send(self.file_client.get(&url)).await?;
        Ok(response.bytes().await?)
    }

    /// GET an absolute URL without credentials.
    pub async fn get_public_bytes(&self, url: &str) -> Result<Bytes, ClientError> {
        tracing::debug!(url = %url, "GET (public)");
        let response = self.file_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: "Failed to load file".to_string(),
            });
        }
        Ok(response.bytes().await?)
    }

    /// POST multipart form. Returns the JSON body unvalidated.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Value, ClientError> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, "POST (multipart)");
        let response = self.send(self.client.post(&url).multipart(form)).await?;
        Self::read_json(response).await
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, "DELETE");
        self.send(self.client.delete(&url)).await?;
        Ok(())
    }
}
