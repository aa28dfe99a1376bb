#![allow(dead_code)]

use academy_api_client::{ApiClient, CatalogQueries, QueryCache, StaticToken, TokenProvider};
use academy_core::ClientConfig;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub const CATALOG_ID: &str = "3f2504e0-4f89-41d3-9a0c-0305e82c3301";
pub const TENANT_ID: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

pub fn config_for(server: &mockito::Server) -> ClientConfig {
    ClientConfig::new(server.url())
}

/// Client with no token provider at all.
pub fn anonymous_client(server: &mockito::Server) -> ApiClient {
    ApiClient::new(&config_for(server), None)
}

pub fn client_with_token(server: &mockito::Server, token: &str) -> ApiClient {
    let provider: Arc<dyn TokenProvider> = Arc::new(StaticToken::new(token));
    ApiClient::new(&config_for(server), Some(provider))
}

pub fn queries_for(server: &mockito::Server) -> CatalogQueries {
    let config = config_for(server);
    let client = ApiClient::new(&config, None);
    CatalogQueries::new(client, Arc::new(QueryCache::new()), &config)
}

/// Provider whose user is signed out.
pub struct SignedOut;

#[async_trait]
impl TokenProvider for SignedOut {
    async fn token(&self) -> Option<String> {
        None
    }
}

pub fn catalog_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "sector": "Vendas",
        "fileUrl": null,
        "fileName": "catalog.pdf",
        "mimeType": "application/pdf",
        "createdAt": "2024-05-01T09:00:00.000Z"
    })
}

pub fn list_json(items: Vec<Value>, total: u64) -> String {
    json!({ "items": items, "total": total }).to_string()
}

pub fn profile_json(role: &str) -> String {
    json!({ "role": role, "tenantId": TENANT_ID, "tenantName": "Acme" }).to_string()
}
