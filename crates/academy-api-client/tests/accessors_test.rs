mod helpers;

use academy_api_client::{ApiClient, CatalogRecord, ListSource, TokenProvider};
use academy_core::models::{CatalogListParams, UploadPayload, ACCEPTED_MIME_TYPE};
use academy_core::{ClientConfig, Role};
use helpers::*;
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_list_catalogs_live() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/catalogos")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("sector".into(), "Vendas".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("limit".into(), "10".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(list_json(vec![catalog_json(CATALOG_ID, "Price list")], 11))
        .expect(1)
        .create_async()
        .await;

    let client = anonymous_client(&server);
    let params = CatalogListParams {
        sector: Some("Vendas".to_string()),
        page: Some(2),
        limit: Some(10),
        ..Default::default()
    };
    let result = client.list_catalogs(&params).await;

    mock.assert_async().await;
    assert_eq!(result.source, ListSource::Live);
    assert_eq!(result.page.total, 11);
    assert_eq!(result.page.items[0].name, "Price list");
}

#[tokio::test]
async fn test_list_catalogs_invalid_shape_serves_fallback() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/catalogos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "data": [], "count": 0 }).to_string())
        .create_async()
        .await;

    let result = anonymous_client(&server)
        .list_catalogs(&CatalogListParams::default())
        .await;

    assert!(result.is_fallback());
    assert_eq!(result.page.total, 2);
    assert_eq!(result.page.items.len(), 2);
    assert_eq!(result.page.items[0].name, "Catálogo Produtos 2024");
    assert_eq!(result.page.items[1].name, "Manual Técnico");
}

#[tokio::test]
async fn test_list_catalogs_server_error_serves_fallback() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/catalogos")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let result = anonymous_client(&server)
        .list_catalogs(&CatalogListParams::default())
        .await;

    assert_eq!(result.source, ListSource::Fallback);
    assert_eq!(result.page.total, 2);
}

#[tokio::test]
async fn test_list_catalogs_unreachable_serves_fallback() {
    // Nothing listens on port 9 (discard) in the test environment.
    let client = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9"), None);
    let result = client.list_catalogs(&CatalogListParams::default()).await;
    assert!(result.is_fallback());
}

#[tokio::test]
async fn test_get_catalog_invalid_payload_is_passed_through_unchanged() {
    let raw = json!({ "id": "legacy-7", "name": "", "createdAt": "sometime" });
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/catalogos/legacy-7")
        .with_status(200)
        .with_body(raw.to_string())
        .create_async()
        .await;

    let record = anonymous_client(&server).get_catalog("legacy-7").await.unwrap();

    assert_eq!(record, CatalogRecord::Unvalidated(raw));
}

#[tokio::test]
async fn test_get_catalog_valid_payload() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", format!("/catalogos/{}", CATALOG_ID).as_str())
        .with_status(200)
        .with_body(catalog_json(CATALOG_ID, "Manual").to_string())
        .create_async()
        .await;

    let record = anonymous_client(&server).get_catalog(CATALOG_ID).await.unwrap();
    let catalog = record.catalog().expect("validated catalog");
    assert_eq!(catalog.id.to_string(), CATALOG_ID);
    assert_eq!(catalog.name, "Manual");
}

#[tokio::test]
async fn test_get_catalog_not_found_propagates() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/catalogos/missing")
        .with_status(404)
        .with_body("Catalog not found")
        .create_async()
        .await;

    let err = anonymous_client(&server).get_catalog("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(!err.is_unavailable());
}

#[tokio::test]
async fn test_get_catalog_file_returns_bytes() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", format!("/catalogos/{}/file", CATALOG_ID).as_str())
        .match_header("authorization", "Bearer file-token")
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body(b"%PDF-1.4 test")
        .create_async()
        .await;

    let bytes = client_with_token(&server, "file-token")
        .get_catalog_file(CATALOG_ID)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"%PDF-1.4 test");
}

#[tokio::test]
async fn test_upload_sends_multipart_form() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/catalogos/upload")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="catalog\.pdf""#.to_string()),
            Matcher::Regex(r#"name="name"\r\n\r\nCatalog 2024"#.to_string()),
        ]))
        .with_status(201)
        .with_body(catalog_json(CATALOG_ID, "Catalog 2024").to_string())
        .create_async()
        .await;

    let payload = UploadPayload::new(
        "catalog.pdf",
        ACCEPTED_MIME_TYPE,
        b"%PDF-1.4".to_vec(),
        Some("Catalog 2024"),
        None,
    )
    .unwrap();
    let record = anonymous_client(&server).upload_catalog(&payload).await.unwrap();

    mock.assert_async().await;
    assert!(record.is_validated());
    assert_eq!(record.name(), Some("Catalog 2024"));
}

#[tokio::test]
async fn test_upload_unavailable_has_friendly_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/catalogos/upload")
        .with_status(503)
        .create_async()
        .await;

    let payload =
        UploadPayload::new("a.pdf", ACCEPTED_MIME_TYPE, b"%PDF".to_vec(), None, None).unwrap();
    let err = anonymous_client(&server).upload_catalog(&payload).await.unwrap_err();

    assert!(err.is_unavailable());
    assert_eq!(
        err.friendly_message(),
        "API unavailable. Try again when the backend is up."
    );
}

#[tokio::test]
async fn test_delete_forbidden_propagates() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("DELETE", format!("/catalogos/{}", CATALOG_ID).as_str())
        .with_status(403)
        .create_async()
        .await;

    let err = client_with_token(&server, "viewer-token")
        .delete_catalog(CATALOG_ID)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_get_profile() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/me")
        .with_status(200)
        .with_body(profile_json("manager"))
        .create_async()
        .await;

    let profile = anonymous_client(&server).get_profile().await.unwrap();
    assert_eq!(profile.role, Role::Manager);
    assert_eq!(profile.tenant_name.as_deref(), Some("Acme"));
}

#[tokio::test]
async fn test_get_profile_failures_are_absent() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/me")
        .with_status(401)
        .create_async()
        .await;
    assert!(anonymous_client(&server).get_profile().await.is_none());

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/me")
        .with_status(200)
        .with_body(profile_json("owner"))
        .create_async()
        .await;
    assert!(anonymous_client(&server).get_profile().await.is_none());
}

#[tokio::test]
async fn test_no_token_provider_omits_authorization_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/me")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(profile_json("viewer"))
        .expect(1)
        .create_async()
        .await;

    let profile = anonymous_client(&server).get_profile().await;

    mock.assert_async().await;
    assert_eq!(profile.map(|p| p.role), Some(Role::Viewer));
}

#[tokio::test]
async fn test_provider_without_token_omits_authorization_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/me")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(profile_json("viewer"))
        .expect(1)
        .create_async()
        .await;

    let provider: Arc<dyn TokenProvider> = Arc::new(SignedOut);
    let client = ApiClient::new(&config_for(&server), Some(provider));
    assert!(client.get_profile().await.is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_token_is_injected_on_every_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/me")
        .match_header("authorization", "Bearer secret-token")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_body(profile_json("admin"))
        .expect(2)
        .create_async()
        .await;

    let client = client_with_token(&server, "secret-token");
    client.get_profile().await;
    client.get_profile().await;

    mock.assert_async().await;
}
