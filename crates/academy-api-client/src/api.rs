//! Resource accessors for the catalog API.
//!
//! Each accessor performs exactly one HTTP operation. Reads report where their
//! data came from: the list degrades to demo data and says so, single-record
//! reads hand back the raw payload, tagged, when it fails validation.

use crate::{ApiClient, ClientError};
use academy_core::models::{
    fallback_catalog_page, mime_type_for_file_name, Catalog, CatalogListPage, CatalogListParams,
    UploadPayload, UserProfile, MAX_UPLOAD_SIZE_BYTES, MAX_UPLOAD_SIZE_MB,
};
use academy_core::{validate_schema, AppError};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Where a list page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSource {
    Live,
    /// The API failed or returned an unexpected shape; the page is demo data.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogListResult {
    #[serde(flatten)]
    pub page: CatalogListPage,
    pub source: ListSource,
}

impl CatalogListResult {
    pub fn is_fallback(&self) -> bool {
        self.source == ListSource::Fallback
    }
}

/// A single catalog as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CatalogRecord {
    Validated(Catalog),
    /// Payload that did not match the catalog schema, passed through unchanged.
    Unvalidated(Value),
}

impl CatalogRecord {
    fn from_payload(payload: Value) -> Self {
        match validate_schema::<Catalog>(&payload) {
            Ok(catalog) => CatalogRecord::Validated(catalog),
            Err(err) => {
                tracing::warn!(error = %err, "Catalog response failed validation, passing raw payload through");
                CatalogRecord::Unvalidated(payload)
            }
        }
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            CatalogRecord::Validated(catalog) => Some(catalog),
            CatalogRecord::Unvalidated(_) => None,
        }
    }

    pub fn is_validated(&self) -> bool {
        matches!(self, CatalogRecord::Validated(_))
    }

    pub fn id(&self) -> Option<String> {
        match self {
            CatalogRecord::Validated(catalog) => Some(catalog.id.to_string()),
            CatalogRecord::Unvalidated(raw) => raw_str(raw, "id").map(str::to_string),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            CatalogRecord::Validated(catalog) => Some(catalog.name.as_str()),
            CatalogRecord::Unvalidated(raw) => raw_str(raw, "name"),
        }
    }

    pub fn sector(&self) -> Option<&str> {
        match self {
            CatalogRecord::Validated(catalog) => catalog.sector.as_deref(),
            CatalogRecord::Unvalidated(raw) => raw_str(raw, "sector"),
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        match self {
            CatalogRecord::Validated(catalog) => catalog.file_name.as_deref(),
            CatalogRecord::Unvalidated(raw) => raw_str(raw, "fileName"),
        }
    }

    /// Direct public URL of the file, used when the protected endpoint fails.
    pub fn file_url(&self) -> Option<&str> {
        let url = match self {
            CatalogRecord::Validated(catalog) => catalog.file_url.as_deref(),
            CatalogRecord::Unvalidated(raw) => raw_str(raw, "fileUrl"),
        };
        url.filter(|url| !url.is_empty())
    }
}

fn raw_str<'a>(raw: &'a Value, field: &str) -> Option<&'a str> {
    raw.get(field).and_then(Value::as_str)
}

fn catalog_path(id: &str) -> String {
    format!("/catalogos/{}", urlencoding::encode(id))
}

impl ApiClient {
    /// List catalogs. Never fails: transport or validation failures yield the
    /// fixed demo page tagged `ListSource::Fallback`.
    pub async fn list_catalogs(&self, params: &CatalogListParams) -> CatalogListResult {
        let payload = match self.get("/catalogos", &params.to_query()).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(error = %err, "Catalog list request failed, serving demo data");
                return fallback_result();
            }
        };

        match validate_schema::<CatalogListPage>(&payload) {
            Ok(page) => CatalogListResult {
                page,
                source: ListSource::Live,
            },
            Err(err) => {
                tracing::warn!(error = %err, "Catalog list failed validation, serving demo data");
                fallback_result()
            }
        }
    }

    /// Get a single catalog by ID. Transport errors (e.g. 404) propagate.
    pub async fn get_catalog(&self, id: &str) -> Result<CatalogRecord, ClientError> {
        let payload = self.get(&catalog_path(id), &[]).await?;
        Ok(CatalogRecord::from_payload(payload))
    }

    /// Download the catalog PDF through the authenticated file endpoint.
    pub async fn get_catalog_file(&self, id: &str) -> Result<Bytes, ClientError> {
        self.get_bytes(&format!("{}/file", catalog_path(id))).await
    }

    /// Upload a catalog PDF and return the created record.
    pub async fn upload_catalog(&self, payload: &UploadPayload) -> Result<CatalogRecord, ClientError> {
        let file_part = reqwest::multipart::Part::bytes(payload.bytes().to_vec())
            .file_name(payload.file_name().to_string())
            .mime_str(academy_core::models::ACCEPTED_MIME_TYPE)?;

        let mut form = reqwest::multipart::Form::new().part("file", file_part);
        if let Some(name) = payload.name() {
            form = form.text("name", name.to_string());
        }
        if let Some(sector) = payload.sector() {
            form = form.text("sector", sector.to_string());
        }

        let created = self.post_multipart("/catalogos/upload", form).await?;
        let record = CatalogRecord::from_payload(created);
        tracing::info!(id = ?record.id(), "Catalog uploaded");
        Ok(record)
    }

    /// Delete a catalog by ID. 403 and 404 propagate as `ClientError::Status`.
    pub async fn delete_catalog(&self, id: &str) -> Result<(), ClientError> {
        self.delete(&catalog_path(id)).await?;
        tracing::info!(id = %id, "Catalog deleted");
        Ok(())
    }

    /// Current user's profile. Any failure yields `None`, which callers must
    /// read as "unresolved", never as a distinct error.
    pub async fn get_profile(&self) -> Option<UserProfile> {
        let payload = match self.get("/me", &[]).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to fetch current user profile");
                return None;
            }
        };

        match validate_schema::<UserProfile>(&payload) {
            Ok(profile) => Some(profile),
            Err(err) => {
                tracing::warn!(error = %err, "Current user profile failed validation");
                None
            }
        }
    }
}

fn fallback_result() -> CatalogListResult {
    CatalogListResult {
        page: fallback_catalog_page(),
        source: ListSource::Fallback,
    }
}

/// Read a local PDF into an upload payload.
pub fn upload_payload_from_path(
    file_path: &Path,
    name: Option<&str>,
    sector: Option<&str>,
) -> Result<UploadPayload, ClientError> {
    if file_path
        .components()
        .any(|c| c == std::path::Component::ParentDir)
    {
        return Err(AppError::InvalidInput(format!("Invalid path: {}", file_path.display())).into());
    }

    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let read_error = |err: std::io::Error| {
        AppError::InvalidInput(format!("Failed to read file {}: {}", file_path.display(), err))
    };

    // Oversized files are rejected from metadata, before any bytes are read.
    let size = std::fs::metadata(file_path).map_err(read_error)?.len();
    if size > MAX_UPLOAD_SIZE_BYTES as u64 {
        return Err(AppError::PayloadTooLarge(format!(
            "Maximum size: {} MB.",
            MAX_UPLOAD_SIZE_MB
        ))
        .into());
    }
    let bytes = std::fs::read(file_path).map_err(read_error)?;

    let payload = UploadPayload::new(
        file_name.clone(),
        mime_type_for_file_name(&file_name),
        bytes,
        name,
        sector,
    )?;
    Ok(payload)
}
