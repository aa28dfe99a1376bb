use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Upper bound the API accepts for `limit`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A stored PDF document with its metadata, as returned by `GET /catalogos/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub id: Uuid,
    #[validate(length(min = 1, message = "Catalog name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    #[validate(url(message = "Catalog file URL must be a valid URL"))]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Searchable text the backend extracted from the PDF.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One page of `GET /catalogos`. Item order is whatever the server returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CatalogListPage {
    #[validate(nested)]
    pub items: Vec<Catalog>,
    pub total: u64,
}

/// Filters and pagination for `GET /catalogos`.
///
/// All text filters are interpreted server-side: `sector` is an exact/partial
/// match, `q` is a full-text search, `name` is a case-insensitive partial
/// match. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogListParams {
    pub sector: Option<String>,
    pub q: Option<String>,
    pub name: Option<String>,
    pub mime_type: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl CatalogListParams {
    /// 1-based page number actually sent to the API.
    pub fn effective_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size actually sent to the API, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Canonical form: blank text filters dropped, page and limit filled in.
    /// Two parameter sets that produce the same request normalize equal.
    pub fn normalized(&self) -> Self {
        fn clean(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }

        Self {
            sector: clean(&self.sector),
            q: clean(&self.q),
            name: clean(&self.name),
            mime_type: clean(&self.mime_type),
            created_from: self.created_from,
            created_to: self.created_to,
            page: Some(self.effective_page()),
            limit: Some(self.effective_limit()),
        }
    }

    /// Query string pairs in wire naming. Unset filters are omitted.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let params = self.normalized();
        let mut query = Vec::new();
        if let Some(sector) = params.sector {
            query.push(("sector", sector));
        }
        if let Some(q) = params.q {
            query.push(("q", q));
        }
        if let Some(name) = params.name {
            query.push(("name", name));
        }
        if let Some(mime_type) = params.mime_type {
            query.push(("mimeType", mime_type));
        }
        if let Some(from) = params.created_from {
            query.push((
                "createdFrom",
                from.to_rfc3339_opts(SecondsFormat::Millis, true),
            ));
        }
        if let Some(to) = params.created_to {
            query.push(("createdTo", to.to_rfc3339_opts(SecondsFormat::Millis, true)));
        }
        query.push(("page", self.effective_page().to_string()));
        query.push(("limit", self.effective_limit().to_string()));
        query
    }
}

fn seeded_timestamp(seconds_since_epoch: i64) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(seconds_since_epoch)
}

/// Demo data served by the list accessor when the API cannot be reached or
/// returns an unexpected shape.
pub fn fallback_catalog_page() -> CatalogListPage {
    CatalogListPage {
        items: vec![
            Catalog {
                id: uuid::uuid!("a1b2c3d4-e5f6-7890-abcd-ef1234567890"),
                name: "Catálogo Produtos 2024".to_string(),
                sector: Some("Vendas".to_string()),
                file_url: None,
                file_name: Some("catalogo-2024.pdf".to_string()),
                mime_type: Some("application/pdf".to_string()),
                extracted_text: None,
                // 2024-01-15T10:00:00Z
                created_at: seeded_timestamp(1_705_312_800),
            },
            Catalog {
                id: uuid::uuid!("b2c3d4e5-f6a7-8901-bcde-f12345678901"),
                name: "Manual Técnico".to_string(),
                sector: Some("Operações".to_string()),
                file_url: None,
                file_name: Some("manual-tecnico.pdf".to_string()),
                mime_type: Some("application/pdf".to_string()),
                extracted_text: None,
                // 2024-02-01T14:30:00Z
                created_at: seeded_timestamp(1_706_797_800),
            },
        ],
        total: 2,
    }
}
