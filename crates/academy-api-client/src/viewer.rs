//! Document loading for the restricted viewer.
//!
//! Tries the authenticated file endpoint first, then the catalog's public URL
//! without credentials, then gives up with a fixed message. No retries. The
//! whole load races a cancellation token; cancelling drops the in-flight
//! request, which aborts the transfer.

use crate::{ApiClient, CatalogRecord};
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

pub const FILE_NOT_AVAILABLE: &str = "File not available for this catalog.";
pub const FILE_LOAD_FAILED: &str = "Could not load the catalog file.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource {
    /// `GET /catalogos/:id/file` with the bearer token.
    Protected,
    /// The catalog's `fileUrl`, fetched without credentials.
    PublicUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub bytes: Bytes,
    pub source: DocumentSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(LoadedDocument),
    /// Both sources failed or none exists; carries the message to display.
    Unavailable(&'static str),
    Cancelled,
}

async fn load_with_fallback(client: &ApiClient, record: &CatalogRecord) -> LoadOutcome {
    if let Some(id) = record.id() {
        match client.get_catalog_file(&id).await {
            Ok(bytes) => {
                return LoadOutcome::Loaded(LoadedDocument {
                    bytes,
                    source: DocumentSource::Protected,
                })
            }
            Err(err) => {
                tracing::debug!(id = %id, error = %err, "Protected file fetch failed");
            }
        }
    }

    let Some(url) = record.file_url() else {
        return LoadOutcome::Unavailable(FILE_NOT_AVAILABLE);
    };

    match client.get_public_bytes(url).await {
        Ok(bytes) => LoadOutcome::Loaded(LoadedDocument {
            bytes,
            source: DocumentSource::PublicUrl,
        }),
        Err(err) => {
            tracing::warn!(error = %err, "Public file fetch failed");
            LoadOutcome::Unavailable(FILE_LOAD_FAILED)
        }
    }
}

/// Load the PDF for `record`, or stop as soon as `cancel` fires.
pub async fn load_document(
    client: &ApiClient,
    record: &CatalogRecord,
    cancel: &CancellationToken,
) -> LoadOutcome {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!("Document load cancelled");
            LoadOutcome::Cancelled
        }
        outcome = load_with_fallback(client, record) => outcome,
    }
}
