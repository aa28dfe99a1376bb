//! Restricted document viewer.
//!
//! The restrictions here (no context menu, no selection or copy, content
//! hidden while printing) are deterrents for casual use only. They do not
//! protect the document: anyone holding the bytes or the temp file can read
//! it with other tools.

use academy_api_client::viewer::{DocumentSource, LoadedDocument};
use anyhow::Context;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub const PRINTING_DISABLED: &str = "Printing disabled.";
pub const COPY_DISABLED: &str = "Copying is disabled for this document.";
pub const NO_EXTRACTABLE_TEXT: &str = "(no extractable text)";

/// Page break emitted by the text extractor.
const PAGE_BREAK: char = '\u{c}';

/// User interactions the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    ContextMenu,
    SelectStart,
    Copy,
    BeforePrint,
    AfterPrint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// The default action is cancelled.
    Suppressed,
    /// Print state changed.
    PrintStateChanged,
}

/// Restriction state machine. The only state is whether a print is in
/// progress; while it is, the content is hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Restrictions {
    printing: bool,
}

impl Restrictions {
    pub fn handle(&mut self, event: ViewerEvent) -> EventResponse {
        match event {
            ViewerEvent::ContextMenu | ViewerEvent::SelectStart | ViewerEvent::Copy => {
                EventResponse::Suppressed
            }
            ViewerEvent::BeforePrint => {
                self.printing = true;
                EventResponse::PrintStateChanged
            }
            ViewerEvent::AfterPrint => {
                self.printing = false;
                EventResponse::PrintStateChanged
            }
        }
    }

    pub fn content_visible(&self) -> bool {
        !self.printing
    }
}

/// Holds the loaded document. The temp file backing it is released when a new
/// document loads or the session is dropped.
#[derive(Debug, Default)]
pub struct ViewerSession {
    file: Option<NamedTempFile>,
    source: Option<DocumentSource>,
    pages: Vec<String>,
    restrictions: Restrictions,
}

impl ViewerSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `document` in a new session. Text extraction is CPU-bound and
    /// runs on the blocking pool.
    pub async fn open(document: LoadedDocument) -> anyhow::Result<Self> {
        tokio::task::spawn_blocking(move || {
            let mut session = Self::new();
            session.load(&document)?;
            Ok(session)
        })
        .await
        .context("Viewer load task failed")?
    }

    /// Replace the current document with `document`. Blocks while the text
    /// is extracted.
    pub fn load(&mut self, document: &LoadedDocument) -> anyhow::Result<()> {
        self.release();

        let mut temp = NamedTempFile::new().context("Failed to create temp file for PDF")?;
        temp.write_all(&document.bytes)
            .context("Failed to write PDF to temp file")?;
        temp.flush().context("Failed to flush temp file")?;

        self.pages = extract_pages(temp.path());
        self.source = Some(document.source);
        self.file = Some(temp);
        tracing::debug!(
            pages = self.pages.len(),
            source = ?document.source,
            "Document loaded into viewer"
        );
        Ok(())
    }

    /// Drop the current document and its temp file.
    pub fn release(&mut self) {
        if let Some(file) = self.file.take() {
            tracing::debug!(path = %file.path().display(), "Releasing viewer temp file");
        }
        self.pages.clear();
        self.source = None;
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file.as_ref().map(NamedTempFile::path)
    }

    pub fn source(&self) -> Option<DocumentSource> {
        self.source
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn handle(&mut self, event: ViewerEvent) -> EventResponse {
        self.restrictions.handle(event)
    }

    /// Text of page `index` (0-based), or the print notice while printing.
    pub fn render_page(&self, index: usize) -> String {
        if !self.restrictions.content_visible() {
            return PRINTING_DISABLED.to_string();
        }
        match self.pages.get(index) {
            Some(text) => format!(
                "--- Page {} of {} ---\n{}",
                index + 1,
                self.pages.len(),
                text.trim()
            ),
            None => NO_EXTRACTABLE_TEXT.to_string(),
        }
    }
}

/// Extract text per page. Failures leave the document viewable but empty.
fn extract_pages(path: &Path) -> Vec<String> {
    match pdf_extract::extract_text(path) {
        Ok(text) => {
            let pages: Vec<String> = text
                .split(PAGE_BREAK)
                .map(str::trim)
                .filter(|page| !page.is_empty())
                .map(str::to_string)
                .collect();
            if pages.is_empty() {
                tracing::warn!("PDF text extraction returned empty");
            }
            pages
        }
        Err(e) => {
            tracing::warn!(error = %e, "PDF text extraction failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(bytes: &'static [u8]) -> LoadedDocument {
        LoadedDocument {
            bytes: bytes.to_vec().into(),
            source: DocumentSource::Protected,
        }
    }

    #[test]
    fn test_selection_and_context_menu_suppressed() {
        let mut restrictions = Restrictions::default();
        for event in [
            ViewerEvent::ContextMenu,
            ViewerEvent::SelectStart,
            ViewerEvent::Copy,
        ] {
            assert_eq!(restrictions.handle(event), EventResponse::Suppressed);
            assert!(restrictions.content_visible());
        }
    }

    #[test]
    fn test_content_hidden_while_printing() {
        let mut restrictions = Restrictions::default();
        restrictions.handle(ViewerEvent::BeforePrint);
        assert!(!restrictions.content_visible());
        restrictions.handle(ViewerEvent::AfterPrint);
        assert!(restrictions.content_visible());
    }

    #[test]
    fn test_print_notice_replaces_page() {
        let mut session = ViewerSession::new();
        session.pages = vec!["Hello".to_string()];
        assert!(session.render_page(0).contains("Hello"));

        session.handle(ViewerEvent::BeforePrint);
        assert_eq!(session.render_page(0), PRINTING_DISABLED);
    }

    #[tokio::test]
    async fn test_open_loads_off_the_runtime() {
        let session = ViewerSession::open(document(b"not a pdf")).await.unwrap();
        assert_eq!(session.source(), Some(DocumentSource::Protected));
        assert!(session.file_path().is_some_and(|path| path.exists()));
    }

    #[test]
    fn test_reload_releases_previous_temp_file() {
        let mut session = ViewerSession::new();
        session.load(&document(b"not a pdf")).unwrap();
        let first = session.file_path().unwrap().to_path_buf();
        assert!(first.exists());
        assert_eq!(session.page_count(), 0);
        assert_eq!(session.render_page(0), NO_EXTRACTABLE_TEXT);

        session.load(&document(b"still not a pdf")).unwrap();
        let second = session.file_path().unwrap().to_path_buf();
        assert!(!first.exists());
        assert!(second.exists());

        drop(session);
        assert!(!second.exists());
    }
}
