use crate::error::AppError;

/// Largest PDF the dashboard lets through to the upload endpoint.
pub const MAX_UPLOAD_SIZE_MB: usize = 10;
pub const MAX_UPLOAD_SIZE_BYTES: usize = MAX_UPLOAD_SIZE_MB * 1024 * 1024;
pub const ACCEPTED_MIME_TYPE: &str = "application/pdf";

/// Validated multipart payload for `POST /catalogos/upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPayload {
    file_name: String,
    bytes: Vec<u8>,
    name: Option<String>,
    sector: Option<String>,
}

impl UploadPayload {
    /// Builds a payload, enforcing the PDF-only and size rules.
    ///
    /// `name` and `sector` are trimmed and dropped when blank.
    pub fn new(
        file_name: impl Into<String>,
        mime_type: &str,
        bytes: Vec<u8>,
        name: Option<&str>,
        sector: Option<&str>,
    ) -> Result<Self, AppError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(AppError::InvalidInput("Select a PDF file.".to_string()));
        }
        if mime_type != ACCEPTED_MIME_TYPE {
            return Err(AppError::InvalidInput(
                "Only PDF files are allowed.".to_string(),
            ));
        }
        if bytes.len() > MAX_UPLOAD_SIZE_BYTES {
            return Err(AppError::PayloadTooLarge(format!(
                "Maximum size: {} MB.",
                MAX_UPLOAD_SIZE_MB
            )));
        }

        Ok(Self {
            file_name,
            bytes,
            name: non_blank(name),
            sector: non_blank(sector),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn sector(&self) -> Option<&str> {
        self.sector.as_deref()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// MIME type guessed from a file name's extension.
pub fn mime_type_for_file_name(file_name: &str) -> &'static str {
    let is_pdf = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        ACCEPTED_MIME_TYPE
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_payload_trims_optional_fields() {
        let payload = UploadPayload::new(
            "catalog.pdf",
            ACCEPTED_MIME_TYPE,
            b"%PDF-1.4".to_vec(),
            Some("  Catalog 2024 "),
            Some("   "),
        )
        .unwrap();

        assert_eq!(payload.name(), Some("Catalog 2024"));
        assert_eq!(payload.sector(), None);
        assert_eq!(payload.file_name(), "catalog.pdf");
    }

    #[test]
    fn test_upload_payload_rejects_non_pdf() {
        let err = UploadPayload::new("photo.png", "image/png", vec![1, 2, 3], None, None)
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Only PDF files are allowed.");
    }

    #[test]
    fn test_upload_payload_rejects_oversized_file() {
        let bytes = vec![0u8; MAX_UPLOAD_SIZE_BYTES + 1];
        let err = UploadPayload::new("big.pdf", ACCEPTED_MIME_TYPE, bytes, None, None)
            .unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[test]
    fn test_upload_payload_accepts_exact_limit() {
        let bytes = vec![0u8; MAX_UPLOAD_SIZE_BYTES];
        assert!(UploadPayload::new("edge.pdf", ACCEPTED_MIME_TYPE, bytes, None, None).is_ok());
    }

    #[test]
    fn test_upload_payload_requires_file_name() {
        let err = UploadPayload::new("", ACCEPTED_MIME_TYPE, vec![], None, None).unwrap_err();
        assert!(err.to_string().contains("Select a PDF file."));
    }

    #[test]
    fn test_mime_type_for_file_name() {
        assert_eq!(mime_type_for_file_name("a.PDF"), ACCEPTED_MIME_TYPE);
        assert_eq!(mime_type_for_file_name("a.pdf"), ACCEPTED_MIME_TYPE);
        assert_eq!(mime_type_for_file_name("a.docx"), "application/octet-stream");
        assert_eq!(mime_type_for_file_name("pdf"), "application/octet-stream");
    }
}
