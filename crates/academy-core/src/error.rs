//! Error types module
//!
//! Domain-level errors shared by the client library and the dashboard CLI.
//! Transport-specific failures live in `academy_api_client::ClientError` and
//! convert into `AppError` at the edges.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like an unreachable API
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error presentation - lets an error describe how it should
/// be shown to the user and logged.
pub trait ErrorMetadata {
    /// HTTP status code equivalent
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// User-facing message
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Static metadata for each variant: (http_status, error_code, recoverable, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Debug),
        AppError::Unauthorized(_) => (401, "UNAUTHORIZED", false, LogLevel::Debug),
        AppError::Forbidden(_) => (403, "FORBIDDEN", false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::Unavailable(_) => (503, "API_UNAVAILABLE", true, LogLevel::Warn),
        AppError::InvalidResponse(_) => (502, "INVALID_RESPONSE", false, LogLevel::Warn),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Map an HTTP status and response body onto the closest variant.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            400 | 422 => AppError::InvalidInput(body),
            401 => AppError::Unauthorized(body),
            403 => AppError::Forbidden(body),
            404 => AppError::NotFound(body),
            413 => AppError::PayloadTooLarge(body),
            502..=504 => AppError::Unavailable(body),
            _ => AppError::Internal(format!("status {}: {}", status, body)),
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Unauthorized(_) => "Sign in to continue.".to_string(),
            AppError::Forbidden(_) => {
                "You do not have permission to perform this action.".to_string()
            }
            AppError::NotFound(_) => "Catalog not found.".to_string(),
            AppError::Unavailable(_) => {
                "API unavailable. Try again when the backend is up.".to_string()
            }
            AppError::InvalidResponse(_) => "Unexpected response from the API.".to_string(),
            AppError::Internal(_) => "Internal error".to_string(),
        }
    }
}
