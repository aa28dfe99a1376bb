use academy_core::{AppError, ErrorMetadata, SchemaError};

const UNAVAILABLE_MESSAGE: &str = "API unavailable. Try again when the backend is up.";

/// Message fragments that mean the API could not be reached at all.
const UNREACHABLE_PATTERNS: &[&str] = &["network error", "econnrefused", "connection refused"];

/// Failure of a single API request.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Invalid(#[from] AppError),
}

impl ClientError {
    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the backend looks down rather than refusing the request.
    pub fn is_unavailable(&self) -> bool {
        if self.status() == Some(503) {
            return true;
        }
        if let ClientError::Transport(err) = self {
            if err.is_connect() || err.is_timeout() {
                return true;
            }
        }
        let message = format!("{:?} {}", self, self).to_lowercase();
        UNREACHABLE_PATTERNS.iter().any(|p| message.contains(p))
    }

    /// Text suitable for an inline form or action error.
    pub fn friendly_message(&self) -> String {
        if self.is_unavailable() {
            return UNAVAILABLE_MESSAGE.to_string();
        }
        match self {
            ClientError::Status { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    AppError::from_status(*status, "").client_message()
                } else {
                    body.to_string()
                }
            }
            ClientError::Invalid(err) => match err {
                AppError::InvalidInput(msg) | AppError::PayloadTooLarge(msg) => msg.clone(),
                other => other.to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        if err.is_unavailable() {
            return AppError::Unavailable(err.to_string());
        }
        match err {
            ClientError::Status { status, body } => AppError::from_status(status, body),
            ClientError::Transport(e) => AppError::Internal(e.to_string()),
            ClientError::Schema(e) => AppError::InvalidResponse(e.to_string()),
            ClientError::Invalid(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_503_is_unavailable() {
        let err = ClientError::Status {
            status: 503,
            body: "down".to_string(),
        };
        assert!(err.is_unavailable());
        assert_eq!(err.friendly_message(), UNAVAILABLE_MESSAGE);
        assert!(matches!(AppError::from(err), AppError::Unavailable(_)));
    }

    #[test]
    fn test_forbidden_is_not_unavailable() {
        let err = ClientError::Status {
            status: 403,
            body: String::new(),
        };
        assert!(!err.is_unavailable());
        assert_eq!(err.status(), Some(403));
        assert_eq!(
            err.friendly_message(),
            "You do not have permission to perform this action."
        );
        assert!(matches!(AppError::from(err), AppError::Forbidden(_)));
    }

    #[test]
    fn test_network_error_text_is_unavailable() {
        let err = ClientError::Invalid(AppError::Internal("Network Error".to_string()));
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_status_body_is_shown() {
        let err = ClientError::Status {
            status: 400,
            body: "File must be a PDF".to_string(),
        };
        assert_eq!(err.friendly_message(), "File must be a PDF");
    }

    #[test]
    fn test_payload_error_message_is_plain() {
        let err = ClientError::Invalid(AppError::InvalidInput(
            "Only PDF files are allowed.".to_string(),
        ));
        assert_eq!(err.friendly_message(), "Only PDF files are allowed.");
    }
}
