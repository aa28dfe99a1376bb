//! Terminal dashboard over the Academy catalog client.

pub mod gate;
pub mod output;
pub mod viewer;

use academy_api_client::ClientError;
use academy_core::{AppError, ErrorMetadata, LogLevel};

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays clean
/// for `--format json`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Log a failed request at the level its error class calls for and turn it
/// into the message shown to the user.
pub fn report_client_error(err: ClientError) -> anyhow::Error {
    let message = err.friendly_message();
    let app_error = AppError::from(err);
    let status = app_error.http_status_code();
    let code = app_error.error_code();
    let recoverable = app_error.is_recoverable();
    match app_error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(status, code, recoverable, error = %app_error, "Request failed")
        }
        LogLevel::Warn => {
            tracing::warn!(status, code, recoverable, error = %app_error, "Request failed")
        }
        LogLevel::Error => {
            tracing::error!(status, code, recoverable, error = %app_error, "Request failed")
        }
    }
    anyhow::anyhow!(message)
}
