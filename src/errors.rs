use reqwest::StatusCode;
use thiserror::Error;

use crate::models::{ItemId, Severity};

/// Errors raised by the scanning and check-in workflows.
///
/// Every variant is recoverable from the dialog's point of view: the
/// controller converts the error into a severity-colored message, re-enables
/// the input and keeps the dialog open for another attempt.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Server error")]
    Transport(#[from] reqwest::Error),

    #[error("Server error (status {0})")]
    Status(StatusCode),

    #[error("Invalid response body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// Logical error reported by the server (`error` tag), surfaced verbatim.
    #[error("{0}")]
    Server(String),

    #[error("Unknown response from server")]
    UnknownResponse,

    #[error("Stock item {0} has already been scanned")]
    DuplicateItem(ItemId),

    #[error("Stock item {0} is already in the target location")]
    AlreadyAtLocation(ItemId),

    #[error("No items have been scanned")]
    EmptySession,

    #[error("No target location has been selected")]
    NoTargetLocation,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScanError {
    /// Severity used when the error is rendered as an inline dialog message.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Transport(_)
            | Self::Status(_)
            | Self::InvalidBody(_)
            | Self::Server(_)
            | Self::UnknownResponse
            | Self::Config(_) => Severity::Danger,
            Self::DuplicateItem(_) | Self::EmptySession | Self::NoTargetLocation => {
                Severity::Warning
            }
            Self::AlreadyAtLocation(_) => Severity::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_surface_verbatim() {
        let err = ScanError::Server("No match found for barcode data".to_string());
        assert_eq!(err.to_string(), "No match found for barcode data");
        assert_eq!(err.severity(), Severity::Danger);
    }

    #[test]
    fn duplicate_scan_is_a_warning() {
        assert_eq!(ScanError::DuplicateItem(7).severity(), Severity::Warning);
    }

    #[test]
    fn noop_scan_is_informational() {
        assert_eq!(ScanError::AlreadyAtLocation(7).severity(), Severity::Info);
    }
}
