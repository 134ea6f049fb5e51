use thiserror::Error;

/// Errors surfaced by the network operations of the client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to {action}: {status_text} (HTTP {status})")]
    Transport {
        action: &'static str,
        status: u16,
        status_text: String,
    },
    #[error("{0}")]
    Protocol(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised by a [`crate::storage::KeyValueStore`] backend.
///
/// The client never propagates these; they are logged and replaced with a
/// safe default.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_includes_status_text() {
        let err = ClientError::Transport {
            action: "fetch config",
            status: 500,
            status_text: "Internal Server Error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch config: Internal Server Error (HTTP 500)"
        );
    }

    #[test]
    fn test_storage_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StorageError = io_err.into();
        assert!(err.to_string().contains("File system error"));
    }
}
