//! Error types and handling for scrap core

use thiserror::Error;

/// Result type alias for scrap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for scrap core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote service errors
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Page cache errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for field '{field}': {value}")]
    InvalidValue { field: String, value: String },
}

/// Remote search service errors
///
/// A cancelled search is not an error; see [`crate::remote::SearchOutcome`].
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid request URL: {url}")]
    InvalidUrl { url: String },

    #[error("Search task failed: {message}")]
    TaskFailed { message: String },
}

/// Page cache errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to write page cache at {path}: {message}")]
    WriteFailed { path: String, message: String },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        match err.status() {
            Some(status) => RemoteError::Status {
                status: status.as_u16(),
                url,
            }
            .into(),
            None => RemoteError::Network {
                message: err.to_string(),
            }
            .into(),
        }
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Generic(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Generic(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_errors_convert_and_display() {
        let err: Error = RemoteError::Status {
            status: 502,
            url: "https://scrapbox.io/api/pages/demo".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Remote(RemoteError::Status { status: 502, .. })));
        assert_eq!(
            err.to_string(),
            "Remote error: Unexpected status 502 from https://scrapbox.io/api/pages/demo"
        );

        let err: Error = ConfigError::MissingField {
            field: "project".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required field: project"
        );
    }
}
