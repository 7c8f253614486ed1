//! Error types for the per-target scan pipeline.
//!
//! Only [`ScanError::InvalidTarget`] and [`ScanError::Fetch`] prevent a verdict;
//! the remaining variants are recorded as warnings on the target's result.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    /// Input could not be turned into an absolute http(s) URL
    #[error("invalid target '{input}': {reason}")]
    InvalidTarget { input: String, reason: String },

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// PoC artifact could not be written
    #[error("failed to write {}: {source}", .path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("evidence capture failed: {0}")]
    EvidenceCapture(String),
}

impl ScanError {
    pub fn invalid_target(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Transport-level failures of the single GET issued per target
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out: {0}")]
    Timeout(String),

    /// DNS resolution, refused connection or TLS handshake failure
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("redirect error: {0}")]
    Redirect(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request error: {0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            FetchError::Timeout(message)
        } else if err.is_connect() {
            FetchError::Connect(message)
        } else if err.is_redirect() {
            FetchError::Redirect(message)
        } else if err.is_body() || err.is_decode() {
            FetchError::Body(message)
        } else {
            FetchError::Request(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_wraps_into_scan_error() {
        let err: ScanError = FetchError::Connect("dns error".into()).into();
        assert!(matches!(err, ScanError::Fetch(FetchError::Connect(_))));
        assert_eq!(err.to_string(), "fetch failed: connection failed: dns error");
    }

    #[test]
    fn test_invalid_target_message() {
        let err = ScanError::invalid_target("http://", "empty host");
        assert_eq!(err.to_string(), "invalid target 'http://': empty host");
    }
}
