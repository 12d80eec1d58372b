//! Shared error type for the comic and What If? clients.

use std::path::PathBuf;
use thiserror::Error;

/// Hard failures: transport, decoding, filesystem, and input validation.
///
/// Expected "not found" cases (an out-of-range comic number, a gap in the
/// archive) are not errors; they come back as sentinel values instead.
#[derive(Debug, Error)]
pub enum XkcdError {
    // Transport
    #[error("Failed to create HTTP client: {source}")]
    Client { source: reqwest::Error },

    #[error("Network error: could not reach {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to read response body from {url}: {source}")]
    BodyRead { url: String, source: reqwest::Error },

    // Decoding
    #[error("Invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error("Response from {url} has a missing or malformed '{field}' field")]
    MissingField { url: String, field: String },

    // Filesystem
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Input
    #[error("Invalid number '{input}': {reason}")]
    Validation { input: String, reason: String },

    #[error("The What If? archive is empty (page layout may have changed).")]
    EmptyArchive,
}

impl XkcdError {
    /// True for network and HTTP failures.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            XkcdError::Fetch { .. } | XkcdError::HttpStatus { .. } | XkcdError::BodyRead { .. }
        )
    }

    /// True for malformed or incomplete JSON.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            XkcdError::Decode { .. } | XkcdError::MissingField { .. }
        )
    }
}
