// Error types for octofeed.
// Covers GitHub API failures, malformed payloads, and cache/config errors.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OctofeedError {
    #[error("GitHub user not found: {0}")]
    NotFound(String),

    #[error("GitHub API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Malformed events payload: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("Server answered 304 Not Modified but no cached events exist")]
    UnexpectedNotModified,

    #[error("Cache file {} is unreadable: {reason}", .path.display())]
    CacheUnreadable { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OctofeedError {
    /// Whether this error means the requested identity does not exist upstream.
    pub fn is_not_found(&self) -> bool {
        matches!(self, OctofeedError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, OctofeedError>;
