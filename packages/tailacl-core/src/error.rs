use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while syncing policy with the control plane
#[derive(Debug, Error)]
pub enum SyncError {
    /// No tailnet was given on the command line or in the environment
    #[error("Tailnet must be provided via --tailnet or TAILSCALE_TAILNET env")]
    MissingTailnet,

    /// No API key was given on the command line or in the environment
    #[error("Tailscale API key must be provided via --api-key or TAILSCALE_API_KEY env")]
    MissingApiKey,

    /// The control plane answered with a non-success status
    #[error("{method} {url} returned {status}: {body}")]
    Remote {
        method: &'static str,
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The request never completed or its body could not be decoded
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The import file is missing, unreadable or malformed
    #[error("Cannot import {}: {reason}", path.display())]
    Input { path: PathBuf, reason: String },

    /// The export file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode export document: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SyncError {
    /// True for errors caused by missing command-line input, reported as usage errors
    pub fn is_usage(&self) -> bool {
        matches!(self, SyncError::MissingTailnet | SyncError::MissingApiKey)
    }

    /// HTTP status of a rejected request, if any
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            SyncError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
