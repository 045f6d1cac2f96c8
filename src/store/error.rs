//! Error types for the remote row store.

use thiserror::Error;

/// Failures of the remote row store collaborator.
///
/// None of these are retried by the store client; callers decide.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// Credentials (API key or sheet id) are absent or the endpoint is unusable.
    #[error("Remote store not configured: {0}")]
    Configuration(String),

    /// The provider answered with a non-success status.
    #[error("Remote store error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// The request never produced a usable HTTP response.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// A guarded write found the target cells changed since they were read.
    #[error("Concurrent modification detected at {range}")]
    Conflict { range: String },

    /// The provider answered successfully but the body could not be understood.
    #[error("Malformed response: {message}")]
    Malformed { message: String },
}

impl StoreError {
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        StoreError::Remote {
            status,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        StoreError::Transport {
            message: message.into(),
        }
    }

    pub fn conflict(range: impl ToString) -> Self {
        StoreError::Conflict {
            range: range.to_string(),
        }
    }

    /// True for the optimistic-concurrency rejection, the only variant worth re-running a
    /// read-modify-write for.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StoreError::Malformed {
                message: e.to_string(),
            }
        } else {
            StoreError::transport(e.to_string())
        }
    }
}
