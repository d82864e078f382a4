//! Provider error taxonomy.
//!
//! Providers return [`ProviderError`] values carrying transport-level detail.
//! The workflow orchestrator is the single place errors become user-facing:
//! [`classify`] folds a provider error and the operation being attempted into
//! a [`CommitFailure`] with a stable machine-readable kind.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error raised by a Git provider operation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credentials rejected (HTTP 401/403).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("API error{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Api { status: Option<u16>, message: String },

    /// The operation is not available on this provider.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    /// Anything that does not fit the categories above.
    #[error("{0}")]
    Unknown(String),
}

impl ProviderError {
    /// Fold an HTTP response status and body message into the taxonomy.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ProviderError::Auth(message),
            _ => ProviderError::Api {
                status: Some(status),
                message,
            },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ProviderError::from_status(status.as_u16(), err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

/// Stable failure kind exposed to callers and serialized output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Auth,
    Network,
    Api,
    Unknown,
}

/// User-facing outcome of a failed workflow step.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitFailure {
    pub error_type: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl fmt::Display for CommitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommitFailure {}

impl CommitFailure {
    pub fn auth(message: impl Into<String>) -> Self {
        Self {
            error_type: ErrorKind::Auth,
            message: message.into(),
            status_code: None,
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            error_type: ErrorKind::Unknown,
            message: message.into(),
            status_code: None,
        }
    }
}

/// Translate a provider error into a user-facing failure for `operation`
/// (a short present-tense phrase, e.g. "create the branch").
pub fn classify(err: ProviderError, operation: &str) -> CommitFailure {
    match err {
        ProviderError::Auth(_) => CommitFailure {
            error_type: ErrorKind::Auth,
            message: format!(
                "Authentication failed while trying to {operation}. \
                 Please check your token and permissions."
            ),
            status_code: None,
        },
        ProviderError::Network(_) => CommitFailure {
            error_type: ErrorKind::Network,
            message: format!(
                "Network error while trying to {operation}. \
                 Please check your connection and try again."
            ),
            status_code: None,
        },
        ProviderError::Api { status, message } => {
            let message = match status {
                Some(401) | Some(403) => format!(
                    "Authentication failed while trying to {operation}. \
                     Please check your token and permissions."
                ),
                Some(404) => format!(
                    "Resource not found while trying to {operation}. \
                     Please check your project ID."
                ),
                Some(422) => format!(
                    "Invalid data provided while trying to {operation}. \
                     Please check your inputs."
                ),
                Some(429) => format!(
                    "Rate limit exceeded while trying to {operation}. \
                     Please try again later."
                ),
                Some(s) if s >= 500 => format!(
                    "The server encountered an error while trying to {operation}. \
                     Please try again later."
                ),
                _ => message,
            };
            let error_type = match status {
                Some(401) | Some(403) => ErrorKind::Auth,
                _ => ErrorKind::Api,
            };
            CommitFailure {
                error_type,
                message,
                status_code: status,
            }
        }
        ProviderError::Unsupported(what) => CommitFailure {
            error_type: ErrorKind::Api,
            message: format!("The provider does not support {what}."),
            status_code: None,
        },
        ProviderError::Unknown(message) => CommitFailure {
            error_type: ErrorKind::Unknown,
            message,
            status_code: None,
        },
    }
}
