//! Error and result types shared across the crate.
//!
//! Two families matter at runtime:
//! - [`ValidationError`]: rejected locally before any request is made.
//! - [`FetchError`]: a GitHub call failed; surfaced as a toast, state is left untouched.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Input rejected before reaching the network.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Fill the username field")]
    EmptyQuery,
}

/// A GitHub request that did not produce usable data.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FetchError {
    /// Transport failure (DNS, connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status.
    #[error("GitHub API error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Primary rate limit exhausted.
    #[error("GitHub API rate limit exceeded, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// Body did not match the expected shape.
    #[error("unexpected response shape: {0}")]
    Schema(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl FetchError {
    /// Short text suitable for a notification body.
    pub fn user_message(&self) -> &str {
        match self {
            Self::RateLimited { .. } => "GitHub API rate limit reached. Please try again later.",
            Self::Validation(ValidationError::EmptyQuery) => "Fill the username field",
            Self::Network(_) | Self::Status { .. } | Self::Schema(_) => {
                "Please try again later."
            }
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Schema(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status { status: status.as_u16(), message: err.to_string() }
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Schema(err.to_string())
    }
}

/// Crate-level error for setup paths (settings file, client construction).
#[derive(Debug, Error)]
pub enum Error {
    #[error("config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
