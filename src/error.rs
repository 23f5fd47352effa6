//! Error types

use thiserror::Error;

/// Library error type
#[derive(Error, Debug)]
pub enum Error {
    /// The proxy listing could not be fetched or had no table to read
    #[error("Proxy source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Invalid proxy endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Application result type
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single probe through one candidate.
///
/// Always recovered inside the probe loop by moving on to the next candidate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    #[error("timed out")]
    Timeout,

    #[error("HTTP status: {0}")]
    Status(u16),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("could not build client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for ProbeFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProbeFailure::Timeout
        } else if e.is_builder() {
            ProbeFailure::Client(e.to_string())
        } else {
            ProbeFailure::Connect(e.to_string())
        }
    }
}
