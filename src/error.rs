use serde_json::Value;
use thiserror::Error;

use crate::checksum::ChecksumError;

/// Errors returned by Bayarcash operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("checksum error: {0}")]
    Checksum(#[from] ChecksumError),

    #[error("invalid arguments: {0}")]
    Validation(String),

    /// Upstream answered with a non-success status.
    #[error("Bayarcash API error {status}: {body}")]
    Api { status: u16, body: Value },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
