//! Error type for MyParcel operations.

use crate::validation::ValidationError;
use thiserror::Error;

/// Errors returned by the MyParcel client.
///
/// Nothing is retried: every failure reaches the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encoding(String),

    /// The response body was not JSON or did not have the expected envelope.
    #[error("failed to decode response body: {0}")]
    Decoding(String),

    /// The API answered with a non-success status. `body` holds the raw
    /// response bytes read as UTF-8, regardless of any declared charset;
    /// invalid sequences become U+FFFD.
    #[error("MyParcel API returned status code {status}: {body}")]
    Remote { status: u16, body: String },

    /// Network-level failure: DNS, connect, TLS or timeout.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The shipment failed local validation and was not sent.
    #[error("invalid shipment: {0}")]
    Validation(#[from] ValidationError),

    /// A configured value (API key, user agent) cannot be sent as a header.
    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),

    /// The builder settings were rejected, e.g. a malformed proxy URL.
    #[error("invalid client configuration: {0}")]
    Configuration(String),
}

impl Error {
    /// HTTP status of a [`Error::Remote`] failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened before any response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
