//! Error types for remote synchronization operations.

use thiserror::Error;

/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, RemoteError>;

/// Failure modes of a Remote Data Service round-trip.
///
/// The taxonomy is deliberately flat: the store converts every failure
/// into an explicit negative result for the caller, so fine-grained
/// variants buy nothing beyond logging and tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The server answered with a non-success status.
    #[error("Server rejected the request ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        message: String,
    },

    /// The request never completed (connection refused, DNS, timeout).
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The request payload could not be encoded.
    #[error("Invalid request payload: {0}")]
    Payload(String),
}

impl RemoteError {
    /// Returns `true` if the server rejected the request as a client
    /// error (validation failure, capacity exceeded, not found).
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 400 && *status < 500)
    }
}
