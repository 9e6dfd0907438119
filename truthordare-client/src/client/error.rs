//! Client error taxonomy.

use thiserror::Error;

/// Errors surfaced by [`TruthOrDareClient`](crate::TruthOrDareClient)
/// operations.
///
/// Every failed call maps to exactly one variant. Nothing is retried
/// internally; retry timing is the caller's decision.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected locally: a 429 cooldown is still active. The request never
    /// reached the network.
    #[error("Rate limit cooldown active, retry in {wait_secs}s")]
    RateLimitBlocked {
        /// Whole seconds until the cooldown window ends.
        wait_secs: u64,
    },

    /// The server answered 429 Too Many Requests.
    #[error("Rate limit exceeded")]
    RateLimitExceeded {
        /// Whole seconds until the window resets, when the server reported
        /// a reset time.
        wait_secs: Option<u64>,
    },

    /// The server answered 500 Internal Server Error.
    #[error("Server error")]
    ServerError,

    /// No response arrived within the configured deadline.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout {
        /// The deadline that elapsed.
        timeout_secs: u64,
    },

    /// Any other transport or HTTP failure.
    #[error("Request failed: {0}")]
    Unknown(#[from] reqwest::Error),
}
