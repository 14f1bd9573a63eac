//! Error types for oracle access and package search.

use thiserror::Error;

/// Errors that can occur while querying the generation oracle.
///
/// Timeout and connection failure are deliberately distinct categories so
/// the web layer can surface actionable messages and statuses for each.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The query was empty or otherwise unusable.
    #[error("Invalid query: {reason}")]
    InvalidQuery {
        /// Why the query was rejected.
        reason: String,
    },

    /// The oracle did not answer within the configured timeout.
    #[error("Oracle request timed out after {seconds} seconds")]
    Timeout {
        /// The timeout that elapsed.
        seconds: u64,
    },

    /// The oracle endpoint could not be reached at all.
    #[error("Failed to connect to oracle: {reason}")]
    Unreachable {
        /// The underlying connection failure.
        reason: String,
    },

    /// The configured endpoint answered 404; almost always a
    /// misconfigured gateway URL.
    #[error("Oracle endpoint not found: {url}")]
    EndpointNotFound {
        /// The URL that answered 404.
        url: String,
    },

    /// The oracle answered with a non-2xx status.
    #[error("Oracle request failed with status {status}: {message}")]
    UpstreamFailure {
        /// HTTP status returned by the oracle.
        status: u16,
        /// Best-effort message extracted from the error body.
        message: String,
    },

    /// The oracle answered 2xx but the body was not JSON in any
    /// recognized shape.
    #[error("Malformed oracle response: {reason}")]
    MalformedResponse {
        /// Why the body could not be interpreted.
        reason: String,
    },
}
