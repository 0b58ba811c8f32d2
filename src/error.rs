//! Error taxonomy for the portal data layer.
//!
//! Read-path failures never reach callers (the fallback policy absorbs them);
//! everything here surfaces on the write and authentication paths only.

use thiserror::Error;

/// Failure reported by the remote data gateway.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Could not reach the backend at all.
    #[error("transport failure for {collection}: {message}")]
    Transport { collection: String, message: String },

    /// The backend answered with an error status.
    #[error("backend rejected {collection} request ({status}): {message}")]
    Backend {
        collection: String,
        status: u16,
        message: String,
    },

    /// No response within the configured bound.
    #[error("request to {collection} timed out after {timeout_secs}s")]
    Timeout {
        collection: String,
        timeout_secs: u64,
    },

    /// The backend answered 2xx but the body did not match the expected shape.
    #[error("malformed response from {collection}: {message}")]
    MalformedResponse { collection: String, message: String },

    /// Sign-in refused by the authentication backend.
    #[error("authentication rejected: {message}")]
    AuthRejected { message: String },
}

impl GatewayError {
    /// Error category for logging and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            GatewayError::Transport { .. } => "transport",
            GatewayError::Backend { .. } => "backend",
            GatewayError::Timeout { .. } => "timeout",
            GatewayError::MalformedResponse { .. } => "malformed_response",
            GatewayError::AuthRejected { .. } => "auth",
        }
    }

    /// Whether retrying the same call can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::Transport { .. } | GatewayError::Timeout { .. }
        )
    }
}

/// Error surfaced by portal mutations.
#[derive(Debug, Clone, Error)]
pub enum PortalError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A required field was empty; the gateway is never contacted.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}
