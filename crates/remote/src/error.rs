//! Remote cart service error types.

use thiserror::Error;

/// Errors that can occur calling the remote cart service.
///
/// All variants are expected runtime conditions and travel back to the
/// caller as values; none of them abort the session except
/// [`AuthRejected`](RemoteError::AuthRejected), which the engine answers
/// with a session teardown.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// Network failure, timeout, or a 5xx from the service. The cart keeps
    /// its last-known state when this happens.
    #[error("Cart service unavailable: {0}")]
    Unavailable(String),

    /// The service rejected the presented token (401 with a token attached).
    ///
    /// Never produced for anonymous requests: a 401 without a token is an
    /// expected response on protected routes, not a session failure.
    #[error("Authentication rejected by the cart service")]
    AuthRejected,

    /// Non-2xx response that is neither a 5xx nor a token rejection.
    #[error("Cart service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Failed to decode cart service response: {0}")]
    Decode(String),
}
