//! Engine error types.

use cart::CartError;
use remote::RemoteError;
use thiserror::Error;

/// Errors surfaced by cart engine operations.
///
/// Local persistence failures never appear here: the guest store is
/// best-effort by contract, so the engine logs those and carries on.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid mutation arguments (caller bug).
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// A remote cart service call failed.
    #[error("Remote cart error: {0}")]
    Remote(#[from] RemoteError),

    /// A mutation arrived while a sync or refresh was in flight. The cart
    /// is read-only until the round-trip resolves.
    #[error("Cart is busy syncing with the remote service")]
    SyncInFlight,

    /// The operation needs an authenticated session.
    #[error("Operation requires an authenticated session")]
    NotAuthenticated,
}
