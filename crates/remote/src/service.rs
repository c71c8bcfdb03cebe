//! Cart service trait.

use async_trait::async_trait;
use cart::CartLine;
use common::{LineId, TicketTypeId};

use crate::RemoteError;

/// Operations against the server-authoritative cart.
///
/// Every mutating call returns the updated snapshot so callers can replace
/// their in-memory state verbatim; the service, not the client, is the
/// source of truth once a session is authenticated. Upper bounds on
/// quantities, if any, are enforced server-side and surface as
/// [`RemoteError::Api`] failures.
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Fetches the full cart.
    async fn fetch_cart(&self) -> Result<Vec<CartLine>, RemoteError>;

    /// Adds tickets of the given type; merging into an existing line is the
    /// server's responsibility.
    async fn add_line(
        &self,
        ticket_type_id: &TicketTypeId,
        quantity: u32,
    ) -> Result<Vec<CartLine>, RemoteError>;

    /// Sets the quantity of an existing line.
    async fn update_line(
        &self,
        line_id: &LineId,
        quantity: u32,
    ) -> Result<Vec<CartLine>, RemoteError>;

    /// Removes a line.
    async fn remove_line(&self, line_id: &LineId) -> Result<Vec<CartLine>, RemoteError>;

    /// Clears the server-side cart.
    async fn clear(&self) -> Result<(), RemoteError>;
}
