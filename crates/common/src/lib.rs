//! Shared identifier types for the storefront cart.

pub mod types;

pub use types::{EventId, LineId, TicketTypeId};
