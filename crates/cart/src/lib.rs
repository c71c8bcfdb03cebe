//! Cart domain model for the storefront.
//!
//! This crate provides the in-memory shopping cart:
//! - [`Money`] for unit prices and totals (integer cents)
//! - [`CartLine`] / [`LineDraft`] line items
//! - [`Cart`] aggregate enforcing the one-line-per-ticket-type invariant
//! - [`SessionPhase`] state machine for the guest/authenticated boundary

pub mod aggregate;
pub mod line;
pub mod money;
pub mod phase;

pub use aggregate::Cart;
pub use line::{CartLine, LineDraft};
pub use money::Money;
pub use phase::SessionPhase;

use thiserror::Error;

/// Errors that can occur during cart mutations.
///
/// These indicate caller bugs (invalid arguments), not runtime conditions,
/// and are raised eagerly before any state changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantity must be greater than zero when adding a line.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// Unit price may not be negative.
    #[error("Invalid unit price: {cents} cents (must not be negative)")]
    InvalidPrice { cents: i64 },
}
