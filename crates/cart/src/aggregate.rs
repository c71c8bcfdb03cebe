//! Cart aggregate.

use common::{LineId, TicketTypeId};
use serde::{Deserialize, Serialize};

use crate::{CartError, CartLine, LineDraft, Money};

/// The in-memory shopping cart.
///
/// Lines are kept in insertion order: the order matters for display and for
/// the guest→authenticated merge, which replays lines in the order they were
/// originally added. Totals are always recomputed from the lines, never
/// cached.
///
/// Invariant: at most one line exists per ticket type. Adding a ticket type
/// that is already present increments the existing line instead of creating
/// a duplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from existing lines, e.g. a hydrated guest cart or a
    /// server snapshot.
    ///
    /// Duplicate ticket types are collapsed into the first occurrence so the
    /// uniqueness invariant holds regardless of the input.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            if let Some(existing) = cart.find_by_ticket_type_mut(&line.ticket_type_id) {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            } else if line.quantity > 0 {
                cart.lines.push(line);
            }
        }
        cart
    }

    /// Adds a draft line to the cart.
    ///
    /// If a line for the same ticket type already exists, its quantity is
    /// incremented and its line ID kept; otherwise a new line is appended
    /// with a freshly generated ID. Returns the ID of the affected line.
    pub fn add(&mut self, draft: LineDraft) -> Result<LineId, CartError> {
        if draft.quantity == 0 {
            return Err(CartError::InvalidQuantity {
                quantity: draft.quantity,
            });
        }
        if draft.unit_price.is_negative() {
            return Err(CartError::InvalidPrice {
                cents: draft.unit_price.cents(),
            });
        }

        if let Some(existing) = self.find_by_ticket_type_mut(&draft.ticket_type_id) {
            // Quantities saturate rather than overflow; the service enforces
            // any real upper bound.
            existing.quantity = existing.quantity.saturating_add(draft.quantity);
            return Ok(existing.line_id.clone());
        }

        let line = draft.into_line(LineId::generate());
        let line_id = line.line_id.clone();
        self.lines.push(line);
        Ok(line_id)
    }

    /// Removes a line unconditionally. Returns true if a line was present.
    ///
    /// Idempotent: removing an absent line is a no-op.
    pub fn remove(&mut self, line_id: &LineId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.line_id != line_id);
        self.lines.len() != before
    }

    /// Sets the quantity of a line.
    ///
    /// A quantity of zero behaves exactly as [`Cart::remove`]. An absent
    /// line is a no-op, so repeated identical calls converge.
    pub fn set_quantity(&mut self, line_id: &LineId, quantity: u32) {
        if quantity == 0 {
            self.remove(line_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| &l.line_id == line_id) {
            line.quantity = quantity;
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Returns the lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns the number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the cart holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the total ticket count across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Returns the cart total, recomputed from the lines.
    pub fn total_amount(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Returns the line for a ticket type, if present.
    pub fn find_by_ticket_type(&self, ticket_type_id: &TicketTypeId) -> Option<&CartLine> {
        self.lines
            .iter()
            .find(|line| &line.ticket_type_id == ticket_type_id)
    }

    fn find_by_ticket_type_mut(
        &mut self,
        ticket_type_id: &TicketTypeId,
    ) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| &line.ticket_type_id == ticket_type_id)
    }
}
