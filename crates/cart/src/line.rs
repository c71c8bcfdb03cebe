//! Cart line items.

use common::{EventId, LineId, TicketTypeId};
use serde::{Deserialize, Serialize};

use crate::Money;

/// One purchasable line item held in the cart.
///
/// `ticket_type_name`, `event_name` and `event_id` are denormalized display
/// attributes cached from the catalog at the time the line was added; they
/// may go stale and are never treated as authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Line identifier, unique within the cart.
    #[serde(rename = "id")]
    pub line_id: LineId,

    /// The purchasable ticket category. Merge key for the cart.
    pub ticket_type_id: TicketTypeId,

    /// Display name of the ticket category.
    pub ticket_type_name: String,

    /// Display name of the event.
    pub event_name: String,

    /// Event the ticket belongs to.
    pub event_id: EventId,

    /// Number of tickets. Always at least 1 for a stored line.
    pub quantity: u32,

    /// Price per ticket at the time the line was added.
    #[serde(rename = "price")]
    pub unit_price: Money,
}

impl CartLine {
    /// Returns the total price for this line (`quantity × unit_price`).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Input for adding a line to the cart: a [`CartLine`] without an identifier.
///
/// The cart assigns a fresh line ID (guest path) or the server assigns one
/// (remote path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDraft {
    pub ticket_type_id: TicketTypeId,
    pub ticket_type_name: String,
    pub event_name: String,
    pub event_id: EventId,
    pub quantity: u32,
    pub unit_price: Money,
}

impl LineDraft {
    /// Creates a draft line.
    pub fn new(
        ticket_type_id: impl Into<TicketTypeId>,
        ticket_type_name: impl Into<String>,
        event_name: impl Into<String>,
        event_id: impl Into<EventId>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            ticket_type_id: ticket_type_id.into(),
            ticket_type_name: ticket_type_name.into(),
            event_name: event_name.into(),
            event_id: event_id.into(),
            quantity,
            unit_price,
        }
    }

    /// Converts the draft into a full line with the given identifier.
    pub fn into_line(self, line_id: LineId) -> CartLine {
        CartLine {
            line_id,
            ticket_type_id: self.ticket_type_id,
            ticket_type_name: self.ticket_type_name,
            event_name: self.event_name,
            event_id: self.event_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_line() -> CartLine {
        LineDraft::new(
            "vip-1",
            "VIP",
            "Summer Fest",
            "evt-1",
            2,
            Money::from_cents(4999),
        )
        .into_line(LineId::new("line-1"))
    }

    #[test]
    fn line_total_multiplies_quantity_by_unit_price() {
        assert_eq!(sample_line().line_total().cents(), 9998);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let json = serde_json::to_value(sample_line()).unwrap();
        assert_eq!(json["id"], "line-1");
        assert_eq!(json["ticketTypeId"], "vip-1");
        assert_eq!(json["ticketTypeName"], "VIP");
        assert_eq!(json["eventName"], "Summer Fest");
        assert_eq!(json["eventId"], "evt-1");
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["price"], 4999);
    }

    #[test]
    fn deserialization_roundtrip() {
        let line = sample_line();
        let json = serde_json::to_string(&line).unwrap();
        let back: CartLine = serde_json::from_str(&json).unwrap();
        assert_eq!(line, back);
    }
}
