//! Wire types for the cart REST API.
//!
//! Field names and shapes follow the production service exactly; all
//! responses arrive wrapped in [`ApiEnvelope`].

use cart::{CartLine, Money};
use common::{EventId, LineId, TicketTypeId};
use serde::{Deserialize, Serialize};

/// Standard response envelope: `{"success", "message"?, "data", "timestamp"?}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One ticket entry in a cart snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ticket_type: Option<String>,
    #[serde(default)]
    pub ticket_status: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub event_id_type: Option<String>,
    pub quantity: u32,
}

impl CartItemDto {
    /// Maps a wire ticket onto a domain line.
    ///
    /// The service reports one `id` per ticket entry; it serves as both the
    /// line ID and the ticket type ID, and `name` fills both display names.
    pub fn into_line(self) -> CartLine {
        CartLine {
            line_id: LineId::new(self.id.clone()),
            ticket_type_id: TicketTypeId::new(self.id),
            ticket_type_name: self.name.clone(),
            event_name: self.name,
            event_id: EventId::new(self.event_id_type.unwrap_or_default()),
            quantity: self.quantity,
            unit_price: Money::from_major(self.price),
        }
    }
}

/// Full cart snapshot: `{"id", "tickets", "quantity", "totalCost"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshotDto {
    pub id: String,
    pub tickets: Vec<CartItemDto>,
    pub quantity: u32,
    pub total_cost: f64,
}

impl CartSnapshotDto {
    /// Maps the snapshot's tickets onto domain lines, preserving order.
    pub fn into_lines(self) -> Vec<CartLine> {
        self.tickets.into_iter().map(CartItemDto::into_line).collect()
    }
}

/// Body for `POST /api/v1/cart/add`.
#[derive(Debug, Serialize)]
pub struct AddToCartRequest {
    pub id: String,
    pub quantity: u32,
}

/// Body for `PUT /api/v1/cart/{lineId}`.
#[derive(Debug, Serialize)]
pub struct UpdateCartRequest {
    pub quantity: u32,
}
