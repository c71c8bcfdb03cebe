//! Read-only cart view for observers.

use cart::{Cart, CartLine, Money};
use serde::Serialize;

/// Snapshot of the cart as the UI sees it.
///
/// Published through the engine's watch channel after every state change;
/// observers hold a receiver and never mutate state directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    /// Lines in display (insertion) order.
    pub lines: Vec<CartLine>,

    /// Total ticket count across all lines.
    pub item_count: u32,

    /// Cart total, recomputed from the lines.
    pub total_amount: Money,

    /// True while a remote round-trip (merge or refresh) is in flight.
    pub is_syncing: bool,
}

impl CartView {
    pub(crate) fn of(cart: &Cart, is_syncing: bool) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            item_count: cart.item_count(),
            total_amount: cart.total_amount(),
            is_syncing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart::LineDraft;

    #[test]
    fn view_reflects_cart_totals() {
        let mut cart = Cart::new();
        cart.add(LineDraft::new(
            "vip-1",
            "VIP",
            "Fest",
            "evt-1",
            2,
            Money::from_cents(4999),
        ))
        .unwrap();

        let view = CartView::of(&cart, true);
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total_amount, Money::from_cents(9998));
        assert!(view.is_syncing);
    }

    #[test]
    fn empty_cart_view_is_all_zero() {
        let view = CartView::of(&Cart::new(), false);
        assert!(view.lines.is_empty());
        assert_eq!(view.item_count, 0);
        assert_eq!(view.total_amount, Money::zero());
    }
}
