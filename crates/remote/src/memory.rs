//! In-memory cart service for testing.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use cart::{CartLine, LineDraft, Money};
use common::{LineId, TicketTypeId};

use crate::{CartApi, RemoteError};

#[derive(Debug, Default)]
struct InMemoryCartState {
    lines: Vec<CartLine>,
    catalog: HashMap<TicketTypeId, (String, Money)>,
    add_log: Vec<(TicketTypeId, u32)>,
    fail_adds_for: HashSet<TicketTypeId>,
    fail_fetch: Option<RemoteError>,
    next_id: u32,
}

/// In-memory stand-in for the remote cart service.
///
/// Behaves like the real server: assigns its own line IDs, merges adds by
/// ticket type, and returns full snapshots. Failure injection and an
/// ordered add-call log support the reconciliation tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartApi {
    state: Arc<RwLock<InMemoryCartState>>,
    add_latency: Option<Duration>,
}

impl InMemoryCartApi {
    /// Creates an empty service with an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a purchasable ticket type with its display name and price.
    pub fn register_ticket_type(
        &self,
        id: impl Into<TicketTypeId>,
        name: impl Into<String>,
        price: Money,
    ) {
        self.state
            .write()
            .unwrap()
            .catalog
            .insert(id.into(), (name.into(), price));
    }

    /// Presets the server-side cart.
    pub fn seed_lines(&self, lines: Vec<CartLine>) {
        self.state.write().unwrap().lines = lines;
    }

    /// Makes adds for the given ticket type fail with `Unavailable`.
    pub fn fail_adds_for(&self, ticket_type_id: impl Into<TicketTypeId>) {
        self.state
            .write()
            .unwrap()
            .fail_adds_for
            .insert(ticket_type_id.into());
    }

    /// Makes `fetch_cart` fail with the given error (or restores success).
    pub fn set_fail_fetch(&self, error: Option<RemoteError>) {
        self.state.write().unwrap().fail_fetch = error;
    }

    /// Delays every add call; lets tests hold a sync in flight.
    pub fn with_add_latency(mut self, latency: Duration) -> Self {
        self.add_latency = Some(latency);
        self
    }

    /// Returns every add call received, in order.
    pub fn add_calls(&self) -> Vec<(TicketTypeId, u32)> {
        self.state.read().unwrap().add_log.clone()
    }

    /// Returns the number of server-side lines.
    pub fn line_count(&self) -> usize {
        self.state.read().unwrap().lines.len()
    }
}

#[async_trait]
impl CartApi for InMemoryCartApi {
    async fn fetch_cart(&self) -> Result<Vec<CartLine>, RemoteError> {
        let state = self.state.read().unwrap();
        if let Some(error) = &state.fail_fetch {
            return Err(error.clone());
        }
        Ok(state.lines.clone())
    }

    async fn add_line(
        &self,
        ticket_type_id: &TicketTypeId,
        quantity: u32,
    ) -> Result<Vec<CartLine>, RemoteError> {
        if let Some(latency) = self.add_latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.write().unwrap();
        state.add_log.push((ticket_type_id.clone(), quantity));

        if state.fail_adds_for.contains(ticket_type_id) {
            return Err(RemoteError::Unavailable("injected add failure".to_string()));
        }

        if let Some(existing) = state
            .lines
            .iter_mut()
            .find(|line| &line.ticket_type_id == ticket_type_id)
        {
            existing.quantity = existing.quantity.saturating_add(quantity);
        } else {
            let (name, price) = state
                .catalog
                .get(ticket_type_id)
                .cloned()
                .unwrap_or_else(|| (ticket_type_id.to_string(), Money::zero()));
            state.next_id += 1;
            let line_id = LineId::new(format!("SRV-{:04}", state.next_id));
            let line = LineDraft::new(
                ticket_type_id.clone(),
                name.clone(),
                name,
                "",
                quantity,
                price,
            )
            .into_line(line_id);
            state.lines.push(line);
        }

        Ok(state.lines.clone())
    }

    async fn update_line(
        &self,
        line_id: &LineId,
        quantity: u32,
    ) -> Result<Vec<CartLine>, RemoteError> {
        let mut state = self.state.write().unwrap();
        if quantity == 0 {
            state.lines.retain(|line| &line.line_id != line_id);
        } else if let Some(line) = state.lines.iter_mut().find(|l| &l.line_id == line_id) {
            line.quantity = quantity;
        } else {
            return Err(RemoteError::Api {
                status: 404,
                message: format!("no cart line {line_id}"),
            });
        }
        Ok(state.lines.clone())
    }

    async fn remove_line(&self, line_id: &LineId) -> Result<Vec<CartLine>, RemoteError> {
        let mut state = self.state.write().unwrap();
        state.lines.retain(|line| &line.line_id != line_id);
        Ok(state.lines.clone())
    }

    async fn clear(&self) -> Result<(), RemoteError> {
        self.state.write().unwrap().lines.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_merges_by_ticket_type_and_assigns_server_ids() {
        let api = InMemoryCartApi::new();
        api.register_ticket_type("vip-1", "VIP", Money::from_cents(4999));

        let snapshot = api.add_line(&"vip-1".into(), 2).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].line_id, LineId::new("SRV-0001"));

        let snapshot = api.add_line(&"vip-1".into(), 3).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].quantity, 5);
    }

    #[tokio::test]
    async fn injected_add_failure_is_logged_but_not_applied() {
        let api = InMemoryCartApi::new();
        api.fail_adds_for("ga-1");

        let result = api.add_line(&"ga-1".into(), 1).await;
        assert!(matches!(result, Err(RemoteError::Unavailable(_))));
        assert_eq!(api.add_calls().len(), 1);
        assert_eq!(api.line_count(), 0);
    }

    #[tokio::test]
    async fn update_zero_removes_and_unknown_line_is_404() {
        let api = InMemoryCartApi::new();
        api.register_ticket_type("vip-1", "VIP", Money::from_cents(4999));
        let snapshot = api.add_line(&"vip-1".into(), 2).await.unwrap();
        let line_id = snapshot[0].line_id.clone();

        api.update_line(&line_id, 0).await.unwrap();
        assert_eq!(api.line_count(), 0);

        let err = api.update_line(&line_id, 1).await.unwrap_err();
        assert!(matches!(err, RemoteError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn fetch_failure_injection() {
        let api = InMemoryCartApi::new();
        api.set_fail_fetch(Some(RemoteError::Unavailable("down".to_string())));
        assert!(api.fetch_cart().await.is_err());

        api.set_fail_fetch(None);
        assert!(api.fetch_cart().await.unwrap().is_empty());
    }
}
