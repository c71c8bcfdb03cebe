//! The cart reconciliation engine.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cart::{Cart, CartError, CartLine, LineDraft, SessionPhase};
use common::LineId;
use remote::{CartApi, RemoteError, TokenStore};
use storage::GuestCartStore;
use tokio::sync::{Mutex, watch};

use crate::{CartView, EngineError, SyncOutcome, SyncReport};

struct EngineState {
    cart: Cart,
    phase: SessionPhase,
    is_syncing: bool,
}

/// Owns the canonical cart state across the guest/authenticated boundary.
///
/// Construct one engine per session at application start and hand references
/// to whichever UI components need it; all cart mutation goes through the
/// engine, which is what keeps the one-line-per-ticket-type invariant from
/// being violated externally.
///
/// Guest-path mutations complete synchronously (the returned futures resolve
/// without suspending); authenticated mutations round-trip to the remote
/// service and replace in-memory state with the server's snapshot.
pub struct CartEngine<A: CartApi, S: GuestCartStore> {
    remote: A,
    local: S,
    tokens: Arc<dyn TokenStore>,
    state: Mutex<EngineState>,
    sync_flight: AtomicBool,
    view_tx: watch::Sender<CartView>,
}

impl<A: CartApi, S: GuestCartStore> CartEngine<A, S> {
    /// Creates an engine with an empty cart.
    ///
    /// The starting phase follows the token store: a session that already
    /// holds a token begins remote-backed, otherwise guest-backed. Call
    /// [`hydrate`](Self::hydrate) to populate the cart.
    pub fn new(remote: A, local: S, tokens: Arc<dyn TokenStore>) -> Self {
        let phase = if tokens.is_authenticated() {
            SessionPhase::AuthenticatedRemote
        } else {
            SessionPhase::GuestLocal
        };
        let state = EngineState {
            cart: Cart::new(),
            phase,
            is_syncing: false,
        };
        let (view_tx, _) = watch::channel(CartView::of(&state.cart, false));
        Self {
            remote,
            local,
            tokens,
            state: Mutex::new(state),
            sync_flight: AtomicBool::new(false),
            view_tx,
        }
    }

    /// Subscribes to cart view updates.
    pub fn subscribe(&self) -> watch::Receiver<CartView> {
        self.view_tx.subscribe()
    }

    /// Returns the current cart view.
    pub fn view(&self) -> CartView {
        self.view_tx.borrow().clone()
    }

    /// Returns the current session phase.
    pub async fn phase(&self) -> SessionPhase {
        self.state.lock().await.phase
    }

    /// Populates the cart at session start.
    ///
    /// Unauthenticated sessions hydrate from the guest store. Authenticated
    /// sessions refresh from the remote service — unless a guest cart is
    /// left over from browsing before login, in which case the normal merge
    /// path runs first.
    #[tracing::instrument(skip(self))]
    pub async fn hydrate(&self) -> Result<(), EngineError> {
        if self.tokens.is_authenticated() {
            if self.load_guest_lines().is_empty() {
                self.refresh_from_remote().await
            } else {
                self.reconcile_on_login().await.map(|_| ())
            }
        } else {
            let lines = self.load_guest_lines();
            let mut state = self.state.lock().await;
            state.cart = Cart::from_lines(lines);
            self.publish(&state);
            Ok(())
        }
    }

    /// Adds tickets to the cart.
    ///
    /// Guest path: merges into the in-memory cart and persists. Remote path:
    /// issues the server add and adopts the returned snapshot.
    #[tracing::instrument(skip(self, draft), fields(ticket_type = %draft.ticket_type_id))]
    pub async fn add_item(&self, draft: LineDraft) -> Result<(), EngineError> {
        if draft.quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity: 0 }.into());
        }

        let mut state = self.state.lock().await;
        if state.is_syncing {
            return Err(EngineError::SyncInFlight);
        }
        if state.phase.is_remote_backed() {
            drop(state);
            let lines = self
                .remote_call(self.remote.add_line(&draft.ticket_type_id, draft.quantity))
                .await?;
            self.apply_snapshot(lines).await;
        } else {
            state.cart.add(draft)?;
            self.persist_guest(&state.cart);
            self.publish(&state);
        }
        Ok(())
    }

    /// Removes a line. Idempotent: removing an absent line is a no-op on
    /// the guest path and the server treats it the same way.
    #[tracing::instrument(skip(self), fields(line = %line_id))]
    pub async fn remove_item(&self, line_id: &LineId) -> Result<(), EngineError> {
        let mut state = self.state.lock().await;
        if state.is_syncing {
            return Err(EngineError::SyncInFlight);
        }
        if state.phase.is_remote_backed() {
            drop(state);
            let lines = self.remote_call(self.remote.remove_line(line_id)).await?;
            self.apply_snapshot(lines).await;
        } else {
            state.cart.remove(line_id);
            self.persist_guest(&state.cart);
            self.publish(&state);
        }
        Ok(())
    }

    /// Sets a line's quantity; zero behaves exactly as removal.
    #[tracing::instrument(skip(self), fields(line = %line_id))]
    pub async fn update_quantity(
        &self,
        line_id: &LineId,
        quantity: u32,
    ) -> Result<(), EngineError> {
        let mut state = self.state.lock().await;
        if state.is_syncing {
            return Err(EngineError::SyncInFlight);
        }
        if state.phase.is_remote_backed() {
            drop(state);
            let call = async {
                if quantity == 0 {
                    self.remote.remove_line(line_id).await
                } else {
                    self.remote.update_line(line_id, quantity).await
                }
            };
            let lines = self.remote_call(call).await?;
            self.apply_snapshot(lines).await;
        } else {
            state.cart.set_quantity(line_id, quantity);
            self.persist_guest(&state.cart);
            self.publish(&state);
        }
        Ok(())
    }

    /// Empties the cart.
    ///
    /// On the guest path the persistence entry is erased outright — an
    /// absent key and an empty cart hydrate identically.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), EngineError> {
        let mut state = self.state.lock().await;
        if state.is_syncing {
            return Err(EngineError::SyncInFlight);
        }
        if state.phase.is_remote_backed() {
            drop(state);
            self.remote_call(self.remote.clear()).await?;
            let mut state = self.state.lock().await;
            state.cart.clear();
            self.publish(&state);
        } else {
            state.cart.clear();
            if let Err(error) = self.local.erase() {
                tracing::warn!(%error, "failed to erase guest cart entry");
            }
            self.publish(&state);
        }
        Ok(())
    }

    /// Replaces in-memory state with the server's cart, verbatim.
    ///
    /// Valid only with a token present. On failure the cart keeps its
    /// last-known state (stale but consistent) and the error travels back
    /// to the caller; a token rejection tears the session down instead.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_from_remote(&self) -> Result<(), EngineError> {
        if !self.tokens.is_authenticated() {
            return Err(EngineError::NotAuthenticated);
        }

        {
            let mut state = self.state.lock().await;
            state.is_syncing = true;
            self.publish(&state);
        }

        let fetched = self.remote.fetch_cart().await;

        let mut state = self.state.lock().await;
        state.is_syncing = false;
        match fetched {
            Ok(lines) => {
                state.cart = Cart::from_lines(lines);
                self.publish(&state);
                Ok(())
            }
            Err(RemoteError::AuthRejected) => {
                self.teardown_locked(&mut state);
                Err(RemoteError::AuthRejected.into())
            }
            Err(error) => {
                self.publish(&state);
                Err(error.into())
            }
        }
    }

    /// Merges the guest cart into the remote cart after sign-in.
    ///
    /// Runs at most once at a time: a second trigger while one is in flight
    /// returns [`SyncOutcome::AlreadyInFlight`] without side effects.
    ///
    /// The merge is best-effort and non-transactional — each guest line is
    /// replayed against the remote add endpoint in its original insertion
    /// order, per-line failures are logged and counted but never abort the
    /// loop, and the guest entry is erased afterwards regardless, so a later
    /// reload cannot re-submit lines that already made it across. A repeat
    /// invocation after a failure is safe: with no guest entry left it
    /// degenerates to a refresh.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile_on_login(&self) -> Result<SyncOutcome, EngineError> {
        if !self.tokens.is_authenticated() {
            return Err(EngineError::NotAuthenticated);
        }
        if self
            .sync_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("reconciliation already in flight, ignoring trigger");
            return Ok(SyncOutcome::AlreadyInFlight);
        }

        metrics::counter!("cart_reconcile_runs_total").increment(1);
        {
            let mut state = self.state.lock().await;
            state.phase = SessionPhase::Syncing;
            state.is_syncing = true;
            self.publish(&state);
        }

        let guest_lines = self.load_guest_lines();
        let mut report = SyncReport {
            attempted: guest_lines.len(),
            ..SyncReport::default()
        };

        for line in &guest_lines {
            match self
                .remote
                .add_line(&line.ticket_type_id, line.quantity)
                .await
            {
                Ok(_) => report.migrated += 1,
                Err(error) => {
                    report.failed += 1;
                    metrics::counter!("cart_reconcile_line_failures_total").increment(1);
                    tracing::warn!(
                        ticket_type = %line.ticket_type_id,
                        %error,
                        "failed to migrate guest cart line"
                    );
                }
            }
        }

        if let Err(error) = self.local.erase() {
            tracing::warn!(%error, "failed to erase guest cart entry after merge");
        }

        let fetched = self.remote.fetch_cart().await;

        let mut state = self.state.lock().await;
        state.is_syncing = false;
        let outcome = match fetched {
            Ok(lines) => {
                state.phase = SessionPhase::AuthenticatedRemote;
                state.cart = Cart::from_lines(lines);
                self.publish(&state);
                tracing::info!(
                    attempted = report.attempted,
                    migrated = report.migrated,
                    failed = report.failed,
                    "guest cart reconciled"
                );
                Ok(SyncOutcome::Completed(report))
            }
            Err(RemoteError::AuthRejected) => {
                self.teardown_locked(&mut state);
                Err(RemoteError::AuthRejected.into())
            }
            Err(error) => {
                state.phase = SessionPhase::AuthenticatedRemote;
                self.publish(&state);
                Err(error.into())
            }
        };
        drop(state);

        self.sync_flight.store(false, Ordering::Release);
        outcome
    }

    /// Returns the engine to a fresh guest session after logout.
    ///
    /// The remote cart is not re-imported into guest storage.
    #[tracing::instrument(skip(self))]
    pub async fn reset_to_guest(&self) {
        let mut state = self.state.lock().await;
        state.phase = SessionPhase::GuestLocal;
        state.is_syncing = false;
        state.cart = Cart::new();
        self.publish(&state);
    }

    async fn remote_call<T>(
        &self,
        call: impl Future<Output = Result<T, RemoteError>>,
    ) -> Result<T, EngineError> {
        match call.await {
            Ok(value) => Ok(value),
            Err(RemoteError::AuthRejected) => {
                let mut state = self.state.lock().await;
                self.teardown_locked(&mut state);
                Err(RemoteError::AuthRejected.into())
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn apply_snapshot(&self, lines: Vec<CartLine>) {
        let mut state = self.state.lock().await;
        state.cart = Cart::from_lines(lines);
        self.publish(&state);
    }

    /// Forced session teardown on a rejected token.
    fn teardown_locked(&self, state: &mut EngineState) {
        tracing::warn!("session rejected by cart service, returning to guest state");
        self.tokens.clear();
        state.phase = SessionPhase::GuestLocal;
        state.is_syncing = false;
        state.cart = Cart::new();
        self.publish(state);
    }

    fn load_guest_lines(&self) -> Vec<CartLine> {
        match self.local.load() {
            Ok(lines) => lines,
            Err(error) => {
                tracing::warn!(%error, "failed to read guest cart, treating as empty");
                Vec::new()
            }
        }
    }

    fn persist_guest(&self, cart: &Cart) {
        if let Err(error) = self.local.save(cart.lines()) {
            metrics::counter!("guest_cart_persist_failures_total").increment(1);
            tracing::warn!(%error, "failed to persist guest cart");
        }
    }

    fn publish(&self, state: &EngineState) {
        self.view_tx
            .send_replace(CartView::of(&state.cart, state.is_syncing));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart::Money;
    use remote::{InMemoryCartApi, InMemoryTokenStore};
    use storage::InMemoryGuestStore;

    fn guest_engine() -> CartEngine<InMemoryCartApi, InMemoryGuestStore> {
        CartEngine::new(
            InMemoryCartApi::new(),
            InMemoryGuestStore::new(),
            Arc::new(InMemoryTokenStore::new()),
        )
    }

    fn draft(ticket: &str, quantity: u32) -> LineDraft {
        LineDraft::new(
            ticket,
            ticket,
            "Summer Fest",
            "evt-1",
            quantity,
            Money::from_cents(4999),
        )
    }

    #[tokio::test]
    async fn starts_in_guest_phase_without_token() {
        let engine = guest_engine();
        assert_eq!(engine.phase().await, SessionPhase::GuestLocal);
        assert_eq!(engine.view().item_count, 0);
    }

    #[tokio::test]
    async fn starts_remote_backed_with_token() {
        let engine = CartEngine::new(
            InMemoryCartApi::new(),
            InMemoryGuestStore::new(),
            Arc::new(InMemoryTokenStore::with_token("tok-1")),
        );
        assert_eq!(engine.phase().await, SessionPhase::AuthenticatedRemote);
    }

    #[tokio::test]
    async fn zero_quantity_add_fails_fast() {
        let engine = guest_engine();
        let err = engine.add_item(draft("vip-1", 0)).await.unwrap_err();
        assert!(matches!(err, EngineError::Cart(_)));
    }

    #[tokio::test]
    async fn guest_add_publishes_view_updates() {
        let engine = guest_engine();
        let mut views = engine.subscribe();

        engine.add_item(draft("vip-1", 2)).await.unwrap();
        views.changed().await.unwrap();
        let view = views.borrow().clone();
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total_amount, Money::from_cents(9998));
    }

    #[tokio::test]
    async fn refresh_requires_authentication() {
        let engine = guest_engine();
        assert!(matches!(
            engine.refresh_from_remote().await,
            Err(EngineError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn reconcile_requires_authentication() {
        let engine = guest_engine();
        assert!(matches!(
            engine.reconcile_on_login().await,
            Err(EngineError::NotAuthenticated)
        ));
    }
}
