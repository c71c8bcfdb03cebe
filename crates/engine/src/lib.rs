//! Cart reconciliation engine.
//!
//! [`CartEngine`] owns the canonical cart state for a storefront session and
//! mediates between the local guest store and the remote cart service:
//! - unauthenticated, it persists every mutation locally;
//! - on sign-in it performs the one-time, best-effort merge of guest lines
//!   into the remote cart;
//! - authenticated, it treats the remote service as authoritative and keeps
//!   only a read-through projection in memory.

pub mod engine;
pub mod error;
pub mod sync;
pub mod view;

pub use engine::CartEngine;
pub use error::EngineError;
pub use sync::{SyncOutcome, SyncReport};
pub use view::CartView;
