//! Remote cart service client.
//!
//! This crate provides everything that talks to (or stands in for) the
//! server-authoritative cart:
//! - [`CartApi`] — the service trait the engine orchestrates against
//! - [`HttpCartApi`] — the REST implementation
//! - [`InMemoryCartApi`] — an in-memory server for tests
//! - [`TokenStore`] — the authentication signal and bearer-token source
//! - [`RemoteError`] — the failure taxonomy for remote calls

pub mod dto;
pub mod error;
pub mod http;
pub mod memory;
pub mod service;
pub mod session;

pub use error::RemoteError;
pub use http::HttpCartApi;
pub use memory::InMemoryCartApi;
pub use service::CartApi;
pub use session::{InMemoryTokenStore, TokenStore};
