//! Guest cart persistence.
//!
//! The guest cart lives under a single key as a JSON-serialized array of
//! lines, mirroring the browser profile storage it stands in for. An absent
//! key and an empty array read identically; erasing removes the key rather
//! than writing an empty value.

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use error::StorageError;
pub use file::JsonFileStore;
pub use memory::InMemoryGuestStore;
pub use store::GuestCartStore;
