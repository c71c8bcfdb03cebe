//! Guest cart store trait.

use cart::CartLine;

use crate::StorageError;

/// Key-value persistence for the guest cart.
///
/// The store holds one entry: a JSON array of cart lines, serialized as a
/// string. Operations are synchronous; guest-path mutations never suspend.
///
/// Contract:
/// - an absent entry and an empty array are equivalent on [`load`](Self::load);
/// - [`erase`](Self::erase) removes the entry entirely and succeeds if it
///   was already absent;
/// - the entry is exclusively owned by the cart engine, no other component
///   writes to it.
pub trait GuestCartStore: Send + Sync {
    /// Reads the persisted guest cart. Absent entry yields an empty vec.
    fn load(&self) -> Result<Vec<CartLine>, StorageError>;

    /// Replaces the persisted guest cart with the given lines.
    fn save(&self, lines: &[CartLine]) -> Result<(), StorageError>;

    /// Removes the persisted entry.
    fn erase(&self) -> Result<(), StorageError>;
}
