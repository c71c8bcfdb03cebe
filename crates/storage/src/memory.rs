//! In-memory guest cart store for testing.

use std::sync::{Arc, RwLock};

use cart::CartLine;

use crate::{GuestCartStore, StorageError};

#[derive(Debug, Default)]
struct InMemoryGuestState {
    /// The serialized entry, `None` when the key is absent.
    value: Option<String>,
    fail_on_save: bool,
}

/// In-memory guest cart store.
///
/// Stores the serialized string exactly as a real key-value facility would,
/// so parse failures and the absent-vs-empty distinction behave the same as
/// in production.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGuestStore {
    state: Arc<RwLock<InMemoryGuestState>>,
}

impl InMemoryGuestStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail on subsequent saves.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.state.write().unwrap().fail_on_save = fail;
    }

    /// Replaces the entry with a value that will not parse, to exercise the
    /// read-failure path.
    pub fn set_corrupted(&self) {
        self.state.write().unwrap().value = Some("{not json".to_string());
    }

    /// Returns true if the entry is present (even if empty).
    pub fn is_present(&self) -> bool {
        self.state.read().unwrap().value.is_some()
    }
}

impl GuestCartStore for InMemoryGuestStore {
    fn load(&self) -> Result<Vec<CartLine>, StorageError> {
        let state = self.state.read().unwrap();
        match &state.value {
            Some(raw) => Ok(serde_json::from_str(raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, lines: &[CartLine]) -> Result<(), StorageError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_save {
            return Err(StorageError::Io(std::io::Error::other(
                "injected save failure",
            )));
        }
        state.value = Some(serde_json::to_string(lines)?);
        Ok(())
    }

    fn erase(&self) -> Result<(), StorageError> {
        self.state.write().unwrap().value = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart::{LineDraft, Money};
    use common::LineId;

    fn line(ticket: &str, quantity: u32) -> CartLine {
        LineDraft::new(ticket, ticket, "Fest", "evt-1", quantity, Money::from_cents(1000))
            .into_line(LineId::generate())
    }

    #[test]
    fn absent_entry_reads_as_empty() {
        let store = InMemoryGuestStore::new();
        assert!(!store.is_present());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let store = InMemoryGuestStore::new();
        store.save(&[line("vip-1", 2), line("ga-1", 1)]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].ticket_type_id, "vip-1".into());
    }

    #[test]
    fn erase_removes_the_entry() {
        let store = InMemoryGuestStore::new();
        store.save(&[line("vip-1", 2)]).unwrap();
        assert!(store.is_present());

        store.erase().unwrap();
        assert!(!store.is_present());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn corrupted_entry_fails_to_parse() {
        let store = InMemoryGuestStore::new();
        store.set_corrupted();
        assert!(matches!(
            store.load(),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn injected_save_failure() {
        let store = InMemoryGuestStore::new();
        store.set_fail_on_save(true);
        assert!(matches!(
            store.save(&[line("vip-1", 1)]),
            Err(StorageError::Io(_))
        ));
        assert!(!store.is_present());
    }
}
