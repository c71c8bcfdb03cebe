//! File-backed guest cart store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use cart::CartLine;

use crate::{GuestCartStore, StorageError};

/// Guest cart store backed by a single JSON file.
///
/// The file plays the role of the browser profile storage: one durable
/// string entry, surviving restarts. A missing file reads as an empty cart
/// and erasing deletes the file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store at the given path. The file is created lazily on the
    /// first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GuestCartStore for JsonFileStore {
    fn load(&self) -> Result<Vec<CartLine>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, lines: &[CartLine]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(lines)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn erase(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart::{LineDraft, Money};
    use common::LineId;

    fn line(ticket: &str, quantity: u32) -> CartLine {
        LineDraft::new(ticket, ticket, "Fest", "evt-1", quantity, Money::from_cents(2500))
            .into_line(LineId::generate())
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("cart.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_load_erase_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("cart.json"));

        store.save(&[line("vip-1", 2)]).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].quantity, 2);

        store.erase().unwrap();
        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn erase_of_absent_file_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("cart.json"));
        store.erase().unwrap();
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/profile/cart.json"));
        store.save(&[line("ga-1", 1)]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn garbage_on_disk_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        std::fs::write(&path, "definitely not json").unwrap();

        let store = JsonFileStore::new(path);
        assert!(matches!(
            store.load(),
            Err(StorageError::Serialization(_))
        ));
    }
}
