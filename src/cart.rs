use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::StorageError;

/// Fixed key the cart count lives under.
pub const CART_KEY: &str = "cartCount";

/// Durable string-to-string storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keeps every key in a single TOML table on disk.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/storefront/storage.toml`
    pub fn default_path() -> Result<PathBuf, StorageError> {
        let mut path = dirs::data_dir().ok_or(StorageError::NoLocation)?;
        path.push("storefront");
        path.push("storage.toml");
        Ok(path)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_table(&self) -> Result<toml::Table, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.parse::<toml::Table>()?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(toml::Table::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let table = self.read_table()?;
        Ok(table.get(key).map(|value| match value {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut doc = self.read_table()?;
        doc.insert(key.to_string(), toml::Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // the table on disk is always complete
        let tmp = self.tmp_path();
        fs::write(&tmp, doc.to_string())?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Running cart counter. Falls back to a session-only value once the
/// backing store fails.
pub struct CartStore {
    store: Option<Box<dyn KeyValueStore>>,
    count: u64,
}

impl CartStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        match store.get(CART_KEY) {
            Ok(raw) => {
                let count = raw.as_deref().map(parse_count).unwrap_or(0);
                tracing::debug!(count, "cart count restored");
                Self { store: Some(store), count }
            }
            Err(e) => {
                tracing::warn!(error = %e, "cart storage unavailable, keeping count in memory");
                Self { store: None, count: 0 }
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::default()))
    }

    pub fn get(&self) -> u64 {
        self.count
    }

    pub fn increment(&mut self) -> u64 {
        self.count += 1;
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.set(CART_KEY, &self.count.to_string()) {
                tracing::warn!(error = %e, "failed to persist cart count, keeping count in memory");
                self.store = None;
            }
        }
        self.count
    }

    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }
}

fn parse_count(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::NoLocation)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::NoLocation)
        }
    }

    /// Reads fine, fails on write.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(Some("4".into()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::NoLocation)
        }
    }

    #[test]
    fn starts_at_zero_without_persisted_value() {
        let cart = CartStore::in_memory();
        assert_eq!(cart.get(), 0);
    }

    #[test]
    fn increments_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.toml");

        let mut cart = CartStore::new(Box::new(FileStore::new(&path)));
        for expected in 1..=5 {
            assert_eq!(cart.increment(), expected);
        }
        assert_eq!(cart.get(), 5);
        drop(cart);

        let restarted = CartStore::new(Box::new(FileStore::new(&path)));
        assert_eq!(restarted.get(), 5);
        assert!(restarted.is_persistent());

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("cartCount = \"5\""));
    }

    #[test]
    fn file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.toml");
        fs::write(&path, "theme = \"dark\"\n").unwrap();

        let mut store = FileStore::new(&path);
        store.set(CART_KEY, "2").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get(CART_KEY).unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn writes_replace_the_file_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.toml");
        let stale = dir.path().join("storage.toml.tmp");
        fs::write(&stale, "half a wri").unwrap();

        let mut cart = CartStore::new(Box::new(FileStore::new(&path)));
        cart.increment();
        cart.increment();

        assert!(!stale.exists());
        let table: toml::Table = fs::read_to_string(&path).unwrap().parse().unwrap();
        assert_eq!(table.get(CART_KEY).and_then(|v| v.as_str()), Some("2"));
    }

    #[test]
    fn garbage_value_reads_as_zero() {
        let mut store = MemoryStore::default();
        store.set(CART_KEY, "lots").unwrap();
        let cart = CartStore::new(Box::new(store));
        assert_eq!(cart.get(), 0);
    }

    #[test]
    fn unreadable_store_falls_back_to_memory() {
        let mut cart = CartStore::new(Box::new(BrokenStore));
        assert!(!cart.is_persistent());
        assert_eq!(cart.increment(), 1);
        assert_eq!(cart.increment(), 2);
    }

    #[test]
    fn failed_write_keeps_counting_in_memory() {
        let mut cart = CartStore::new(Box::new(ReadOnlyStore));
        assert_eq!(cart.get(), 4);
        assert_eq!(cart.increment(), 5);
        assert!(!cart.is_persistent());
        assert_eq!(cart.increment(), 6);
    }

    #[test]
    fn corrupt_file_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.toml");
        fs::write(&path, "this is = = not toml").unwrap();

        let mut cart = CartStore::new(Box::new(FileStore::new(&path)));
        assert!(!cart.is_persistent());
        assert_eq!(cart.increment(), 1);
    }
}
