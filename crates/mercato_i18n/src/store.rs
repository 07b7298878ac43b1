//! Durable key-value storage for the language preference.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::StoreError;

/// Where the selected language survives a restart.
///
/// Implementations are called on the thread that changes the language;
/// they should not block for long.
pub trait PreferenceStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store. Clones share the same map, so handing a clone to a new
/// context behaves like reopening the same storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Flat TOML file of string values, e.g. `language = "fr"`.
///
/// The file is created on first write. Other keys in the file are preserved.
#[derive(Clone, Debug)]
pub struct TomlFileStore {
    path: PathBuf,
}

impl TomlFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<toml::Table, StoreError> {
        let src = match fs::read_to_string(&self.path) {
            Ok(src) => src,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(toml::Table::new()),
            Err(e) => return Err(e.into()),
        };
        src.parse::<toml::Table>()
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

impl PreferenceStore for TomlFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let table = self.read_table()?;
        Ok(table
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking every later save.
        let mut table = match self.read_table() {
            Ok(table) => table,
            Err(StoreError::Decode(_)) => toml::Table::new(),
            Err(e) => return Err(e),
        };
        table.insert(key.to_string(), toml::Value::String(value.to_string()));
        let out = toml::to_string(&table).map_err(|e| StoreError::Encode(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, out)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_clones_share_values() {
        let store = MemoryStore::new();
        let reopened = store.clone();
        store.save("language", "es").unwrap();
        assert_eq!(reopened.load("language").unwrap(), Some("es".to_string()));
        assert_eq!(reopened.load("other").unwrap(), None);
    }

    #[test]
    fn toml_file_round_trip_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("mercato.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "theme = \"dark\"\n").unwrap();

        let store = TomlFileStore::new(&path);
        assert_eq!(store.load("language").unwrap(), None);
        store.save("language", "fr").unwrap();

        let reopened = TomlFileStore::new(&path);
        assert_eq!(reopened.load("language").unwrap(), Some("fr".to_string()));
        assert_eq!(reopened.load("theme").unwrap(), Some("dark".to_string()));
    }

    #[test]
    fn toml_file_missing_is_empty_and_created_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.toml");
        let store = TomlFileStore::new(&path);
        assert_eq!(store.load("language").unwrap(), None);

        store.save("language", "es").unwrap();
        assert!(path.exists());
        assert_eq!(store.load("language").unwrap(), Some("es".to_string()));
    }

    #[test]
    fn corrupt_file_fails_load_but_is_replaced_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "this is = = not toml").unwrap();

        let store = TomlFileStore::new(&path);
        assert!(matches!(store.load("language"), Err(StoreError::Decode(_))));

        store.save("language", "fr").unwrap();
        assert_eq!(store.load("language").unwrap(), Some("fr".to_string()));
    }
}
