use eyre::Result;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use crate::config::get_app_data_prefix;
use crate::logging;

pub const FAVORITES_KEY: &str = "favorites";
pub const SEARCH_HISTORY_KEY: &str = "searchHistory";
pub const THEME_KEY: &str = "theme";
pub const FONT_SIZE_KEY: &str = "fontSize";

/// Key/value persistence port shared by the stores.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

pub type SharedStorage = Rc<RefCell<dyn Storage>>;

pub fn shared<S: Storage + 'static>(storage: S) -> SharedStorage {
    Rc::new(RefCell::new(storage))
}

/// Read a JSON value stored under `key`.
///
/// A missing key, a failed read, or an unparsable value all yield
/// `T::default()`; the latter two are logged. The next successful write
/// replaces whatever was there.
pub fn load_json<T>(storage: &dyn Storage, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(err) => {
            logging::error(format!("Error loading {}: {}", key, err));
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            logging::warn(format!("Discarding malformed {}: {}", key, err));
            T::default()
        }
    }
}

pub fn save_json<T>(storage: &mut dyn Storage, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    storage.set_item(key, &raw)
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        Self::open(&prefix.join("storage.db"))
    }

    pub fn open(filepath: &Path) -> Result<Self> {
        if let Some(parent) = filepath.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(filepath)?;
        Self::init_db(&conn)?;
        logging::debug(format!("Opened storage at {}", filepath.display()));

        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_db(&conn)?;
        Ok(Self { conn })
    }

    fn init_db(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT (datetime('now'))
            );
            ",
        )?;
        Ok(())
    }

    #[cfg(test)]
    fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM local_storage ORDER BY key")?;
        let keys_iter = stmt.query_map([], |row| row.get(0))?;

        let mut keys = Vec::new();
        for key in keys_iter {
            keys.push(key?);
        }
        Ok(keys)
    }
}

impl Storage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key=?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO local_storage (key, value, updated_at) VALUES (?, ?, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key=?", params![key])?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM local_storage", [])?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.items.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sqlite_storage_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("storage.db");
        assert!(!db_path.exists());
        let storage = SqliteStorage::open(&db_path).unwrap();
        assert!(db_path.exists());
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn test_sqlite_set_get_replace() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        assert_eq!(storage.get_item(THEME_KEY).unwrap(), None);

        storage.set_item(THEME_KEY, "dark").unwrap();
        assert_eq!(storage.get_item(THEME_KEY).unwrap(), Some("dark".to_string()));

        storage.set_item(THEME_KEY, "light").unwrap();
        assert_eq!(storage.get_item(THEME_KEY).unwrap(), Some("light".to_string()));
        assert_eq!(storage.keys().unwrap(), vec![THEME_KEY.to_string()]);
    }

    #[test]
    fn test_sqlite_remove_and_clear() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        storage.set_item(THEME_KEY, "dark").unwrap();
        storage.set_item(FONT_SIZE_KEY, "large").unwrap();

        storage.remove_item(THEME_KEY).unwrap();
        assert_eq!(storage.get_item(THEME_KEY).unwrap(), None);
        assert_eq!(storage.get_item(FONT_SIZE_KEY).unwrap(), Some("large".to_string()));

        // Removing a missing key is not an error
        storage.remove_item("missing").unwrap();

        storage.clear().unwrap();
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn test_sqlite_persists_across_connections() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("storage.db");
        {
            let mut storage = SqliteStorage::open(&db_path).unwrap();
            save_json(&mut storage, SEARCH_HISTORY_KEY, &vec!["神", "愛"]).unwrap();
        }
        let storage = SqliteStorage::open(&db_path).unwrap();
        let history: Vec<String> = load_json(&storage, SEARCH_HISTORY_KEY);
        assert_eq!(history, vec!["神", "愛"]);
    }

    #[test]
    fn test_load_json_missing_and_malformed() {
        let storage = MemoryStorage::new().with_item(FAVORITES_KEY, "{not json");
        let favorites: Vec<String> = load_json(&storage, FAVORITES_KEY);
        assert!(favorites.is_empty());

        let history: Vec<String> = load_json(&storage, SEARCH_HISTORY_KEY);
        assert!(history.is_empty());
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        storage.set_item("a", "1").unwrap();
        assert_eq!(storage.get_item("a").unwrap(), Some("1".to_string()));
        storage.clear().unwrap();
        assert_eq!(storage.get_item("a").unwrap(), None);
    }
}
