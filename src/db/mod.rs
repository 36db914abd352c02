//! String key/value persistence: browser `localStorage` on the web, a
//! SQLite settings table for native builds of the web client. The proxy
//! server does not link SQLite.

use thiserror::Error;

#[cfg(target_arch = "wasm32")]
use gloo_storage::{LocalStorage, Storage};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("storage backend failed: {0}")]
    Backend(String),
}

#[cfg(all(not(target_arch = "wasm32"), any(test, feature = "web")))]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

pub trait KeyValueStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_string(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

#[cfg(target_arch = "wasm32")]
fn js_message(err: wasm_bindgen::JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, StorageError> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(js_message(err)))
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| StorageError::Backend(js_message(err)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        LocalStorage::delete(key);
        Ok(())
    }
}

#[cfg(all(not(target_arch = "wasm32"), any(test, feature = "web")))]
pub struct SqliteStore {
    conn: rusqlite::Connection,
}

#[cfg(all(not(target_arch = "wasm32"), any(test, feature = "web")))]
impl SqliteStore {
    pub fn open(path: &std::path::Path) -> Result<Self, StorageError> {
        let conn = rusqlite::Connection::open(path)
            .map_err(|e| StorageError::Unavailable(format!("Failed to open database: {e}")))?;
        Self::initialize(conn)
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Self::initialize(rusqlite::Connection::open_in_memory()?)
    }

    /// `<data dir>/behimelobot/behimelobot.db`, falling back to the working
    /// directory.
    #[cfg(feature = "web")]
    pub fn open_default() -> Result<Self, StorageError> {
        let data_dir = dirs::data_local_dir()
            .map(|dir| dir.join("behimelobot"))
            .unwrap_or_else(|| std::path::PathBuf::from("."));
        std::fs::create_dir_all(&data_dir)
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Self::open(&data_dir.join("behimelobot.db"))
    }

    fn initialize(conn: rusqlite::Connection) -> Result<Self, StorageError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        Ok(Self { conn })
    }
}

#[cfg(all(not(target_arch = "wasm32"), any(test, feature = "web")))]
impl KeyValueStore for SqliteStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, StorageError> {
        use rusqlite::OptionalExtension;

        Ok(self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?)
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            [key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?1", [key])?;
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::rc::Rc<S> {
    fn get_string(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_string(key)
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_string(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

#[cfg(target_arch = "wasm32")]
pub type PlatformStore = BrowserStore;
#[cfg(all(not(target_arch = "wasm32"), feature = "web"))]
pub type PlatformStore = SqliteStore;

/// The platform's persistent store.
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Result<PlatformStore, StorageError> {
    Ok(BrowserStore)
}

#[cfg(all(not(target_arch = "wasm32"), feature = "web"))]
pub fn default_store() -> Result<PlatformStore, StorageError> {
    SqliteStore::open_default()
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn values_round_trip_and_overwrite() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.get_string("k").unwrap(), None);
        store.set_string("k", "one").unwrap();
        store.set_string("k", "two").unwrap();
        assert_eq!(store.get_string("k").unwrap().as_deref(), Some("two"));
        store.remove("k").unwrap();
        assert_eq!(store.get_string("k").unwrap(), None);
    }

    #[test]
    fn file_store_persists_between_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.set_string("behimelobot_downloads", "[]").unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get_string("behimelobot_downloads").unwrap().as_deref(),
            Some("[]")
        );
    }
}
