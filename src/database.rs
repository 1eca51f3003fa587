use rusqlite::Error::InvalidParameterName;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};
use tracing::warn;

use crate::models::{Settings, TargetClient};

/// Centralized preference key names.
/// Prevents typos between the engine, the settings surface and export/import.
pub mod keys {
    pub const SERVER_URL: &str = "server_url";
    pub const REFRESH_ON_IDLE_EXIT: &str = "refresh_on_idle_exit";
    pub const TARGET_CLIENT: &str = "target_client";
    pub const LAST_WALLPAPER_URI: &str = "last_wallpaper_uri";
    pub const LAST_WALLPAPER_AUTHOR: &str = "last_wallpaper_author";
    pub const LAST_ACTION_URI: &str = "last_action_uri";
    pub const LAST_UPDATE_MS: &str = "last_update_ms";
}

/// Durable key-value preference store backing settings and the wallpaper cache.
pub struct Database {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Lock the connection, converting a poisoned mutex (panic in another
    /// thread while holding the lock) into an error instead of panicking.
    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, rusqlite::Error> {
        self.conn.lock().map_err(|e| {
            InvalidParameterName(format!(
                "Preferences mutex poisoned: {}. A panic occurred while holding the lock.",
                e
            ))
        })
    }

    pub fn new(db_path: &str) -> SqliteResult<Self> {
        let conn = Connection::open(db_path)?;

        // GUARD: Integrity check on startup — detect corruption before init
        let integrity: String = conn
            .query_row("PRAGMA integrity_check", [], |r| r.get(0))
            .map_err(|e| InvalidParameterName(format!("Integrity check failed: {}", e)))?;
        if integrity.to_lowercase() != "ok" {
            return Err(InvalidParameterName(format!(
                "Preference store corruption detected: {}",
                integrity
            )));
        }

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| {
                warn!(
                    "[PREFS] Failed to enable WAL mode: {}. Continuing with default journal mode.",
                    e
                );
            })
            .ok();
        let _ = conn.pragma_update(None, "synchronous", "NORMAL");

        conn.execute(
            "CREATE TABLE IF NOT EXISTS preferences (key TEXT PRIMARY KEY, value TEXT)",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory store for tests and throwaway hosts.
    pub fn in_memory() -> SqliteResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS preferences (key TEXT PRIMARY KEY, value TEXT)",
            [],
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn get(&self, key: &str) -> SqliteResult<Option<String>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare("SELECT value FROM preferences WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> SqliteResult<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    // --- Typed settings accessors (written by the host's settings surface) ---

    pub fn server_url(&self) -> String {
        self.get(keys::SERVER_URL).ok().flatten().unwrap_or_default()
    }

    pub fn set_server_url(&self, url: &str) -> SqliteResult<()> {
        self.set(keys::SERVER_URL, url)
    }

    pub fn refresh_on_idle_exit(&self) -> bool {
        self.get(keys::REFRESH_ON_IDLE_EXIT)
            .ok()
            .flatten()
            .map(|v| v == "true")
            .unwrap_or(false)
    }

    pub fn set_refresh_on_idle_exit(&self, enabled: bool) -> SqliteResult<()> {
        self.set(
            keys::REFRESH_ON_IDLE_EXIT,
            if enabled { "true" } else { "false" },
        )
    }

    pub fn target_client(&self) -> TargetClient {
        self.get(keys::TARGET_CLIENT)
            .ok()
            .flatten()
            .map(|v| TargetClient::from_str(&v))
            .unwrap_or_default()
    }

    pub fn set_target_client(&self, client: TargetClient) -> SqliteResult<()> {
        self.set(keys::TARGET_CLIENT, client.as_str())
    }

    /// Snapshot of the user settings for one resolution pass.
    pub fn load_settings(&self) -> Settings {
        Settings {
            server_url: self.server_url(),
            refresh_on_idle_exit: self.refresh_on_idle_exit(),
            target_client: self.target_client(),
        }
    }

    // --- Cached wallpaper fields (written only by the engine) ---

    pub fn last_wallpaper_uri(&self) -> String {
        self.get(keys::LAST_WALLPAPER_URI)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    pub fn last_wallpaper_author(&self) -> String {
        self.get(keys::LAST_WALLPAPER_AUTHOR)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    pub fn last_action_uri(&self) -> String {
        self.get(keys::LAST_ACTION_URI)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    pub fn last_update_ms(&self) -> i64 {
        self.get(keys::LAST_UPDATE_MS)
            .ok()
            .flatten()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Overwrite all cached wallpaper fields in one transaction, so a crash
    /// between keys cannot leave the cache half-updated.
    pub fn save_last_wallpaper(
        &self,
        uri: &str,
        author: &str,
        action_uri: &str,
        update_ms: i64,
    ) -> SqliteResult<()> {
        let update_ms_str = update_ms.to_string();
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        for (key, value) in [
            (keys::LAST_WALLPAPER_URI, uri),
            (keys::LAST_WALLPAPER_AUTHOR, author),
            (keys::LAST_ACTION_URI, action_uri),
            (keys::LAST_UPDATE_MS, update_ms_str.as_str()),
        ] {
            tx.execute(
                "INSERT INTO preferences (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    // --- Bulk transfer (host binder getPreferences / setPreferences) ---

    /// Serialize every preference key into one opaque JSON blob for
    /// cross-process transfer.
    pub fn export(&self) -> SqliteResult<String> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM preferences ORDER BY key")?;
        let mut rows = stmt.query([])?;
        let mut map = serde_json::Map::new();
        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            let value: String = row.get(1)?;
            map.insert(key, serde_json::Value::String(value));
        }
        serde_json::to_string(&serde_json::Value::Object(map))
            .map_err(|e| InvalidParameterName(format!("Failed to serialize preferences: {}", e)))
    }

    /// Replace the whole store with the keys from an exported blob.
    pub fn import(&self, blob: &str) -> SqliteResult<()> {
        let parsed: serde_json::Value = serde_json::from_str(blob)
            .map_err(|e| InvalidParameterName(format!("Malformed preferences blob: {}", e)))?;
        let obj = parsed
            .as_object()
            .ok_or_else(|| InvalidParameterName("Preferences blob is not an object".into()))?;

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM preferences", [])?;
        for (key, value) in obj {
            let value_str = match value.as_str() {
                Some(s) => s.to_string(),
                // Tolerate non-string values from older exports
                None => value.to_string(),
            };
            tx.execute(
                "INSERT INTO preferences (key, value) VALUES (?1, ?2)",
                params![key, value_str],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
