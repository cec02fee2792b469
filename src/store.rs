//! Versioned key-value state backends
//!
//! The ledger core only needs point get/put, delete, a key-range scan and
//! per-key history. Implementations must retain every version ever written
//! for a key; deletes leave a tombstone version behind.

use crate::error::{LedgerError, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::{Arc, Mutex, MutexGuard};

pub type KeyValue = (String, Vec<u8>);

/// One version from a key's write history. `value` is `None` for the
/// tombstone left by a delete.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub value: Option<Vec<u8>>,
    /// Write time, unix milliseconds.
    pub timestamp: i64,
}

/// Abstraction over the host-provided versioned world state.
///
/// Scan and history iterators are finite and non-restartable; they own
/// whatever resources they need and release them when dropped, so early
/// returns and error paths cannot leak store-side cursors.
pub trait StateStore: Send + Sync {
    /// Current value for `key`. Absence is `Ok(None)`, never an error.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write the current value for `key`, appending a new version.
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove the current value for `key`, appending a tombstone version.
    fn delete(&self, key: &str) -> Result<()>;

    /// Current values for keys in `[start, end)`, in key order. An empty
    /// bound leaves that side unbounded.
    fn range_scan(&self, start: &str, end: &str)
        -> Result<Box<dyn Iterator<Item = Result<KeyValue>>>>;

    /// All versions ever written for `key`, most recent first. Empty for a
    /// key that was never written.
    fn history(&self, key: &str) -> Result<Box<dyn Iterator<Item = Result<HistoryEntry>>>>;
}

// ============================================================================
// SQLite backend
// ============================================================================

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| LedgerError::Storage(format!("Failed to open database: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS world_state (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL
            )",
            [],
        )
        .map_err(|e| {
            LedgerError::Storage(format!("Failed to create world_state table: {}", e))
        })?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS key_history (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                key TEXT NOT NULL,
                value BLOB,
                timestamp INTEGER NOT NULL
            )",
            [],
        )
        .map_err(|e| {
            LedgerError::Storage(format!("Failed to create key_history table: {}", e))
        })?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_key_history_key ON key_history (key)",
            [],
        )
        .map_err(|e| LedgerError::Storage(format!("Failed to create history index: {}", e)))?;

        Ok(SqliteStore { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| LedgerError::Storage("Mutex poisoned".to_string()))
    }

    /// Write the current value and its history row in one transaction so a
    /// crash cannot leave state and history disagreeing.
    fn write_version(&self, key: &str, value: Option<&[u8]>) -> Result<()> {
        let conn_guard = self.lock()?;
        let tx = conn_guard
            .unchecked_transaction()
            .map_err(|e| LedgerError::Storage(format!("Failed to start transaction: {}", e)))?;

        match value {
            Some(bytes) => {
                tx.execute(
                    "INSERT OR REPLACE INTO world_state (key, value) VALUES (?1, ?2)",
                    params![key, bytes],
                )
                .map_err(|e| LedgerError::Storage(format!("Failed to write state: {}", e)))?;
            }
            None => {
                tx.execute("DELETE FROM world_state WHERE key = ?1", params![key])
                    .map_err(|e| {
                        LedgerError::Storage(format!("Failed to delete state: {}", e))
                    })?;
            }
        }

        tx.execute(
            "INSERT INTO key_history (key, value, timestamp) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().timestamp_millis()],
        )
        .map_err(|e| LedgerError::Storage(format!("Failed to append history: {}", e)))?;

        tx.commit()
            .map_err(|e| LedgerError::Storage(format!("Failed to commit transaction: {}", e)))?;

        Ok(())
    }
}

fn collect_rows(
    stmt: &mut rusqlite::Statement<'_>,
    sql_params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<KeyValue>> {
    let mapped = stmt
        .query_map(sql_params, |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
        })
        .map_err(|e| LedgerError::Storage(format!("Failed to query range: {}", e)))?;

    let mut rows = Vec::new();
    for row_result in mapped {
        rows.push(
            row_result.map_err(|e| LedgerError::Storage(format!("Failed to read row: {}", e)))?,
        );
    }
    Ok(rows)
}

impl StateStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let conn_guard = self.lock()?;
        conn_guard
            .query_row(
                "SELECT value FROM world_state WHERE key = ?1",
                params![key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()
            .map_err(|e| LedgerError::Storage(format!("Failed to read state: {}", e)))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.write_version(key, Some(value))
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.write_version(key, None)
    }

    fn range_scan(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn Iterator<Item = Result<KeyValue>>>> {
        let conn_guard = self.lock()?;

        // Rows are materialized under the lock; the returned iterator owns
        // them and holds no statement or connection.
        let rows = match (start.is_empty(), end.is_empty()) {
            (true, true) => {
                let mut stmt = conn_guard
                    .prepare("SELECT key, value FROM world_state ORDER BY key ASC")?;
                collect_rows(&mut stmt, &[])?
            }
            (false, true) => {
                let mut stmt = conn_guard.prepare(
                    "SELECT key, value FROM world_state WHERE key >= ?1 ORDER BY key ASC",
                )?;
                collect_rows(&mut stmt, &[&start])?
            }
            (true, false) => {
                let mut stmt = conn_guard.prepare(
                    "SELECT key, value FROM world_state WHERE key < ?1 ORDER BY key ASC",
                )?;
                collect_rows(&mut stmt, &[&end])?
            }
            (false, false) => {
                let mut stmt = conn_guard.prepare(
                    "SELECT key, value FROM world_state WHERE key >= ?1 AND key < ?2 ORDER BY key ASC",
                )?;
                collect_rows(&mut stmt, &[&start, &end])?
            }
        };

        Ok(Box::new(rows.into_iter().map(Ok)))
    }

    fn history(&self, key: &str) -> Result<Box<dyn Iterator<Item = Result<HistoryEntry>>>> {
        let conn_guard = self.lock()?;
        let mut stmt = conn_guard.prepare(
            "SELECT value, timestamp FROM key_history WHERE key = ?1 ORDER BY seq DESC",
        )?;

        let mapped = stmt
            .query_map(params![key], |row| {
                Ok(HistoryEntry {
                    value: row.get::<_, Option<Vec<u8>>>(0)?,
                    timestamp: row.get::<_, i64>(1)?,
                })
            })
            .map_err(|e| LedgerError::Storage(format!("Failed to query history: {}", e)))?;

        let mut entries = Vec::new();
        for entry_result in mapped {
            entries.push(entry_result.map_err(|e| {
                LedgerError::Storage(format!("Failed to read history row: {}", e))
            })?);
        }

        Ok(Box::new(entries.into_iter().map(Ok)))
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Simple in-memory store useful for tests and ephemeral runs.
#[derive(Clone, Default)]
pub struct MemStore {
    state: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    history: Arc<Mutex<HashMap<String, Vec<HistoryEntry>>>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn append_history(&self, key: &str, value: Option<Vec<u8>>) -> Result<()> {
        let mut history = self
            .history
            .lock()
            .map_err(|_| LedgerError::Storage("Mutex poisoned".to_string()))?;
        history.entry(key.to_string()).or_default().push(HistoryEntry {
            value,
            timestamp: Utc::now().timestamp_millis(),
        });
        Ok(())
    }
}

impl StateStore for MemStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let state = self
            .state
            .lock()
            .map_err(|_| LedgerError::Storage("Mutex poisoned".to_string()))?;
        Ok(state.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| LedgerError::Storage("Mutex poisoned".to_string()))?;
        state.insert(key.to_string(), value.to_vec());
        drop(state);
        self.append_history(key, Some(value.to_vec()))
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| LedgerError::Storage("Mutex poisoned".to_string()))?;
        state.remove(key);
        drop(state);
        self.append_history(key, None)
    }

    fn range_scan(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn Iterator<Item = Result<KeyValue>>>> {
        let state = self
            .state
            .lock()
            .map_err(|_| LedgerError::Storage("Mutex poisoned".to_string()))?;

        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start.to_string())
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end.to_string())
        };

        let rows: Vec<KeyValue> = state
            .range((lower, upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Box::new(rows.into_iter().map(Ok)))
    }

    fn history(&self, key: &str) -> Result<Box<dyn Iterator<Item = Result<HistoryEntry>>>> {
        let history = self
            .history
            .lock()
            .map_err(|_| LedgerError::Storage("Mutex poisoned".to_string()))?;

        // Entries are appended chronologically; serve most recent first.
        let entries: Vec<HistoryEntry> = history
            .get(key)
            .map(|versions| versions.iter().rev().cloned().collect())
            .unwrap_or_default();

        Ok(Box::new(entries.into_iter().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise_store(store: &dyn StateStore) {
        assert_eq!(store.get("A1").unwrap(), None);

        store.put("A1", b"one").unwrap();
        store.put("A2", b"two").unwrap();
        store.put("B1", b"three").unwrap();
        assert_eq!(store.get("A1").unwrap(), Some(b"one".to_vec()));

        // Full scan covers every current key in order
        let all: Vec<_> = store
            .range_scan("", "")
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        let keys: Vec<&str> = all.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["A1", "A2", "B1"]);

        // Half-open range excludes the end key
        let partial: Vec<_> = store
            .range_scan("A1", "B1")
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(partial.len(), 2);

        // Overwrite then delete: three versions, newest first, tombstone last-written
        store.put("A1", b"one-v2").unwrap();
        store.delete("A1").unwrap();
        assert_eq!(store.get("A1").unwrap(), None);

        let versions: Vec<_> = store
            .history("A1")
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(versions.len(), 3);
        assert_eq!(versions[0].value, None);
        assert_eq!(versions[1].value, Some(b"one-v2".to_vec()));
        assert_eq!(versions[2].value, Some(b"one".to_vec()));

        // History of an unknown key is empty, not an error
        assert_eq!(store.history("missing").unwrap().count(), 0);
    }

    #[test]
    fn test_mem_store() {
        exercise_store(&MemStore::new());
    }

    #[test]
    fn test_sqlite_store() {
        let store = SqliteStore::open(":memory:").unwrap();
        exercise_store(&store);
    }

    #[test]
    fn test_sqlite_open_creates_schema() {
        let store = SqliteStore::open(":memory:").unwrap();
        assert!(store.conn.lock().unwrap().is_autocommit());
    }
}
