//! SQLite-backed set store
//!
//! One `sets` table keyed by an autoincrement id. The connection is not
//! `Sync`, so it sits behind a mutex; every operation is a single statement.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::error::{SetStoreError, SetStoreResult};
use super::store::SetStore;
use super::types::{NewSet, Set, SetId};

const CREATE_SET_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS sets (
        id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
        movement TEXT NOT NULL,
        volume REAL NOT NULL,
        intensity REAL NOT NULL,
        created_on TEXT NOT NULL,
        last_updated_on TEXT NOT NULL
    )";

const SELECT_COLUMNS: &str = "id, movement, volume, intensity, created_on, last_updated_on";

/// Set store persisted to a SQLite database
pub struct SqliteSetStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteSetStore {
    /// Create or open a database file
    pub fn open(path: &Path) -> SetStoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Non-persistent database
    pub fn open_in_memory() -> SetStoreResult<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> SetStoreResult<Self> {
        conn.execute(CREATE_SET_TABLE, [])?;

        tracing::debug!(path = ?path, "Opened set database");

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Database file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> SetStoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| SetStoreError::Lock(e.to_string()))
    }
}

fn row_to_set(row: &Row<'_>) -> rusqlite::Result<Set> {
    Ok(Set {
        id: SetId(row.get::<_, i64>(0)? as u64),
        movement: row.get(1)?,
        volume: row.get(2)?,
        intensity: row.get(3)?,
        created_on: parse_timestamp(row.get::<_, String>(4)?),
        last_updated_on: parse_timestamp(row.get::<_, String>(5)?),
    })
}

fn parse_timestamp(raw: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            tracing::warn!(value = %raw, error = %e, "Unreadable timestamp in set table");
            DateTime::<Utc>::UNIX_EPOCH
        })
}

impl SetStore for SqliteSetStore {
    fn add(&self, new: NewSet) -> SetStoreResult<Set> {
        let conn = self.conn()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO sets (movement, volume, intensity, created_on, last_updated_on)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![new.movement, new.volume, new.intensity, now.to_rfc3339()],
        )?;

        let id = SetId(conn.last_insert_rowid() as u64);
        tracing::debug!(set_id = %id, "Stored set");

        Ok(Set {
            id,
            movement: new.movement,
            volume: new.volume,
            intensity: new.intensity,
            created_on: now,
            last_updated_on: now,
        })
    }

    fn list(&self) -> SetStoreResult<Vec<Set>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare_cached(&format!("SELECT {} FROM sets ORDER BY id", SELECT_COLUMNS))?;

        let sets = stmt
            .query_map([], row_to_set)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(sets)
    }

    fn get(&self, id: SetId) -> SetStoreResult<Set> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM sets WHERE id = ?1", SELECT_COLUMNS),
            params![id.0 as i64],
            row_to_set,
        )
        .optional()?
        .ok_or(SetStoreError::NotFound(id))
    }

    fn update(&self, id: SetId, update: NewSet) -> SetStoreResult<Set> {
        {
            let conn = self.conn()?;
            let changed = conn.execute(
                "UPDATE sets SET movement = ?1, volume = ?2, intensity = ?3, last_updated_on = ?4
                 WHERE id = ?5",
                params![
                    update.movement,
                    update.volume,
                    update.intensity,
                    Utc::now().to_rfc3339(),
                    id.0 as i64
                ],
            )?;

            match changed {
                0 => return Err(SetStoreError::NotFound(id)),
                1 => {}
                n => {
                    return Err(SetStoreError::Database(format!(
                        "unexpected number of affected rows: {}",
                        n
                    )))
                }
            }
        }

        self.get(id)
    }

    fn delete(&self, id: SetId) -> SetStoreResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM sets WHERE id = ?1", params![id.0 as i64])?;

        if changed == 0 {
            return Err(SetStoreError::NotFound(id));
        }
        Ok(())
    }

    fn count(&self) -> SetStoreResult<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sets", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
