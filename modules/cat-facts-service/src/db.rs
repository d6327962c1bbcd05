//! SQLite persistence for cat facts.
//!
//! Uniqueness of `fact` text is enforced by the table's UNIQUE constraint, so
//! a duplicate insert fails inside SQLite and never leaves a second row.

use crate::error::{FactError, Result};
use cat_facts_types::*;
use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const FACT_COLUMNS: &str = "id, fact, source, favorite, created_at";

pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    pub fn open(path: &str) -> Result<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.initialize()?;
        Ok(db)
    }

    /// Creates the `cat_facts` table if missing. Safe to call repeatedly.
    pub fn initialize(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS cat_facts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fact TEXT NOT NULL UNIQUE,
                source TEXT NOT NULL DEFAULT 'user',
                favorite INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_cat_facts_created_at
             ON cat_facts(created_at)",
            [],
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| FactError::StorageUnavailable("database lock poisoned".to_string()))
    }

    /// Inserts a new fact. Returns `FactError::Duplicate` if the exact text
    /// is already stored.
    pub fn insert(&self, text: &str, source: FactSource) -> Result<Fact> {
        let conn = self.conn()?;
        let created_at = now_timestamp();
        if let Err(e) = conn.execute(
            "INSERT INTO cat_facts (fact, source, created_at) VALUES (?1, ?2, ?3)",
            params![text, source.as_str(), created_at],
        ) {
            let err = FactError::from(e);
            if matches!(err, FactError::Duplicate) {
                log::warn!("Skipped duplicate fact: {}", preview(text));
            }
            return Err(err);
        }

        let fact = Fact {
            id: conn.last_insert_rowid(),
            text: text.to_string(),
            source,
            favorite: false,
            created_at,
        };
        log::info!("Inserted fact {}: {}", fact.id, preview(text));
        Ok(fact)
    }

    /// All facts, newest first. Equal timestamps fall back to id order.
    pub fn list_all(&self) -> Result<Vec<Fact>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {FACT_COLUMNS} FROM cat_facts ORDER BY created_at DESC, id DESC"
        ))?;
        let facts = stmt
            .query_map([], row_to_fact)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(facts)
    }

    pub fn get(&self, id: i64) -> Result<Option<Fact>> {
        let conn = self.conn()?;
        get_fact_impl(&conn, id)
    }

    /// Removes the fact with `id`. Returns whether a row was deleted.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM cat_facts WHERE id = ?1", params![id])?;
        if removed > 0 {
            log::info!("Deleted fact {}", id);
        }
        Ok(removed > 0)
    }

    /// Replaces the text of an existing fact. `Ok(None)` when `id` is unknown.
    pub fn update(&self, id: i64, text: &str) -> Result<Option<Fact>> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE cat_facts SET fact = ?1 WHERE id = ?2",
            params![text, id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        log::info!("Updated fact {}", id);
        get_fact_impl(&conn, id)
    }

    pub fn toggle_favorite(&self, id: i64) -> Result<Option<Fact>> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE cat_facts SET favorite = NOT favorite WHERE id = ?1",
            params![id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        get_fact_impl(&conn, id)
    }

    #[cfg(test)]
    pub fn execute_raw(&self, sql: &str) -> Result<()> {
        self.conn()?.execute_batch(sql)?;
        Ok(())
    }

    pub fn stats(&self) -> Result<FactStats> {
        let conn = self.conn()?;
        let stats = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(favorite), 0),
                    COALESCE(SUM(source = 'user'), 0),
                    COALESCE(SUM(source = 'api'), 0)
             FROM cat_facts",
            [],
            |row| {
                Ok(FactStats {
                    total: row.get(0)?,
                    favorites: row.get(1)?,
                    user_count: row.get(2)?,
                    api_count: row.get(3)?,
                })
            },
        )?;
        Ok(stats)
    }
}

fn get_fact_impl(conn: &Connection, id: i64) -> Result<Option<Fact>> {
    let fact = conn
        .query_row(
            &format!("SELECT {FACT_COLUMNS} FROM cat_facts WHERE id = ?1"),
            params![id],
            row_to_fact,
        )
        .optional()?;
    Ok(fact)
}

fn row_to_fact(row: &rusqlite::Row) -> rusqlite::Result<Fact> {
    let source: String = row.get(2)?;
    Ok(Fact {
        id: row.get(0)?,
        text: row.get(1)?,
        source: FactSource::parse(&source).unwrap_or_default(),
        favorite: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn preview(text: &str) -> String {
    if text.chars().count() > 50 {
        let head: String = text.chars().take(50).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
