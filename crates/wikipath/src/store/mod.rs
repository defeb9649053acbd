//! `SQLite` storage layer for the link graph.
//!
//! `SQLite` is the source of truth for all persistent data: pages, links, and
//! per-page expansion state. Every mutating operation commits before it
//! returns, so the expansion layer can re-query immediately after a write.
//!
//! ## Module Structure
//!
//! - `schema` - Database schema (DDL)
//! - `nodes` - Page CRUD operations
//! - `edges` - Link CRUD operations

mod edges;
mod nodes;
mod schema;

pub(crate) use schema::SCHEMA;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::error::{Error, Result};
use crate::types::StoreStats;

/// Normalize a page title for storage and lookup.
///
/// Identity in the graph is the trimmed, casefolded title; the assigned
/// integer ID is authoritative everywhere else.
pub(crate) fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// `SQLite` database wrapper for the link graph.
///
/// The connection is wrapped in a `Mutex` so one store instance can be shared
/// across concurrently running searches. All upserts are idempotent single
/// statements, so concurrent expansions of the same page converge to the same
/// stored state without any cross-search locking.
pub struct GraphStore {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl GraphStore {
    /// Open or create the link-graph database.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// database cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode and foreign keys
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        // Apply schema
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_path_buf(),
        })
    }

    /// Open an in-memory database.
    ///
    /// Used by tests that don't need a file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: PathBuf::from(":memory:"),
        })
    }

    /// Acquire the connection lock.
    ///
    /// Returns a `MutexGuard` providing exclusive access to the underlying
    /// connection. Used internally by all database operations.
    pub(crate) fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            Error::Internal(format!(
                "database connection mutex poisoned (a thread panicked while holding the lock): {e}"
            ))
        })
    }

    /// Path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get statistics about the database contents.
    ///
    /// # Errors
    ///
    /// Returns an error if any count query fails.
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.connection()?;

        let page_count: usize = conn.query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        let link_count: usize = conn.query_row("SELECT COUNT(*) FROM links", [], |row| row.get(0))?;
        let expanded_count: usize = conn.query_row(
            "SELECT COUNT(*) FROM pages WHERE expanded = 1",
            [],
            |row| row.get(0),
        )?;

        Ok(StoreStats {
            page_count,
            link_count,
            expanded_count,
        })
    }
}
