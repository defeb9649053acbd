//! Page CRUD operations for the link-graph store.

use rusqlite::{OptionalExtension, params};

use super::{GraphStore, normalize_title};
use crate::error::Result;
use crate::types::{NodeId, PageRecord};

impl GraphStore {
    /// Get the ID for a title, inserting the page if it doesn't exist.
    ///
    /// Idempotent: the title is normalized and unique, so repeated and
    /// concurrent calls with the same title converge on a single row.
    /// `INSERT OR IGNORE` followed by the lookup makes each call a pair of
    /// atomic statements; no multi-statement transaction is needed.
    ///
    /// # Errors
    ///
    /// Returns an error if either statement fails.
    pub fn get_or_create_node(&self, title: &str) -> Result<NodeId> {
        let normalized = normalize_title(title);
        let conn = self.connection()?;

        conn.execute(
            "INSERT OR IGNORE INTO pages (title) VALUES (?1)",
            [&normalized],
        )?;

        conn.query_row(
            "SELECT id FROM pages WHERE title = ?1",
            [&normalized],
            |row| row.get::<_, i64>(0).map(NodeId::from),
        )
        .map_err(Into::into)
    }

    /// Look up a page ID by title without creating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_node_id(&self, title: &str) -> Result<Option<NodeId>> {
        let normalized = normalize_title(title);
        let conn = self.connection()?;

        conn.query_row(
            "SELECT id FROM pages WHERE title = ?1",
            [&normalized],
            |row| row.get::<_, i64>(0).map(NodeId::from),
        )
        .optional()
        .map_err(Into::into)
    }

    /// Get the normalized title for a page ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn title_of(&self, id: NodeId) -> Result<Option<String>> {
        let conn = self.connection()?;

        conn.query_row(
            "SELECT title FROM pages WHERE id = ?1",
            [id.as_i64()],
            |row| row.get(0),
        )
        .optional()
        .map_err(Into::into)
    }

    /// Get the full page record for a title.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_page(&self, title: &str) -> Result<Option<PageRecord>> {
        let normalized = normalize_title(title);
        let conn = self.connection()?;

        conn.query_row(
            "SELECT id, title, last_revision, expanded FROM pages WHERE title = ?1",
            [&normalized],
            |row| {
                Ok(PageRecord {
                    id: NodeId::from(row.get::<_, i64>(0)?),
                    title: row.get(1)?,
                    last_revision: row.get(2)?,
                    expanded: row.get::<_, i64>(3)? != 0,
                })
            },
        )
        .optional()
        .map_err(Into::into)
    }

    /// Whether a page's outgoing links have been fetched.
    ///
    /// Stored explicitly rather than inferred from an empty link list, so a
    /// page that genuinely has no links is distinguishable from one never
    /// expanded.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Unknown IDs report `false`.
    pub fn is_expanded(&self, id: NodeId) -> Result<bool> {
        let conn = self.connection()?;

        let expanded: Option<i64> = conn
            .query_row(
                "SELECT expanded FROM pages WHERE id = ?1",
                [id.as_i64()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(expanded.unwrap_or(0) != 0)
    }

    /// Record that a page's outgoing links are now fully fetched.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_expanded(&self, id: NodeId) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "UPDATE pages SET expanded = 1 WHERE id = ?1",
            [id.as_i64()],
        )?;
        Ok(())
    }

    /// Get the stored revision token for a title.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn revision_of(&self, title: &str) -> Result<Option<String>> {
        let normalized = normalize_title(title);
        let conn = self.connection()?;

        let revision: Option<Option<String>> = conn
            .query_row(
                "SELECT last_revision FROM pages WHERE title = ?1",
                [&normalized],
                |row| row.get(0),
            )
            .optional()?;

        Ok(revision.flatten())
    }

    /// Store the revision token observed for a page.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_revision(&self, id: NodeId, revision: &str) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "UPDATE pages SET last_revision = ?2 WHERE id = ?1",
            params![id.as_i64(), revision],
        )?;
        Ok(())
    }
}
