//! Link CRUD operations for the link-graph store.

use rusqlite::params;

use super::GraphStore;
use crate::error::Result;
use crate::types::NodeId;

impl GraphStore {
    /// Record a directed link between two pages.
    ///
    /// Idempotent: the (source, target) pair is the primary key, so inserting
    /// an existing link is a no-op. Callers must materialize both endpoints
    /// with `get_or_create_node` first, which keeps referential integrity.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn record_edge(&self, source: NodeId, target: NodeId) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "INSERT OR IGNORE INTO links (source_id, target_id) VALUES (?1, ?2)",
            params![source.as_i64(), target.as_i64()],
        )?;
        Ok(())
    }

    /// Get the outgoing neighbors of a page in discovery order.
    ///
    /// Returns an empty vector when no links are recorded; whether the page
    /// was ever expanded is a separate question answered by
    /// [`GraphStore::is_expanded`].
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn neighbors_of(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let conn = self.connection()?;

        let mut stmt = conn
            .prepare("SELECT target_id FROM links WHERE source_id = ?1 ORDER BY rowid")?;

        let neighbors = stmt
            .query_map([id.as_i64()], |row| {
                row.get::<_, i64>(0).map(NodeId::from)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(neighbors)
    }
}

#[cfg(test)]
mod tests {
    use crate::store::GraphStore;

    #[test]
    fn record_edge_deduplicates() {
        let store = GraphStore::open_in_memory().unwrap();

        let a = store.get_or_create_node("A").unwrap();
        let b = store.get_or_create_node("B").unwrap();

        store.record_edge(a, b).unwrap();
        store.record_edge(a, b).unwrap();

        assert_eq!(store.stats().unwrap().link_count, 1, "exactly one link row");
        assert_eq!(store.neighbors_of(a).unwrap(), vec![b]);
    }

    #[test]
    fn neighbors_preserve_discovery_order() {
        let store = GraphStore::open_in_memory().unwrap();

        let a = store.get_or_create_node("A").unwrap();
        let z = store.get_or_create_node("Z").unwrap();
        let m = store.get_or_create_node("M").unwrap();
        let b = store.get_or_create_node("B").unwrap();

        store.record_edge(a, z).unwrap();
        store.record_edge(a, m).unwrap();
        store.record_edge(a, b).unwrap();

        // Insertion order, not sorted order
        assert_eq!(store.neighbors_of(a).unwrap(), vec![z, m, b]);
    }

    #[test]
    fn neighbors_of_unlinked_page_is_empty() {
        let store = GraphStore::open_in_memory().unwrap();

        let a = store.get_or_create_node("A").unwrap();
        assert!(store.neighbors_of(a).unwrap().is_empty());
    }

    #[test]
    fn edges_are_directed() {
        let store = GraphStore::open_in_memory().unwrap();

        let a = store.get_or_create_node("A").unwrap();
        let b = store.get_or_create_node("B").unwrap();
        store.record_edge(a, b).unwrap();

        assert_eq!(store.neighbors_of(a).unwrap(), vec![b]);
        assert!(store.neighbors_of(b).unwrap().is_empty());
    }
}
