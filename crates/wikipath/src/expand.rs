//! Lazy expansion layer: expand-on-miss neighbor access.
//!
//! Makes the graph appear total to the search engine. Every page, however
//! newly encountered, yields some (possibly empty) neighbor list, while the
//! network is hit at most once per distinct page across all searches:
//! subsequent lookups are served from the store's cached edges.

use tracing::{debug, warn};

use crate::error::Result;
use crate::source::LinkSource;
use crate::store::GraphStore;
use crate::types::NodeId;

/// Expand-on-miss view over the link graph.
///
/// Borrows the store and a link source (constructor injection; no process-wide
/// state), so each test can wire its own isolated pair.
pub struct LazyExpander<'a> {
    store: &'a GraphStore,
    source: &'a dyn LinkSource,
}

impl<'a> LazyExpander<'a> {
    /// Create an expander over the given store and source.
    #[must_use]
    pub fn new(store: &'a GraphStore, source: &'a dyn LinkSource) -> Self {
        Self { store, source }
    }

    /// Outgoing neighbor IDs of a page by title, creating the page if the
    /// title has never been seen.
    ///
    /// # Errors
    ///
    /// Returns an error if any store operation fails. Upstream failure does
    /// not error; it surfaces as a shorter (possibly empty) neighbor list.
    pub fn out_neighbors(&self, title: &str) -> Result<Vec<NodeId>> {
        let id = self.store.get_or_create_node(title)?;
        self.out_neighbors_by_id(id)
    }

    /// Outgoing neighbor IDs of a page by ID.
    ///
    /// Serves the cached list when the page is already expanded; otherwise
    /// fetches the link list, persists every edge, and marks the page
    /// expanded so an empty page is not re-fetched on the next visit.
    ///
    /// # Errors
    ///
    /// Returns an error if any store operation fails.
    pub fn out_neighbors_by_id(&self, id: NodeId) -> Result<Vec<NodeId>> {
        if self.store.is_expanded(id)? {
            return self.store.neighbors_of(id);
        }

        let Some(title) = self.store.title_of(id)? else {
            warn!(
                id = id.as_i64(),
                "expansion requested for unknown page id, possible database corruption"
            );
            return Ok(Vec::new());
        };

        debug!(title, "expanding page");
        let titles = self.source.resolve_links(&title);

        for target_title in &titles {
            let target = self.store.get_or_create_node(target_title)?;
            self.store.record_edge(id, target)?;
        }
        self.store.mark_expanded(id)?;

        self.store.neighbors_of(id)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use super::*;
    use crate::store::GraphStore;

    /// Stub source serving a fixed adjacency list, counting calls.
    struct StubSource {
        links: HashMap<String, Vec<String>>,
        calls: Cell<usize>,
    }

    impl StubSource {
        fn new(entries: &[(&str, &[&str])]) -> Self {
            let links = entries
                .iter()
                .map(|(title, targets)| {
                    (
                        (*title).to_string(),
                        targets.iter().map(|t| (*t).to_string()).collect(),
                    )
                })
                .collect();
            Self {
                links,
                calls: Cell::new(0),
            }
        }
    }

    impl LinkSource for StubSource {
        fn resolve_links(&self, title: &str) -> Vec<String> {
            self.calls.set(self.calls.get() + 1);
            self.links.get(title).cloned().unwrap_or_default()
        }

        fn resolve_revision(&self, _title: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn first_access_fetches_and_persists() {
        let store = GraphStore::open_in_memory().unwrap();
        let source = StubSource::new(&[("a", &["b", "c"])]);
        let expander = LazyExpander::new(&store, &source);

        let neighbors = expander.out_neighbors("A").unwrap();
        assert_eq!(neighbors.len(), 2);
        assert_eq!(source.calls.get(), 1);

        // Targets were materialized as pages, edges recorded
        assert!(store.find_node_id("b").unwrap().is_some());
        assert!(store.find_node_id("c").unwrap().is_some());
        assert_eq!(store.stats().unwrap().link_count, 2);
    }

    #[test]
    fn second_access_is_a_cache_hit() {
        let store = GraphStore::open_in_memory().unwrap();
        let source = StubSource::new(&[("a", &["b"])]);
        let expander = LazyExpander::new(&store, &source);

        let first = expander.out_neighbors("a").unwrap();
        let second = expander.out_neighbors("a").unwrap();

        assert_eq!(first, second);
        assert_eq!(source.calls.get(), 1, "resolver called exactly once");
    }

    #[test]
    fn empty_page_is_not_refetched() {
        let store = GraphStore::open_in_memory().unwrap();
        let source = StubSource::new(&[]);
        let expander = LazyExpander::new(&store, &source);

        assert!(expander.out_neighbors("dead end").unwrap().is_empty());
        assert!(expander.out_neighbors("dead end").unwrap().is_empty());

        // The expansion flag, not list emptiness, decides the cache hit
        assert_eq!(source.calls.get(), 1);
    }

    #[test]
    fn duplicate_titles_from_source_collapse_to_one_edge() {
        let store = GraphStore::open_in_memory().unwrap();
        let source = StubSource::new(&[("a", &["b", "b", "B "])]);
        let expander = LazyExpander::new(&store, &source);

        let neighbors = expander.out_neighbors("a").unwrap();
        assert_eq!(neighbors.len(), 1);
        assert_eq!(store.stats().unwrap().link_count, 1);
    }

    #[test]
    fn preseeded_but_unexpanded_page_still_fetches() {
        let store = GraphStore::open_in_memory().unwrap();
        let source = StubSource::new(&[("a", &["c"])]);
        let expander = LazyExpander::new(&store, &source);

        // An edge recorded by hand does not imply the page was expanded
        let a = store.get_or_create_node("a").unwrap();
        let b = store.get_or_create_node("b").unwrap();
        store.record_edge(a, b).unwrap();

        let neighbors = expander.out_neighbors_by_id(a).unwrap();
        assert_eq!(source.calls.get(), 1);
        // Cached edge kept, fetched edge appended in discovery order
        let c = store.find_node_id("c").unwrap().unwrap();
        assert_eq!(neighbors, vec![b, c]);
    }

    #[test]
    fn unknown_id_yields_empty_list() {
        let store = GraphStore::open_in_memory().unwrap();
        let source = StubSource::new(&[]);
        let expander = LazyExpander::new(&store, &source);

        let neighbors = expander.out_neighbors_by_id(NodeId(424_242)).unwrap();
        assert!(neighbors.is_empty());
        assert_eq!(source.calls.get(), 0);
    }
}
