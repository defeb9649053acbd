//! # Wikipath: lazy Wikipedia link-graph pathfinder
//!
//! Wikipath finds a path between two Wikipedia articles by searching the
//! article link graph. The graph is far too large to hold locally, so edges
//! are discovered on demand through the MediaWiki API and memoized in
//! `SQLite`: the first visit to a page costs a network round trip; every
//! later visit, in this search or any future one, is a local query.
//!
//! ## Design Philosophy
//!
//! - **Cache, not mirror** - only pages a search actually touches are stored
//! - **Best effort upstream** - a flaky API shrinks the explored graph, it
//!   never crashes a search; only storage failures are fatal
//! - **Embeddable** - library first, CLI second
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use wikipath::{Pathfinder, Strategy};
//!
//! let pathfinder = Pathfinder::new(Path::new("wikipath.db"))?;
//!
//! let outcome = pathfinder.find_path("Rust (programming language)", "Philosophy", Strategy::Bfs)?;
//! match outcome.path {
//!     Some(path) => println!("{}", path.join(" -> ")),
//!     None => println!("no path found ({} pages explored)", outcome.visited.len()),
//! }
//! # Ok::<(), wikipath::Error>(())
//! ```

mod error;
mod expand;
mod search;
mod source;
mod store;
mod types;

pub use error::{Error, Result};
pub use expand::LazyExpander;
pub use source::{LinkSource, WikiLinkSource};
pub use store::GraphStore;
pub use types::{
    NodeId, PageRecord, PreloadStats, RefreshOutcome, SearchOptions, SearchOutcome, StoreStats,
    Strategy, Termination,
};

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

/// Lazy link-graph pathfinding engine.
///
/// `Pathfinder` is the sole entry point for callers (the CLI here, a web
/// layer elsewhere). It owns the graph store and a link source and wires
/// them through the expansion layer for each operation; searches running on
/// separate `Pathfinder` references share the store's idempotent upserts and
/// nothing else.
pub struct Pathfinder {
    store: GraphStore,
    source: Box<dyn LinkSource>,
    db_path: PathBuf,
}

impl Pathfinder {
    /// Open a pathfinder over the given database, resolving links from the
    /// production Wikipedia API.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the HTTP client
    /// cannot be constructed.
    pub fn new(db_path: &Path) -> Result<Self> {
        Ok(Self {
            store: GraphStore::open(db_path)?,
            source: Box::new(WikiLinkSource::new()?),
            db_path: db_path.to_path_buf(),
        })
    }

    /// Open a pathfinder with an injected link source.
    ///
    /// Tests use this with stub sources; it also allows pointing at a
    /// non-production MediaWiki endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn with_source(db_path: &Path, source: Box<dyn LinkSource>) -> Result<Self> {
        Ok(Self {
            store: GraphStore::open(db_path)?,
            source,
            db_path: db_path.to_path_buf(),
        })
    }

    // === Pathfinding ===

    /// Find a path between two article titles.
    ///
    /// Both endpoints are materialized as pages first, so previously unseen
    /// titles work; their edges are then discovered lazily as the search
    /// frontier reaches them. "No path" and exhaustion are reported through
    /// the outcome, never as errors.
    ///
    /// # Errors
    ///
    /// Returns an error only for storage failures.
    pub fn find_path(&self, start: &str, end: &str, strategy: Strategy) -> Result<SearchOutcome> {
        self.find_path_with(start, end, strategy, &SearchOptions::default())
    }

    /// Find a path with explicit search options (cooperative deadline).
    ///
    /// # Errors
    ///
    /// Returns an error only for storage failures.
    pub fn find_path_with(
        &self,
        start: &str,
        end: &str,
        strategy: Strategy,
        options: &SearchOptions,
    ) -> Result<SearchOutcome> {
        let start_id = self.store.get_or_create_node(start)?;
        let end_id = self.store.get_or_create_node(end)?;

        let expander = LazyExpander::new(&self.store, self.source.as_ref());
        search::run(&expander, &self.store, start_id, end_id, strategy, options)
    }

    // === Cache maintenance ===

    /// Re-fetch a page's links unless the stored revision is still current.
    ///
    /// Compares the stored revision token against the live one; if they
    /// match, nothing is fetched. Otherwise the link list is resolved and
    /// recorded (idempotently; existing edges are kept) and the new token is
    /// stored. An unavailable live revision degrades to a plain re-fetch
    /// with no token update.
    ///
    /// # Errors
    ///
    /// Returns an error if any store operation fails.
    pub fn refresh_links(&self, title: &str) -> Result<RefreshOutcome> {
        let id = self.store.get_or_create_node(title)?;
        let stored = self.store.revision_of(title)?;
        let live = self.source.resolve_revision(title);

        if let (Some(stored), Some(live)) = (stored.as_deref(), live.as_deref()) {
            if stored == live {
                debug!(title, revision = live, "page is up to date");
                return Ok(RefreshOutcome::Fresh);
            }
        }

        info!(title, revision = live.as_deref(), "refreshing links");
        let titles = self.source.resolve_links(title);
        let links = titles.len();

        for target_title in &titles {
            let target = self.store.get_or_create_node(target_title)?;
            self.store.record_edge(id, target)?;
        }
        self.store.mark_expanded(id)?;

        if let Some(live) = live {
            self.store.set_revision(id, &live)?;
        }

        Ok(RefreshOutcome::Refreshed { links })
    }

    /// Eagerly expand the link graph around a page, bounded by depth.
    ///
    /// Runs an explicit worklist rather than recursing, so pathological link
    /// structures cannot grow the call stack. Depth 1 expands only the page
    /// itself; each extra level expands the pages discovered by the previous
    /// one. Already-expanded pages are skipped (their cached neighbors are
    /// still traversed).
    ///
    /// # Errors
    ///
    /// Returns an error if any store operation fails.
    pub fn preload(&self, title: &str, depth: u32) -> Result<PreloadStats> {
        let started = Instant::now();
        let mut stats = PreloadStats::default();

        let expander = LazyExpander::new(&self.store, self.source.as_ref());
        let root = self.store.get_or_create_node(title)?;

        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut worklist: VecDeque<(NodeId, u32)> = VecDeque::from([(root, depth)]);

        while let Some((id, remaining)) = worklist.pop_front() {
            // Dedup before the depth check so a page reached from two
            // parents at the boundary counts as one skip
            if !seen.insert(id) {
                continue;
            }
            if remaining == 0 {
                stats.pages_skipped += 1;
                continue;
            }

            let already_expanded = self.store.is_expanded(id)?;
            let neighbors = expander.out_neighbors_by_id(id)?;

            if already_expanded {
                stats.pages_skipped += 1;
            } else {
                stats.pages_expanded += 1;
                stats.links_recorded += neighbors.len();
            }

            for neighbor in neighbors {
                if !seen.contains(&neighbor) {
                    worklist.push_back((neighbor, remaining - 1));
                }
            }
        }

        stats.duration = started.elapsed();
        info!(
            title,
            depth,
            expanded = stats.pages_expanded,
            skipped = stats.pages_skipped,
            links = stats.links_recorded,
            "preload complete"
        );
        Ok(stats)
    }

    // === Database ===

    /// Look up what is cached for a title.
    ///
    /// Returns `None` for titles no search or preload has ever touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn page(&self, title: &str) -> Result<Option<PageRecord>> {
        self.store.get_page(title)
    }

    /// Get statistics about the cached graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the count queries fail.
    pub fn stats(&self) -> Result<StoreStats> {
        self.store.stats()
    }

    /// Path to the `SQLite` database file.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use super::*;

    /// Stub source with a fixed adjacency list and a fixed revision per page.
    struct StubSource {
        links: HashMap<String, Vec<String>>,
        revisions: HashMap<String, String>,
        link_calls: Cell<usize>,
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
                revisions: HashMap::new(),
                link_calls: Cell::new(0),
            }
        }

        fn with_revision(mut self, title: &str, revision: &str) -> Self {
            self.revisions.insert(title.to_string(), revision.to_string());
            self
        }
    }

    impl LinkSource for StubSource {
        fn resolve_links(&self, title: &str) -> Vec<String> {
            self.link_calls.set(self.link_calls.get() + 1);
            self.links.get(title).cloned().unwrap_or_default()
        }

        fn resolve_revision(&self, title: &str) -> Option<String> {
            self.revisions.get(title).cloned()
        }
    }

    fn pathfinder(entries: &[(&str, &[&str])]) -> (tempfile::TempDir, Pathfinder) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let pathfinder =
            Pathfinder::with_source(&db_path, Box::new(StubSource::new(entries))).unwrap();
        (dir, pathfinder)
    }

    #[test]
    fn find_path_follows_lazy_expansion() {
        let (_dir, pathfinder) = pathfinder(&[("a", &["b"]), ("b", &["c"])]);

        let outcome = pathfinder.find_path("A", "C", Strategy::Bfs).unwrap();
        assert_eq!(
            outcome.path,
            Some(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(outcome.termination, Termination::Found);
    }

    #[test]
    fn find_path_reflexive() {
        let (_dir, pathfinder) = pathfinder(&[]);

        let outcome = pathfinder
            .find_path("Loop", "loop", Strategy::UniformCost)
            .unwrap();
        assert_eq!(outcome.path, Some(vec!["loop".to_string()]));
        assert_eq!(outcome.visited.len(), 1);
    }

    #[test]
    fn find_path_no_route_is_not_an_error() {
        let (_dir, pathfinder) = pathfinder(&[("a", &[])]);

        let outcome = pathfinder.find_path("a", "nowhere", Strategy::Bfs).unwrap();
        assert!(outcome.path.is_none());
        assert_eq!(outcome.termination, Termination::Exhausted);
    }

    #[test]
    fn second_search_reuses_persisted_edges() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");

        let source = Box::new(StubSource::new(&[("a", &["b"])]));
        let pathfinder = Pathfinder::with_source(&db_path, source).unwrap();

        pathfinder.find_path("a", "b", Strategy::Bfs).unwrap();

        // New pathfinder over the same database, with a source that would
        // return different links if it were ever consulted for "a"
        let source = Box::new(StubSource::new(&[("a", &["x", "y"])]));
        let pathfinder = Pathfinder::with_source(&db_path, source).unwrap();

        let outcome = pathfinder.find_path("a", "b", Strategy::Bfs).unwrap();
        assert_eq!(outcome.path, Some(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn preload_respects_depth_budget() {
        // a -> b -> c -> d; depth 2 must expand a and b only
        let (_dir, pathfinder) =
            pathfinder(&[("a", &["b"]), ("b", &["c"]), ("c", &["d"])]);

        let stats = pathfinder.preload("a", 2).unwrap();

        assert_eq!(stats.pages_expanded, 2);
        assert_eq!(stats.links_recorded, 2);
        // c was reached but its depth budget was exhausted
        assert_eq!(stats.pages_skipped, 1);
        assert_eq!(pathfinder.stats().unwrap().expanded_count, 2);
    }

    #[test]
    fn preload_skips_already_expanded_pages() {
        let (_dir, pathfinder) = pathfinder(&[("a", &["b"]), ("b", &[])]);

        pathfinder.preload("a", 2).unwrap();
        let stats = pathfinder.preload("a", 2).unwrap();

        assert_eq!(stats.pages_expanded, 0);
        assert_eq!(stats.pages_skipped, 2);
    }

    #[test]
    fn preload_counts_boundary_pages_once() {
        // d sits at the depth boundary, reachable from both b and c
        let (_dir, pathfinder) =
            pathfinder(&[("a", &["b", "c"]), ("b", &["d"]), ("c", &["d"])]);

        let stats = pathfinder.preload("a", 2).unwrap();

        assert_eq!(stats.pages_expanded, 3);
        assert_eq!(stats.pages_skipped, 1, "one page, one skip");
    }

    #[test]
    fn preload_handles_cycles_without_looping() {
        let (_dir, pathfinder) = pathfinder(&[("a", &["b"]), ("b", &["a"])]);

        let stats = pathfinder.preload("a", 10).unwrap();
        assert_eq!(stats.pages_expanded, 2);
    }

    #[test]
    fn page_reports_expansion_state() {
        let (_dir, pathfinder) = pathfinder(&[("a", &["b"])]);

        assert!(pathfinder.page("a").unwrap().is_none());

        pathfinder.find_path("a", "b", Strategy::Bfs).unwrap();

        let record = pathfinder.page("A").unwrap().unwrap();
        assert!(record.expanded);
        assert_eq!(record.title, "a");

        // b was popped as the target, never expanded
        let record = pathfinder.page("b").unwrap().unwrap();
        assert!(!record.expanded);
    }

    #[test]
    fn refresh_skips_when_revision_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");

        let source =
            StubSource::new(&[("page", &["x"])]).with_revision("page", "2024-01-01T00:00:00Z");
        let pathfinder = Pathfinder::with_source(&db_path, Box::new(source)).unwrap();

        let first = pathfinder.refresh_links("page").unwrap();
        assert_eq!(first, RefreshOutcome::Refreshed { links: 1 });

        let second = pathfinder.refresh_links("page").unwrap();
        assert_eq!(second, RefreshOutcome::Fresh);
    }

    #[test]
    fn refresh_refetches_on_new_revision() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");

        let source =
            StubSource::new(&[("page", &["x"])]).with_revision("page", "2024-01-01T00:00:00Z");
        let pathfinder = Pathfinder::with_source(&db_path, Box::new(source)).unwrap();
        pathfinder.refresh_links("page").unwrap();

        // Same database, a newer live revision
        let source =
            StubSource::new(&[("page", &["x", "y"])]).with_revision("page", "2024-06-01T00:00:00Z");
        let pathfinder = Pathfinder::with_source(&db_path, Box::new(source)).unwrap();

        let outcome = pathfinder.refresh_links("page").unwrap();
        assert_eq!(outcome, RefreshOutcome::Refreshed { links: 2 });
        assert_eq!(pathfinder.stats().unwrap().link_count, 2);
    }

    #[test]
    fn refresh_without_live_revision_still_fetches() {
        let (_dir, pathfinder) = pathfinder(&[("page", &["x"])]);

        let first = pathfinder.refresh_links("page").unwrap();
        assert_eq!(first, RefreshOutcome::Refreshed { links: 1 });

        // No revision token to compare, so refresh never reports Fresh
        let second = pathfinder.refresh_links("page").unwrap();
        assert_eq!(second, RefreshOutcome::Refreshed { links: 1 });
    }
}
