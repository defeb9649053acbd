//! Domain types for the Wikipath link graph.
//!
//! - **Entities**: `PageRecord` (stored in the database)
//! - **Transient**: search frontiers and visited sets (owned by one search)
//! - **Results**: `SearchOutcome`, `PreloadStats`, `RefreshOutcome`,
//!   `StoreStats` (returned to callers, never persisted)

use std::collections::HashSet;
use std::time::Duration;

/// A strongly-typed page ID.
///
/// IDs are assigned by the store on first insertion and are stable for the
/// lifetime of the database; the visited test in both search strategies uses
/// this ID, never the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub i64);

impl NodeId {
    /// Extract the raw i64 value.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Frontier discipline for a path search.
///
/// Both strategies interact with the expansion layer identically and differ
/// only in the order they pop the frontier. All edges cost 1, so uniform-cost
/// search returns paths of the same length as BFS; it exists because the cost
/// bookkeeping generalizes if edge weights ever become non-uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// FIFO frontier, shortest hop count first.
    Bfs,
    /// Min-cost frontier (degenerate Dijkstra under unit weights).
    UniformCost,
}

impl Strategy {
    /// Human-readable name used by the CLI and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bfs => "bfs",
            Self::UniformCost => "uniform-cost",
        }
    }
}

/// Why a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The target page was reached.
    Found,
    /// The frontier emptied before reaching the target. A normal outcome:
    /// no path exists in the currently known and reachable graph.
    Exhausted,
    /// The cooperative deadline elapsed, checked at frontier-pop granularity.
    DeadlineExceeded,
}

/// Result of one `find_path` invocation.
#[derive(Debug)]
pub struct SearchOutcome {
    /// The path as page titles from start to end, or `None` if no path
    /// was found before the search ended.
    pub path: Option<Vec<String>>,
    /// Every page finalized (popped and processed) during the search.
    pub visited: HashSet<NodeId>,
    /// Why the search ended.
    pub termination: Termination,
}

impl SearchOutcome {
    /// Whether the search produced a path.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.termination == Termination::Found
    }
}

/// Options applied to a single search invocation.
#[derive(Debug, Default, Clone)]
pub struct SearchOptions {
    /// Abort the search once this much wall-clock time has elapsed.
    ///
    /// Checked cooperatively each time the frontier is popped, so a slow
    /// in-flight page fetch still runs to its own timeout first.
    pub deadline: Option<Duration>,
}

/// A stored page row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Stable page ID.
    pub id: NodeId,
    /// Normalized title (trimmed, casefolded).
    pub title: String,
    /// Opaque revision token from the last refresh, if any.
    pub last_revision: Option<String>,
    /// Whether this page's outgoing links have been fetched.
    pub expanded: bool,
}

/// Counts describing the database contents.
#[derive(Debug, Default, Clone, Copy)]
pub struct StoreStats {
    /// Total page rows.
    pub page_count: usize,
    /// Total link rows.
    pub link_count: usize,
    /// Pages whose link lists have been fetched.
    pub expanded_count: usize,
}

/// Result of a depth-limited preload.
#[derive(Debug, Default)]
pub struct PreloadStats {
    /// Pages whose links were fetched from the API during this preload.
    pub pages_expanded: usize,
    /// Pages skipped because their links were already cached, or because
    /// the depth budget ran out before reaching them.
    pub pages_skipped: usize,
    /// Links recorded from freshly expanded pages.
    pub links_recorded: usize,
    /// Wall-clock time spent.
    pub duration: Duration,
}

/// Result of a revision-aware link refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The stored revision matches the live one; nothing was fetched.
    Fresh,
    /// Links were re-fetched and recorded.
    Refreshed {
        /// Number of link titles returned by the API (pre-dedup).
        links: usize,
    },
}
