//! Search engines over the lazily materialized link graph.
//!
//! Two frontier disciplines share one interaction with the expansion layer:
//! a FIFO queue (BFS) and a min-cost heap (uniform-cost search). Neighbor
//! expansion happens inside the loop, so network latency for never-seen
//! pages lands on the search's critical path; already-cached pages cost one
//! indexed query.
//!
//! Per invocation the state machine is `INIT -> RUNNING -> {FOUND |
//! EXHAUSTED}`; nothing is resumable, a fresh frontier and visited set are
//! built every call.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::time::Instant;

use tracing::debug;

use crate::error::{Error, Result};
use crate::expand::LazyExpander;
use crate::store::GraphStore;
use crate::types::{NodeId, SearchOptions, SearchOutcome, Strategy, Termination};

/// Run a path search from `start` to `target`.
///
/// Both endpoints must already be materialized as pages; `Pathfinder` does
/// that before calling in.
pub(crate) fn run(
    expander: &LazyExpander<'_>,
    store: &GraphStore,
    start: NodeId,
    target: NodeId,
    strategy: Strategy,
    options: &SearchOptions,
) -> Result<SearchOutcome> {
    debug!(
        start = start.as_i64(),
        target = target.as_i64(),
        strategy = strategy.as_str(),
        "starting search"
    );

    match strategy {
        Strategy::Bfs => bfs(expander, store, start, target, options),
        Strategy::UniformCost => uniform_cost(expander, store, start, target, options),
    }
}

/// Breadth-first search: FIFO frontier, shortest hop count first.
fn bfs(
    expander: &LazyExpander<'_>,
    store: &GraphStore,
    start: NodeId,
    target: NodeId,
    options: &SearchOptions,
) -> Result<SearchOutcome> {
    let started = Instant::now();
    let mut frontier: VecDeque<(NodeId, Vec<NodeId>)> = VecDeque::new();
    frontier.push_back((start, vec![start]));
    let mut visited: HashSet<NodeId> = HashSet::new();

    while let Some((current, path)) = frontier.pop_front() {
        if deadline_elapsed(options, started) {
            return Ok(timed_out(visited));
        }

        // Visited test on pop; a page may be enqueued more than once
        if !visited.insert(current) {
            continue;
        }

        if current == target {
            return found(store, path, visited);
        }

        for neighbor in expander.out_neighbors_by_id(current)? {
            if !visited.contains(&neighbor) {
                let mut extended = path.clone();
                extended.push(neighbor);
                frontier.push_back((neighbor, extended));
            }
        }
    }

    Ok(exhausted(visited))
}

/// An entry in the uniform-cost frontier.
///
/// Ordered by (cost, insertion sequence), so equal costs pop in FIFO order.
#[derive(Debug)]
struct FrontierEntry {
    cost: u64,
    seq: u64,
    node: NodeId,
    path: Vec<NodeId>,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.seq == other.seq
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.cost, self.seq).cmp(&(other.cost, other.seq))
    }
}

/// Uniform-cost search: min-cost frontier with unit edge weights.
///
/// Degenerates to BFS's shortest-hop guarantee because every edge costs 1,
/// but keeps the `best_known_cost` bookkeeping that would generalize to
/// non-uniform weights.
fn uniform_cost(
    expander: &LazyExpander<'_>,
    store: &GraphStore,
    start: NodeId,
    target: NodeId,
    options: &SearchOptions,
) -> Result<SearchOutcome> {
    let started = Instant::now();
    let mut frontier: BinaryHeap<Reverse<FrontierEntry>> = BinaryHeap::new();
    let mut best_known_cost: HashMap<NodeId, u64> = HashMap::from([(start, 0)]);
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut seq: u64 = 0;

    frontier.push(Reverse(FrontierEntry {
        cost: 0,
        seq,
        node: start,
        path: vec![start],
    }));

    while let Some(Reverse(entry)) = frontier.pop() {
        if deadline_elapsed(options, started) {
            return Ok(timed_out(visited));
        }

        if !visited.insert(entry.node) {
            continue;
        }

        if entry.node == target {
            return found(store, entry.path, visited);
        }

        for neighbor in expander.out_neighbors_by_id(entry.node)? {
            if visited.contains(&neighbor) {
                continue;
            }

            let new_cost = entry.cost + 1;
            // Push only on strict improvement over the best recorded cost
            if best_known_cost
                .get(&neighbor)
                .is_none_or(|&best| new_cost < best)
            {
                best_known_cost.insert(neighbor, new_cost);
                seq += 1;
                let mut extended = entry.path.clone();
                extended.push(neighbor);
                frontier.push(Reverse(FrontierEntry {
                    cost: new_cost,
                    seq,
                    node: neighbor,
                    path: extended,
                }));
            }
        }
    }

    Ok(exhausted(visited))
}

fn deadline_elapsed(options: &SearchOptions, started: Instant) -> bool {
    options
        .deadline
        .is_some_and(|deadline| started.elapsed() >= deadline)
}

fn found(store: &GraphStore, path: Vec<NodeId>, visited: HashSet<NodeId>) -> Result<SearchOutcome> {
    let titles = titles_for_path(store, &path)?;
    debug!(hops = titles.len().saturating_sub(1), explored = visited.len(), "path found");
    Ok(SearchOutcome {
        path: Some(titles),
        visited,
        termination: Termination::Found,
    })
}

fn exhausted(visited: HashSet<NodeId>) -> SearchOutcome {
    debug!(explored = visited.len(), "frontier exhausted, no path");
    SearchOutcome {
        path: None,
        visited,
        termination: Termination::Exhausted,
    }
}

fn timed_out(visited: HashSet<NodeId>) -> SearchOutcome {
    debug!(explored = visited.len(), "search deadline exceeded");
    SearchOutcome {
        path: None,
        visited,
        termination: Termination::DeadlineExceeded,
    }
}

/// Resolve a path of IDs back to titles via the store.
fn titles_for_path(store: &GraphStore, path: &[NodeId]) -> Result<Vec<String>> {
    let mut titles = Vec::with_capacity(path.len());
    for &id in path {
        let title = store
            .title_of(id)?
            .ok_or_else(|| Error::Internal(format!("page id {} has no title row", id.as_i64())))?;
        titles.push(title);
    }
    Ok(titles)
}
