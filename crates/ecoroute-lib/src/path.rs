use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::Serialize;

use crate::graph::{Graph, TravelMode};

/// Undirected segment between two locations; `(a, b)` equals `(b, a)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Segment {
    low: String,
    high: String,
}

impl Segment {
    pub fn new(a: &str, b: &str) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low: low.to_string(),
            high: high.to_string(),
        }
    }

    /// Endpoints in lexical order.
    pub fn endpoints(&self) -> (&str, &str) {
        (&self.low, &self.high)
    }

    /// Whether the directed traversal `from -> to` crosses this segment.
    pub fn matches(&self, from: &str, to: &str) -> bool {
        (self.low == from && self.high == to) || (self.low == to && self.high == from)
    }
}

/// Query-scoped restrictions applied during pathfinding.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchConstraints {
    /// Location codes that must not appear after the start of the path.
    pub avoided_nodes: HashSet<String>,
    /// Undirected segments that must not be traversed.
    pub avoided_segments: HashSet<Segment>,
}

impl SearchConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn avoid_node(mut self, code: impl Into<String>) -> Self {
        self.avoided_nodes.insert(code.into());
        self
    }

    #[must_use]
    pub fn avoid_segment(mut self, a: &str, b: &str) -> Self {
        self.avoided_segments.insert(Segment::new(a, b));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.avoided_nodes.is_empty() && self.avoided_segments.is_empty()
    }

    /// Whether the directed traversal `from -> to` is permitted.
    ///
    /// Only the entered node is checked against the avoided set, so the start
    /// of a search is never rejected.
    pub fn allows(&self, from: &str, to: &str) -> bool {
        if self.avoided_nodes.contains(to) {
            return false;
        }

        if !self.avoided_segments.is_empty()
            && self.avoided_segments.contains(&Segment::new(from, to))
        {
            return false;
        }

        true
    }
}

/// Driving-time shortest path without additional constraints.
pub fn find_route(graph: &Graph, start: &str, goal: &str) -> Vec<String> {
    find_route_with(graph, start, goal, TravelMode::Driving, |_, _| true)
}

/// Run Dijkstra's algorithm over the given mode while honouring `constraints`.
pub fn find_route_dijkstra(
    graph: &Graph,
    start: &str,
    goal: &str,
    mode: TravelMode,
    constraints: &SearchConstraints,
) -> Vec<String> {
    if constraints.is_empty() {
        return find_route_with(graph, start, goal, mode, |_, _| true);
    }
    find_route_with(graph, start, goal, mode, |from, to| {
        constraints.allows(from, to)
    })
}

/// Dijkstra core shared by every search in the crate.
///
/// Edges whose cost for `mode` is unavailable are never relaxed, and `allows`
/// is consulted for each directed traversal `u -> v` before relaxation. An
/// empty vector means `goal` is unreachable. A query whose start and goal are
/// the same known location yields that single location.
///
/// Equal-cost candidates are popped in location-code order, so results are
/// repeatable but no particular path among equal-cost ones is privileged.
pub fn find_route_with<F>(
    graph: &Graph,
    start: &str,
    goal: &str,
    mode: TravelMode,
    allows: F,
) -> Vec<String>
where
    F: Fn(&str, &str) -> bool,
{
    if start == goal {
        return if graph.contains(start) {
            vec![start.to_string()]
        } else {
            Vec::new()
        };
    }

    let mut distances: HashMap<&str, u64> = HashMap::new();
    let mut parents: HashMap<&str, &str> = HashMap::new();
    let mut settled: HashSet<&str> = HashSet::new();
    let mut queue = BinaryHeap::new();

    distances.insert(start, 0);
    queue.push(QueueEntry::new(start, 0));

    while let Some(entry) = queue.pop() {
        if !settled.insert(entry.node) {
            continue;
        }

        if entry.node == goal {
            break;
        }

        for edge in graph.neighbours(entry.node) {
            let Some(weight) = edge.data.cost(mode) else {
                continue;
            };
            let next = edge.target.as_str();
            if settled.contains(next) || !allows(entry.node, next) {
                continue;
            }

            let next_cost = entry.cost + u64::from(weight);
            if next_cost < distances.get(next).copied().unwrap_or(u64::MAX) {
                distances.insert(next, next_cost);
                parents.insert(next, entry.node);
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    reconstruct_path(&parents, start, goal)
}

fn reconstruct_path(parents: &HashMap<&str, &str>, start: &str, goal: &str) -> Vec<String> {
    if !parents.contains_key(goal) {
        return Vec::new();
    }

    let mut path = vec![goal.to_string()];
    let mut current = goal;
    while current != start {
        let Some(&previous) = parents.get(current) else {
            return Vec::new();
        };
        path.push(previous.to_string());
        current = previous;
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry<'a> {
    node: &'a str,
    cost: u64,
}

impl<'a> QueueEntry<'a> {
    fn new(node: &'a str, cost: u64) -> Self {
        Self { node, cost }
    }
}

impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(self.node))
    }
}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
