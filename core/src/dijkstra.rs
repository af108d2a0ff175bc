use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::matrix::WeightMatrix;

/// Distance of a vertex not (yet) reached from the source.
pub const INFINITE: u64 = u64::MAX;

/// Which shortest-path implementation to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Linear minimum scan over the remaining set, O(n²).
    #[default]
    Dense,
    /// Binary heap keyed by (distance, index).
    Heap,
}

impl Engine {
    pub fn run(self, matrix: &WeightMatrix, source: usize) -> Result<ShortestPathTree> {
        match self {
            Engine::Dense => dijkstra(matrix, source),
            Engine::Heap => dijkstra_heap(matrix, source),
        }
    }
}

/// Distances from one source plus the predecessor of each vertex on its best path.
/// All arrays are indexed by enumeration position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPathTree {
    source: usize,
    distance: Vec<u64>,
    predecessor: Vec<Option<usize>>,
}

impl ShortestPathTree {
    pub(crate) fn from_parts(
        source: usize,
        distance: Vec<u64>,
        predecessor: Vec<Option<usize>>,
    ) -> Self {
        debug_assert_eq!(distance.len(), predecessor.len());
        Self {
            source,
            distance,
            predecessor,
        }
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn len(&self) -> usize {
        self.distance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }

    /// Shortest distance to `index`, None if unreachable.
    pub fn distance(&self, index: usize) -> Option<u64> {
        match self.distance.get(index).copied() {
            Some(INFINITE) | None => None,
            d => d,
        }
    }

    pub fn predecessor(&self, index: usize) -> Option<usize> {
        self.predecessor.get(index).copied().flatten()
    }

    pub fn is_reached(&self, index: usize) -> bool {
        self.distance(index).is_some()
    }

    fn dump(&self) {
        trace!(source = self.source, distance = ?self.distance, "distances");
        trace!(predecessor = ?self.predecessor, "predecessors");
    }
}

/// Remaining vertex with the smallest finite distance; lowest index on ties.
fn closest_remaining(distance: &[u64], remaining: &[bool]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &d) in distance.iter().enumerate() {
        if !remaining[i] || d == INFINITE {
            continue;
        }
        if best.map_or(true, |b| d < distance[b]) {
            best = Some(i);
        }
    }
    best
}

/// Dijkstra with a linear scan for the next vertex.
///
/// Every vertex is finalized at most once, so the loop is capped at the
/// vertex count. Vertices left with infinite distance once no reachable
/// vertex remains are unreachable and keep [`INFINITE`].
///
/// Panics if `source` is not a valid position in `matrix`.
pub fn dijkstra(matrix: &WeightMatrix, source: usize) -> Result<ShortestPathTree> {
    let n = matrix.size();
    assert!(source < n, "source index {source} out of range for {n} vertices");

    let mut distance = vec![INFINITE; n];
    let mut predecessor: Vec<Option<usize>> = vec![None; n];
    let mut remaining = vec![true; n];
    let mut left = n;
    distance[source] = 0;

    let mut iterations = 0;
    while left > 0 {
        if iterations >= n {
            return Err(Error::IterationLimitExceeded {
                stage: "dijkstra",
                limit: n,
            });
        }
        iterations += 1;

        let Some(u) = closest_remaining(&distance, &remaining) else {
            break;
        };
        remaining[u] = false;
        left -= 1;

        let du = distance[u];
        for (v, w) in matrix.row(u) {
            if !remaining[v] {
                continue;
            }
            let alt = du.saturating_add(w);
            if alt < distance[v] {
                distance[v] = alt;
                predecessor[v] = Some(u);
            }
        }
    }

    let tree = ShortestPathTree::from_parts(source, distance, predecessor);
    tree.dump();
    Ok(tree)
}

/// Dijkstra driven by a binary heap. Produces the same tree as [`dijkstra`]:
/// vertices are finalized in (distance, index) order in both.
///
/// Panics if `source` is not a valid position in `matrix`.
pub fn dijkstra_heap(matrix: &WeightMatrix, source: usize) -> Result<ShortestPathTree> {
    let n = matrix.size();
    assert!(source < n, "source index {source} out of range for {n} vertices");

    let mut distance = vec![INFINITE; n];
    let mut predecessor: Vec<Option<usize>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut finalized = 0;
    let mut heap = BinaryHeap::new();

    distance[source] = 0;
    heap.push(Reverse((0u64, source)));

    while let Some(Reverse((d, u))) = heap.pop() {
        // Stale entry: u was already finalized or improved since it was pushed
        if settled[u] || d > distance[u] {
            continue;
        }
        if finalized >= n {
            return Err(Error::IterationLimitExceeded {
                stage: "dijkstra",
                limit: n,
            });
        }
        settled[u] = true;
        finalized += 1;

        for (v, w) in matrix.row(u) {
            if settled[v] {
                continue;
            }
            let alt = d.saturating_add(w);
            if alt < distance[v] {
                distance[v] = alt;
                predecessor[v] = Some(u);
                heap.push(Reverse((alt, v)));
            }
        }
    }

    let tree = ShortestPathTree::from_parts(source, distance, predecessor);
    tree.dump();
    Ok(tree)
}
