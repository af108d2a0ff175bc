use serde::{Deserialize, Serialize};

use crate::dijkstra::ShortestPathTree;
use crate::enumerate::VertexIndex;
use crate::error::{Error, Result};
use crate::storage::VertexId;

/// A shortest path from source to target, both endpoints included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    pub path: Vec<VertexId>,
    /// Number of vertices on the path.
    pub length: usize,
    /// Sum of the edge weights along the path.
    pub weight: u64,
}

/// Walk predecessors from `target` back to the tree's source.
///
/// The walk visits at most one vertex per enumerated vertex; a longer chain
/// means the predecessors form a cycle.
pub fn reconstruct_path(
    tree: &ShortestPathTree,
    index: &VertexIndex,
    target: usize,
) -> Result<PathResult> {
    let id_of = |i: usize| {
        index
            .id_at(i)
            .ok_or_else(|| Error::corrupt(format!("enumeration index {i} out of range")))
    };

    let source = tree.source();
    let Some(weight) = tree.distance(target) else {
        return Err(Error::NoPathExists {
            source_id: id_of(source)?,
            target_id: id_of(target)?,
        });
    };

    let limit = tree.len();
    let mut path = Vec::new();
    let mut current = target;
    loop {
        if path.len() >= limit {
            return Err(Error::IterationLimitExceeded {
                stage: "path reconstruction",
                limit,
            });
        }
        path.push(id_of(current)?);
        match tree.predecessor(current) {
            Some(prev) => current = prev,
            None if current == source => break,
            None => {
                return Err(Error::BrokenPredecessorChain {
                    at: id_of(current)?,
                })
            }
        }
    }
    path.reverse();

    Ok(PathResult {
        length: path.len(),
        path,
        weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dijkstra::INFINITE;

    fn index(n: u64) -> VertexIndex {
        VertexIndex::from_ids((1..=n).collect()).unwrap()
    }

    #[test]
    fn test_chain_path() {
        // ids 1,2,3 at positions 0,1,2
        let tree = ShortestPathTree::from_parts(0, vec![0, 5, 7], vec![None, Some(0), Some(1)]);
        let p = reconstruct_path(&tree, &index(3), 2).unwrap();
        assert_eq!(p.path, vec![1, 2, 3]);
        assert_eq!(p.length, 3);
        assert_eq!(p.weight, 7);
    }

    #[test]
    fn test_target_is_source() {
        let tree = ShortestPathTree::from_parts(1, vec![INFINITE, 0], vec![None, None]);
        let p = reconstruct_path(&tree, &index(2), 1).unwrap();
        assert_eq!(p.path, vec![2]);
        assert_eq!(p.length, 1);
        assert_eq!(p.weight, 0);
    }

    #[test]
    fn test_unreached_target() {
        let tree = ShortestPathTree::from_parts(2, vec![INFINITE, INFINITE, 0], vec![None; 3]);
        let err = reconstruct_path(&tree, &index(3), 0).unwrap_err();
        assert!(matches!(
            err,
            Error::NoPathExists {
                source_id: 3,
                target_id: 1
            }
        ));
    }

    #[test]
    fn test_predecessor_cycle_capped() {
        // 1 and 2 point at each other, neither reaches the source 0
        let tree =
            ShortestPathTree::from_parts(0, vec![0, 3, 4], vec![None, Some(2), Some(1)]);
        let err = reconstruct_path(&tree, &index(3), 1).unwrap_err();
        assert!(matches!(
            err,
            Error::IterationLimitExceeded { limit: 3, .. }
        ));
    }

    #[test]
    fn test_chain_ending_off_source() {
        let tree = ShortestPathTree::from_parts(0, vec![0, 3, 4], vec![None, None, Some(1)]);
        let err = reconstruct_path(&tree, &index(3), 2).unwrap_err();
        assert!(matches!(err, Error::BrokenPredecessorChain { at: 2 }));
    }

    #[test]
    fn test_result_serializes() {
        let p = PathResult {
            path: vec![1, 3],
            length: 2,
            weight: 1,
        };
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"path":[1,3],"length":2,"weight":1}"#);
    }
}
