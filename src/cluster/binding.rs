//! Process-to-node binding.

use crate::error::RoutingError;
use crate::topology::NodeId;

/// Which node a participating process owns for the whole run.
///
/// Process rank `r` owns node `r`; the binding is created once during
/// distribution and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessBinding {
    pub rank: usize,
    pub node: NodeId,
}

impl ProcessBinding {
    /// Bind `rank` to its node in a topology of `node_count` nodes
    pub fn assign(rank: usize, node_count: usize) -> Result<Self, RoutingError> {
        if rank >= node_count {
            return Err(RoutingError::TopologyMismatch {
                processes: rank + 1,
                nodes: node_count,
            });
        }
        Ok(Self {
            rank,
            node: NodeId(rank),
        })
    }

    /// Bindings for every rank of a run with `node_count` processes
    pub fn all(node_count: usize) -> Vec<Self> {
        (0..node_count)
            .map(|rank| Self {
                rank,
                node: NodeId(rank),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_owns_matching_node() {
        let binding = ProcessBinding::assign(2, 4).unwrap();
        assert_eq!(binding.rank, 2);
        assert_eq!(binding.node, NodeId(2));
    }

    #[test]
    fn test_rank_out_of_range() {
        assert!(matches!(
            ProcessBinding::assign(4, 4),
            Err(RoutingError::TopologyMismatch { processes: 5, nodes: 4 })
        ));
    }

    #[test]
    fn test_all_bindings() {
        let bindings = ProcessBinding::all(3);
        assert_eq!(bindings.len(), 3);
        assert!(bindings.iter().all(|b| b.node.index() == b.rank));
    }
}
