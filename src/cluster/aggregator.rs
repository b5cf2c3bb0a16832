//! Result aggregation.

use std::sync::mpsc::Receiver;

use log::{debug, info};

use crate::error::RoutingError;
use crate::solver::SolveStats;
use crate::topology::{CostMatrix, DistanceVector, FinalRoutingTable, NodeId};

/// What a node process reports back to the coordinator
#[derive(Debug)]
pub enum NodeEvent {
    Converged {
        node: NodeId,
        vector: DistanceVector,
        stats: SolveStats,
    },
    Failed {
        rank: usize,
    },
}

/// Block until every node has reported, placing row `r` from node `r`.
pub fn collect(
    events: &Receiver<NodeEvent>,
    node_count: usize,
) -> Result<(FinalRoutingTable, Vec<SolveStats>), RoutingError> {
    let mut rows: Vec<Option<DistanceVector>> = vec![None; node_count];
    let mut stats = vec![SolveStats::default(); node_count];

    for _ in 0..node_count {
        let event = events.recv().map_err(|_| {
            RoutingError::transport("node processes exited before reporting their rows")
        })?;

        match event {
            NodeEvent::Converged { node, vector, stats: node_stats } => {
                if vector.len() != node_count {
                    return Err(RoutingError::transport(format!(
                        "node {} reported {} entries, expected {}",
                        node,
                        vector.len(),
                        node_count
                    )));
                }
                let slot = rows.get_mut(node.index()).ok_or_else(|| {
                    RoutingError::transport(format!("row for unknown node {}", node.index()))
                })?;
                if slot.is_some() {
                    return Err(RoutingError::transport(format!("node {} reported twice", node)));
                }
                debug!("Received final row of node {}", node);
                *slot = Some(vector);
                stats[node.index()] = node_stats;
            }
            NodeEvent::Failed { rank } => {
                return Err(RoutingError::transport(format!("process {} failed", rank)));
            }
        }
    }

    let rows = rows.into_iter().flatten().collect();
    let matrix = CostMatrix::from_rows(rows)?;
    info!("Aggregated routing table for {} nodes", node_count);
    Ok((FinalRoutingTable::new(matrix), stats))
}
