//! Topology distribution.
//!
//! The coordinator checks that every node has exactly one process, then
//! hands each process its own row of the cost matrix. No process sees any
//! other row.

use std::sync::mpsc::Sender;

use log::{debug, info};

use super::binding::ProcessBinding;
use super::transport::{Assignment, Envelope};
use crate::error::RoutingError;
use crate::topology::CostMatrix;

/// Fail with `TopologyMismatch` unless there is one process per node.
pub fn validate_process_count(matrix: &CostMatrix, processes: usize) -> Result<(), RoutingError> {
    let nodes = matrix.node_count();
    if processes != nodes {
        return Err(RoutingError::TopologyMismatch { processes, nodes });
    }
    Ok(())
}

/// Validate the process count and deliver one row to each process inbox.
///
/// `inboxes[rank]` is the inbox of the process with that rank.
pub fn distribute(
    matrix: &CostMatrix,
    inboxes: &[Sender<Envelope>],
) -> Result<Vec<ProcessBinding>, RoutingError> {
    validate_process_count(matrix, inboxes.len())?;

    let node_count = matrix.node_count();
    let bindings = ProcessBinding::all(node_count);
    for (binding, inbox) in bindings.iter().zip(inboxes) {
        let assignment = Assignment {
            binding: *binding,
            node_count,
            row: matrix.row(binding.node).clone(),
        };
        debug!("Assigning node {} to rank {}", binding.node, binding.rank);
        inbox.send(Envelope::Assign(assignment)).map_err(|_| {
            RoutingError::transport(format!("rank {} exited before its assignment", binding.rank))
        })?;
    }

    info!("Distributed {} rows to {} processes", node_count, inboxes.len());
    Ok(bindings)
}
