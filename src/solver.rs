//! Distance-vector solver.
//!
//! One solver runs per node. It owns that node's [`DistanceVector`] and
//! brings it to shortest-path distances by repeatedly exchanging vectors with
//! peers and relaxing against what they send back (distributed Bellman-Ford).

use log::{debug, trace};

use crate::cluster::ProcessBinding;
use crate::error::RoutingError;
use crate::topology::{DistanceVector, NodeId};

/// Blocking point-to-point vector exchange with a named peer.
///
/// Sends `local` to the process owning `peer` and returns that process's
/// current vector.
pub trait Exchange {
    fn exchange(
        &mut self,
        peer: NodeId,
        local: &DistanceVector,
    ) -> Result<DistanceVector, RoutingError>;
}

/// Counters collected while solving
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub rounds: usize,
    pub exchanges: usize,
    pub relaxations: usize,
}

/// Per-node distance-vector solver
#[derive(Debug)]
pub struct DistanceVectorSolver {
    binding: ProcessBinding,
    vector: DistanceVector,
    stats: SolveStats,
}

impl DistanceVectorSolver {
    /// Start from the node's row of the initial cost matrix
    pub fn new(binding: ProcessBinding, initial: DistanceVector) -> Self {
        Self {
            binding,
            vector: initial,
            stats: SolveStats::default(),
        }
    }

    pub fn node(&self) -> NodeId {
        self.binding.node
    }

    pub fn vector(&self) -> &DistanceVector {
        &self.vector
    }

    pub fn stats(&self) -> SolveStats {
        self.stats
    }

    /// Rounds needed for an `node_count`-node graph: the longest simple path
    /// has `node_count - 1` edges.
    pub fn rounds_for(node_count: usize) -> usize {
        node_count.saturating_sub(1)
    }

    /// Run exactly `N - 1` rounds and return the converged vector.
    pub fn solve<E: Exchange>(
        mut self,
        exchange: &mut E,
    ) -> Result<(DistanceVector, SolveStats), RoutingError> {
        let rounds = Self::rounds_for(self.vector.len());
        for _ in 0..rounds {
            self.run_round(exchange)?;
        }
        debug!(
            "Node {} converged after {} rounds ({} exchanges, {} relaxations)",
            self.node(),
            self.stats.rounds,
            self.stats.exchanges,
            self.stats.relaxations
        );
        Ok((self.vector, self.stats))
    }

    /// One pass over every peer that was reachable when the round started.
    ///
    /// Pivots are chosen from the pre-round snapshot: a peer that becomes
    /// reachable partway through this round waits for the next one. Updates
    /// from one pivot are visible to the pivots after it.
    pub fn run_round<E: Exchange>(&mut self, exchange: &mut E) -> Result<(), RoutingError> {
        let owner = self.node();
        let pivots = self.vector.reachable_peers(owner);
        trace!("Node {} round {} pivots: {:?}", owner, self.stats.rounds + 1, pivots);

        for pivot in pivots {
            let remote = exchange.exchange(pivot, &self.vector)?;
            self.stats.exchanges += 1;
            if remote.len() != self.vector.len() {
                return Err(RoutingError::transport(format!(
                    "node {} sent a vector of length {}, expected {}",
                    pivot,
                    remote.len(),
                    self.vector.len()
                )));
            }
            self.relax(pivot, &remote);
        }

        self.stats.rounds += 1;
        Ok(())
    }

    fn relax(&mut self, pivot: NodeId, remote: &DistanceVector) {
        let owner = self.node();
        let via = self.vector.get(pivot);

        for index in 0..self.vector.len() {
            let destination = NodeId(index);
            if destination == owner {
                continue;
            }
            let remote_cost = remote.get(destination);
            if !remote_cost.is_reachable() {
                continue;
            }
            let candidate = via.through(remote_cost);
            if candidate < self.vector.get(destination) {
                trace!(
                    "Node {}: {} -> {} via {} ({} < {})",
                    owner,
                    owner,
                    destination,
                    pivot,
                    candidate,
                    self.vector.get(destination)
                );
                self.vector.set(destination, candidate);
                self.stats.relaxations += 1;
            }
        }
    }
}
