//! Distributed computation of the routing table.
//!
//! One thread per node process plus the coordinator on the calling thread:
//!
//! 1. the coordinator distributes one row to each process ([`distributor`]),
//! 2. every process waits on a shared barrier, then solves its row by
//!    exchanging vectors with its peers ([`crate::solver`], [`transport`]),
//! 3. the coordinator collects the converged rows ([`aggregator`]) and shuts
//!    every process down.

pub mod aggregator;
pub mod binding;
pub mod distributor;
pub mod transport;

use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Barrier};
use std::thread;

use log::{info, warn};

pub use aggregator::NodeEvent;
pub use binding::ProcessBinding;
pub use transport::{Assignment, Envelope, Mailbox, PeerLink};

use crate::error::RoutingError;
use crate::solver::{DistanceVectorSolver, SolveStats};
use crate::topology::{CostMatrix, FinalRoutingTable};

/// Result of a completed distributed run
#[derive(Debug, Clone)]
pub struct ClusterOutcome {
    pub table: FinalRoutingTable,
    pub stats: Vec<SolveStats>,
}

/// Run the distributed computation with `processes` node processes.
///
/// Fails with `TopologyMismatch` (after shutting every process down) when
/// `processes` differs from the node count.
pub fn run_cluster(
    matrix: &CostMatrix,
    processes: usize,
) -> Result<ClusterOutcome, RoutingError> {
    info!("Starting {} node processes", processes);

    let (inboxes, mailboxes) = transport::mesh(processes);
    let (events_tx, events_rx) = mpsc::channel();
    let barrier = Arc::new(Barrier::new(processes.max(1)));

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(processes);
        for mailbox in mailboxes {
            let process = NodeProcess {
                mailbox,
                events: events_tx.clone(),
                barrier: Arc::clone(&barrier),
            };
            let handle = thread::Builder::new()
                .name(format!("node-{}", process.mailbox.rank()))
                .spawn_scoped(scope, move || process.run());
            match handle {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    shutdown(&inboxes);
                    return Err(RoutingError::transport(format!(
                        "failed to spawn node process: {}",
                        err
                    )));
                }
            }
        }
        drop(events_tx);

        let outcome = distributor::distribute(matrix, &inboxes)
            .and_then(|_| aggregator::collect(&events_rx, matrix.node_count()));
        shutdown(&inboxes);

        let mut process_errors = Vec::new();
        for (rank, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(err)) => process_errors.push(err),
                Err(_) => {
                    let message = format!("process {} panicked", rank);
                    process_errors.push(RoutingError::transport(message));
                }
            }
        }

        match outcome {
            Ok((table, stats)) => Ok(ClusterOutcome { table, stats }),
            // A node failure is more specific than the coordinator's view of it.
            Err(RoutingError::Transport(message)) => match process_errors.into_iter().next() {
                Some(err) => Err(err),
                None => Err(RoutingError::Transport(message)),
            },
            Err(err) => Err(err),
        }
    })
}

fn shutdown(inboxes: &[Sender<Envelope>]) {
    for inbox in inboxes {
        // Processes that already exited have dropped their inbox.
        let _ = inbox.send(Envelope::Shutdown);
    }
}

/// One participating process, owning exactly one node once assigned
struct NodeProcess {
    mailbox: Mailbox,
    events: Sender<NodeEvent>,
    barrier: Arc<Barrier>,
}

impl NodeProcess {
    fn run(self) -> Result<(), RoutingError> {
        let NodeProcess { mailbox, events, barrier } = self;
        let rank = mailbox.rank();

        let result = solve_and_serve(mailbox, &events, &barrier);
        if let Err(err) = &result {
            warn!("Process {} failed: {}", rank, err);
            let _ = events.send(NodeEvent::Failed { rank });
        }
        result
    }
}

fn solve_and_serve(
    mailbox: Mailbox,
    events: &Sender<NodeEvent>,
    barrier: &Barrier,
) -> Result<(), RoutingError> {
    let Some((assignment, mut link)) = mailbox.await_assignment()? else {
        return Ok(());
    };
    barrier.wait();

    let solver = DistanceVectorSolver::new(assignment.binding, assignment.row);
    let (vector, stats) = solver.solve(&mut link)?;

    events
        .send(NodeEvent::Converged {
            node: link.node(),
            vector: vector.clone(),
            stats,
        })
        .map_err(|_| RoutingError::transport("coordinator stopped collecting results"))?;

    link.serve_until_shutdown(&vector)
}
