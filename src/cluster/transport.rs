//! Channel transport between node processes.
//!
//! Every process owns one inbox. A vector exchange posts a request into the
//! peer's inbox and blocks until the matching reply arrives; while blocked,
//! the process keeps answering requests from other peers with its own
//! current vector, so two processes waiting on each other always make
//! progress.

use std::sync::mpsc::{self, Receiver, Sender};

use log::trace;

use super::binding::ProcessBinding;
use crate::error::RoutingError;
use crate::solver::Exchange;
use crate::topology::{DistanceVector, NodeId};

/// A node's initial state, delivered by the distributor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub binding: ProcessBinding,
    pub node_count: usize,
    pub row: DistanceVector,
}

/// Messages carried between the coordinator and node processes
#[derive(Debug)]
pub enum Envelope {
    Assign(Assignment),
    Request { from: NodeId, vector: DistanceVector },
    Reply { from: NodeId, vector: DistanceVector },
    Shutdown,
}

/// Create one inbox per rank, wired into a full mesh.
///
/// Returns the coordinator's senders (indexed by rank) and one unbound
/// [`Mailbox`] per rank.
pub fn mesh(processes: usize) -> (Vec<Sender<Envelope>>, Vec<Mailbox>) {
    let (senders, receivers): (Vec<_>, Vec<_>) = (0..processes).map(|_| mpsc::channel()).unzip();

    let mailboxes = receivers
        .into_iter()
        .enumerate()
        .map(|(rank, inbox)| Mailbox {
            rank,
            inbox,
            peers: senders.clone(),
        })
        .collect();

    (senders, mailboxes)
}

/// A process's endpoint before it knows which node it owns
#[derive(Debug)]
pub struct Mailbox {
    rank: usize,
    inbox: Receiver<Envelope>,
    peers: Vec<Sender<Envelope>>,
}

impl Mailbox {
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Block until the distributor assigns a node, or the run is cancelled.
    ///
    /// Returns `None` when the coordinator shuts the run down instead.
    pub fn await_assignment(self) -> Result<Option<(Assignment, PeerLink)>, RoutingError> {
        let envelope = self.inbox.recv().map_err(|_| {
            RoutingError::transport(format!("rank {} lost its coordinator", self.rank))
        })?;

        match envelope {
            Envelope::Assign(assignment) => {
                if assignment.binding.rank != self.rank {
                    return Err(RoutingError::transport(format!(
                        "rank {} received the assignment for rank {}",
                        self.rank, assignment.binding.rank
                    )));
                }
                if assignment.row.len() != assignment.node_count {
                    return Err(RoutingError::transport(format!(
                        "rank {} received a row of {} entries for {} nodes",
                        self.rank,
                        assignment.row.len(),
                        assignment.node_count
                    )));
                }
                let link = PeerLink {
                    node: assignment.binding.node,
                    inbox: self.inbox,
                    peers: self.peers,
                };
                Ok(Some((assignment, link)))
            }
            Envelope::Shutdown => Ok(None),
            other => Err(RoutingError::transport(format!(
                "rank {} expected an assignment, got {:?}",
                self.rank, other
            ))),
        }
    }
}

/// A bound process endpoint that can exchange vectors with its peers
#[derive(Debug)]
pub struct PeerLink {
    node: NodeId,
    inbox: Receiver<Envelope>,
    peers: Vec<Sender<Envelope>>,
}

impl PeerLink {
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Keep answering peers with `vector` until the coordinator says stop.
    pub fn serve_until_shutdown(&self, vector: &DistanceVector) -> Result<(), RoutingError> {
        loop {
            match self.recv()? {
                Envelope::Request { from, vector: theirs } => self.answer(from, &theirs, vector)?,
                Envelope::Shutdown => return Ok(()),
                other => return Err(self.unexpected(other)),
            }
        }
    }

    fn answer(
        &self,
        from: NodeId,
        theirs: &DistanceVector,
        ours: &DistanceVector,
    ) -> Result<(), RoutingError> {
        trace!("Node {} answering {} (received {:?})", self.node, from, theirs.costs());
        self.send(
            from,
            Envelope::Reply {
                from: self.node,
                vector: ours.clone(),
            },
        )
    }

    fn send(&self, to: NodeId, envelope: Envelope) -> Result<(), RoutingError> {
        let peer = self
            .peers
            .get(to.index())
            .ok_or_else(|| RoutingError::transport(format!("no process owns node {}", to)))?;
        peer.send(envelope).map_err(|_| {
            RoutingError::transport(format!("node {} is no longer accepting messages", to))
        })
    }

    fn recv(&self) -> Result<Envelope, RoutingError> {
        self.inbox
            .recv()
            .map_err(|_| RoutingError::transport(format!("inbox of node {} closed", self.node)))
    }

    fn unexpected(&self, envelope: Envelope) -> RoutingError {
        RoutingError::transport(format!("node {} received unexpected {:?}", self.node, envelope))
    }
}

impl Exchange for PeerLink {
    fn exchange(
        &mut self,
        peer: NodeId,
        local: &DistanceVector,
    ) -> Result<DistanceVector, RoutingError> {
        if peer == self.node {
            return Ok(local.clone());
        }

        self.send(
            peer,
            Envelope::Request {
                from: self.node,
                vector: local.clone(),
            },
        )?;

        loop {
            match self.recv()? {
                Envelope::Reply { from, vector } if from == peer => return Ok(vector),
                Envelope::Request { from, vector } => self.answer(from, &vector, local)?,
                Envelope::Shutdown => {
                    return Err(RoutingError::transport(format!(
                        "node {} shut down while waiting for node {}",
                        self.node, peer
                    )))
                }
                other => return Err(self.unexpected(other)),
            }
        }
    }
}
