//! Topology type definitions.
//!
//! Link costs, node identifiers, distance vectors and the square cost matrix
//! that every stage of a run passes around.

use std::fmt;

use crate::error::RoutingError;

/// Token used in topology and report files for "no link" / "no path"
pub const UNREACHABLE_TOKEN: &str = "-";

/// Largest node count that still has a single-letter label
pub const MAX_LABELLED_NODES: usize = 26;

/// Largest accepted link cost; keeps the sum of two legs below `u64::MAX`
pub const MAX_LINK_COST: u64 = u64::MAX / 2;

/// Cost of a link or path between two nodes.
///
/// `Unreachable` orders after every finite cost, so the usual comparisons
/// read as "is shorter than".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(into = "Option<u64>")]
pub enum Cost {
    Finite(u64),
    Unreachable,
}

impl Cost {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Finite(_))
    }

    pub fn value(&self) -> Option<u64> {
        match self {
            Self::Finite(cost) => Some(*cost),
            Self::Unreachable => None,
        }
    }

    /// Path cost through an intermediate hop; unreachable if either leg is.
    pub fn through(self, next: Cost) -> Cost {
        match (self, next) {
            (Self::Finite(a), Self::Finite(b)) => Self::Finite(a.saturating_add(b)),
            _ => Self::Unreachable,
        }
    }
}

impl From<Cost> for Option<u64> {
    fn from(cost: Cost) -> Self {
        cost.value()
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(cost) => write!(f, "{}", cost),
            Self::Unreachable => f.write_str(UNREACHABLE_TOKEN),
        }
    }
}

/// Index of a node in `0..N`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }

    /// Letter label used in reports (`A` for node 0, `B` for node 1, ...).
    ///
    /// `None` past the last letter.
    pub fn label(self) -> Option<char> {
        if self.0 < MAX_LABELLED_NODES {
            Some((b'A' + self.0 as u8) as char)
        } else {
            None
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => write!(f, "{}", label),
            None => write!(f, "#{}", self.0),
        }
    }
}

/// A node's best-known distance to every node, indexed by node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceVector(Vec<Cost>);

impl DistanceVector {
    pub fn new(costs: Vec<Cost>) -> Self {
        Self(costs)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, node: NodeId) -> Cost {
        self.0[node.index()]
    }

    pub fn set(&mut self, node: NodeId, cost: Cost) {
        self.0[node.index()] = cost;
    }

    pub fn costs(&self) -> &[Cost] {
        &self.0
    }

    /// Nodes other than `owner` that currently have a finite distance
    pub fn reachable_peers(&self, owner: NodeId) -> Vec<NodeId> {
        self.0
            .iter()
            .enumerate()
            .filter(|(index, cost)| *index != owner.index() && cost.is_reachable())
            .map(|(index, _)| NodeId(index))
            .collect()
    }
}

impl From<Vec<Cost>> for DistanceVector {
    fn from(costs: Vec<Cost>) -> Self {
        Self(costs)
    }
}

/// Square N×N matrix of costs, one [`DistanceVector`] per row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    rows: Vec<DistanceVector>,
}

impl CostMatrix {
    /// Build a matrix from rows, rejecting anything that is not square.
    pub fn from_rows(rows: Vec<DistanceVector>) -> Result<Self, RoutingError> {
        let size = rows.len();
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != size) {
            return Err(RoutingError::parse(
                index,
                format!("row {} has {} entries, expected {}", index, row.len(), size),
            ));
        }
        Ok(Self { rows })
    }

    pub fn node_count(&self) -> usize {
        self.rows.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.rows.len()).map(NodeId)
    }

    pub fn row(&self, node: NodeId) -> &DistanceVector {
        &self.rows[node.index()]
    }

    pub fn cost(&self, from: NodeId, to: NodeId) -> Cost {
        self.rows[from.index()].get(to)
    }

    pub fn rows(&self) -> &[DistanceVector] {
        &self.rows
    }
}

/// Shortest-path table produced by aggregation; read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalRoutingTable(CostMatrix);

impl FinalRoutingTable {
    pub(crate) fn new(matrix: CostMatrix) -> Self {
        Self(matrix)
    }

    pub fn matrix(&self) -> &CostMatrix {
        &self.0
    }

    pub fn node_count(&self) -> usize {
        self.0.node_count()
    }

    pub fn distance(&self, from: NodeId, to: NodeId) -> Cost {
        self.0.cost(from, to)
    }
}
