//! Network topology module.
//!
//! This module contains the cost-matrix data model and the loader that
//! reads an initial topology from its textual form.

pub mod types;
pub mod loader;

// Re-export key types and functions for easier access
pub use types::{Cost, CostMatrix, DistanceVector, FinalRoutingTable, NodeId, MAX_LINK_COST};
pub use loader::{load_topology, parse_topology, DEFAULT_MAX_NODES};
