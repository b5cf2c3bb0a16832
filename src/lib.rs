//! # dvroute - Distributed distance-vector routing tables
//!
//! Computes the complete shortest-distance routing table for a small, fixed
//! set of nodes. Every node is owned by its own process (a thread), which
//! iteratively exchanges distance vectors with its peers and relaxes its own
//! row of the cost matrix until the table is stable.
//!
//! ## Architecture
//!
//! - `topology`: cost matrix types and the topology file loader
//! - `cluster`: row distribution, the channel transport between node
//!   processes, and aggregation of the converged rows
//! - `solver`: the per-node distributed Bellman-Ford loop
//! - `report`: text and JSON report output
//! - `config`: run configuration
//! - `orchestrator`: runs load, compute and report end to end
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use dvroute::{config::RunConfig, orchestrator};
//!
//! let config = RunConfig::default();
//! let table = orchestrator::run(&config)?;
//! println!("{} nodes routed", table.node_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Topology Format
//!
//! Whitespace-separated tokens: the node count, then the cost matrix in
//! row-major order with `-` for "no direct link":
//!
//! ```text
//! 4
//! 0 1 - 4
//! 1 0 2 -
//! - 2 0 1
//! 4 - 1 0
//! ```
//!
//! Link costs are non-negative integers no larger than
//! [`topology::MAX_LINK_COST`] (`u64::MAX / 2`). Path sums past that bound
//! saturate at `u64::MAX`.
//!
//! ## Error Handling
//!
//! Library functions return [`error::RoutingError`]; the binary reports them
//! through `color_eyre`.

pub mod config;
pub mod error;
pub mod topology;
pub mod solver;
pub mod cluster;
pub mod report;
pub mod orchestrator;
