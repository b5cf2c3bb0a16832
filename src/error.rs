//! Error types shared by every stage of a routing run.

use std::path::PathBuf;

/// Errors that can abort a routing run
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("Failed to read topology file {}: {source}", path.display())]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid topology at token {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Topology has {nodes} nodes but at most {max} are supported")]
    TooManyNodes { nodes: usize, max: usize },

    #[error("Number of processes ({processes}) must equal the number of nodes ({nodes})")]
    TopologyMismatch { processes: usize, nodes: usize },

    #[error("Failed to write routing table to {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Transport failure: {0}")]
    Transport(String),
}

impl RoutingError {
    pub(crate) fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}
