//! Run configuration.

use std::path::PathBuf;

use crate::report::ReportFormat;
use crate::topology::DEFAULT_MAX_NODES;

/// Default topology file name
pub const DEFAULT_INPUT: &str = "topology.txt";

/// Default report file name
pub const DEFAULT_OUTPUT: &str = "routing_table.txt";

/// Everything a single routing run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Topology file to read
    pub input: PathBuf,
    /// Report file to write
    pub output: PathBuf,
    /// Number of participating processes; the node count when `None`
    pub processes: Option<usize>,
    /// Largest node count accepted from the topology file
    pub max_nodes: usize,
    /// Report format
    pub format: ReportFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            processes: None,
            max_nodes: DEFAULT_MAX_NODES,
            format: ReportFormat::Text,
        }
    }
}

impl RunConfig {
    /// Process count for a topology with `node_count` nodes
    pub fn process_count(&self, node_count: usize) -> usize {
        self.processes.unwrap_or(node_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.input, PathBuf::from("topology.txt"));
        assert_eq!(config.output, PathBuf::from("routing_table.txt"));
        assert_eq!(config.max_nodes, 7);
        assert_eq!(config.format, ReportFormat::Text);
    }

    #[test]
    fn test_process_count_falls_back_to_node_count() {
        let mut config = RunConfig::default();
        assert_eq!(config.process_count(4), 4);

        config.processes = Some(3);
        assert_eq!(config.process_count(4), 3);
    }
}
