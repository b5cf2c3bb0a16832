//! Run orchestrator.
//!
//! This module drives a routing run end to end: load the topology, run the
//! distributed computation, write the report.

use log::{debug, info};

use crate::cluster::{run_cluster, ClusterOutcome};
use crate::config::RunConfig;
use crate::error::RoutingError;
use crate::report::write_report;
use crate::topology::{load_topology, FinalRoutingTable, NodeId};

/// Run the whole pipeline described by `config`.
///
/// Nothing is written unless the computation completes.
pub fn run(config: &RunConfig) -> Result<FinalRoutingTable, RoutingError> {
    let matrix = load_topology(&config.input, config.max_nodes)?;
    let processes = config.process_count(matrix.node_count());

    let ClusterOutcome { table, stats } = run_cluster(&matrix, processes)?;
    for (index, node_stats) in stats.iter().enumerate() {
        debug!(
            "Node {}: {} rounds, {} exchanges, {} relaxations",
            NodeId(index),
            node_stats.rounds,
            node_stats.exchanges,
            node_stats.relaxations
        );
    }
    let exchanges: usize = stats.iter().map(|s| s.exchanges).sum();
    info!("Routing table converged after {} vector exchanges", exchanges);

    write_report(&table, &config.output, config.format)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportFormat;
    use crate::topology::Cost;
    use std::fs;

    #[test]
    fn test_run_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("topology.txt");
        let output = dir.path().join("routing_table.txt");
        fs::write(&input, "3\n0 4 1\n4 0 1\n1 1 0\n").unwrap();

        let config = RunConfig {
            input,
            output: output.clone(),
            ..RunConfig::default()
        };
        let table = run(&config).unwrap();

        assert_eq!(table.distance(NodeId(0), NodeId(1)), Cost::Finite(2));
        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content, "Final routing table:\nA: 0 2 1\nB: 2 0 1\nC: 1 1 0\n");
    }

    #[test]
    fn test_mismatch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("topology.txt");
        let output = dir.path().join("routing_table.txt");
        fs::write(&input, "2\n0 1\n1 0\n").unwrap();

        let config = RunConfig {
            input,
            output: output.clone(),
            processes: Some(3),
            max_nodes: 7,
            format: ReportFormat::Json,
        };
        let result = run(&config);

        assert!(matches!(
            result,
            Err(RoutingError::TopologyMismatch { processes: 3, nodes: 2 })
        ));
        assert!(!output.exists());
    }
}
