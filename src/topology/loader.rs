//! Topology file loading.
//!
//! The file is a stream of whitespace-separated tokens: the node count `N`
//! followed by `N * N` row-major link costs, where `-` marks a missing link.

use std::fs;
use std::path::Path;

use log::{info, warn};

use super::types::{
    Cost, CostMatrix, DistanceVector, MAX_LABELLED_NODES, MAX_LINK_COST, UNREACHABLE_TOKEN,
};
use crate::error::RoutingError;

/// Default upper bound on the node count
pub const DEFAULT_MAX_NODES: usize = 7;

/// Load and parse a topology file
pub fn load_topology(path: &Path, max_nodes: usize) -> Result<CostMatrix, RoutingError> {
    info!("Loading topology from: {:?}", path);

    let content = fs::read_to_string(path).map_err(|source| RoutingError::ConfigLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let matrix = parse_topology(&content, max_nodes)?;
    info!("Loaded topology with {} nodes", matrix.node_count());
    Ok(matrix)
}

/// Parse topology text into a cost matrix.
///
/// `max_nodes` is clamped to the number of single-letter labels.
pub fn parse_topology(content: &str, max_nodes: usize) -> Result<CostMatrix, RoutingError> {
    let mut tokens = content.split_whitespace().enumerate();

    let (position, first) = tokens
        .next()
        .ok_or_else(|| RoutingError::parse(0, "missing node count"))?;
    let node_count: usize = first
        .parse()
        .map_err(|_| RoutingError::parse(position, format!("invalid node count '{}'", first)))?;

    if node_count == 0 {
        return Err(RoutingError::parse(position, "node count must be at least 1"));
    }
    let max = max_nodes.min(MAX_LABELLED_NODES);
    if node_count > max {
        return Err(RoutingError::TooManyNodes { nodes: node_count, max });
    }

    let mut rows = Vec::with_capacity(node_count);
    for row in 0..node_count {
        let mut costs = Vec::with_capacity(node_count);
        for column in 0..node_count {
            let (position, token) = tokens.next().ok_or_else(|| {
                RoutingError::parse(
                    1 + row * node_count + column,
                    format!(
                        "expected {} cost entries, input ended early",
                        node_count * node_count
                    ),
                )
            })?;
            costs.push(parse_cost(position, token)?);
        }
        rows.push(DistanceVector::new(costs));
    }

    if let Some((position, token)) = tokens.next() {
        return Err(RoutingError::parse(
            position,
            format!("unexpected trailing token '{}'", token),
        ));
    }

    let matrix = CostMatrix::from_rows(rows)?;
    for node in matrix.nodes() {
        match matrix.cost(node, node) {
            Cost::Finite(0) | Cost::Unreachable => {}
            Cost::Finite(cost) => warn!("Node {} has non-zero self cost {}", node, cost),
        }
    }
    Ok(matrix)
}

/// Parse a single cost token (`-` or an integer in `0..=MAX_LINK_COST`)
pub fn parse_cost(position: usize, token: &str) -> Result<Cost, RoutingError> {
    if token == UNREACHABLE_TOKEN {
        return Ok(Cost::Unreachable);
    }
    let cost = token
        .parse::<u64>()
        .map_err(|_| RoutingError::parse(position, format!("invalid cost '{}'", token)))?;
    if cost > MAX_LINK_COST {
        return Err(RoutingError::parse(
            position,
            format!("cost {} exceeds the maximum of {}", cost, MAX_LINK_COST),
        ));
    }
    Ok(Cost::Finite(cost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::NodeId;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SQUARE: &str = "4\n0 1 - 4\n1 0 2 -\n- 2 0 1\n4 - 1 0\n";

    #[test]
    fn test_parse_example_topology() {
        let matrix = parse_topology(SQUARE, DEFAULT_MAX_NODES).unwrap();
        assert_eq!(matrix.node_count(), 4);
        assert_eq!(matrix.cost(NodeId(0), NodeId(1)), Cost::Finite(1));
        assert_eq!(matrix.cost(NodeId(0), NodeId(2)), Cost::Unreachable);
        assert_eq!(matrix.cost(NodeId(3), NodeId(0)), Cost::Finite(4));
    }

    #[test]
    fn test_tokens_need_not_follow_rows() {
        let matrix = parse_topology("2 0 5\n\n 7   0", DEFAULT_MAX_NODES).unwrap();
        assert_eq!(matrix.cost(NodeId(0), NodeId(1)), Cost::Finite(5));
        assert_eq!(matrix.cost(NodeId(1), NodeId(0)), Cost::Finite(7));
    }

    #[test]
    fn test_single_node() {
        let matrix = parse_topology("1\n0\n", DEFAULT_MAX_NODES).unwrap();
        assert_eq!(matrix.node_count(), 1);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(parse_topology("", 7), Err(RoutingError::Parse { .. })));
        assert!(matches!(parse_topology("0", 7), Err(RoutingError::Parse { .. })));
        assert!(matches!(parse_topology("x", 7), Err(RoutingError::Parse { .. })));
        assert!(matches!(parse_topology("2 0 1 1", 7), Err(RoutingError::Parse { .. })));
        assert!(matches!(parse_topology("2 0 1 1 0 9", 7), Err(RoutingError::Parse { .. })));
        assert!(matches!(
            parse_topology("2 0 -1 1 0", 7),
            Err(RoutingError::Parse { position: 2, .. })
        ));
    }

    #[test]
    fn test_node_count_bound_is_configurable() {
        let eight = format!("8 {}", vec!["0"; 64].join(" "));
        assert!(matches!(
            parse_topology(&eight, DEFAULT_MAX_NODES),
            Err(RoutingError::TooManyNodes { nodes: 8, max: 7 })
        ));
        assert_eq!(parse_topology(&eight, 8).unwrap().node_count(), 8);
    }

    #[test]
    fn test_node_count_bound_never_exceeds_labels() {
        let nodes = MAX_LABELLED_NODES + 1;
        let text = format!("{} {}", nodes, vec!["0"; nodes * nodes].join(" "));
        assert!(matches!(
            parse_topology(&text, 30),
            Err(RoutingError::TooManyNodes { nodes: 27, max: 26 })
        ));

        let text = format!("26 {}", vec!["0"; 26 * 26].join(" "));
        assert_eq!(parse_topology(&text, 30).unwrap().node_count(), 26);
    }

    #[test]
    fn test_cost_bound() {
        let largest = MAX_LINK_COST.to_string();
        assert_eq!(parse_cost(0, &largest).unwrap(), Cost::Finite(MAX_LINK_COST));
        assert!(matches!(
            parse_cost(3, &(MAX_LINK_COST + 1).to_string()),
            Err(RoutingError::Parse { position: 3, .. })
        ));
        assert!(parse_cost(0, "18446744073709551616").is_err());
    }

    #[test]
    fn test_load_topology_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", SQUARE).unwrap();

        let matrix = load_topology(temp_file.path(), DEFAULT_MAX_NODES).unwrap();
        assert_eq!(matrix.node_count(), 4);
    }

    #[test]
    fn test_missing_file_is_config_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_topology(&dir.path().join("missing.txt"), DEFAULT_MAX_NODES);
        assert!(matches!(result, Err(RoutingError::ConfigLoad { .. })));
    }
}
