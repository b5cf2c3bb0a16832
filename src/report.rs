//! Routing table report generation.
//!
//! Writes the final table as human-readable text (and, optionally, JSON),
//! and reads the text form back.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::error::RoutingError;
use crate::topology::loader::parse_cost;
use crate::topology::{Cost, CostMatrix, DistanceVector, FinalRoutingTable, NodeId};

/// First line of every text report
pub const REPORT_HEADER: &str = "Final routing table:";

/// Output format of the report file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport {
    nodes: Vec<String>,
    table: BTreeMap<String, Vec<Cost>>,
}

/// Render the table as text, one labelled line per node
pub fn render_text(table: &FinalRoutingTable) -> String {
    let mut lines = vec![REPORT_HEADER.to_string()];
    for (index, row) in table.matrix().rows().iter().enumerate() {
        let costs: Vec<String> = row.costs().iter().map(Cost::to_string).collect();
        lines.push(format!("{}: {}", NodeId(index), costs.join(" ")));
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Render the table as pretty-printed JSON; unreachable entries are `null`.
pub fn render_json(table: &FinalRoutingTable) -> Result<String, serde_json::Error> {
    let matrix = table.matrix();
    let report = JsonReport {
        nodes: matrix.nodes().map(|node| node.to_string()).collect(),
        table: matrix
            .nodes()
            .map(|node| (node.to_string(), matrix.row(node).costs().to_vec()))
            .collect(),
    };
    serde_json::to_string_pretty(&report)
}

/// Write the report to `output_path`
pub fn write_report(
    table: &FinalRoutingTable,
    output_path: &Path,
    format: ReportFormat,
) -> Result<(), RoutingError> {
    let content = match format {
        ReportFormat::Text => render_text(table),
        ReportFormat::Json => render_json(table).map_err(|err| RoutingError::OutputWrite {
            path: output_path.to_path_buf(),
            source: err.into(),
        })?,
    };

    fs::write(output_path, content).map_err(|source| RoutingError::OutputWrite {
        path: output_path.to_path_buf(),
        source,
    })?;

    info!("Routing table written to {}", output_path.display());
    Ok(())
}

/// Read a text report back into a table.
///
/// Costs use the same token rules as topology files.
pub fn parse_report(content: &str) -> Result<FinalRoutingTable, RoutingError> {
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());

    match lines.next() {
        Some(line) if line.trim() == REPORT_HEADER => {}
        _ => return Err(RoutingError::parse(0, "missing report header")),
    }

    let mut rows = Vec::new();
    let mut position = 0;
    for (index, line) in lines.enumerate() {
        let (label, costs) = line.split_once(':').ok_or_else(|| {
            RoutingError::parse(position, format!("missing node label in '{}'", line))
        })?;

        let expected = NodeId(index)
            .label()
            .ok_or_else(|| RoutingError::parse(position, "too many rows"))?;
        if label.trim() != expected.to_string() {
            return Err(RoutingError::parse(
                position,
                format!("expected row {}, found '{}'", expected, label.trim()),
            ));
        }
        position += 1;

        let mut row = Vec::new();
        for token in costs.split_whitespace() {
            row.push(parse_cost(position, token)?);
            position += 1;
        }
        rows.push(DistanceVector::new(row));
    }

    Ok(FinalRoutingTable::new(CostMatrix::from_rows(rows)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::parse_topology;

    fn example_table() -> FinalRoutingTable {
        let matrix = parse_topology("3\n0 1 -\n1 0 -\n- - 0\n", 7).unwrap();
        FinalRoutingTable::new(matrix)
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&example_table());
        assert_eq!(text, "Final routing table:\nA: 0 1 -\nB: 1 0 -\nC: - - 0\n");
    }

    #[test]
    fn test_text_report_reads_back() {
        let table = example_table();
        let parsed = parse_report(&render_text(&table)).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_parse_report_rejects_out_of_order_rows() {
        let text = "Final routing table:\nB: 0 1\nA: 1 0\n";
        assert!(matches!(parse_report(text), Err(RoutingError::Parse { .. })));
        assert!(matches!(parse_report("A: 0\n"), Err(RoutingError::Parse { .. })));
    }

    #[test]
    fn test_parse_report_rejects_rows_past_the_alphabet() {
        let mut text = String::from("Final routing table:\n");
        for index in 0..27 {
            let label = NodeId(index).label().unwrap_or('X');
            text.push_str(&format!("{}: 0\n", label));
        }
        assert!(matches!(
            parse_report(&text),
            Err(RoutingError::Parse { message, .. }) if message == "too many rows"
        ));

        let unlabelled = format!("Final routing table:\n{}", "X: 0\n".repeat(27));
        assert!(matches!(parse_report(&unlabelled), Err(RoutingError::Parse { .. })));
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&example_table()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"], serde_json::json!(["A", "B", "C"]));
        assert_eq!(value["table"]["A"], serde_json::json!([0, 1, null]));
        assert_eq!(value["table"]["C"], serde_json::json!([null, null, 0]));
    }

    #[test]
    fn test_write_report_to_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("table.txt");
        let result = write_report(&example_table(), &path, ReportFormat::Text);
        assert!(matches!(result, Err(RoutingError::OutputWrite { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.txt");
        write_report(&example_table(), &path, ReportFormat::Text).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(REPORT_HEADER));
    }
}
