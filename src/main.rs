use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use dvroute::config::{RunConfig, DEFAULT_INPUT, DEFAULT_OUTPUT};
use dvroute::orchestrator;
use dvroute::report::ReportFormat;
use dvroute::topology::DEFAULT_MAX_NODES;

/// Distributed distance-vector routing table computation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the topology file
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Path of the routing table report to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Number of participating processes (must equal the node count)
    #[arg(short = 'n', long)]
    processes: Option<usize>,

    /// Largest accepted node count
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_NODES as u8,
        value_parser = clap::value_parser!(u8).range(1..=26)
    )]
    max_nodes: u8,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        Self {
            input: args.input,
            output: args.output,
            processes: args.processes,
            max_nodes: args.max_nodes as usize,
            format: args.format,
        }
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = RunConfig::from(args);
    info!("Topology file: {:?}", config.input);
    info!("Output file: {:?}", config.output);

    let table = orchestrator::run(&config).wrap_err("Routing run failed")?;

    info!("Computed routing table for {} nodes", table.node_count());
    Ok(())
}
