//! component-sssp: query shortest paths inside one graph component.
//!
//! The graph and component are named explicitly on every invocation; results
//! are written to stdout as JSON, logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use component_sssp_core::{
    component_sssp, load_vertex_index, load_weight_matrix, Component, EdgeLookupMode, Engine,
    Error as SsspError, VertexId,
};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod util;

use config::{FileConfig, Overrides, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about = "Shortest paths over graph component files")]
struct Args {
    /// JSON config file (root, engine, edge_lookup, weight_attribute, max_vertices)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding graph-<n>/component-<m> trees
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Graph number
    #[arg(long, short = 'g', global = true, default_value_t = 0)]
    graph: u32,
    /// Component number within the graph
    #[arg(long, short = 'c', global = true, default_value_t = 0)]
    component: u32,
    /// Shortest-path engine: dense or heap
    #[arg(long, global = true, value_parser = util::parse_engine)]
    engine: Option<Engine>,
    /// Edge lookup while building the matrix: scan or index
    #[arg(long, global = true, value_parser = util::parse_edge_lookup)]
    edge_lookup: Option<EdgeLookupMode>,
    /// Integer edge attribute to use as weight (default: first int attribute)
    #[arg(long, global = true)]
    weight_attribute: Option<String>,
    /// Refuse components with more vertices than this
    #[arg(long, global = true)]
    max_vertices: Option<usize>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shortest path between two vertices
    Path { source: VertexId, target: VertexId },
    /// List the component's vertices in enumeration order
    Vertices,
    /// Print the dense weight matrix (null = no edge)
    Matrix,
}

/// Exit status for a query the component cannot answer (missing vertex, no path).
const EXIT_QUERY: u8 = 2;

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            exit_code(&err)
        }
    }
}

/// Query errors exit with 2, everything else with 1.
fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<SsspError>() {
        Some(e) if e.is_query_error() => ExitCode::from(EXIT_QUERY),
        _ => ExitCode::FAILURE,
    }
}

fn run(args: Args) -> Result<()> {
    let filter = if args.verbose > 0 {
        EnvFilter::new(util::verbosity_directive(args.verbose))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(
        file,
        Overrides {
            root: args.root,
            engine: args.engine,
            edge_lookup: args.edge_lookup,
            weight_attribute: args.weight_attribute,
            max_vertices: args.max_vertices,
        },
    )?;

    let component = Component::locate(&settings.root, args.graph, args.component)
        .with_context(|| {
            format!(
                "opening graph {} component {} under {}",
                args.graph,
                args.component,
                settings.root.display()
            )
        })?;
    info!(dir = %component.dir().display(), "component opened");

    let output = match args.command {
        Command::Path { source, target } => {
            let result = component_sssp(&component, source, target, &settings.options)?;
            serde_json::to_value(result)?
        }
        Command::Vertices => {
            let index = load_vertex_index(&component)?;
            json!({ "count": index.len(), "vertices": index.ids() })
        }
        Command::Matrix => {
            let index = load_vertex_index(&component)?;
            let matrix = load_weight_matrix(&component, &index, &settings.options)?;
            let rows: Vec<Vec<Option<u64>>> = (0..matrix.size())
                .map(|i| (0..matrix.size()).map(|j| matrix.get(i, j)).collect())
                .collect();
            json!({ "vertices": index.ids(), "weights": rows })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
