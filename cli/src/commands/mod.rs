//! CLI command definitions and dispatch.

mod export;
mod images;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use layerpack_core::{PackError, Result};
use layerpack_engine::LocalGraph;

/// Layerpack — layered image export tool.
#[derive(Parser)]
#[command(name = "layerpack", version, about)]
pub struct Cli {
    /// Image graph directory (defaults to the per-user data directory)
    #[arg(long, global = true, env = "LAYERPACK_GRAPH_DIR")]
    pub graph_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Export images and their ancestry to a tar archive
    Export(export::ExportArgs),
    /// List repositories and tags in the graph
    Images(images::ImagesArgs),
}

/// Dispatch a parsed CLI invocation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let graph = open_graph(cli.graph_dir)?;
    match cli.command {
        Command::Export(args) => export::execute(&graph, args),
        Command::Images(args) => images::execute(&graph, args),
    }
}

/// Open the image graph, creating the directory layout on first use.
fn open_graph(dir: Option<PathBuf>) -> Result<LocalGraph> {
    let root = match dir {
        Some(dir) => dir,
        None => default_graph_dir()?,
    };
    LocalGraph::open(root)
}

fn default_graph_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join("layerpack").join("graph"))
        .ok_or_else(|| {
            PackError::StoreError(
                "could not determine a data directory; pass --graph-dir".to_string(),
            )
        })
}
