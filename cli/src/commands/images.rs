//! `layerpack images` command.

use clap::Args;
use layerpack_core::Result;
use layerpack_engine::{LocalGraph, TagStore};

use crate::output;

#[derive(Args)]
pub struct ImagesArgs {
    /// Only show image IDs (one per line)
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn execute(graph: &LocalGraph, args: ImagesArgs) -> Result<()> {
    let repositories = graph.repositories()?;

    // --quiet: print only distinct image IDs
    if args.quiet {
        let mut ids: Vec<&String> = repositories
            .values()
            .flat_map(|tags| tags.values())
            .collect();
        ids.sort();
        ids.dedup();
        for id in ids {
            println!("{id}");
        }
        return Ok(());
    }

    // Default: table output
    let mut table = output::new_table(&["REPOSITORY", "TAG", "IMAGE ID"]);
    for (repository, tags) in &repositories {
        for (tag, id) in tags {
            table.add_row(vec![
                repository.clone(),
                tag.clone(),
                output::short_id(id),
            ]);
        }
    }

    println!("{table}");
    Ok(())
}
