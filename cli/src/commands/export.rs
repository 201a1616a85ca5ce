//! `layerpack export` command — export images to a tar archive.
//!
//! Serializes the requested images, every ancestor, and the repository tags
//! pointing at them into one uncompressed tar archive, suitable for moving
//! to another machine.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use clap::Args;
use layerpack_core::{PackError, Result};
use layerpack_engine::{Exporter, LocalGraph};

#[derive(Args)]
pub struct ExportArgs {
    /// Image references to export (repository, repository:tag, or image ID)
    #[arg(required = true)]
    pub references: Vec<String>,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<String>,
}

pub fn execute(graph: &LocalGraph, args: ExportArgs) -> Result<()> {
    let exporter = Exporter::new(graph, graph);

    match args.output {
        Some(path) => {
            let file = File::create(&path).map_err(|e| {
                PackError::ArchiveError(format!("failed to create {path}: {e}"))
            })?;
            let mut writer = BufWriter::new(file);
            exporter.export(&args.references, &mut writer)?;
            writer
                .flush()
                .map_err(|e| PackError::ArchiveError(format!("failed to flush {path}: {e}")))?;

            let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            println!(
                "Exported {} reference(s) to {} ({})",
                args.references.len(),
                path,
                crate::output::format_bytes(size)
            );
            Ok(())
        }
        None => {
            let stdout = io::stdout();
            exporter.export(&args.references, stdout.lock())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn seeded_graph(tmp: &TempDir) -> LocalGraph {
        let graph = LocalGraph::open(tmp.path().join("graph")).unwrap();
        graph.add_image("B", br#"{"id":"B"}"#, None, b"diff-B").unwrap();
        graph
            .add_image("A", br#"{"id":"A"}"#, Some("B"), b"diff-A")
            .unwrap();
        graph.set_tag("busybox", "latest", "A").unwrap();
        graph
    }

    #[test]
    fn test_export_to_file() {
        let tmp = TempDir::new().unwrap();
        let graph = seeded_graph(&tmp);
        let output = tmp.path().join("out.tar");

        execute(
            &graph,
            ExportArgs {
                references: vec!["busybox".to_string()],
                output: Some(output.to_str().unwrap().to_string()),
            },
        )
        .unwrap();

        let extract = TempDir::new().unwrap();
        let file = fs::File::open(&output).unwrap();
        tar::Archive::new(file).unpack(extract.path()).unwrap();

        assert!(extract.path().join("A").join("layer.tar").exists());
        assert!(extract.path().join("B").join("layer.tar").exists());
        assert!(extract.path().join("repositories").exists());
    }

    #[test]
    fn test_export_unknown_reference_fails() {
        let tmp = TempDir::new().unwrap();
        let graph = seeded_graph(&tmp);
        let output = tmp.path().join("out.tar");

        let result = execute(
            &graph,
            ExportArgs {
                references: vec!["ghost".to_string()],
                output: Some(output.to_str().unwrap().to_string()),
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_export_invalid_output_path_fails() {
        let tmp = TempDir::new().unwrap();
        let graph = seeded_graph(&tmp);

        let result = execute(
            &graph,
            ExportArgs {
                references: vec!["busybox".to_string()],
                output: Some(
                    tmp.path()
                        .join("missing-dir")
                        .join("out.tar")
                        .to_str()
                        .unwrap()
                        .to_string(),
                ),
            },
        );
        assert!(matches!(result.unwrap_err(), PackError::ArchiveError(_)));
    }
}
