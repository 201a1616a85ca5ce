//! Archive assembly.
//!
//! Thin wrapper around the tar encoder: packs a finished staging tree into a
//! single uncompressed archive stream.

use std::io::Write;
use std::path::Path;

use layerpack_core::{PackError, Result};

/// Pack the contents of `dir` into `out` as an uncompressed tar stream.
///
/// Entries are stored relative to the directory root, matching the staging
/// layout consumed by importers.
pub fn pack_directory<W: Write>(dir: &Path, mut out: W) -> Result<()> {
    let mut builder = tar::Builder::new(&mut out);
    builder
        .append_dir_all(".", dir)
        .map_err(|e| PackError::ArchiveError(format!("failed to archive staging tree: {e}")))?;
    builder
        .finish()
        .map_err(|e| PackError::ArchiveError(format!("failed to finalize archive: {e}")))?;
    drop(builder);
    out.flush()
        .map_err(|e| PackError::ArchiveError(format!("failed to flush archive stream: {e}")))?;
    Ok(())
}
