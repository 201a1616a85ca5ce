//! Ephemeral staging tree for one export call.
//!
//! One subdirectory per exported image, holding the version marker, the raw
//! metadata descriptor, and the layer diff. The tree lives in a uniquely
//! named temporary directory owned by a single export call and is removed
//! when dropped, on success or failure alike.
//!
//! Deduplication is an in-memory set of staged IDs checked by the single
//! sequential writer, so an image shared between requested references is
//! serialized exactly once per call.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use layerpack_core::{PackError, RepositoryMap, Result, LAYER_FORMAT_VERSION};
use tempfile::TempDir;

/// Version marker file inside each image directory.
const VERSION_FILE: &str = "VERSION";
/// Metadata descriptor file inside each image directory.
const DESCRIPTOR_FILE: &str = "json";
/// Filesystem diff file inside each image directory.
const LAYER_FILE: &str = "layer.tar";
/// Aggregate repository descriptor at the tree root.
const REPOSITORIES_FILE: &str = "repositories";

/// Staging area accumulating per-image export artifacts before packaging.
pub struct StagingTree {
    dir: TempDir,
    staged: HashSet<String>,
}

impl StagingTree {
    /// Create a fresh staging tree in a uniquely named temporary directory.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("layerpack-export-")
            .tempdir()
            .map_err(|e| {
                PackError::StagingError(format!("failed to create staging directory: {e}"))
            })?;
        Ok(Self {
            dir,
            staged: HashSet::new(),
        })
    }

    /// Root path of the staging tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Whether an image was already serialized in this export call.
    pub fn contains(&self, id: &str) -> bool {
        self.staged.contains(id)
    }

    /// Number of images serialized so far.
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// Whether no image has been serialized yet.
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Serialize one image into its staging subdirectory.
    ///
    /// Writes the version marker, the descriptor, and the diff, then records
    /// the ID as staged. The caller checks [`StagingTree::contains`] first;
    /// staging the same ID twice in one call is a logic error and is
    /// rejected.
    pub fn stage_image(&mut self, id: &str, descriptor: &[u8], mut diff: impl Read) -> Result<()> {
        // IDs become path components; anything else is a malformed reference
        // that fell through resolution.
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
            return Err(PackError::StagingError(format!(
                "invalid image ID for staging: {id:?}"
            )));
        }
        if !self.staged.insert(id.to_string()) {
            return Err(PackError::StagingError(format!(
                "image {id} staged twice in one export call"
            )));
        }

        let image_dir = self.dir.path().join(id);
        fs::create_dir(&image_dir).map_err(|e| {
            PackError::StagingError(format!("failed to create staging directory for {id}: {e}"))
        })?;

        fs::write(image_dir.join(VERSION_FILE), LAYER_FORMAT_VERSION).map_err(|e| {
            PackError::StagingError(format!("failed to write version marker for {id}: {e}"))
        })?;

        fs::write(image_dir.join(DESCRIPTOR_FILE), descriptor).map_err(|e| {
            PackError::StagingError(format!("failed to write descriptor for {id}: {e}"))
        })?;

        let mut layer = File::create(image_dir.join(LAYER_FILE)).map_err(|e| {
            PackError::StagingError(format!("failed to create layer file for {id}: {e}"))
        })?;
        std::io::copy(&mut diff, &mut layer).map_err(|e| {
            PackError::StagingError(format!("failed to write layer for {id}: {e}"))
        })?;

        tracing::debug!(image = id, "serialized layer");
        Ok(())
    }

    /// Write the aggregate repository descriptor at the tree root.
    pub fn write_repositories(&self, repositories: &RepositoryMap) -> Result<()> {
        let data = serde_json::to_vec_pretty(repositories)?;
        fs::write(self.dir.path().join(REPOSITORIES_FILE), data).map_err(|e| {
            PackError::StagingError(format!("failed to write repositories descriptor: {e}"))
        })
    }
}
