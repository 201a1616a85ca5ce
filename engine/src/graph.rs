//! On-disk image graph.
//!
//! A persistent layout backing both collaborator traits, used by the CLI and
//! by anything that wants a self-contained graph on local disk:
//!
//! ```text
//! <root>/
//! ├── repositories.json       (repository name -> {tag -> image ID})
//! └── images/
//!     └── <image ID>/
//!         ├── json            (metadata descriptor)
//!         ├── layer.tar       (filesystem diff)
//!         └── parent          (parent image ID; absent for a root image)
//! ```
//!
//! The export engine only reads from the graph; [`LocalGraph::add_image`] and
//! [`LocalGraph::set_tag`] exist so importers and tests can populate it.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use layerpack_core::{PackError, Repository, RepositoryMap, Result};

use crate::provider::{ImageProvider, TagStore};

/// Tag assumed when a reference carries none.
const DEFAULT_TAG: &str = "latest";

/// Repository catalog file at the graph root.
const REPOSITORIES_INDEX: &str = "repositories.json";

/// Image graph rooted at a local directory.
pub struct LocalGraph {
    root: PathBuf,
}

impl LocalGraph {
    /// Open a graph, creating the directory layout on first use.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("images")).map_err(|e| {
            PackError::StoreError(format!(
                "failed to create graph directory {}: {e}",
                root.display()
            ))
        })?;
        Ok(Self { root })
    }

    /// Root directory of the graph.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Record an image with its descriptor, diff, and optional parent.
    pub fn add_image(
        &self,
        id: &str,
        descriptor: &[u8],
        parent: Option<&str>,
        diff: &[u8],
    ) -> Result<()> {
        let dir = self.image_dir(id);
        fs::create_dir_all(&dir).map_err(|e| {
            PackError::StoreError(format!("failed to create image directory for {id}: {e}"))
        })?;
        fs::write(dir.join("json"), descriptor)
            .map_err(|e| PackError::StoreError(format!("failed to write descriptor for {id}: {e}")))?;
        fs::write(dir.join("layer.tar"), diff)
            .map_err(|e| PackError::StoreError(format!("failed to write layer for {id}: {e}")))?;
        if let Some(parent) = parent {
            fs::write(dir.join("parent"), parent).map_err(|e| {
                PackError::StoreError(format!("failed to write parent for {id}: {e}"))
            })?;
        }
        tracing::debug!(image = id, parent, "added image to graph");
        Ok(())
    }

    /// Point `repository:tag` at an image ID, creating the repository on
    /// first reference.
    pub fn set_tag(&self, repository: &str, tag: &str, id: &str) -> Result<()> {
        let mut catalog = self.load_repositories()?;
        catalog
            .entry(repository.to_string())
            .or_default()
            .insert(tag.to_string(), id.to_string());
        self.store_repositories(&catalog)
    }

    fn image_dir(&self, id: &str) -> PathBuf {
        self.root.join("images").join(id)
    }

    fn load_repositories(&self) -> Result<RepositoryMap> {
        let path = self.root.join(REPOSITORIES_INDEX);
        if !path.exists() {
            return Ok(RepositoryMap::new());
        }
        let data = fs::read(&path).map_err(|e| {
            PackError::StoreError(format!("failed to read repository catalog: {e}"))
        })?;
        serde_json::from_slice(&data)
            .map_err(|e| PackError::StoreError(format!("corrupt repository catalog: {e}")))
    }

    fn store_repositories(&self, catalog: &RepositoryMap) -> Result<()> {
        let data = serde_json::to_vec_pretty(catalog)?;
        fs::write(self.root.join(REPOSITORIES_INDEX), data).map_err(|e| {
            PackError::StoreError(format!("failed to write repository catalog: {e}"))
        })
    }

    fn read_image_file(&self, id: &str, name: &str) -> Result<Vec<u8>> {
        match fs::read(self.image_dir(id).join(name)) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PackError::ImageNotFound(id.to_string()))
            }
            Err(e) => Err(PackError::StoreError(format!(
                "failed to read {name} for {id}: {e}"
            ))),
        }
    }
}

impl ImageProvider for LocalGraph {
    fn metadata_descriptor(&self, id: &str) -> Result<Vec<u8>> {
        self.read_image_file(id, "json")
    }

    fn filesystem_diff(&self, id: &str) -> Result<Box<dyn Read + '_>> {
        match File::open(self.image_dir(id).join("layer.tar")) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PackError::ImageNotFound(id.to_string()))
            }
            Err(e) => Err(PackError::StoreError(format!(
                "failed to open layer for {id}: {e}"
            ))),
        }
    }

    fn parent(&self, id: &str) -> Result<Option<String>> {
        if !self.image_dir(id).is_dir() {
            return Err(PackError::ImageNotFound(id.to_string()));
        }
        match fs::read_to_string(self.image_dir(id).join("parent")) {
            Ok(parent) => {
                let parent = parent.trim().to_string();
                Ok((!parent.is_empty()).then_some(parent))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PackError::StoreError(format!(
                "failed to read parent of {id}: {e}"
            ))),
        }
    }
}

impl TagStore for LocalGraph {
    fn repository(&self, name: &str) -> Result<Option<Repository>> {
        let mut catalog = self.load_repositories()?;
        Ok(catalog.remove(name))
    }

    fn lookup(&self, reference: &str) -> Result<Option<String>> {
        let (name, tag) = split_reference(reference);
        let catalog = self.load_repositories()?;
        Ok(catalog
            .get(name)
            .and_then(|tags| tags.get(tag))
            .cloned())
    }

    fn repositories(&self) -> Result<RepositoryMap> {
        self.load_repositories()
    }
}

/// Split a reference into name and tag, defaulting the tag.
///
/// The tag separator is the last colon after the last slash, so registry
/// ports (`registry:5000/app`) are not mistaken for tags.
fn split_reference(reference: &str) -> (&str, &str) {
    let tag_start = reference.rfind('/').map_or(0, |slash| slash + 1);
    match reference[tag_start..].rfind(':') {
        Some(colon) => {
            let colon = tag_start + colon;
            (&reference[..colon], &reference[colon + 1..])
        }
        None => (reference, DEFAULT_TAG),
    }
}
