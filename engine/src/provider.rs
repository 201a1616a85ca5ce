//! Collaborator contracts consumed by the export engine.
//!
//! The engine owns no image metadata and no layer content. Everything it
//! needs is answered by these two read-only traits; [`crate::graph::LocalGraph`]
//! implements both over an on-disk layout, and embedders can supply their own
//! backing store.

use std::io::Read;

use layerpack_core::{Repository, RepositoryMap, Result};

/// Read-only access to image metadata and layer content.
///
/// All operations are blocking; the engine calls them sequentially.
pub trait ImageProvider {
    /// Raw JSON metadata descriptor for an image.
    ///
    /// Fails with [`PackError::ImageNotFound`](layerpack_core::PackError::ImageNotFound)
    /// if the ID is unknown.
    fn metadata_descriptor(&self, id: &str) -> Result<Vec<u8>>;

    /// Filesystem diff for an image as an opaque byte stream.
    fn filesystem_diff(&self, id: &str) -> Result<Box<dyn Read + '_>>;

    /// Parent image ID, or `None` for a root image.
    fn parent(&self, id: &str) -> Result<Option<String>>;
}

/// Read-only view of the repository and tag catalog.
pub trait TagStore {
    /// All tag mappings for a repository name, or `None` if the name does not
    /// name a repository.
    fn repository(&self, name: &str) -> Result<Option<Repository>>;

    /// Resolve a tag or alias reference to an image ID, `None` if unknown.
    fn lookup(&self, reference: &str) -> Result<Option<String>>;

    /// Snapshot of every known repository and its tags.
    ///
    /// One snapshot is sufficient for a whole export call; the engine never
    /// mutates the catalog.
    fn repositories(&self) -> Result<RepositoryMap>;

    /// Every (repository, tag) pair currently pointing at the given image.
    ///
    /// The default implementation scans the full [`TagStore::repositories`]
    /// snapshot; stores with a reverse index can override it.
    fn repositories_referencing(&self, id: &str) -> Result<Vec<(String, String)>> {
        let mut references = Vec::new();
        for (repo_name, tags) in self.repositories()? {
            for (tag, tagged_id) in tags {
                if tagged_id == id {
                    references.push((repo_name.clone(), tag));
                }
            }
        }
        Ok(references)
    }
}
