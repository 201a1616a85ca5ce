//! Export orchestration.
//!
//! Drives reference resolution, ancestry serialization, and archive assembly
//! for one export call. The orchestrator owns the staging tree and the
//! accumulated repository map for the duration of the call; the tree is
//! removed on every exit path.

use std::io::Write;

use layerpack_core::{PackError, RepositoryMap, Result};

use crate::ancestry::AncestryChain;
use crate::archive;
use crate::provider::{ImageProvider, TagStore};
use crate::resolve::resolve_reference;
use crate::staging::StagingTree;

/// Exporter over a pair of backing stores.
///
/// Both stores are read-only to the exporter; one value can serve any number
/// of sequential export calls.
pub struct Exporter<'a> {
    images: &'a dyn ImageProvider,
    tags: &'a dyn TagStore,
}

impl<'a> Exporter<'a> {
    pub fn new(images: &'a dyn ImageProvider, tags: &'a dyn TagStore) -> Self {
        Self { images, tags }
    }

    /// Export the given references as one uncompressed tar stream into `out`.
    ///
    /// References are processed strictly in order and the first failure
    /// aborts the whole call; no partial archive is written in that case
    /// beyond what already reached `out`.
    pub fn export<W: Write>(&self, references: &[String], out: W) -> Result<()> {
        let mut staging = StagingTree::new()?;
        let mut repositories = RepositoryMap::new();

        for reference in references {
            tracing::debug!(%reference, "serializing reference");
            let ids = resolve_reference(self.tags, reference)?;
            for id in &ids {
                self.export_image(id, &mut staging, &mut repositories)
                    .map_err(|e| match e {
                        // A raw passthrough reference the store does not know
                        // is the user's mistake, not a store failure.
                        PackError::ImageNotFound(ref missing) if missing.as_str() == id.as_str() => {
                            PackError::ReferenceError(format!("no such image: {reference}"))
                        }
                        other => other,
                    })?;
            }
            tracing::debug!(%reference, "end serializing reference");
        }

        if repositories.is_empty() {
            tracing::debug!("no repositories to write");
        } else {
            staging.write_repositories(&repositories)?;
        }

        tracing::debug!(images = staging.len(), "assembling archive");
        archive::pack_directory(staging.path(), out)
        // Dropping the staging tree removes it, here and on every early
        // return above.
    }

    /// Serialize one image and every ancestor not yet present in the tree.
    ///
    /// Stops at the first ancestor already serialized earlier in this call;
    /// that ancestor's own ancestry is complete by induction.
    fn export_image(
        &self,
        start: &str,
        staging: &mut StagingTree,
        repositories: &mut RepositoryMap,
    ) -> Result<()> {
        for id in AncestryChain::new(self.images, start) {
            let id = id?;
            if staging.contains(&id) {
                break;
            }

            let descriptor = self.images.metadata_descriptor(&id)?;
            let diff = self.images.filesystem_diff(&id)?;
            staging.stage_image(&id, &descriptor, diff)?;

            for (repo, tag) in self.tags.repositories_referencing(&id)? {
                repositories.entry(repo).or_default().insert(tag, id.clone());
            }
        }
        Ok(())
    }
}
