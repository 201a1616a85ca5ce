//! Reference resolution.
//!
//! Turns a user-supplied reference string into the concrete image IDs to
//! export.

use layerpack_core::{PackError, Result};

use crate::provider::TagStore;

/// Resolve one reference into the image IDs it names.
///
/// Resolution order:
/// 1. A repository name (`busybox`) selects every image tagged in it.
/// 2. A tagged or aliased reference (`busybox:1.0`) resolves through the tag
///    store to a single ID.
/// 3. Anything else is passed through as a raw image ID; serialization fails
///    later if the backing store has no such image.
///
/// A repository with multiple tags on one image yields that ID once per tag;
/// the export deduplicates during serialization.
pub fn resolve_reference(store: &dyn TagStore, reference: &str) -> Result<Vec<String>> {
    if reference.is_empty() {
        return Err(PackError::ReferenceError("empty reference".to_string()));
    }

    if let Some(repo) = store.repository(reference)? {
        let ids: Vec<String> = repo.into_values().collect();
        tracing::debug!(reference, count = ids.len(), "resolved repository reference");
        return Ok(ids);
    }

    if let Some(id) = store.lookup(reference)? {
        tracing::debug!(reference, image = %id, "resolved tagged reference");
        return Ok(vec![id]);
    }

    // Not a repository and not a known tag: treat as a raw image ID.
    Ok(vec![reference.to_string()])
}
