//! Repository and tag mapping types.

use std::collections::BTreeMap;

/// Version marker written into every serialized image directory.
pub const LAYER_FORMAT_VERSION: &str = "1.0";

/// Tag name to image ID mapping within one repository.
///
/// Several tags may point at the same image ID.
pub type Repository = BTreeMap<String, String>;

/// Repository name to tag table mapping.
///
/// This is the shape of the `repositories` descriptor written at the root of
/// an export archive. Ordered maps keep the serialized form deterministic.
pub type RepositoryMap = BTreeMap<String, Repository>;
