//! Shared types for the layerpack image export engine.

pub mod error;
pub mod repo;

pub use error::{PackError, Result};
pub use repo::{Repository, RepositoryMap, LAYER_FORMAT_VERSION};
