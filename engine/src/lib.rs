//! Layered image export engine.
//!
//! Turns a set of image references into a single portable uncompressed tar
//! archive that preserves image ancestry and repository tag mappings, so
//! images can move between machines without a shared registry.
//!
//! # Archive layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Export archive                          │
//! │                                                             │
//! │  repositories          (repo name -> {tag -> image ID},     │
//! │                         present only when non-empty)        │
//! │  <image ID>/                                                │
//! │  ├── VERSION           (layer format marker, "1.0")         │
//! │  ├── json              (raw metadata descriptor)            │
//! │  └── layer.tar         (raw filesystem diff)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every parent of an exported image, up to a root, is included in the
//! archive; an image shared between requested references is serialized
//! exactly once per export call.

pub mod ancestry;
pub mod archive;
pub mod export;
pub mod graph;
pub mod provider;
pub mod resolve;
pub mod staging;

pub use ancestry::AncestryChain;
pub use export::Exporter;
pub use graph::LocalGraph;
pub use provider::{ImageProvider, TagStore};
pub use resolve::resolve_reference;
pub use staging::StagingTree;

/// Layerpack engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
