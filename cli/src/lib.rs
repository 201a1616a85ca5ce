//! Layerpack CLI — export layered images to portable archives.

pub mod commands;
pub mod output;
