//! Room and scene data structures.
//!
//! - `capture` holds the captured room document model and the merged structure
//! - `style` is the fixed per-category thickness and material table
//! - `scene_graph` turns a merged structure into box nodes and uploads them
//! - `block` is one category of surfaces drawn as instanced unit boxes
//! - `instance` holds per-instance transformation data
//! - `model` contains mesh and material definitions and draw calls
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod block;
pub mod capture;
pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod style;
pub mod texture;
