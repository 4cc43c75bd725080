//! room-ngin
//!
//! Viewer for RoomPlan captures. A captured room is a JSON document listing the
//! walls, floors, doors, windows and openings a scan found, each with its size
//! and placement. This crate loads such documents, merges several of them into
//! one structure and renders every surface as a thin, instanced box with an
//! orbit camera and a headlight.
//!
//! High-level modules
//! - `data_structures`: capture documents, surface styles, the scene graph and GPU data
//! - `resources`: loading captures, textures and meshes
//! - `merge`: combining captured rooms into one structure
//! - `session`: the load → merge → build pipeline and its cancellation
//! - `camera`: orbit camera, controller and uniforms for view/projection
//! - `pipelines`: opaque, double-sided and transparent render pipelines and the light
//! - `render`: sorting scene objects into pipeline batches and recording a frame
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `flow`: the window event loop
//! - `config`: viewer settings and the command line
//! - `offscreen`: headless rendering for image tests (`integration-tests` feature)
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod merge;
#[cfg(feature = "integration-tests")]
pub mod offscreen;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod session;

pub use config::ViewerConfig;
pub use data_structures::capture::{CapturedRoom, CapturedStructure, Surface, SurfaceKind};
pub use data_structures::scene_graph::{RoomScene, SurfaceNode};
pub use merge::{MergeError, StructureBuilder, StructureMerger};
pub use resources::{Assets, LoadError};
pub use session::{Session, SessionError};
