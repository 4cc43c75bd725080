#![allow(dead_code)]

use std::{
    future::Future,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use room_ngin::{
    data_structures::{
        capture::{Category, CapturedRoom, CapturedStructure, Surface},
        scene_graph::RoomScene,
    },
    merge::{MergeError, StructureMerger},
    resources::{Assets, load_captured_room},
    session::SceneTarget,
};

pub const BUNDLED_WALLS: usize = 4;
pub const BUNDLED_SURFACES: usize = 8;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn bundled_capture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join("capturedRoom.json")
}

pub fn bundled_assets() -> Assets {
    Assets::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"))
}

pub fn bundled_room() -> CapturedRoom {
    load_captured_room(&bundled_capture()).expect("bundled capture must load")
}

pub fn adjacent_room() -> CapturedRoom {
    load_captured_room(&fixture("adjacentRoom.json")).expect("fixture must load")
}

/// Column-major translation matrix.
pub fn translation(x: f32, y: f32, z: f32) -> [f32; 16] {
    [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        x, y, z, 1.0,
    ]
}

pub fn wall(width: f32, height: f32, transform: [f32; 16]) -> Surface {
    Surface::new(Category::Wall {}, [width, height, 0.0], transform)
}

pub fn room(version: Option<u32>, walls: Vec<Surface>) -> CapturedRoom {
    CapturedRoom {
        identifier: None,
        version,
        walls,
        doors: Vec::new(),
        windows: Vec::new(),
        openings: Vec::new(),
        floors: None,
        extra: Default::default(),
    }
}

/// Records every scene it is given.
#[derive(Default)]
pub struct RecordingTarget {
    pub scenes: Vec<RoomScene>,
}

impl SceneTarget for RecordingTarget {
    fn assign_scene(&mut self, scene: RoomScene) {
        self.scenes.push(scene);
    }
}

/// Always fails with the given error.
pub struct FailingMerger(pub MergeError);

impl StructureMerger for FailingMerger {
    fn captured_structure(
        &self,
        _rooms: &[CapturedRoom],
    ) -> impl Future<Output = Result<CapturedStructure, MergeError>> + Send {
        let error = self.0.clone();
        async move { Err(error) }
    }
}

/// Never finishes. Counts how often it was started.
#[derive(Default, Clone)]
pub struct PendingMerger {
    pub started: Arc<AtomicUsize>,
}

impl StructureMerger for PendingMerger {
    fn captured_structure(
        &self,
        _rooms: &[CapturedRoom],
    ) -> impl Future<Output = Result<CapturedStructure, MergeError>> + Send {
        self.started.fetch_add(1, Ordering::SeqCst);
        futures::future::pending()
    }
}
