//! Merging captured rooms into one structure.
//!
//! [`StructureMerger`] is the seam the session awaits; [`StructureBuilder`] is
//! the implementation the viewer uses. It unions the surfaces of all rooms per
//! category, keeping the first surface seen for every identifier, so the same
//! capture merged with itself comes out unchanged.

use std::{collections::HashMap, future::Future};

use thiserror::Error;
use uuid::Uuid;

use crate::data_structures::capture::{CapturedRoom, CapturedStructure, SurfaceKind};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("there are no captured rooms to merge")]
    NoRooms,

    #[error("captured rooms were written by different versions ({0} and {1})")]
    IncompatibleVersions(u32, u32),

    #[error("surface {id} is a {first} in one room and a {second} in another")]
    ConflictingSurface {
        id: Uuid,
        first: SurfaceKind,
        second: SurfaceKind,
    },
}

/// Produces a [`CapturedStructure`] from an ordered list of rooms.
pub trait StructureMerger {
    fn captured_structure(
        &self,
        rooms: &[CapturedRoom],
    ) -> impl Future<Output = Result<CapturedStructure, MergeError>> + Send;
}

#[derive(Clone, Debug, Default)]
pub struct StructureBuilder;

impl StructureBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(&self, rooms: &[CapturedRoom]) -> Result<CapturedStructure, MergeError> {
        if rooms.is_empty() {
            return Err(MergeError::NoRooms);
        }
        // documents without a version are accepted next to any version
        let mut versions = rooms.iter().filter_map(|room| room.version);
        if let Some(expected) = versions.next() {
            if let Some(other) = versions.find(|version| *version != expected) {
                return Err(MergeError::IncompatibleVersions(expected, other));
            }
        }

        let mut seen: HashMap<Uuid, SurfaceKind> = HashMap::new();
        let mut structure = CapturedStructure::default();
        for room in rooms {
            let collections = [
                (SurfaceKind::Floor, room.floors()),
                (SurfaceKind::Wall, room.walls.as_slice()),
                (SurfaceKind::Door, room.doors.as_slice()),
                (SurfaceKind::Opening, room.openings.as_slice()),
                (SurfaceKind::Window, room.windows.as_slice()),
            ];
            for (kind, surfaces) in collections {
                for surface in surfaces {
                    match seen.get(&surface.identifier) {
                        Some(first) if *first != kind => {
                            return Err(MergeError::ConflictingSurface {
                                id: surface.identifier,
                                first: *first,
                                second: kind,
                            });
                        }
                        Some(_) => {
                            log::debug!("skipping duplicate {kind} {}", surface.identifier);
                        }
                        None => {
                            seen.insert(surface.identifier, kind);
                            structure.surfaces_mut(kind).push(surface.clone());
                        }
                    }
                }
            }
        }
        log::info!(
            "merged {} rooms into {} surfaces",
            rooms.len(),
            structure.surface_count()
        );
        Ok(structure)
    }
}

impl StructureMerger for StructureBuilder {
    fn captured_structure(
        &self,
        rooms: &[CapturedRoom],
    ) -> impl Future<Output = Result<CapturedStructure, MergeError>> + Send {
        async move { self.merge(rooms) }
    }
}
