use room_ngin::{
    data_structures::capture::{Category, Surface, SurfaceKind},
    merge::{MergeError, StructureBuilder, StructureMerger},
};

use crate::common::test_utils::{
    BUNDLED_SURFACES, BUNDLED_WALLS, adjacent_room, bundled_room, room, translation, wall,
};

mod common;

#[tokio::test]
async fn should_keep_single_room_as_is() {
    let room = bundled_room();
    let structure = StructureBuilder::new()
        .captured_structure(std::slice::from_ref(&room))
        .await
        .unwrap();

    assert_eq!(structure.walls, room.walls);
    assert_eq!(structure.doors, room.doors);
    assert_eq!(structure.windows, room.windows);
    assert_eq!(structure.openings, room.openings);
    assert_eq!(structure.floors, room.floors());
    assert_eq!(structure.surface_count(), BUNDLED_SURFACES);
}

#[test]
fn should_merge_room_with_itself_to_same_structure() {
    let room = bundled_room();
    let builder = StructureBuilder::new();

    let once = builder.merge(&[room.clone()]).unwrap();
    let twice = builder.merge(&[room.clone(), room]).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn should_union_rooms_and_drop_shared_surfaces() {
    let first = bundled_room();
    let second = adjacent_room();
    let shared = second.walls[0].identifier;
    assert!(first.walls.iter().any(|w| w.identifier == shared));

    let structure = StructureBuilder::new().merge(&[first.clone(), second.clone()]).unwrap();

    assert_eq!(structure.walls.len(), BUNDLED_WALLS + 1);
    assert_eq!(structure.floors.len(), 2);
    assert_eq!(
        structure
            .walls
            .iter()
            .filter(|w| w.identifier == shared)
            .count(),
        1
    );
    // surfaces of the first room come first and keep their order
    assert_eq!(&structure.walls[..BUNDLED_WALLS], first.walls.as_slice());
    assert_eq!(structure.walls[BUNDLED_WALLS], second.walls[1]);
}

#[test]
fn should_fail_without_rooms() {
    assert_eq!(StructureBuilder::new().merge(&[]), Err(MergeError::NoRooms));
}

#[test]
fn should_fail_on_mixed_versions() {
    let rooms = [
        room(Some(2), vec![wall(1.0, 2.0, translation(0.0, 1.0, 0.0))]),
        room(Some(3), vec![wall(1.0, 2.0, translation(1.0, 1.0, 0.0))]),
    ];

    assert_eq!(
        StructureBuilder::new().merge(&rooms),
        Err(MergeError::IncompatibleVersions(2, 3))
    );
}

#[test]
fn should_ignore_missing_versions() {
    let rooms = [
        room(None, vec![wall(1.0, 2.0, translation(0.0, 1.0, 0.0))]),
        room(Some(2), vec![wall(1.0, 2.0, translation(1.0, 1.0, 0.0))]),
    ];

    let structure = StructureBuilder::new().merge(&rooms).unwrap();
    assert_eq!(structure.walls.len(), 2);
}

#[test]
fn should_fail_on_surface_with_two_categories() {
    let wall = wall(1.0, 2.0, translation(0.0, 1.0, 0.0));
    let mut door = Surface::new(
        Category::Door { is_open: true },
        [0.9, 2.0, 0.0],
        translation(0.0, 1.0, 0.0),
    );
    door.identifier = wall.identifier;

    let first = room(Some(2), vec![wall.clone()]);
    let mut second = room(Some(2), Vec::new());
    second.doors.push(door);

    let err = StructureBuilder::new().merge(&[first, second]).unwrap_err();
    assert_eq!(
        err,
        MergeError::ConflictingSurface {
            id: wall.identifier,
            first: SurfaceKind::Wall,
            second: SurfaceKind::Door,
        }
    );
    assert!(err.to_string().contains("wall"));
}

#[test]
fn should_merge_empty_room_to_empty_structure() {
    let structure = StructureBuilder::new().merge(&[room(Some(2), Vec::new())]).unwrap();
    assert!(structure.is_empty());
}
