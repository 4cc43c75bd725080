use room_ngin::{
    data_structures::capture::{CapturedRoom, Category, Confidence, SurfaceKind},
    resources::{LoadError, load_captured_room},
};

use crate::common::test_utils::{BUNDLED_SURFACES, BUNDLED_WALLS, bundled_capture, fixture};

mod common;

#[test]
fn should_load_bundled_capture() {
    let room = load_captured_room(&bundled_capture()).unwrap();

    assert_eq!(room.version, Some(2));
    assert_eq!(room.walls.len(), BUNDLED_WALLS);
    assert_eq!(room.doors.len(), 1);
    assert_eq!(room.windows.len(), 1);
    assert_eq!(room.openings.len(), 1);
    assert_eq!(room.floors().len(), 1);
    assert_eq!(room.surface_count(), BUNDLED_SURFACES);

    assert_eq!(room.doors[0].category, Category::Door { is_open: false });
    assert_eq!(room.doors[0].kind(), SurfaceKind::Door);
    assert_eq!(room.walls[0].confidence, Some(Confidence::High {}));
    assert_eq!(
        room.windows[0].parent_identifier,
        Some(room.walls[0].identifier)
    );
}

#[test]
fn should_read_dimensions_and_transform_as_written() {
    let room = load_captured_room(&bundled_capture()).unwrap();
    let north = &room.walls[0];

    assert_eq!(north.dimensions, [4.0, 2.5, 0.0]);
    // column-major: translation sits in the last four floats
    assert_eq!(&north.transform[12..], &[0.0, 1.25, -1.5, 1.0]);
    assert_eq!(
        north.identifier_string(),
        "1A4E6F0C-2B7D-4C8E-9F10-A1B2C3D4E5F1"
    );
}

#[test]
fn should_report_missing_capture() {
    let path = fixture("does-not-exist.json");
    let err = load_captured_room(&path).unwrap_err();

    assert!(matches!(&err, LoadError::NotFound(missing) if *missing == path));
    assert!(err.to_string().contains("does-not-exist.json"));
}

#[test]
fn should_report_unreadable_capture() {
    // a directory exists but can't be read as a file
    let path = fixture("");
    let err = load_captured_room(&path).unwrap_err();

    assert!(matches!(err, LoadError::Read { .. }), "got {err:?}");
}

#[test]
fn should_report_malformed_capture() {
    let err = load_captured_room(&fixture("malformed.json")).unwrap_err();

    match err {
        LoadError::Decode { path, .. } => assert!(path.ends_with("malformed.json")),
        other => panic!("expected a decode error, got {other:?}"),
    }
}

#[test]
fn should_reject_unknown_category() {
    let document = br#"{"walls": [{
        "category": {"staircase": {}},
        "dimensions": [1.0, 1.0, 0.0],
        "transform": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1],
        "identifier": "D5F6A7B8-C9DA-4BEC-9FD0-E1F2A3B4C5D6"
    }]}"#;

    assert!(CapturedRoom::from_slice(document).is_err());
}

#[test]
fn should_load_capture_without_floors() {
    let room = load_captured_room(&fixture("legacyRoom.json")).unwrap();

    assert_eq!(room.version, None);
    assert!(room.floors.is_none());
    assert!(room.floors().is_empty());
    assert_eq!(room.surface_count(), 1);
}

#[test]
fn should_keep_unknown_fields_when_written_back() {
    let room = load_captured_room(&bundled_capture()).unwrap();
    assert!(room.extra.contains_key("story"));
    assert!(room.walls[0].extra.contains_key("polygonCorners"));

    let bytes = room.to_vec().unwrap();
    let reread = CapturedRoom::from_slice(&bytes).unwrap();
    assert_eq!(reread, room);

    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("\"1A4E6F0C-2B7D-4C8E-9F10-A1B2C3D4E5F1\""));
    assert!(text.contains("\"isOpen\":false"));
}
