use std::path::PathBuf;

use clap::Parser;
use room_ngin::{
    config::{Args, ViewerConfig},
    resources::{Assets, CAPTURED_ROOM},
};

#[test]
fn should_default_to_bundled_capture() {
    let args = Args::try_parse_from(["room-ngin", "--assets", "demo"]).unwrap();
    let config = ViewerConfig::from(args);

    assert_eq!(config.assets, Assets::new("demo"));
    assert_eq!(config.captures, vec![PathBuf::from("demo").join(CAPTURED_ROOM)]);
    assert!(config.camera_control);
    assert!(config.default_lighting);
    assert_eq!(config.clear_colour, wgpu::Color::BLACK);
}

#[test]
fn should_take_captures_and_switches_from_command_line() {
    let args = Args::try_parse_from([
        "room-ngin",
        "--no-camera-control",
        "--no-default-lighting",
        "first.json",
        "second.json",
    ])
    .unwrap();
    let config = ViewerConfig::from(args);

    assert_eq!(
        config.captures,
        vec![PathBuf::from("first.json"), PathBuf::from("second.json")]
    );
    assert!(!config.camera_control);
    assert!(!config.default_lighting);
}

#[test]
fn should_reject_unknown_flags() {
    assert!(Args::try_parse_from(["room-ngin", "--wireframe"]).is_err());
}
