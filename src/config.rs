//! Viewer configuration and the command line that fills it.

use std::path::PathBuf;

use clap::Parser;

use crate::resources::{Assets, CAPTURED_ROOM};

/// Show RoomPlan captures as a 3D model.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "room-ngin", version, about)]
pub struct Args {
    /// Directory with the bundled capture and the surface textures
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Keep the camera fixed
    #[arg(long)]
    pub no_camera_control: bool,

    /// Render surfaces unshaded instead of with headlight and ambient light
    #[arg(long)]
    pub no_default_lighting: bool,

    /// Captured rooms to merge; the bundled capture when none are given
    #[arg(value_name = "CAPTURE.json")]
    pub captures: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub assets: Assets,
    pub captures: Vec<PathBuf>,
    pub clear_colour: wgpu::Color,
    pub camera_control: bool,
    pub default_lighting: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let assets = Assets::bundled();
        Self {
            captures: vec![assets.path(CAPTURED_ROOM)],
            assets,
            clear_colour: wgpu::Color::BLACK,
            camera_control: true,
            default_lighting: true,
        }
    }
}

impl From<Args> for ViewerConfig {
    fn from(args: Args) -> Self {
        let assets = args.assets.map(Assets::new).unwrap_or_else(Assets::bundled);
        let captures = if args.captures.is_empty() {
            vec![assets.path(CAPTURED_ROOM)]
        } else {
            args.captures
        };
        Self {
            assets,
            captures,
            clear_colour: wgpu::Color::BLACK,
            camera_control: !args.no_camera_control,
            default_lighting: !args.no_default_lighting,
        }
    }
}
