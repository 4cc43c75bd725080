//! Fixed per-category look of a surface: extrusion thickness and placeholder material.

use crate::{data_structures::capture::SurfaceKind, render::Pass};

pub const FLOOR_TEXTURE: &str = "floor-texture.png";
pub const DOOR_TEXTURE: &str = "door-texture.png";
pub const WINDOW_TEXTURE: &str = "window-texture.png";

/// Colour channel of a material: either a flat colour or a named image asset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Diffuse {
    Color([f32; 4]),
    Texture(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceStyle {
    /// Box length along the surface normal.
    pub thickness: f32,
    pub diffuse: Diffuse,
    /// Repeat the texture once per metre instead of stretching it over the box.
    pub tiled: bool,
    pub transparent: bool,
    /// Draw back faces too. Transparent styles are always drawn from both sides.
    pub double_sided: bool,
    pub specular: bool,
    pub ambient_occlusion: bool,
}

impl SurfaceStyle {
    const OPAQUE: SurfaceStyle = SurfaceStyle {
        thickness: 0.01,
        diffuse: Diffuse::Color([1.0, 1.0, 1.0, 1.0]),
        tiled: false,
        transparent: false,
        double_sided: false,
        specular: true,
        ambient_occlusion: false,
    };

    pub fn pass(&self) -> Pass {
        if self.transparent {
            Pass::Transparent
        } else if self.double_sided {
            Pass::DoubleSided
        } else {
            Pass::Opaque
        }
    }
}

impl SurfaceKind {
    pub fn style(&self) -> SurfaceStyle {
        match self {
            SurfaceKind::Floor => SurfaceStyle {
                thickness: 0.01,
                diffuse: Diffuse::Texture(FLOOR_TEXTURE),
                tiled: true,
                ..SurfaceStyle::OPAQUE
            },
            SurfaceKind::Wall => SurfaceStyle {
                thickness: 0.01,
                diffuse: Diffuse::Color([0.5, 0.5, 0.5, 1.0]),
                ..SurfaceStyle::OPAQUE
            },
            SurfaceKind::Door => SurfaceStyle {
                thickness: 0.02,
                diffuse: Diffuse::Texture(DOOR_TEXTURE),
                tiled: true,
                ..SurfaceStyle::OPAQUE
            },
            SurfaceKind::Opening => SurfaceStyle {
                thickness: 0.02,
                diffuse: Diffuse::Color([0.0, 0.0, 0.0, 1.0]),
                ..SurfaceStyle::OPAQUE
            },
            SurfaceKind::Window => SurfaceStyle {
                thickness: 0.03,
                diffuse: Diffuse::Texture(WINDOW_TEXTURE),
                tiled: false,
                transparent: true,
                double_sided: true,
                specular: false,
                ambient_occlusion: true,
            },
        }
    }
}
