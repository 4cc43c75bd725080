use std::path::{Path, PathBuf};

use anyhow::Context;
use thiserror::Error;

use crate::data_structures::{
    capture::{CapturedRoom, SurfaceKind},
    model::{Material, MaterialUniform},
    style::{Diffuse, SurfaceStyle},
    texture::Texture,
};

/**
 * This module contains all logic for loading captures, textures and meshes from external files.
 */
pub mod mesh;
pub mod texture;

/// File name of the capture shipped in the asset directory.
pub const CAPTURED_ROOM: &str = "capturedRoom.json";

/// Reasons a captured room could not be loaded.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("capture not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("capture {} could not be read: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("capture {} is not a valid room document: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read `path` and decode it into a [`CapturedRoom`].
pub fn load_captured_room(path: &Path) -> Result<CapturedRoom, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let room = CapturedRoom::from_slice(&bytes).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "loaded {} surfaces from {}",
        room.surface_count(),
        path.display()
    );
    Ok(room)
}

/// Directory resources are looked up in by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assets {
    root: PathBuf,
}

impl Assets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `./assets` when run from a checkout, otherwise the copy the build script
    /// placed next to the build output.
    pub fn bundled() -> Self {
        let local = Path::new("./").join("assets");
        if local.is_dir() {
            Self::new(local)
        } else {
            Self::new(env!("ROOM_NGIN_ASSETS"))
        }
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    pub fn load_binary(&self, file_name: &str) -> anyhow::Result<Vec<u8>> {
        let path = self.path(file_name);
        std::fs::read(&path).with_context(|| format!("could not read {}", path.display()))
    }
}

/// Material for one surface category. A texture that can't be loaded leaves the
/// material untextured (plain white) instead of failing the whole scene.
pub fn load_material(
    kind: SurfaceKind,
    style: &SurfaceStyle,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    assets: &Assets,
) -> Material {
    let label = format!("{kind} material");
    let diffuse_texture = match style.diffuse {
        Diffuse::Texture(file_name) => {
            match texture::load_texture(file_name, device, queue, assets) {
                Ok(texture) => texture,
                Err(e) => {
                    log::warn!("{kind} surfaces stay untextured: {e:#}");
                    Texture::create_solid([255; 4], &label, device, queue)
                }
            }
        }
        Diffuse::Color(_) => Texture::create_solid([255; 4], &label, device, queue),
    };
    let uniform = MaterialUniform::from(style);
    let uniform_buffer = texture::material_buffer(device, &label, uniform);
    Material::new(device, &label, diffuse_texture, uniform_buffer, layout)
}
