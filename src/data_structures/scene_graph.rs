//! Scene graph built from a merged room structure.
//!
//! [`RoomScene`] is the CPU side: one [`SurfaceNode`] per surface with its box
//! geometry, material style and transform. It knows nothing about the GPU and is
//! what tests and the session work with. [`SceneBlocks`] is the GPU side: the
//! same nodes grouped per category into instanced [`BuildingBlocks`].

use cgmath::{Vector3, Vector4};
use wgpu::{BindGroupLayout, Device, Queue};

use crate::{
    data_structures::{
        block::BuildingBlocks,
        capture::{CapturedStructure, Surface, SurfaceKind},
        style::SurfaceStyle,
    },
    render::Render,
    resources::Assets,
};

/// Box extents: `width` along x, `height` along y, `length` along z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxGeometry {
    pub width: f32,
    pub height: f32,
    pub length: f32,
}

/// A renderable box standing in for one surface.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceNode {
    /// The surface identifier. Assigned once and never overwritten.
    pub name: String,
    /// Human readable category label, kept next to the name.
    pub label: String,
    pub kind: SurfaceKind,
    pub geometry: BoxGeometry,
    pub transform: cgmath::Matrix4<f32>,
    pub style: SurfaceStyle,
}

impl SurfaceNode {
    /// Box for `surface`. Dimensions and transform are taken as they are, so
    /// zero or negative sizes and broken transforms produce degenerate boxes.
    pub fn from_surface(surface: &Surface) -> Self {
        let kind = surface.kind();
        let style = kind.style();
        Self {
            name: surface.identifier_string(),
            label: format!("Space {kind}"),
            kind,
            geometry: BoxGeometry {
                width: surface.dimensions[0],
                height: surface.dimensions[1],
                length: style.thickness,
            },
            transform: surface.matrix(),
            style,
        }
    }

    /// The transform as 16 floats, column by column.
    pub fn transform_columns(&self) -> [f32; 16] {
        let cols: [[f32; 4]; 4] = self.transform.into();
        let mut flat = [0.0; 16];
        for (i, col) in cols.iter().enumerate() {
            flat[i * 4..i * 4 + 4].copy_from_slice(col);
        }
        flat
    }

    fn corners(&self) -> impl Iterator<Item = Vector3<f32>> + '_ {
        let (w, h, l) = (
            self.geometry.width * 0.5,
            self.geometry.height * 0.5,
            self.geometry.length * 0.5,
        );
        [-1.0f32, 1.0].into_iter().flat_map(move |x| {
            [-1.0f32, 1.0].into_iter().flat_map(move |y| {
                [-1.0f32, 1.0].into_iter().map(move |z| {
                    (self.transform * Vector4::new(x * w, y * h, z * l, 1.0)).truncate()
                })
            })
        })
    }
}

/// Root of the scene: every surface of the structure as a child, in the order
/// floors, walls, doors, openings, windows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomScene {
    pub children: Vec<SurfaceNode>,
}

impl RoomScene {
    pub fn from_structure(structure: CapturedStructure) -> Self {
        let children = SurfaceKind::ALL
            .iter()
            .flat_map(|kind| structure.surfaces(*kind))
            .map(SurfaceNode::from_surface)
            .collect::<Vec<_>>();
        log::info!("built scene with {} nodes", children.len());
        Self { children }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn nodes(&self, kind: SurfaceKind) -> impl Iterator<Item = &SurfaceNode> {
        self.children.iter().filter(move |node| node.kind == kind)
    }

    pub fn find(&self, name: &str) -> Option<&SurfaceNode> {
        self.children.iter().find(|node| node.name == name)
    }

    /// Axis aligned box around all transformed boxes, `None` for an empty scene.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut corners = self.children.iter().flat_map(|node| node.corners()).peekable();
        corners.peek()?;
        let mut bounds = Bounds::default();
        corners.for_each(|corner| bounds.merge(&corner));
        Some(bounds)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Vector3::new(f32::MAX, f32::MAX, f32::MAX),
            max: Vector3::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }
}

impl Bounds {
    #[inline]
    pub fn merge(&mut self, point: &Vector3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Radius of the sphere through the corners.
    pub fn radius(&self) -> f32 {
        use cgmath::InnerSpace;
        (self.max - self.min).magnitude() * 0.5
    }
}

/// GPU copy of a [`RoomScene`]: one instanced batch per category present.
pub struct SceneBlocks {
    pub children: Vec<BuildingBlocks>,
}

impl SceneBlocks {
    pub fn upload(
        scene: &RoomScene,
        device: &Device,
        queue: &Queue,
        material_layout: &BindGroupLayout,
        assets: &Assets,
    ) -> Self {
        let children = SurfaceKind::ALL
            .iter()
            .filter_map(|kind| {
                let nodes = scene.nodes(*kind).collect::<Vec<_>>();
                if nodes.is_empty() {
                    return None;
                }
                Some(BuildingBlocks::new(
                    *kind,
                    &nodes,
                    device,
                    queue,
                    material_layout,
                    assets,
                ))
            })
            .collect();
        Self { children }
    }

    pub fn get_render(&self) -> Render<'_> {
        Render::Composed(self.children.iter().map(BuildingBlocks::get_render).collect())
    }
}
