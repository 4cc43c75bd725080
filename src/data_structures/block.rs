use wgpu::{BindGroupLayout, Device, Queue, util::DeviceExt};

use crate::{
    data_structures::{
        capture::SurfaceKind,
        instance::Instance,
        model::{self, ModelVertex},
        scene_graph::SurfaceNode,
        style::SurfaceStyle,
    },
    render::{Instanced, Pass, Render},
    resources::{Assets, load_material, mesh::load_mesh},
};

/**
 * `BuildingBlocks` are all surfaces of one category drawn as instances of a
 * single unit box. The box spans -0.5..0.5 on every axis so an instance scale
 * of (width, height, thickness) gives the final size around the surface origin.
 */
pub struct BuildingBlocks {
    pub kind: SurfaceKind,
    pub style: SurfaceStyle,
    pub obj_model: model::Model,
    pub instances: Vec<Instance>,
    pub instance_buffer: wgpu::Buffer,
}

impl BuildingBlocks {
    pub fn new(
        kind: SurfaceKind,
        nodes: &[&SurfaceNode],
        device: &Device,
        queue: &Queue,
        material_layout: &BindGroupLayout,
        assets: &Assets,
    ) -> Self {
        let style = kind.style();
        let (vertices, indices) = unit_box();
        let mesh = load_mesh(&format!("{kind} box"), &vertices, &indices, device);
        let material = load_material(kind, &style, device, queue, material_layout, assets);
        let obj_model = model::Model {
            meshes: vec![mesh],
            materials: vec![material],
        };

        let instances = nodes
            .iter()
            .map(|node| Instance::from(*node))
            .collect::<Vec<_>>();

        let instance_data = instances.iter().map(Instance::to_raw).collect::<Vec<_>>();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{kind} Instance Buffer")),
            contents: bytemuck::cast_slice(&instance_data),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        log::debug!("uploaded {} {kind} instances", instances.len());

        Self {
            kind,
            style,
            obj_model,
            instances,
            instance_buffer,
        }
    }

    pub fn get_render(&self) -> Render<'_> {
        let instanced = Instanced {
            instance: &self.instance_buffer,
            model: &self.obj_model,
            amount: self.instances.len(),
        };
        match self.style.pass() {
            Pass::Opaque => Render::Default(instanced),
            Pass::DoubleSided => Render::DoubleSided(instanced),
            Pass::Transparent => Render::Transparent(instanced),
        }
    }
}

/// A box of side length one centred on the origin: four vertices per face so
/// every face gets its own normal and texture coordinates.
pub fn unit_box() -> (Vec<ModelVertex>, Vec<u32>) {
    // (normal, u axis, v axis) with u x v == normal, so faces wind counter-clockwise
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    const CORNERS: [(f32, f32, [f32; 2]); 4] = [
        (-0.5, -0.5, [0.0, 1.0]),
        (0.5, -0.5, [1.0, 1.0]),
        (0.5, 0.5, [1.0, 0.0]),
        (-0.5, 0.5, [0.0, 0.0]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in FACES {
        let base = vertices.len() as u32;
        for (su, sv, tex_coords) in CORNERS {
            let position = [
                normal[0] * 0.5 + u[0] * su + v[0] * sv,
                normal[1] * 0.5 + u[1] * su + v[1] * sv,
                normal[2] * 0.5 + u[2] * su + v[2] * sv,
            ];
            vertices.push(ModelVertex {
                position,
                tex_coords,
                normal,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}
