//! Instance transformation data for GPU rendering.
//!
//! Every surface becomes one instance of a unit box. The instance keeps the
//! surface transform untouched and stretches the box with a separate scale, so
//! the transform that ends up on the GPU is exactly the one the scan recorded.

use cgmath::{Matrix, SquareMatrix};

use crate::data_structures::{model, scene_graph::SurfaceNode};

/// Per-instance data: the placement of a box and how far it is stretched.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub transform: cgmath::Matrix4<f32>,
    pub scale: cgmath::Vector3<f32>,
    /// How often the texture repeats across the box.
    pub uv_scale: cgmath::Vector2<f32>,
}

impl Instance {
    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        self.transform
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_raw(&self) -> InstanceRaw {
        let world_matrix = self.to_matrix();
        let handedness = world_matrix.determinant().signum();
        InstanceRaw {
            model: world_matrix.into(),
            normal: normal_matrix(&world_matrix).into(),
            handedness,
            uv_scale: self.uv_scale.into(),
        }
    }
}

/// Inverse transpose of the linear part. Degenerate matrices (zero scale, broken
/// transforms) have no inverse and are passed through as they are.
fn normal_matrix(world: &cgmath::Matrix4<f32>) -> cgmath::Matrix3<f32> {
    let linear = cgmath::Matrix3::from_cols(
        world.x.truncate(),
        world.y.truncate(),
        world.z.truncate(),
    );
    linear
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or(linear)
}

impl From<&SurfaceNode> for Instance {
    fn from(node: &SurfaceNode) -> Self {
        let uv_scale = if node.style.tiled {
            cgmath::Vector2::new(node.geometry.width, node.geometry.height)
        } else {
            cgmath::Vector2::new(1.0, 1.0)
        };
        Instance {
            transform: node.transform,
            scale: cgmath::Vector3::new(
                node.geometry.width,
                node.geometry.height,
                node.geometry.length,
            ),
            uv_scale,
        }
    }
}

/**
 * The raw instance is the actual data stored on the GPU
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
    handedness: f32,
    uv_scale: [f32; 2],
}

impl InstanceRaw {
    pub fn model(&self) -> [[f32; 4]; 4] {
        self.model
    }

    pub fn handedness(&self) -> f32 {
        self.handedness
    }
}

/**
 * As we store vertex data directly in the GPU memory we need to tell what the bytes refer to:
 *
 * offset: zero as we want to use the full space.
 * stride: length of an instance
 *
 * Stride layout here: model as 4x4 matrix (four 4d vectors), normal matrix as 3x3,
 * handedness and the texture repeat.
 */
impl model::Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // Step to the next instance only once all vertices of a box are processed
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // A mat4 takes up 4 vertex slots as it is technically 4 vec4s.
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 25]>() as wgpu::BufferAddress,
                    shader_location: 12,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 26]>() as wgpu::BufferAddress,
                    shader_location: 13,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}
