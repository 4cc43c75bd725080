//! Render pipelines of the viewer.
//!
//! All pipelines share one shader and one pipeline layout (material, camera,
//! light). They differ in blending, culling and depth writes, one per [`Pass`].

use crate::render::Pass;

pub mod basic;
pub mod light;
pub mod transparent;

#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub double_sided: wgpu::RenderPipeline,
    pub transparent: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        material_layout: &wgpu::BindGroupLayout,
        camera_layout: &wgpu::BindGroupLayout,
        light_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Surface Pipeline Layout"),
            bind_group_layouts: &[material_layout, camera_layout, light_layout],
            push_constant_ranges: &[],
        });
        Self {
            basic: basic::mk_basic_pipeline(device, format, &layout, Pass::Opaque),
            double_sided: basic::mk_basic_pipeline(device, format, &layout, Pass::DoubleSided),
            transparent: transparent::mk_transparent_pipeline(device, format, &layout),
        }
    }

    pub fn get(&self, pass: Pass) -> &wgpu::RenderPipeline {
        match pass {
            Pass::Opaque => &self.basic,
            Pass::DoubleSided => &self.double_sided,
            Pass::Transparent => &self.transparent,
        }
    }
}

pub(crate) fn surface_shader() -> wgpu::ShaderModuleDescriptor<'static> {
    wgpu::ShaderModuleDescriptor {
        label: Some("Surface Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("surface.wgsl").into()),
    }
}
