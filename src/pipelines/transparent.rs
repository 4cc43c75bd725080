use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::{basic::mk_render_pipeline, surface_shader},
    render::Pass,
};

/**
 * Pipeline for translucent, double-sided surfaces such as windows.
 *
 * Colours are alpha blended, both faces are drawn and depth is tested but not
 * written, so everything behind a window stays visible. It has to run after
 * the opaque pipeline.
 */
pub fn mk_transparent_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    layout: &wgpu::PipelineLayout,
) -> wgpu::RenderPipeline {
    mk_render_pipeline(
        device,
        layout,
        format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        Pass::Transparent.cull_mode(),
        Some((Texture::DEPTH_FORMAT, Pass::Transparent.writes_depth())),
        &[ModelVertex::desc(), InstanceRaw::desc()],
        surface_shader(),
    )
}
