//! Render composition and pipeline batching.
//!
//! Scene objects describe how they want to be drawn with a [`Render`]. The
//! viewer walks that description once per frame and sorts the instanced draws
//! into one batch per [`Pass`], which are then drawn with their own pipelines
//! (opaque first, so blended surfaces see the depth buffer).

use crate::{
    data_structures::model::{DrawModel, Model},
    pipelines::Pipelines,
};

/// Data for instanced object rendering: a model and its instance buffer.
#[derive(Clone, Copy)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
}

/// Specifies how a scene object should be rendered.
///
/// - `None` renders nothing
/// - `Default(Instanced)` renders an opaque instanced object with back faces culled
/// - `DoubleSided(Instanced)` renders an opaque instanced object from both sides
/// - `Transparent(Instanced)` renders a blended, double-sided instanced object
/// - `Composed(Vec<Render>)` recursively renders composition of multiple renders
pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    DoubleSided(Instanced<'a>),
    Transparent(Instanced<'a>),
    Composed(Vec<Render<'a>>),
}

/// Pipeline a batch is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pass {
    Opaque,
    DoubleSided,
    /// Blended and always drawn from both sides.
    Transparent,
}

impl Pass {
    /// Draw order of the passes within a frame.
    pub const ORDER: [Pass; 3] = [Pass::Opaque, Pass::DoubleSided, Pass::Transparent];

    pub fn cull_mode(&self) -> Option<wgpu::Face> {
        match self {
            Pass::Opaque => Some(wgpu::Face::Back),
            Pass::DoubleSided | Pass::Transparent => None,
        }
    }

    pub fn writes_depth(&self) -> bool {
        !matches!(self, Pass::Transparent)
    }
}

/// Instanced draws sorted by pass.
#[derive(Default)]
pub struct Batches<'a> {
    pub opaque: Vec<Instanced<'a>>,
    pub double_sided: Vec<Instanced<'a>>,
    pub transparent: Vec<Instanced<'a>>,
}

impl<'a> Batches<'a> {
    pub fn get(&self, pass: Pass) -> &[Instanced<'a>] {
        match pass {
            Pass::Opaque => &self.opaque,
            Pass::DoubleSided => &self.double_sided,
            Pass::Transparent => &self.transparent,
        }
    }
}

impl<'a> Render<'a> {
    pub fn batches(self) -> Batches<'a> {
        let mut batches = Batches::default();
        self.set_pipelines(&mut batches);
        batches
    }

    fn set_pipelines(self, batches: &mut Batches<'a>) {
        match self {
            Render::Default(instanced) => batches.opaque.push(instanced),
            Render::DoubleSided(instanced) => batches.double_sided.push(instanced),
            Render::Transparent(instanced) => batches.transparent.push(instanced),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(batches)),
            Render::None => (),
        }
    }
}

/// Colour and depth attachment of one frame.
pub struct FrameTarget<'a> {
    pub color: &'a wgpu::TextureView,
    pub depth: &'a wgpu::TextureView,
    pub clear_colour: wgpu::Color,
}

/// Bind groups shared by every draw of a frame.
pub struct FrameBindings<'a> {
    pub pipelines: &'a Pipelines,
    pub camera: &'a wgpu::BindGroup,
    pub light: &'a wgpu::BindGroup,
}

/// Record a render pass that clears `target` and draws `render` pass by pass.
pub fn record_frame(
    encoder: &mut wgpu::CommandEncoder,
    target: &FrameTarget<'_>,
    bindings: &FrameBindings<'_>,
    render: Render<'_>,
) {
    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Render Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(target.clear_colour),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: target.depth,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        occlusion_query_set: None,
        timestamp_writes: None,
    });

    let batches = render.batches();
    for pass in Pass::ORDER {
        let batch = batches.get(pass);
        if batch.is_empty() {
            continue;
        }
        render_pass.set_pipeline(bindings.pipelines.get(pass));
        for instanced in batch {
            if instanced.amount == 0 || instanced.instance.size() == 0 {
                log::warn!("skipping a batch without instances");
                continue;
            }
            render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
            render_pass.draw_model_instanced(
                instanced.model,
                0..instanced.amount as u32,
                bindings.camera,
                bindings.light,
            );
        }
    }
}
