//! Headless rendering for image tests.
//!
//! [`Offscreen`] owns the same pipelines, camera and light as the window
//! context but draws into a texture that is copied back to the CPU, so a frame
//! can be checked pixel by pixel without opening a window.

use std::time::Duration;

use anyhow::Context as _;

use crate::{
    camera::{Camera, CameraController, CameraResources, Projection},
    config::ViewerConfig,
    context::request_device,
    data_structures::{
        scene_graph::{RoomScene, SceneBlocks},
        texture::Texture,
    },
    pipelines::{Pipelines, light::LightResources},
    render::{FrameBindings, FrameTarget, Render, record_frame},
    resources::{self, Assets},
};

#[derive(Debug)]
pub struct Offscreen {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub pipelines: Pipelines,
    pub material_layout: wgpu::BindGroupLayout,
    pub assets: Assets,
    pub clear_colour: wgpu::Color,
    width: u32,
    height: u32,
}

impl Offscreen {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// The width is rounded up to 64 pixels so every row is 256 byte aligned.
    pub async fn new(width: u32, height: u32, viewer: &ViewerConfig) -> anyhow::Result<Self> {
        let width = width.max(1).next_multiple_of(64);
        let height = height.max(1);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter for headless rendering")?;
        let (device, queue) = request_device(&adapter).await?;

        let projection = Projection::viewer(width, height);
        let camera = CameraResources::new(
            Camera::default(),
            CameraController::new(2.0, 0.4),
            &projection,
            &device,
        );
        let light = LightResources::new(viewer.default_lighting, &device);
        let material_layout = resources::texture::material_layout(&device);
        let pipelines = Pipelines::new(
            &device,
            Self::FORMAT,
            &material_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
        );

        Ok(Self {
            device,
            queue,
            camera,
            projection,
            light,
            pipelines,
            material_layout,
            assets: viewer.assets.clone(),
            clear_colour: viewer.clear_colour,
            width,
            height,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn upload(&self, scene: &RoomScene) -> SceneBlocks {
        SceneBlocks::upload(
            scene,
            &self.device,
            &self.queue,
            &self.material_layout,
            &self.assets,
        )
    }

    /// Point the camera at the whole scene. Empty scenes keep the current view.
    pub fn frame(&mut self, scene: &RoomScene) {
        if let Some(bounds) = scene.bounds() {
            self.camera.camera.frame(&bounds, self.projection.fovy);
        }
    }

    /// Draw one frame of `blocks` and read it back.
    pub async fn render(&mut self, blocks: Option<&SceneBlocks>) -> anyhow::Result<image::RgbaImage> {
        self.camera.write_uniform(&self.projection, &self.queue);
        self.light.write_uniform(&self.camera.camera, &self.queue);

        let extent = wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        };
        let target = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Output Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = Texture::create_depth_texture(
            &self.device,
            [self.width, self.height],
            "offscreen_depth_texture",
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Offscreen Encoder"),
            });
        let render = blocks.map(SceneBlocks::get_render).unwrap_or(Render::None);
        record_frame(
            &mut encoder,
            &FrameTarget {
                color: &view,
                depth: &depth.view,
                clear_colour: self.clear_colour,
            },
            &FrameBindings {
                pipelines: &self.pipelines,
                camera: &self.camera.bind_group,
                light: &self.light.bind_group,
            },
            render,
        );

        let bytes_per_row = std::mem::size_of::<u32>() as u32 * self.width;
        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Offscreen Readback Buffer"),
            size: (bytes_per_row * self.height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            extent,
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            if tx.send(result).is_err() {
                log::debug!("read back no longer awaited");
            }
        });
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(Duration::from_secs(3)),
            })
            .map_err(|e| anyhow::anyhow!("the frame did not finish: {e:?}"))?;
        rx.receive()
            .await
            .context("the read back was dropped")?
            .context("the frame could not be mapped")?;

        let pixels = buffer_slice.get_mapped_range().to_vec();
        output_buffer.unmap();
        image::RgbaImage::from_raw(self.width, self.height, pixels)
            .context("the read back does not fill the frame")
    }
}
