//! Application event loop of the viewer.
//!
//! The window and GPU context are created when the event loop resumes. Right
//! after that a [`Session`] is started for the configured captures. Its result
//! comes back into the loop as a [`FlowEvent::SceneReady`] and is attached with
//! [`present`], so the window only ever shows a complete scene. Closing the
//! window aborts a merge that is still running.
//!
//! # Lifecycle
//!
//! Each frame:
//! 1. Collect window/device events for the camera controller
//! 2. Update the camera and move the headlight
//! 3. Collect the scene's [`Render`] and sort it into one batch per pass
//! 4. Draw the opaque batches, then the transparent one
//! 5. Present the frame

use std::{fmt::Debug, iter, sync::Arc};

use futures::future::AbortHandle;
use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    config::ViewerConfig,
    context::Context,
    data_structures::{
        scene_graph::{RoomScene, SceneBlocks},
        texture::Texture,
    },
    merge::StructureBuilder,
    render::{FrameBindings, FrameTarget, Render, record_frame},
    session::{SceneTarget, Session, SessionError, present},
};

const TITLE: &str = "room-ngin";
const EMPTY_TITLE: &str = "room-ngin (no scene)";

/// A scene together with its GPU buffers.
pub struct AttachedScene {
    pub scene: RoomScene,
    pub blocks: SceneBlocks,
}

impl Debug for AttachedScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachedScene")
            .field("nodes", &self.scene.len())
            .field("batches", &self.blocks.children.len())
            .finish()
    }
}

/// Application state bundle: GPU context, the attached scene and surface status.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    scene: Option<AttachedScene>,
    is_surface_configured: bool,
}

impl SceneTarget for AppState {
    fn assign_scene(&mut self, scene: RoomScene) {
        let blocks = SceneBlocks::upload(
            &scene,
            &self.ctx.device,
            &self.ctx.queue,
            &self.ctx.material_layout,
            &self.ctx.assets,
        );
        if let Some(bounds) = scene.bounds() {
            self.ctx
                .camera
                .camera
                .frame(&bounds, self.ctx.projection.fovy);
        }
        log::info!("showing {} surfaces", scene.len());
        self.scene = Some(AttachedScene { scene, blocks });
        self.ctx.window.set_title(TITLE);
        self.ctx.window.request_redraw();
    }
}

impl AppState {
    async fn new(window: Arc<Window>, config: &ViewerConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config).await?;
        Ok(Self {
            ctx,
            scene: None,
            is_surface_configured: false,
        })
    }

    pub fn scene(&self) -> Option<&RoomScene> {
        self.scene.as_ref().map(|attached| &attached.scene)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        let render = match &self.scene {
            Some(attached) => attached.blocks.get_render(),
            None => Render::None,
        };
        record_frame(
            &mut encoder,
            &FrameTarget {
                color: &view,
                depth: &self.ctx.depth_texture.view,
                clear_colour: self.ctx.clear_colour,
            },
            &FrameBindings {
                pipelines: &self.ctx.pipelines,
                camera: &self.ctx.camera.bind_group,
                light: &self.ctx.light.bind_group,
            },
            render,
        );

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub enum FlowEvent {
    SceneReady(Result<RoomScene, SessionError>),
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SceneReady(Ok(scene)) => write!(f, "SceneReady({} nodes)", scene.len()),
            Self::SceneReady(Err(e)) => write!(f, "SceneReady({e})"),
        }
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    config: ViewerConfig,
    state: Option<AppState>,
    session: Option<AbortHandle>,
    last_time: Instant,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: ViewerConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            proxy,
            config,
            state: None,
            session: None,
            last_time: Instant::now(),
        })
    }

    /// Load the configured captures and merge them in the background.
    fn start_session(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let mut session = Session::new(StructureBuilder::new());
        for path in &self.config.captures {
            if let Err(e) = session.load(path) {
                // present logs the failure and leaves the window empty
                if present(state, Err(e.into())).is_err() {
                    state.ctx.window.set_title(EMPTY_TITLE);
                }
                return;
            }
        }
        let handle = session.spawn(self.async_runtime.handle());
        self.session = Some(handle.abort_handle());
        let proxy = self.proxy.clone();
        self.async_runtime.spawn(async move {
            let outcome = handle.join().await;
            if proxy.send_event(FlowEvent::SceneReady(outcome)).is_err() {
                log::debug!("event loop closed before the scene was ready");
            }
        });
    }

    fn cancel_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.abort();
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.cancel_session();
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes().with_title(TITLE);
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("could not open a window: {e}");
                event_loop.exit();
                return;
            }
        };

        match self
            .async_runtime
            .block_on(AppState::new(window, &self.config))
        {
            Ok(mut state) => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("viewer initialization failed: {e:#}");
                event_loop.exit();
                return;
            }
        }
        self.start_session();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::SceneReady(outcome) => {
                self.session = None;
                if let Some(state) = &mut self.state {
                    match present(state, outcome) {
                        Ok(nodes) => log::debug!("attached {nodes} nodes"),
                        Err(_) => state.ctx.window.set_title(EMPTY_TITLE),
                    }
                }
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            state.ctx.camera.controller.handle_mouse(dx, dy);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.ctx.camera.controller.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => {
                self.cancel_session();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                state
                    .ctx
                    .camera
                    .controller
                    .update(&mut state.ctx.camera.camera, dt);
                state.ctx.write_uniforms();

                match state.render() {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Open the viewer window and block until it is closed.
pub fn run(config: ViewerConfig) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
