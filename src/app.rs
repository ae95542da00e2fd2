//! Application event loop and windowing shell.
//!
//! The shell owns the window, the winit event loop and the GPU [`Context`].
//! Application behaviour is supplied through the [`GraphicsApp`] capability
//! trait; the shell holds the trait object directly and dispatches events to
//! it, so there is no process-wide callback target.
//!
//! Per loop iteration: winit delivers pending input events, a redraw clears
//! color and depth and calls [`GraphicsApp::on_draw`] inside the frame's
//! render pass, and the close request is the only exit point.

use std::iter;
use std::pin::Pin;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use crate::context::{Context, InitContext};
use crate::texture::DepthTexture;

pub const DISPLAY_WIDTH: u32 = 640;
pub const DISPLAY_HEIGHT: u32 = 580;

const WINDOW_TITLE: &str = "orb-ngin";

/// Per-frame and input hooks implemented by the concrete application.
///
/// The shell guarantees `on_draw` runs exactly once per presented frame,
/// after all startup uploads have completed.
pub trait GraphicsApp {
    /// Record this frame's draw into the pass. The pass already has color
    /// and depth attachments cleared.
    fn on_draw(&mut self, ctx: &Context, render_pass: &mut wgpu::RenderPass<'_>);

    /// A keyboard key changed state.
    fn on_key_down(&mut self, ctx: &Context, key: KeyCode, state: ElementState);

    /// The pointer moved to `position` in window coordinates.
    fn on_mouse_move(&mut self, ctx: &Context, position: PhysicalPosition<f64>);

    /// A pointer button changed state.
    fn on_mouse_down(&mut self, ctx: &Context, button: MouseButton, state: ElementState);
}

/// Factory for the application: receives an [`InitContext`], loads its
/// resources asynchronously and returns the boxed app.
pub type AppConstructor =
    Box<dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsApp>>>>>>;

/// Context, application and surface status for a running window.
struct AppState {
    ctx: Context,
    app: Box<dyn GraphicsApp>,
    is_surface_configured: bool,
}

impl AppState {
    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = DepthTexture::create(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Keep the loop going: each presented frame schedules the next one.
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
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.app.on_draw(&self.ctx, &mut render_pass);
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Winit application driver. Initialization happens on `resumed`, after
/// which the state is live for the rest of the process.
pub struct App {
    async_runtime: tokio::runtime::Runtime,
    state: Option<AppState>,
    // Held until `resumed`; `take()`n on first use.
    constructor: Option<AppConstructor>,
}

impl App {
    fn new(constructor: AppConstructor) -> Self {
        let async_runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
        Self {
            async_runtime,
            state: None,
            constructor: Some(constructor),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(DISPLAY_WIDTH, DISPLAY_HEIGHT));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .expect("create window"),
        );

        let constructor = self.constructor.take().unwrap();
        let init = self.async_runtime.block_on(async move {
            let ctx = Context::new(window).await?;
            // The conversion only clones the internal Arcs of Device and Queue.
            let app = constructor((&ctx).into()).await?;
            Ok::<_, anyhow::Error>((ctx, app))
        });
        let (ctx, app) = match init {
            Ok(initialized) => initialized,
            Err(e) => panic!("App initialization failed: {}", e),
        };

        self.state = Some(AppState {
            ctx,
            app,
            is_surface_configured: false,
        });
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

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => match state.render() {
                Ok(_) => {}
                // Reconfigure the surface if it's lost or outdated
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = state.ctx.window.inner_size();
                    state.resize(size.width, size.height);
                }
                Err(e) => {
                    log::error!("Unable to render {}", e);
                }
            },
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    state.app.on_key_down(&state.ctx, code, event.state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.app.on_mouse_move(&state.ctx, position);
            }
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                state.app.on_mouse_down(&state.ctx, button, button_state);
            }
            _ => {}
        }
    }
}

/// Initialize logging, build the event loop and drive the application
/// until its window closes.
pub fn run(constructor: AppConstructor) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(constructor);
    event_loop.run_app(&mut app)?;

    Ok(())
}
