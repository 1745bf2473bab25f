//! Window management module
//!
//! A thin winit wrapper that opens a window, owns the surface and calls a
//! per-frame callback with the surface view to render into.

mod cursor;
pub mod frame_io;
pub mod settings;

pub use cursor::WindowCursor;
pub use frame_io::{FrameInput, FrameOutput, Viewport};
pub use settings::WindowSettings;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorIcon, CustomCursor, WindowId};

use crate::context::WgpuContext;
use cursor::CursorChange;

/// A window with GPU rendering context.
pub struct Window {
    settings: WindowSettings,
}

impl Window {
    pub fn new(settings: WindowSettings) -> anyhow::Result<Self> {
        Ok(Self { settings })
    }

    /// Run the render loop with a callback.
    ///
    /// The callback receives a `FrameInput` and should return a `FrameOutput`.
    pub fn render_loop<F, S>(self, state_init: S, callback: F) -> anyhow::Result<()>
    where
        F: FnMut(&mut S, FrameInput<'_>) -> FrameOutput + 'static,
        S: 'static,
    {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App {
            settings: self.settings,
            state: state_init,
            callback,
            graphics: None,
            cursor: WindowCursor::default(),
            cursors: HashMap::new(),
            start_time: Instant::now(),
            last_frame_time: Instant::now(),
            mouse_position: (0.0, 0.0),
        };

        event_loop.run_app(&mut app)?;
        Ok(())
    }
}

struct Graphics {
    window: Arc<winit::window::Window>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    ctx: WgpuContext,
}

impl Graphics {
    fn new(event_loop: &ActiveEventLoop, settings: &WindowSettings) -> anyhow::Result<Self> {
        let window = Arc::new(event_loop.create_window(settings.attributes())?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no GPU adapter can present to the window")?;

        let ctx = pollster::block_on(WgpuContext::from_adapter(&adapter))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .context("surface reports no texture formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: settings.present_mode(),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&ctx.device, &config);

        Ok(Self {
            window,
            surface,
            config,
            ctx,
        })
    }
}

struct App<S, F> {
    settings: WindowSettings,
    state: S,
    callback: F,
    graphics: Option<Graphics>,
    cursor: WindowCursor,
    cursors: HashMap<u64, CustomCursor>,
    start_time: Instant,
    last_frame_time: Instant,
    mouse_position: (f32, f32),
}

impl<S, F> App<S, F> {
    fn apply_cursor(&mut self, event_loop: &ActiveEventLoop) {
        if let (Some(change), Some(graphics)) = (self.cursor.take(), &self.graphics) {
            match change {
                CursorChange::Custom { id, source } => {
                    let cursor = self
                        .cursors
                        .entry(id)
                        .or_insert_with(|| event_loop.create_custom_cursor(source));
                    graphics.window.set_cursor(cursor.clone());
                }
                CursorChange::Default => graphics.window.set_cursor(CursorIcon::Default),
            }
        }

        for id in self.cursor.take_released() {
            if self.cursors.remove(&id).is_some() {
                tracing::debug!("released native cursor {}", id);
            }
        }
    }
}

impl<S, F> ApplicationHandler for App<S, F>
where
    F: FnMut(&mut S, FrameInput<'_>) -> FrameOutput + 'static,
    S: 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }

        match Graphics::new(event_loop, &self.settings) {
            Ok(graphics) => self.graphics = Some(graphics),
            Err(err) => {
                tracing::error!("failed to initialise window graphics: {:#}", err);
                event_loop.exit();
                return;
            }
        }

        self.start_time = Instant::now();
        self.last_frame_time = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(graphics) = &mut self.graphics else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    graphics.config.width = size.width;
                    graphics.config.height = size.height;
                    graphics
                        .surface
                        .configure(&graphics.ctx.device, &graphics.config);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = (position.x as f32, position.y as f32);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed_time = (now - self.start_time).as_secs_f64();
                let delta_time = (now - self.last_frame_time).as_secs_f64();
                self.last_frame_time = now;

                let surface_texture = match graphics.surface.get_current_texture() {
                    Ok(texture) => texture,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        graphics
                            .surface
                            .configure(&graphics.ctx.device, &graphics.config);
                        return;
                    }
                    Err(e) => {
                        tracing::error!("Surface error: {:?}", e);
                        return;
                    }
                };

                let view = surface_texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                let frame_input = FrameInput {
                    elapsed_time,
                    delta_time,
                    mouse_position: self.mouse_position,
                    viewport: Viewport {
                        width: graphics.config.width,
                        height: graphics.config.height,
                    },
                    ctx: &graphics.ctx,
                    surface_view: &view,
                    surface_format: graphics.config.format,
                    cursor: &self.cursor,
                };

                let output = (self.callback)(&mut self.state, frame_input);

                graphics.window.pre_present_notify();
                surface_texture.present();

                self.apply_cursor(event_loop);

                if output.exit {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = &self.graphics {
            graphics.window.request_redraw();
        }
    }
}
