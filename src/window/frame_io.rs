//! Frame input/output types
//!
//! Types for passing data to and from the render loop callback.

use super::cursor::WindowCursor;
use crate::context::WgpuContext;

/// Drawable area of the surface in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Input data for a frame.
pub struct FrameInput<'a> {
    /// Seconds since the window opened.
    pub elapsed_time: f64,
    /// Seconds since the previous frame.
    pub delta_time: f64,
    /// Last known cursor position in physical pixels.
    pub mouse_position: (f32, f32),
    pub viewport: Viewport,
    pub ctx: &'a WgpuContext,
    /// The surface texture view to render to.
    pub surface_view: &'a wgpu::TextureView,
    pub surface_format: wgpu::TextureFormat,
    /// Cursor sink applied after the callback returns.
    pub cursor: &'a WindowCursor,
}

impl<'a> FrameInput<'a> {
    pub fn width(&self) -> u32 {
        self.viewport.width
    }

    pub fn height(&self) -> u32 {
        self.viewport.height
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }
}

/// Output data from a frame.
#[derive(Debug, Clone, Default)]
pub struct FrameOutput {
    /// Whether to exit the application.
    pub exit: bool,
}

impl FrameOutput {
    pub fn new() -> Self {
        Self { exit: false }
    }

    pub fn exit() -> Self {
        Self { exit: true }
    }
}
