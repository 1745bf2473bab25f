//! Render device
//!
//! The narrow rendering-API surface the batch backend drives. [`WgpuDevice`]
//! talks to the GPU; [`RecordingDevice`] records every call and is used for
//! headless runs, tests and benchmarks.

mod gpu;
mod recording;

pub use gpu::{Globals, WgpuBuffers, WgpuDevice};
pub use recording::{DeviceCommand, RecordedBuffers, RecordingDevice, DEFAULT_MAX_TEXTURE_DIMENSION};

use crate::core::BlendMode;

/// Sentinel index that ends one triangle strip and starts the next.
pub const PRIMITIVE_RESTART_INDEX: u16 = 0xFFFF;

/// An error reported by the rendering API.
///
/// These are detected after the fact and logged; they never abort a frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("out of memory: {0}")]
    OutOfMemory(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<wgpu::Error> for DeviceError {
    fn from(error: wgpu::Error) -> Self {
        match error {
            wgpu::Error::OutOfMemory { .. } => DeviceError::OutOfMemory(error.to_string()),
            wgpu::Error::Validation { .. } => DeviceError::Validation(error.to_string()),
            #[allow(unreachable_patterns)]
            _ => DeviceError::Internal(error.to_string()),
        }
    }
}

/// Rendering operations needed by the batch backend.
///
/// All calls happen on the thread that owns the rendering context. Draw
/// calls are only issued between [`begin_render`](Self::begin_render) and
/// [`end_render`](Self::end_render).
pub trait RenderDevice {
    /// GPU vertex and index buffer pair owned by one batch.
    type Buffers;

    /// Current viewport size in pixels.
    fn viewport(&mut self) -> (u32, u32);

    /// Largest width or height the atlas texture may have.
    fn max_texture_dimension(&self) -> u32;

    /// Allocate a vertex and an index buffer of `capacity` bytes each.
    fn create_batch_buffers(&mut self, capacity: usize) -> Self::Buffers;

    /// (Re)create the atlas texture and fill it with `rgba`.
    fn create_atlas(&mut self, width: u32, height: u32, rgba: &[u8]);

    /// Overwrite an atlas region with tightly packed RGBA8 rows.
    fn write_atlas(&mut self, x: u32, y: u32, width: u32, height: u32, rgba: &[u8]);

    /// Activate the shader and projection and bind the atlas.
    fn begin_render(&mut self);

    /// Select the blend equation for the following draws.
    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Transfer staged vertex and index bytes into `buffers`.
    fn upload(&mut self, buffers: &Self::Buffers, vertices: &[u8], indices: &[u8]);

    /// Draw `index_count` indices from `buffers` as a restart-separated
    /// triangle strip.
    fn draw_indexed_strip(&mut self, buffers: &Self::Buffers, index_count: u32);

    /// Submit everything recorded since [`begin_render`](Self::begin_render).
    fn end_render(&mut self);

    /// Clear the frame buffer to `color`.
    fn clear(&mut self, color: [f32; 4]);

    /// Take the oldest error reported since the last poll.
    fn poll_error(&mut self) -> Option<DeviceError>;
}
