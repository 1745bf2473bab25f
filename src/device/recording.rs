//! Headless render device that records every call.

use std::collections::VecDeque;

use super::{DeviceError, RenderDevice};
use crate::core::{BlendMode, QuadVertex};

/// Buffer pair handed out by [`RecordingDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedBuffers {
    pub id: usize,
    pub capacity: usize,
}

/// One recorded device call.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    CreateBatchBuffers {
        id: usize,
        capacity: usize,
    },
    CreateAtlas {
        width: u32,
        height: u32,
        fill: [u8; 4],
    },
    WriteAtlas {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        /// First texel of the written data.
        first_texel: [u8; 4],
        len: usize,
    },
    BeginRender,
    SetBlendMode(BlendMode),
    Upload {
        buffers: usize,
        vertices: Vec<QuadVertex>,
        indices: Vec<u16>,
    },
    DrawIndexedStrip {
        buffers: usize,
        index_count: u32,
    },
    EndRender,
    Clear([f32; 4]),
}

/// A [`RenderDevice`] without a GPU.
#[derive(Debug)]
pub struct RecordingDevice {
    viewport: (u32, u32),
    next_buffers: usize,
    commands: Vec<DeviceCommand>,
    errors: VecDeque<DeviceError>,
    viewport_queries: usize,
    max_texture_dimension: u32,
}

/// Texture size limit reported by default, the wgpu default limit.
pub const DEFAULT_MAX_TEXTURE_DIMENSION: u32 = 8192;

impl RecordingDevice {
    /// Create a device reporting the given viewport size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: (width, height),
            next_buffers: 0,
            commands: Vec::new(),
            errors: VecDeque::new(),
            viewport_queries: 0,
            max_texture_dimension: DEFAULT_MAX_TEXTURE_DIMENSION,
        }
    }

    /// Change the reported texture size limit.
    pub fn set_max_texture_dimension(&mut self, max: u32) {
        self.max_texture_dimension = max;
    }

    /// Change the reported viewport size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    /// Number of times the viewport was queried.
    pub fn viewport_queries(&self) -> usize {
        self.viewport_queries
    }

    /// Queue an error to be returned by the next [`RenderDevice::poll_error`].
    pub fn inject_error(&mut self, error: DeviceError) {
        self.errors.push_back(error);
    }

    /// Every call recorded so far.
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Drain the recorded calls.
    pub fn take_commands(&mut self) -> Vec<DeviceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of atlas uploads recorded.
    pub fn atlas_writes(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DeviceCommand::WriteAtlas { .. }))
            .count()
    }

    /// Number of draw calls recorded.
    pub fn draw_calls(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DeviceCommand::DrawIndexedStrip { .. }))
            .count()
    }
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

fn first_texel(rgba: &[u8]) -> [u8; 4] {
    let mut texel = [0; 4];
    let n = rgba.len().min(4);
    texel[..n].copy_from_slice(&rgba[..n]);
    texel
}

impl RenderDevice for RecordingDevice {
    type Buffers = RecordedBuffers;

    fn viewport(&mut self) -> (u32, u32) {
        self.viewport_queries += 1;
        self.viewport
    }

    fn max_texture_dimension(&self) -> u32 {
        self.max_texture_dimension
    }

    fn create_batch_buffers(&mut self, capacity: usize) -> RecordedBuffers {
        let id = self.next_buffers;
        self.next_buffers += 1;
        self.commands
            .push(DeviceCommand::CreateBatchBuffers { id, capacity });
        RecordedBuffers { id, capacity }
    }

    fn create_atlas(&mut self, width: u32, height: u32, rgba: &[u8]) {
        self.commands.push(DeviceCommand::CreateAtlas {
            width,
            height,
            fill: first_texel(rgba),
        });
    }

    fn write_atlas(&mut self, x: u32, y: u32, width: u32, height: u32, rgba: &[u8]) {
        self.commands.push(DeviceCommand::WriteAtlas {
            x,
            y,
            width,
            height,
            first_texel: first_texel(rgba),
            len: rgba.len(),
        });
    }

    fn begin_render(&mut self) {
        self.commands.push(DeviceCommand::BeginRender);
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.commands.push(DeviceCommand::SetBlendMode(mode));
    }

    fn upload(&mut self, buffers: &RecordedBuffers, vertices: &[u8], indices: &[u8]) {
        self.commands.push(DeviceCommand::Upload {
            buffers: buffers.id,
            vertices: vertices
                .chunks_exact(std::mem::size_of::<QuadVertex>())
                .map(bytemuck::pod_read_unaligned)
                .collect(),
            indices: indices
                .chunks_exact(std::mem::size_of::<u16>())
                .map(bytemuck::pod_read_unaligned)
                .collect(),
        });
    }

    fn draw_indexed_strip(&mut self, buffers: &RecordedBuffers, index_count: u32) {
        self.commands.push(DeviceCommand::DrawIndexedStrip {
            buffers: buffers.id,
            index_count,
        });
    }

    fn end_render(&mut self) {
        self.commands.push(DeviceCommand::EndRender);
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.commands.push(DeviceCommand::Clear(color));
    }

    fn poll_error(&mut self) -> Option<DeviceError> {
        self.errors.pop_front()
    }
}
