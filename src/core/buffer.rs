//! GPU buffer abstractions
//!
//! Provides fixed-capacity stream buffers for per-frame vertex and index data,
//! and a typed uniform buffer.

use crate::context::WgpuContext;
use bytemuck::{Pod, Zeroable};
use std::marker::PhantomData;

/// A fixed-capacity GPU buffer rewritten every frame.
///
/// The buffer is allocated once and never resized; each frame overwrites it
/// from offset zero.
pub struct StreamBuffer {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) capacity: u64,
}

impl StreamBuffer {
    /// Create a vertex stream buffer with the given byte capacity.
    pub fn vertex(ctx: &WgpuContext, capacity: u64, label: Option<&str>) -> Self {
        Self::new(ctx, capacity, wgpu::BufferUsages::VERTEX, label)
    }

    /// Create an index stream buffer with the given byte capacity.
    pub fn index(ctx: &WgpuContext, capacity: u64, label: Option<&str>) -> Self {
        Self::new(ctx, capacity, wgpu::BufferUsages::INDEX, label)
    }

    fn new(ctx: &WgpuContext, capacity: u64, usage: wgpu::BufferUsages, label: Option<&str>) -> Self {
        // wgpu requires buffer sizes and copy sizes to be 4-byte multiples.
        let capacity = wgpu::util::align_to(capacity, wgpu::COPY_BUFFER_ALIGNMENT);
        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label,
            size: capacity,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, capacity }
    }

    /// Write `data` at offset zero.
    ///
    /// `data.len()` must be a multiple of [`wgpu::COPY_BUFFER_ALIGNMENT`] and
    /// fit in the buffer; callers pad beforehand.
    pub fn write(&self, ctx: &WgpuContext, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        ctx.queue.write_buffer(&self.buffer, 0, data);
    }

    /// Get the raw wgpu buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Get the byte capacity.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

/// A typed GPU uniform buffer.
pub struct UniformBuffer<T> {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) bind_group_layout: wgpu::BindGroupLayout,
    pub(crate) bind_group: wgpu::BindGroup,
    _marker: PhantomData<T>,
}

impl<T: Pod + Zeroable> UniformBuffer<T> {
    /// Create a new uniform buffer with initial data, visible to the vertex stage.
    pub fn new(ctx: &WgpuContext, data: &T, binding: u32, label: Option<&str>) -> Self {
        use wgpu::util::DeviceExt;

        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label,
                contents: bytemuck::bytes_of(data),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: label.map(|l| format!("{} layout", l)).as_deref(),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: label.map(|l| format!("{} bind group", l)).as_deref(),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group_layout,
            bind_group,
            _marker: PhantomData,
        }
    }

    /// Update the buffer contents.
    pub fn update(&self, ctx: &WgpuContext, data: &T) {
        ctx.queue
            .write_buffer(&self.buffer, 0, bytemuck::bytes_of(data));
    }

    /// Get the bind group layout.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Get the bind group.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
