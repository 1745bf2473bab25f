//! wgpu implementation of [`RenderDevice`].

use std::collections::VecDeque;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use super::{DeviceError, RenderDevice};
use crate::context::WgpuContext;
use crate::core::{BlendMode, PipelineBuilder, QuadVertex, StreamBuffer, Texture2D, UniformBuffer};

const SHADER: &str = include_str!("../shaders/batch.wgsl");

/// Projection uniform shared by all batches.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Globals {
    pub model_view_projection: [[f32; 4]; 4],
}

impl Globals {
    /// Pixel-space orthographic projection with the origin at the top-left.
    pub fn orthographic(width: u32, height: u32) -> Self {
        let projection =
            Mat4::orthographic_rh(0.0, width as f32, height as f32, 0.0, -1.0, 1.0);
        Self {
            model_view_projection: projection.to_cols_array_2d(),
        }
    }
}

/// Vertex and index buffers of one batch.
pub struct WgpuBuffers {
    vertices: StreamBuffer,
    indices: StreamBuffer,
}

struct TargetView {
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

struct ActiveFrame {
    encoder: wgpu::CommandEncoder,
    pass: wgpu::RenderPass<'static>,
}

/// Render device backed by wgpu.
///
/// The application points it at a color target with [`set_target`] before
/// each frame's render.
///
/// [`set_target`]: WgpuDevice::set_target
pub struct WgpuDevice {
    ctx: WgpuContext,
    pipelines: Vec<wgpu::RenderPipeline>,
    globals: UniformBuffer<Globals>,
    projection_size: (u32, u32),
    atlas_layout: wgpu::BindGroupLayout,
    atlas: Texture2D,
    atlas_bind_group: wgpu::BindGroup,
    target: Option<TargetView>,
    frame: Option<ActiveFrame>,
    padded: Vec<u8>,
    errors: VecDeque<DeviceError>,
}

impl WgpuDevice {
    /// Create the device, its pipelines and a 1x1 white placeholder atlas.
    pub fn new(ctx: &WgpuContext, format: wgpu::TextureFormat) -> anyhow::Result<Self> {
        let globals = UniformBuffer::new(
            ctx,
            &Globals::orthographic(1, 1),
            0,
            Some("batch globals"),
        );

        let atlas_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("atlas bind group layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipelines = BlendMode::ALL
            .iter()
            .map(|&mode| {
                PipelineBuilder::new(ctx)
                    .label(match mode {
                        BlendMode::Normal => "batch pipeline (normal)",
                        BlendMode::Multiply => "batch pipeline (multiply)",
                    })
                    .shader(SHADER)
                    .vertex_layout(QuadVertex::layout())
                    .bind_group_layout(globals.bind_group_layout())
                    .bind_group_layout(&atlas_layout)
                    .color_format(format)
                    .blend(mode)
                    .triangle_strip(wgpu::IndexFormat::Uint16)
                    .build()
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let atlas = Texture2D::from_rgba8(ctx, 1, 1, &[0xff; 4], Some("placeholder atlas"));
        let atlas_bind_group = Self::atlas_bind_group(ctx, &atlas_layout, &atlas);

        Ok(Self {
            ctx: ctx.clone(),
            pipelines,
            globals,
            projection_size: (1, 1),
            atlas_layout,
            atlas,
            atlas_bind_group,
            target: None,
            frame: None,
            padded: Vec::new(),
            errors: VecDeque::new(),
        })
    }

    /// Set the color target that subsequent renders and clears draw into.
    pub fn set_target(&mut self, view: wgpu::TextureView, width: u32, height: u32) {
        self.target = Some(TargetView {
            view,
            width,
            height,
        });
    }

    /// The atlas texture currently bound.
    pub fn atlas(&self) -> &Texture2D {
        &self.atlas
    }

    pub fn context(&self) -> &WgpuContext {
        &self.ctx
    }

    fn atlas_bind_group(
        ctx: &WgpuContext,
        layout: &wgpu::BindGroupLayout,
        atlas: &Texture2D,
    ) -> wgpu::BindGroup {
        ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("atlas bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(atlas.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(atlas.sampler()),
                },
            ],
        })
    }

    /// Run `f` and queue every device error it caused.
    fn capture<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let ctx = self.ctx.clone();
        let (result, errors) = ctx.capture_errors(|| f(self));
        self.errors.extend(errors.into_iter().map(DeviceError::from));
        result
    }

    fn begin_pass(
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        load: wgpu::LoadOp<wgpu::Color>,
        label: &str,
    ) -> wgpu::RenderPass<'static> {
        encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            .forget_lifetime()
    }
}

impl RenderDevice for WgpuDevice {
    type Buffers = WgpuBuffers;

    fn viewport(&mut self) -> (u32, u32) {
        self.target
            .as_ref()
            .map(|t| (t.width, t.height))
            .unwrap_or((0, 0))
    }

    fn max_texture_dimension(&self) -> u32 {
        self.ctx.device.limits().max_texture_dimension_2d
    }

    fn create_batch_buffers(&mut self, capacity: usize) -> WgpuBuffers {
        self.capture(|device| WgpuBuffers {
            vertices: StreamBuffer::vertex(&device.ctx, capacity as u64, Some("batch vertices")),
            indices: StreamBuffer::index(&device.ctx, capacity as u64, Some("batch indices")),
        })
    }

    fn create_atlas(&mut self, width: u32, height: u32, rgba: &[u8]) {
        self.capture(|device| {
            device.atlas = Texture2D::from_rgba8(&device.ctx, width, height, rgba, Some("atlas"));
            device.atlas_bind_group =
                Self::atlas_bind_group(&device.ctx, &device.atlas_layout, &device.atlas);
        });
    }

    fn write_atlas(&mut self, x: u32, y: u32, width: u32, height: u32, rgba: &[u8]) {
        self.capture(|device| {
            device
                .atlas
                .write_region(&device.ctx, x, y, width, height, rgba);
        });
    }

    fn begin_render(&mut self) {
        let Some(target) = &self.target else {
            tracing::warn!("render requested without a target view");
            return;
        };
        let size = (target.width, target.height);

        let frame = self.capture(|device| {
            if device.projection_size != size {
                device.projection_size = size;
                device
                    .globals
                    .update(&device.ctx, &Globals::orthographic(size.0, size.1));
            }

            let target = device.target.as_ref()?;
            let mut encoder = device.ctx.create_encoder(Some("batch encoder"));
            let mut pass = Self::begin_pass(
                &mut encoder,
                &target.view,
                wgpu::LoadOp::Load,
                "batch render pass",
            );
            pass.set_bind_group(0, device.globals.bind_group(), &[]);
            pass.set_bind_group(1, &device.atlas_bind_group, &[]);
            Some(ActiveFrame { encoder, pass })
        });
        self.frame = frame;
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        if let Some(frame) = self.frame.as_mut() {
            frame.pass.set_pipeline(&self.pipelines[mode.index()]);
        }
    }

    fn upload(&mut self, buffers: &WgpuBuffers, vertices: &[u8], indices: &[u8]) {
        if vertices.len() as u64 > buffers.vertices.capacity()
            || indices.len() as u64 > buffers.indices.capacity()
        {
            self.errors.push_back(DeviceError::Validation(format!(
                "batch upload of {} vertex / {} index bytes exceeds capacity {}",
                vertices.len(),
                indices.len(),
                buffers.vertices.capacity()
            )));
            return;
        }

        self.capture(|device| {
            buffers.vertices.write(&device.ctx, vertices);

            let aligned = wgpu::util::align_to(indices.len(), wgpu::COPY_BUFFER_ALIGNMENT as usize);
            if aligned == indices.len() {
                buffers.indices.write(&device.ctx, indices);
            } else {
                device.padded.clear();
                device.padded.extend_from_slice(indices);
                device.padded.resize(aligned, 0);
                buffers.indices.write(&device.ctx, &device.padded);
            }
        });
    }

    fn draw_indexed_strip(&mut self, buffers: &WgpuBuffers, index_count: u32) {
        let Some(frame) = self.frame.as_mut() else {
            return;
        };
        frame
            .pass
            .set_vertex_buffer(0, buffers.vertices.buffer().slice(..));
        frame
            .pass
            .set_index_buffer(buffers.indices.buffer().slice(..), wgpu::IndexFormat::Uint16);
        frame.pass.draw_indexed(0..index_count, 0, 0..1);
    }

    fn end_render(&mut self) {
        let Some(ActiveFrame { encoder, pass }) = self.frame.take() else {
            return;
        };
        drop(pass);
        self.capture(|device| device.ctx.submit([encoder.finish()]));
    }

    fn clear(&mut self, color: [f32; 4]) {
        if self.frame.is_some() {
            tracing::warn!("clear requested while a render pass is open");
            return;
        }
        let Some(target) = &self.target else {
            return;
        };

        let load = wgpu::LoadOp::Clear(wgpu::Color {
            r: color[0] as f64,
            g: color[1] as f64,
            b: color[2] as f64,
            a: color[3] as f64,
        });
        let view = target.view.clone();
        self.capture(|device| {
            let mut encoder = device.ctx.create_encoder(Some("clear encoder"));
            drop(Self::begin_pass(&mut encoder, &view, load, "clear pass"));
            device.ctx.submit([encoder.finish()]);
        });
    }

    fn poll_error(&mut self) -> Option<DeviceError> {
        self.errors.pop_front()
    }
}
