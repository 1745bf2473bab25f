//! Quad batching
//!
//! A [`Batch`] packs quads into CPU staging buffers and draws them with one
//! indexed triangle-strip call. Consecutive quads are separated by the
//! primitive restart index, so any number of them share a single draw.
//!
//! Each quad contributes four vertices in bottom-left, bottom-right,
//! top-left, top-right order. Under strip topology that order yields the
//! quad's two triangles without an explicit diagonal index.

pub mod pool;
pub mod quad;

pub use pool::{Factory, ObjectPool, PoolHandle};
pub use quad::{Quad, TexRect, WHITE};

use crate::core::{BlendMode, QuadVertex};
use crate::device::{RenderDevice, PRIMITIVE_RESTART_INDEX};

/// Vertices per quad.
pub const QUAD_VERTICES: usize = 4;
/// Indices per quad, restart sentinel included.
pub const QUAD_INDICES: usize = QUAD_VERTICES + 1;
/// Bytes of vertex data per quad.
pub const QUAD_BYTES: usize = QUAD_VERTICES * std::mem::size_of::<QuadVertex>();
/// Default byte capacity of each batch buffer.
pub const DEFAULT_BATCH_CAPACITY: usize = 256 * 1024;
/// Largest quad count whose vertex indices stay below the restart index.
pub const MAX_BATCH_QUADS: usize = PRIMITIVE_RESTART_INDEX as usize / QUAD_VERTICES;

/// Reusable unit of GPU buffers plus the quads staged for them this frame.
///
/// GPU buffers are created once, by the pool's factory, and kept for the
/// life of the batch; [`begin`](Batch::begin) only rewinds the staging
/// cursors.
#[derive(Debug)]
pub struct Batch<B> {
    buffers: B,
    capacity: usize,
    blend_mode: BlendMode,
    vertices: Vec<QuadVertex>,
    indices: Vec<u16>,
    primitive_count: usize,
}

impl<B> Batch<B> {
    /// Wrap GPU buffers of `capacity` bytes each.
    ///
    /// Capacities beyond [`MAX_BATCH_QUADS`] quads are accepted, but the
    /// batch reports itself full at that many quads.
    pub fn new(buffers: B, capacity: usize) -> Self {
        let max_quads = Self::max_quads(capacity).min(MAX_BATCH_QUADS);
        Self {
            buffers,
            capacity,
            blend_mode: BlendMode::Normal,
            vertices: Vec::with_capacity(max_quads * QUAD_VERTICES),
            indices: Vec::with_capacity(max_quads * QUAD_INDICES),
            primitive_count: 0,
        }
    }

    /// Most quads a batch of `capacity` bytes accepts.
    pub const fn max_quads(capacity: usize) -> usize {
        if capacity == 0 {
            0
        } else {
            (capacity - 1) / QUAD_BYTES
        }
    }

    /// Rewind the staging cursors and record the blend mode.
    pub fn begin(&mut self, blend_mode: BlendMode) {
        self.blend_mode = blend_mode;
        self.vertices.clear();
        self.indices.clear();
        self.primitive_count = 0;
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Whether one more quad fits.
    pub fn can_add_quad(&self) -> bool {
        self.primitive_count < MAX_BATCH_QUADS
            && (self.primitive_count + 1) * QUAD_BYTES < self.capacity
    }

    /// Append a quad. The caller checks [`can_add_quad`](Self::can_add_quad)
    /// first; a quad that does not fit is dropped with a warning.
    pub fn add_quad_internal(&mut self, quad: &Quad) {
        let base = match u16::try_from(self.primitive_count * QUAD_VERTICES) {
            Ok(base) if self.can_add_quad() => base,
            _ => {
                tracing::warn!(
                    "batch full at {} quads, dropping quad",
                    self.primitive_count
                );
                return;
            }
        };

        let (x, y) = (quad.position.x, quad.position.y);
        let (w, h) = (quad.size.x, quad.size.y);
        let t = quad.texture;

        self.vertices.extend_from_slice(&[
            QuadVertex::new([x, y + h], quad.bottom_left(), [t.x, t.y + t.height]),
            QuadVertex::new(
                [x + w, y + h],
                quad.bottom_right(),
                [t.x + t.width, t.y + t.height],
            ),
            QuadVertex::new([x, y], quad.top_left(), [t.x, t.y]),
            QuadVertex::new([x + w, y], quad.top_right(), [t.x + t.width, t.y]),
        ]);

        self.indices.extend_from_slice(&[
            base,
            base + 1,
            base + 2,
            base + 3,
            PRIMITIVE_RESTART_INDEX,
        ]);

        self.primitive_count += 1;
    }

    /// Number of quads staged.
    pub fn primitive_count(&self) -> usize {
        self.primitive_count
    }

    /// Number of indices staged.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn vertices(&self) -> &[QuadVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn buffers(&self) -> &B {
        &self.buffers
    }

    /// Select the blend equation, upload the staged data, and draw it.
    ///
    /// An empty batch issues no device calls.
    pub fn render<D>(&self, device: &mut D)
    where
        D: RenderDevice<Buffers = B>,
    {
        if self.primitive_count == 0 {
            return;
        }
        device.set_blend_mode(self.blend_mode);
        device.upload(
            &self.buffers,
            bytemuck::cast_slice(&self.vertices),
            bytemuck::cast_slice(&self.indices),
        );
        device.draw_indexed_strip(&self.buffers, self.index_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceCommand, RecordingDevice};

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    const CLEAR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

    fn gradient_quad() -> Quad {
        Quad::new(10.0, 20.0, 30.0, 40.0)
            .with_corner_colors(RED, GREEN, BLUE, CLEAR)
            .with_texture(TexRect::new(0.25, 0.5, 0.125, 0.0625))
    }

    #[test]
    fn test_quad_packing_round_trip() {
        let mut batch = Batch::new((), DEFAULT_BATCH_CAPACITY);
        batch.begin(BlendMode::Normal);
        batch.add_quad_internal(&gradient_quad());

        let v = batch.vertices();
        assert_eq!(v.len(), 4);
        // bottom-left, bottom-right, top-left, top-right
        assert_eq!(
            v[0].attributes(),
            [10.0, 60.0, 0.0, 0.0, 1.0, 1.0, 0.25, 0.5625]
        );
        assert_eq!(
            v[1].attributes(),
            [40.0, 60.0, 0.0, 0.0, 0.0, 0.0, 0.375, 0.5625]
        );
        assert_eq!(v[2].attributes(), [10.0, 20.0, 1.0, 0.0, 0.0, 1.0, 0.25, 0.5]);
        assert_eq!(v[3].attributes(), [40.0, 20.0, 0.0, 1.0, 0.0, 1.0, 0.375, 0.5]);

        assert_eq!(batch.indices(), &[0, 1, 2, 3, PRIMITIVE_RESTART_INDEX]);
        assert_eq!(batch.index_count(), 5);
    }

    #[test]
    fn test_indices_continue_across_quads() {
        let mut batch = Batch::new((), DEFAULT_BATCH_CAPACITY);
        batch.begin(BlendMode::Normal);
        for _ in 0..3 {
            batch.add_quad_internal(&gradient_quad());
        }

        let expected: Vec<u16> = vec![
            0, 1, 2, 3, 0xFFFF, 4, 5, 6, 7, 0xFFFF, 8, 9, 10, 11, 0xFFFF,
        ];
        assert_eq!(batch.indices(), expected.as_slice());
        assert_eq!(batch.primitive_count(), 3);
    }

    #[test]
    fn test_can_add_quad_boundary() {
        // Room for exactly three quads: 3 * 128 = 384 < 385, 4 * 128 = 512 >= 385.
        let capacity = 3 * QUAD_BYTES + 1;
        let mut batch = Batch::new((), capacity);
        batch.begin(BlendMode::Normal);

        for added in 0..3 {
            assert!(batch.can_add_quad(), "quad {} should fit", added);
            batch.add_quad_internal(&gradient_quad());
        }
        assert!(!batch.can_add_quad());
        assert_eq!(Batch::<()>::max_quads(capacity), 3);

        // A capacity of exactly n quads holds n - 1 of them.
        let batch = Batch::new((), QUAD_BYTES);
        assert!(!batch.can_add_quad());
        assert_eq!(Batch::<()>::max_quads(QUAD_BYTES), 0);
    }

    #[test]
    fn test_begin_rewinds_and_sets_blend_mode() {
        let mut batch = Batch::new((), DEFAULT_BATCH_CAPACITY);
        batch.begin(BlendMode::Normal);
        batch.add_quad_internal(&gradient_quad());

        batch.begin(BlendMode::Multiply);
        assert_eq!(batch.blend_mode(), BlendMode::Multiply);
        assert_eq!(batch.primitive_count(), 0);
        assert!(batch.vertices().is_empty());
        assert!(batch.indices().is_empty());
    }

    #[test]
    fn test_oversized_batch_stops_below_restart_index() {
        let capacity = (MAX_BATCH_QUADS + 10) * QUAD_BYTES + 1;
        let mut batch = Batch::new((), capacity);
        batch.begin(BlendMode::Normal);

        let quad = gradient_quad();
        while batch.can_add_quad() {
            batch.add_quad_internal(&quad);
        }
        assert_eq!(batch.primitive_count(), MAX_BATCH_QUADS);

        // past the limit the quad is dropped instead of wrapping
        batch.add_quad_internal(&quad);
        assert_eq!(batch.primitive_count(), MAX_BATCH_QUADS);

        let largest = batch
            .indices()
            .iter()
            .copied()
            .filter(|&i| i != PRIMITIVE_RESTART_INDEX)
            .max();
        assert_eq!(largest, Some((MAX_BATCH_QUADS * QUAD_VERTICES - 1) as u16));
        assert_eq!(batch.index_count() as usize, MAX_BATCH_QUADS * QUAD_INDICES);
    }

    #[test]
    fn test_full_batch_drops_extra_quad() {
        let mut batch = Batch::new((), 2 * QUAD_BYTES + 1);
        batch.begin(BlendMode::Normal);
        batch.add_quad_internal(&gradient_quad());
        batch.add_quad_internal(&gradient_quad());
        batch.add_quad_internal(&gradient_quad());
        assert_eq!(batch.primitive_count(), 2);
        assert_eq!(batch.vertices().len(), 2 * QUAD_VERTICES);
    }

    #[test]
    fn test_default_capacity_quad_limit() {
        assert_eq!(QUAD_BYTES, 128);
        assert_eq!(Batch::<()>::max_quads(DEFAULT_BATCH_CAPACITY), 2047);
    }

    #[test]
    fn test_render_sets_blend_then_uploads_then_draws() {
        let mut device = RecordingDevice::default();
        let buffers = device.create_batch_buffers(DEFAULT_BATCH_CAPACITY);
        let mut batch = Batch::new(buffers, DEFAULT_BATCH_CAPACITY);
        batch.begin(BlendMode::Multiply);
        batch.add_quad_internal(&gradient_quad());
        device.take_commands();

        batch.render(&mut device);

        let commands = device.take_commands();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], DeviceCommand::SetBlendMode(BlendMode::Multiply));
        match &commands[1] {
            DeviceCommand::Upload {
                vertices, indices, ..
            } => {
                assert_eq!(vertices.as_slice(), batch.vertices());
                assert_eq!(indices.as_slice(), batch.indices());
            }
            other => panic!("expected upload, got {:?}", other),
        }
        assert_eq!(
            commands[2],
            DeviceCommand::DrawIndexedStrip {
                buffers: 0,
                index_count: 5
            }
        );
    }

    #[test]
    fn test_empty_batch_renders_nothing() {
        let mut device = RecordingDevice::default();
        let buffers = device.create_batch_buffers(DEFAULT_BATCH_CAPACITY);
        let mut batch = Batch::new(buffers, DEFAULT_BATCH_CAPACITY);
        batch.begin(BlendMode::Normal);
        device.take_commands();

        batch.render(&mut device);
        assert!(device.commands().is_empty());
    }
}
