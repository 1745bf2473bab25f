//! Batched render backend
//!
//! [`BatchRenderBackend`] is what a GUI paint engine drives each frame:
//!
//! ```text
//! begin_frame
//!   begin_batch(mode) add_quad* ...   (repeated per widget)
//! render
//! end_frame
//! ```
//!
//! Batches come from a pool and are handed back at the next
//! [`begin_frame`](BatchRenderBackend::begin_frame), so steady-state frames
//! allocate no GPU buffers. When a batch fills up, [`add_quad`] continues in
//! a fresh batch with the same blend mode.
//!
//! [`add_quad`]: BatchRenderBackend::add_quad

pub mod atlas;
pub mod config;

pub use atlas::TextureAtlas;
pub use config::{AtlasConfig, BackendConfig, ConfigError};

use std::backtrace::Backtrace;

use crate::batch::{Batch, ObjectPool, PoolHandle, Quad};
use crate::core::BlendMode;
use crate::cursor::{CursorError, CursorSink, MouseCursor};
use crate::device::RenderDevice;
use crate::loader::{self, FileResourceLoader, Image, ImageDecoder, ResourceLoader};

/// Frame clear color, transparent black.
const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// Accumulates quads into pooled batches and draws them through a
/// [`RenderDevice`].
pub struct BatchRenderBackend<D: RenderDevice> {
    device: D,
    config: BackendConfig,
    atlas: TextureAtlas,
    pool: ObjectPool<Batch<D::Buffers>>,
    frame_batches: Vec<PoolHandle>,
    viewport: Option<(u32, u32)>,
    resources: Box<dyn ResourceLoader>,
    cursor_sink: Option<Box<dyn CursorSink>>,
    active_cursor: Option<u64>,
    next_cursor_id: u64,
}

impl<D: RenderDevice> BatchRenderBackend<D> {
    /// Create a backend drawing through `device`.
    pub fn new(device: D, config: BackendConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(device, config))
    }

    /// Create a backend with the default configuration.
    pub fn with_defaults(device: D) -> Self {
        Self::build(device, BackendConfig::default())
    }

    fn build(device: D, config: BackendConfig) -> Self {
        Self {
            device,
            atlas: TextureAtlas::new(config.atlas),
            config,
            pool: ObjectPool::new(),
            frame_batches: Vec::new(),
            viewport: None,
            resources: Box::new(FileResourceLoader::new()),
            cursor_sink: None,
            active_cursor: None,
            next_cursor_id: 0,
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    // --- frame ---

    /// Return last frame's batches to the pool.
    pub fn begin_frame(&mut self) {
        tracing::trace!("begin_frame");
        for handle in self.frame_batches.drain(..) {
            self.pool.release(handle);
        }
    }

    /// Start a new batch drawn with `blend_mode`.
    ///
    /// Batches render in the order they were begun.
    pub fn begin_batch(&mut self, blend_mode: BlendMode) {
        let capacity = self.config.batch_capacity;
        let device = &mut self.device;
        let handle = self
            .pool
            .allocate(&mut || Batch::new(device.create_batch_buffers(capacity), capacity));
        if let Some(batch) = self.pool.get_mut(handle) {
            batch.begin(blend_mode);
        }
        self.frame_batches.push(handle);
    }

    /// Append a quad to the current batch, continuing in a new batch with
    /// the same blend mode when it is full.
    pub fn add_quad(&mut self, quad: Quad) {
        let mode = match self.current_batch() {
            Some(batch) if batch.can_add_quad() => None,
            Some(batch) => Some(batch.blend_mode()),
            None => {
                tracing::warn!("add_quad without begin_batch, starting a normal batch");
                Some(BlendMode::Normal)
            }
        };
        if let Some(mode) = mode {
            self.begin_batch(mode);
        }

        if let Some(batch) = self
            .frame_batches
            .last()
            .and_then(|&handle| self.pool.get_mut(handle))
        {
            batch.add_quad_internal(&quad);
        }
    }

    fn current_batch(&self) -> Option<&Batch<D::Buffers>> {
        self.frame_batches
            .last()
            .and_then(|&handle| self.pool.get(handle))
    }

    /// Draw every batch of this frame and return how many there were.
    pub fn render(&mut self) -> usize {
        self.device.begin_render();
        for &handle in &self.frame_batches {
            if let Some(batch) = self.pool.get(handle) {
                batch.render(&mut self.device);
            }
        }
        self.device.end_render();
        self.check_device_errors("render");
        self.frame_batches.len()
    }

    /// Forget per-frame cached state.
    pub fn end_frame(&mut self) {
        tracing::trace!("end_frame");
        self.viewport = None;
        self.check_device_errors("end_frame");
    }

    /// Clear the frame buffer to transparent black.
    pub fn clear(&mut self) {
        tracing::trace!("clear");
        self.device.clear(CLEAR_COLOR);
        self.check_device_errors("clear");
    }

    fn viewport(&mut self) -> (u32, u32) {
        match self.viewport {
            Some(size) => size,
            None => {
                let size = self.device.viewport();
                tracing::debug!("viewport {}x{}", size.0, size.1);
                self.viewport = Some(size);
                size
            }
        }
    }

    /// Viewport width in pixels, cached until [`end_frame`](Self::end_frame).
    pub fn width(&mut self) -> u32 {
        self.viewport().0
    }

    /// Viewport height in pixels, cached until [`end_frame`](Self::end_frame).
    pub fn height(&mut self) -> u32 {
        self.viewport().1
    }

    /// Batches begun this frame.
    pub fn batch_count(&self) -> usize {
        self.frame_batches.len()
    }

    /// Batches ever created by the pool.
    pub fn pooled_batches(&self) -> usize {
        self.pool.len()
    }

    /// Log every error the device reported since the last check and return
    /// how many there were.
    pub fn check_device_errors(&mut self, context: &str) -> usize {
        let mut count = 0;
        while let Some(error) = self.device.poll_error() {
            count += 1;
            let backtrace = error_backtrace();
            tracing::warn!("device error during {}: {}\n{}", context, error, backtrace);
        }
        count
    }

    // --- atlas ---

    pub fn create_atlas_texture(&mut self, width: u32, height: u32) {
        self.atlas.create(&mut self.device, width, height);
        self.check_device_errors("create_atlas_texture");
    }

    pub fn clear_atlas_texture(&mut self, width: u32, height: u32) {
        self.atlas.clear(&mut self.device, width, height);
        self.check_device_errors("clear_atlas_texture");
    }

    /// Upload `image` into the atlas at (`x`, `y`).
    pub fn add_image_to_texture(&mut self, image: &Image, x: u32, y: u32) {
        self.atlas.add_image(&mut self.device, image, x, y);
        self.check_device_errors("add_image_to_texture");
    }

    /// Mark an atlas region as free.
    ///
    /// Only touches the texture when
    /// [`fill_removed_texture`](BackendConfig::fill_removed_texture) is set.
    pub fn remove_from_texture(
        &mut self,
        _image: &Image,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) {
        if !self.config.fill_removed_texture {
            return;
        }
        self.atlas.fill_removed(&mut self.device, x, y, width, height);
        self.check_device_errors("remove_from_texture");
    }

    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    // --- images ---

    pub fn set_resource_loader(&mut self, resources: Box<dyn ResourceLoader>) {
        self.resources = resources;
    }

    /// Load and decode `name`; failures yield [`Image::empty`].
    pub fn load_image(&mut self, name: &str) -> Image {
        match loader::load_raw(self.resources.as_ref(), name) {
            Ok(raw) => raw.into(),
            Err(err) => {
                tracing::warn!("failed to load image {}: {}", name, err);
                Image::empty()
            }
        }
    }

    // --- cursors ---

    pub fn set_cursor_sink(&mut self, sink: Box<dyn CursorSink>) {
        self.cursor_sink = Some(sink);
    }

    /// Load a cursor image with its hotspot measured from the top-left.
    pub fn create_mouse_cursor(
        &mut self,
        name: &str,
        hotspot_x: u32,
        hotspot_y: u32,
    ) -> Result<MouseCursor, CursorError> {
        let reader = self.resources.open(name)?;
        let raw = ImageDecoder::for_name(name).decode_cursor(reader)?;
        let cursor = MouseCursor::new(self.next_cursor_id, raw, hotspot_x, hotspot_y)?;
        self.next_cursor_id += 1;
        Ok(cursor)
    }

    pub fn enable_mouse_cursor(&mut self, cursor: &MouseCursor) {
        self.apply_cursor(Some(cursor));
    }

    /// Restore the platform default cursor.
    pub fn disable_mouse_cursor(&mut self) {
        self.apply_cursor(None);
    }

    /// Release the native resources behind `cursor`.
    ///
    /// A cursor that is currently shown is replaced by the platform default
    /// first.
    pub fn dispose_mouse_cursor(&mut self, cursor: MouseCursor) {
        if self.active_cursor == Some(cursor.id()) {
            self.apply_cursor(None);
        }
        if let Some(sink) = self.cursor_sink.as_mut() {
            sink.release(cursor.id());
        }
    }

    fn apply_cursor(&mut self, cursor: Option<&MouseCursor>) {
        let Some(sink) = self.cursor_sink.as_mut() else {
            tracing::debug!("no cursor sink installed, ignoring cursor change");
            return;
        };
        match sink.set_cursor(cursor) {
            Ok(()) => self.active_cursor = cursor.map(MouseCursor::id),
            Err(err) => tracing::warn!("failed to change mouse cursor: {}", err),
        }
    }
}

/// Stack trace attached to device error reports, taken regardless of
/// `RUST_BACKTRACE`.
fn error_backtrace() -> Backtrace {
    Backtrace::force_capture()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{TexRect, QUAD_BYTES};
    use crate::device::{DeviceCommand, DeviceError, RecordingDevice};
    use crate::loader::MemoryResourceLoader;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;

    fn backend() -> BatchRenderBackend<RecordingDevice> {
        BatchRenderBackend::with_defaults(RecordingDevice::default())
    }

    fn small_backend(quads_per_batch: usize) -> BatchRenderBackend<RecordingDevice> {
        let config = BackendConfig::new().batch_capacity(quads_per_batch * QUAD_BYTES + 1);
        BatchRenderBackend::new(RecordingDevice::default(), config).unwrap()
    }

    fn quad(i: usize) -> Quad {
        Quad::new(i as f32, 0.0, 1.0, 1.0)
    }

    fn encoded(format: image::ImageFormat, width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([9, 8, 7, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    fn draws(commands: &[DeviceCommand]) -> Vec<(usize, u32)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::DrawIndexedStrip {
                    buffers,
                    index_count,
                } => Some((*buffers, *index_count)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_batch_count_is_ceil_of_quads() {
        let per_batch = 4;
        for quads in [1, 3, 4, 5, 8, 9, 17] {
            let mut backend = small_backend(per_batch);
            backend.begin_frame();
            backend.begin_batch(BlendMode::Normal);
            for i in 0..quads {
                backend.add_quad(quad(i));
            }
            let expected = quads.div_ceil(per_batch);
            assert_eq!(backend.render(), expected, "{} quads", quads);

            let modes: Vec<_> = backend
                .device()
                .commands()
                .iter()
                .filter_map(|c| match c {
                    DeviceCommand::SetBlendMode(mode) => Some(*mode),
                    _ => None,
                })
                .collect();
            assert_eq!(modes, vec![BlendMode::Normal; expected]);
        }
    }

    #[test]
    fn test_split_batches_keep_blend_mode_and_order() {
        let mut backend = small_backend(2);
        backend.begin_frame();
        backend.begin_batch(BlendMode::Multiply);
        for i in 0..5 {
            backend.add_quad(quad(i));
        }
        backend.device_mut().take_commands();
        assert_eq!(backend.render(), 3);

        let commands = backend.device().commands();
        assert_eq!(commands.first(), Some(&DeviceCommand::BeginRender));
        assert_eq!(commands.last(), Some(&DeviceCommand::EndRender));
        assert_eq!(draws(commands), vec![(0, 10), (1, 10), (2, 5)]);

        // quads stay in append order across the split
        let first_x: Vec<f32> = commands
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::Upload { vertices, .. } => Some(vertices[2].position[0]),
                _ => None,
            })
            .collect();
        assert_eq!(first_x, vec![0.0, 2.0, 4.0]);
        assert!(commands
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::SetBlendMode(mode) => Some(*mode),
                _ => None,
            })
            .all(|mode| mode == BlendMode::Multiply));
    }

    #[test]
    fn test_batches_render_in_begin_order() {
        let mut backend = backend();
        backend.begin_frame();
        backend.begin_batch(BlendMode::Normal);
        backend.add_quad(quad(0));
        backend.begin_batch(BlendMode::Multiply);
        backend.add_quad(quad(1));
        backend.add_quad(quad(2));
        backend.begin_batch(BlendMode::Normal);
        backend.add_quad(quad(3));
        backend.device_mut().take_commands();

        assert_eq!(backend.render(), 3);
        let commands = backend.device().commands();
        assert_eq!(draws(commands), vec![(0, 5), (1, 10), (2, 5)]);

        let modes: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::SetBlendMode(mode) => Some(*mode),
                _ => None,
            })
            .collect();
        assert_eq!(
            modes,
            vec![BlendMode::Normal, BlendMode::Multiply, BlendMode::Normal]
        );
    }

    #[test]
    fn test_pool_reused_across_frames() {
        let mut backend = small_backend(2);
        for _ in 0..5 {
            backend.begin_frame();
            backend.begin_batch(BlendMode::Normal);
            for i in 0..6 {
                backend.add_quad(quad(i));
            }
            assert_eq!(backend.render(), 3);
            backend.end_frame();
        }

        assert_eq!(backend.pooled_batches(), 3);
        let created = backend
            .device()
            .commands()
            .iter()
            .filter(|c| matches!(c, DeviceCommand::CreateBatchBuffers { .. }))
            .count();
        assert_eq!(created, 3);
    }

    #[test]
    fn test_add_quad_without_batch_starts_normal_batch() {
        let mut backend = backend();
        backend.begin_frame();
        backend.add_quad(quad(0));

        assert_eq!(backend.batch_count(), 1);
        backend.render();
        assert!(backend
            .device()
            .commands()
            .contains(&DeviceCommand::SetBlendMode(BlendMode::Normal)));
    }

    #[test]
    fn test_empty_batch_counts_but_does_not_draw() {
        let mut backend = backend();
        backend.begin_frame();
        backend.begin_batch(BlendMode::Normal);
        backend.device_mut().take_commands();

        assert_eq!(backend.render(), 1);
        assert_eq!(
            backend.device().commands(),
            &[DeviceCommand::BeginRender, DeviceCommand::EndRender]
        );
    }

    #[test]
    fn test_atlas_scenario_with_missing_file() {
        let resources = MemoryResourceLoader::new()
            .with("button.png", encoded(image::ImageFormat::Png, 32, 16));
        let mut backend = backend();
        backend.set_resource_loader(Box::new(resources));

        backend.create_atlas_texture(256, 256);
        let button = backend.load_image("button.png");
        let missing = backend.load_image("missing.png");
        assert_eq!((button.width(), button.height()), (32, 16));
        assert!(missing.is_empty());

        backend.add_image_to_texture(&button, 0, 0);
        backend.add_image_to_texture(&missing, 32, 0);

        assert_eq!(backend.device().atlas_writes(), 1);
        assert_eq!(
            backend.device().commands(),
            &[
                DeviceCommand::CreateAtlas {
                    width: 256,
                    height: 256,
                    fill: [0x80; 4]
                },
                DeviceCommand::WriteAtlas {
                    x: 0,
                    y: 0,
                    width: 32,
                    height: 16,
                    first_texel: [9, 8, 7, 255],
                    len: 32 * 16 * 4
                },
            ]
        );

        backend.begin_frame();
        backend.begin_batch(BlendMode::Normal);
        backend.add_quad(
            Quad::new(10.0, 10.0, 32.0, 16.0)
                .with_texture(TexRect::from_pixels(0, 0, 32, 16, (256, 256))),
        );
        assert_eq!(backend.render(), 1);
        assert_eq!(backend.device().draw_calls(), 1);
    }

    #[test]
    fn test_load_tga_by_extension() {
        let resources = MemoryResourceLoader::new()
            .with("cursor.tga", encoded(image::ImageFormat::Tga, 4, 2));
        let mut backend = backend();
        backend.set_resource_loader(Box::new(resources));

        let image = backend.load_image("cursor.tga");
        assert_eq!((image.width(), image.height()), (4, 2));
        assert_eq!(&image.pixels()[..4], &[9, 8, 7, 255]);
    }

    #[test]
    fn test_remove_fill_is_opt_in() {
        let image = Image::from_rgba(2, 2, vec![0; 16]).unwrap();

        let mut backend = backend();
        backend.create_atlas_texture(64, 64);
        backend.remove_from_texture(&image, 4, 4, 2, 2);
        assert_eq!(backend.device().atlas_writes(), 0);

        let config = BackendConfig::new().fill_removed_texture(true);
        let mut backend = BatchRenderBackend::new(RecordingDevice::default(), config).unwrap();
        backend.create_atlas_texture(64, 64);
        backend.remove_from_texture(&image, 4, 4, 2, 2);
        assert_eq!(
            backend.device().commands().last(),
            Some(&DeviceCommand::WriteAtlas {
                x: 4,
                y: 4,
                width: 2,
                height: 2,
                first_texel: [0xff, 0x00, 0x00, 0xff],
                len: 16
            })
        );
    }

    #[test]
    fn test_viewport_cached_until_end_frame() {
        let mut backend = BatchRenderBackend::with_defaults(RecordingDevice::new(800, 600));
        assert_eq!((backend.width(), backend.height()), (800, 600));

        backend.device_mut().set_viewport(1024, 768);
        assert_eq!((backend.width(), backend.height()), (800, 600));
        assert_eq!(backend.device().viewport_queries(), 1);

        backend.end_frame();
        assert_eq!((backend.width(), backend.height()), (1024, 768));
        assert_eq!(backend.device().viewport_queries(), 2);
    }

    #[test]
    fn test_device_errors_do_not_abort_rendering() {
        let mut backend = backend();
        backend.begin_frame();
        backend.begin_batch(BlendMode::Normal);
        backend.add_quad(quad(0));
        backend
            .device_mut()
            .inject_error(DeviceError::Validation("bad upload".into()));
        backend
            .device_mut()
            .inject_error(DeviceError::OutOfMemory("vram".into()));

        assert_eq!(backend.render(), 1);
        assert_eq!(backend.device().draw_calls(), 1);
        assert_eq!(backend.check_device_errors("after render"), 0);

        backend.end_frame();
        backend.begin_frame();
        backend.begin_batch(BlendMode::Normal);
        backend.add_quad(quad(1));
        assert_eq!(backend.render(), 1);
        assert_eq!(backend.device().draw_calls(), 2);
    }

    #[test]
    fn test_device_error_backtrace_ignores_env() {
        use std::backtrace::BacktraceStatus;

        let backtrace = error_backtrace();
        assert_eq!(backtrace.status(), BacktraceStatus::Captured);
        assert!(!backtrace.to_string().contains("disabled backtrace"));
    }

    #[test]
    fn test_clear_uses_transparent_black() {
        let mut backend = backend();
        backend.clear();
        assert_eq!(
            backend.device().commands(),
            &[DeviceCommand::Clear([0.0, 0.0, 0.0, 0.0])]
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = BackendConfig::new().batch_capacity(64);
        assert!(matches!(
            BatchRenderBackend::new(RecordingDevice::default(), config),
            Err(ConfigError::CapacityTooSmall { capacity: 64 })
        ));
    }

    #[derive(Clone, Default)]
    struct SharedSink {
        shown: Rc<RefCell<Vec<Option<u64>>>>,
        released: Rc<RefCell<Vec<u64>>>,
        fail: bool,
    }

    impl CursorSink for SharedSink {
        fn set_cursor(&mut self, cursor: Option<&MouseCursor>) -> Result<(), CursorError> {
            if self.fail {
                return Err(CursorError::Platform("no cursor support".into()));
            }
            self.shown.borrow_mut().push(cursor.map(MouseCursor::id));
            Ok(())
        }

        fn release(&mut self, id: u64) {
            self.released.borrow_mut().push(id);
        }
    }

    #[test]
    fn test_mouse_cursor_round_trip() {
        let resources = MemoryResourceLoader::new()
            .with("arrow.png", encoded(image::ImageFormat::Png, 16, 16))
            .with("hand.tga", encoded(image::ImageFormat::Tga, 8, 8));
        let sink = SharedSink::default();
        let mut backend = backend();
        backend.set_resource_loader(Box::new(resources));

        let arrow = backend.create_mouse_cursor("arrow.png", 1, 2).unwrap();
        let hand = backend.create_mouse_cursor("hand.tga", 4, 0).unwrap();
        assert_ne!(arrow.id(), hand.id());
        assert_eq!(arrow.hotspot(), (1, 2));

        // ignored without a sink
        backend.enable_mouse_cursor(&arrow);

        backend.set_cursor_sink(Box::new(sink.clone()));
        backend.enable_mouse_cursor(&arrow);
        backend.enable_mouse_cursor(&hand);
        backend.disable_mouse_cursor();
        assert_eq!(
            *sink.shown.borrow(),
            vec![Some(arrow.id()), Some(hand.id()), None]
        );
    }

    #[test]
    fn test_disposed_cursors_are_released() {
        let resources = MemoryResourceLoader::new()
            .with("arrow.png", encoded(image::ImageFormat::Png, 16, 16))
            .with("hand.png", encoded(image::ImageFormat::Png, 16, 16));
        let sink = SharedSink::default();
        let mut backend = backend();
        backend.set_resource_loader(Box::new(resources));
        backend.set_cursor_sink(Box::new(sink.clone()));

        let arrow = backend.create_mouse_cursor("arrow.png", 0, 0).unwrap();
        let hand = backend.create_mouse_cursor("hand.png", 0, 0).unwrap();
        let (arrow_id, hand_id) = (arrow.id(), hand.id());
        backend.enable_mouse_cursor(&arrow);

        // an inactive cursor is released without touching the shown one
        backend.dispose_mouse_cursor(hand);
        assert_eq!(*sink.shown.borrow(), vec![Some(arrow_id)]);

        // the active cursor falls back to the default before release
        backend.dispose_mouse_cursor(arrow);
        assert_eq!(*sink.shown.borrow(), vec![Some(arrow_id), None]);
        assert_eq!(*sink.released.borrow(), vec![hand_id, arrow_id]);

        // screen transitions recreating cursors release every one of them
        for _ in 0..3 {
            let cursor = backend.create_mouse_cursor("arrow.png", 0, 0).unwrap();
            backend.enable_mouse_cursor(&cursor);
            backend.dispose_mouse_cursor(cursor);
        }
        assert_eq!(sink.released.borrow().len(), 5);
    }

    #[test]
    fn test_mouse_cursor_errors() {
        let resources = MemoryResourceLoader::new()
            .with("tiny.png", encoded(image::ImageFormat::Png, 4, 4))
            .with("broken.png", vec![0u8; 12]);
        let mut backend = backend();
        backend.set_resource_loader(Box::new(resources));

        assert!(matches!(
            backend.create_mouse_cursor("absent.png", 0, 0),
            Err(CursorError::Resource(_))
        ));
        assert!(matches!(
            backend.create_mouse_cursor("broken.png", 0, 0),
            Err(CursorError::Decode(_))
        ));
        assert!(matches!(
            backend.create_mouse_cursor("tiny.png", 4, 0),
            Err(CursorError::HotspotOutOfBounds { .. })
        ));

        // sink failures are logged, not raised
        let cursor = backend.create_mouse_cursor("tiny.png", 0, 0).unwrap();
        backend.set_cursor_sink(Box::new(SharedSink {
            fail: true,
            ..SharedSink::default()
        }));
        backend.enable_mouse_cursor(&cursor);
        backend.disable_mouse_cursor();
    }
}
