//! rein-batch
//!
//! A batched 2D render backend for GUI toolkits, built on wgpu.
//!
//! Quads are packed into pooled vertex/index buffers and drawn as
//! triangle strips separated by a primitive restart index, one draw call per
//! batch. Textures live in a single atlas.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **context** - Core wgpu wrapper (Device, Queue)
//! 2. **core** - GPU primitives (buffers, textures, pipelines, blend states)
//! 3. **device** - The `RenderDevice` seam with wgpu and recording implementations
//! 4. **batch** - Quads, batches and the batch pool
//! 5. **backend** - Per-frame orchestration, atlas and configuration
//! 6. **loader** - Resource lookup and image decoding
//! 7. **cursor** - Platform-neutral mouse cursors
//! 8. **window** - Window management with winit (feature = "window")

pub mod backend;
pub mod batch;
pub mod context;
pub mod core;
pub mod cursor;
pub mod device;
pub mod loader;

#[cfg(feature = "window")]
pub mod window;

// Re-export commonly used types
pub use context::WgpuContext;

pub use core::{BlendMode, PipelineBuilder, QuadVertex, StreamBuffer, Texture2D, UniformBuffer};

pub use backend::{AtlasConfig, BackendConfig, BatchRenderBackend, ConfigError, TextureAtlas};
pub use batch::{Batch, ObjectPool, Quad, TexRect};
pub use cursor::{CursorError, CursorSink, MouseCursor};
pub use device::{DeviceError, RecordingDevice, RenderDevice, WgpuDevice};
pub use loader::{
    DecodeError, FileResourceLoader, Image, ImageDecoder, LoadError, MemoryResourceLoader,
    RawImage, ResourceError, ResourceLoader,
};

#[cfg(feature = "window")]
pub use window::{FrameInput, FrameOutput, Window, WindowCursor, WindowSettings};
