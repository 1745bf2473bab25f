//! Core rendering abstractions
//!
//! This module provides mid-level abstractions over wgpu primitives.

pub mod buffer;
pub mod pipeline;
pub mod render_states;
pub mod texture;
pub mod vertex;

pub use buffer::{StreamBuffer, UniformBuffer};
pub use pipeline::PipelineBuilder;
pub use render_states::BlendMode;
pub use texture::Texture2D;
pub use vertex::QuadVertex;
