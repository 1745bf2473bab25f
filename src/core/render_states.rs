//! Render state configurations
//!
//! Blend modes a batch can be drawn with.

/// Blend mode of a batch.
///
/// A batch keeps one blend mode between two `begin` calls; switching blend
/// modes mid-frame means starting a new batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Standard alpha blending (`src_alpha`, `1 - src_alpha`).
    #[default]
    Normal,
    /// Multiplies the destination by the source color (`dst_color`, `0`).
    Multiply,
}

impl BlendMode {
    /// All blend modes, in pipeline slot order.
    pub const ALL: [BlendMode; 2] = [BlendMode::Normal, BlendMode::Multiply];

    /// Index of the pipeline slot used for this mode.
    pub const fn index(self) -> usize {
        match self {
            BlendMode::Normal => 0,
            BlendMode::Multiply => 1,
        }
    }

    /// Convert to wgpu blend state.
    pub fn to_wgpu(self) -> wgpu::BlendState {
        match self {
            BlendMode::Normal => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                    operation: wgpu::BlendOperation::Add,
                },
            },
            BlendMode::Multiply => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::Dst,
                    dst_factor: wgpu::BlendFactor::Zero,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::DstAlpha,
                    dst_factor: wgpu::BlendFactor::Zero,
                    operation: wgpu::BlendOperation::Add,
                },
            },
        }
    }
}
