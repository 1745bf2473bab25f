//! WgpuContext - Device and Queue wrapper
//!
//! Provides a convenient wrapper around wgpu's Device and Queue, plus the
//! error-scope helper the render device uses to detect validation errors.

use std::sync::Arc;

/// Core wgpu context containing device and queue.
///
/// This is the fundamental building block for all GPU operations.
#[derive(Clone)]
pub struct WgpuContext {
    /// The wgpu device for creating GPU resources.
    pub device: Arc<wgpu::Device>,
    /// The wgpu queue for submitting commands.
    pub queue: Arc<wgpu::Queue>,
}

impl WgpuContext {
    /// Create a new context from existing device and queue.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
        }
    }

    /// Create a new context asynchronously with default settings.
    pub async fn new_async(compatible_surface: Option<&wgpu::Surface<'_>>) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await?;

        Self::from_adapter(&adapter).await
    }

    /// Request a device and queue from an adapter the caller picked.
    pub async fn from_adapter(adapter: &wgpu::Adapter) -> anyhow::Result<Self> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("rein-batch device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        Ok(Self::new(device, queue))
    }

    /// Create a new context synchronously (blocks).
    pub fn new_blocking(compatible_surface: Option<&wgpu::Surface<'_>>) -> anyhow::Result<Self> {
        pollster::block_on(Self::new_async(compatible_surface))
    }

    /// Submit command buffers to the queue.
    pub fn submit<I: IntoIterator<Item = wgpu::CommandBuffer>>(&self, command_buffers: I) {
        self.queue.submit(command_buffers);
    }

    /// Create a command encoder.
    pub fn create_encoder(&self, label: Option<&str>) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label })
    }

    /// Run `f` inside error scopes for every error filter and return the
    /// errors the device reported while it ran.
    ///
    /// This is the wgpu counterpart of polling an error code after a risky
    /// call: the error is handed back to the caller instead of going to the
    /// uncaptured-error handler, which would panic by default.
    pub fn capture_errors<R>(&self, f: impl FnOnce() -> R) -> (R, Vec<wgpu::Error>) {
        let scopes: Vec<_> = CAPTURED_ERRORS
            .iter()
            .map(|&filter| self.device.push_error_scope(filter))
            .collect();
        let result = f();
        // innermost scope first
        let errors = scopes
            .into_iter()
            .rev()
            .filter_map(|scope| pollster::block_on(scope.pop()))
            .collect();
        (result, errors)
    }
}

/// Error filters [`WgpuContext::capture_errors`] opens a scope for.
pub const CAPTURED_ERRORS: [wgpu::ErrorFilter; 3] = [
    wgpu::ErrorFilter::Internal,
    wgpu::ErrorFilter::OutOfMemory,
    wgpu::ErrorFilter::Validation,
];

impl std::fmt::Debug for WgpuContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuContext").finish()
    }
}
