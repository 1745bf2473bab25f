//! Window settings

/// Settings for creating the demo window.
#[derive(Debug, Clone)]
pub struct WindowSettings {
    pub title: String,
    /// Initial inner size (width, height) in logical pixels.
    pub size: (u32, u32),
    /// Smallest inner size the user may resize to.
    pub min_size: Option<(u32, u32)>,
    pub resizable: bool,
    pub vsync: bool,
    pub maximized: bool,
    /// Borderless fullscreen on the current monitor.
    pub fullscreen: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "rein-batch".to_string(),
            size: (1024, 768),
            min_size: None,
            resizable: true,
            vsync: true,
            maximized: false,
            fullscreen: false,
        }
    }
}

impl WindowSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn min_size(mut self, width: u32, height: u32) -> Self {
        self.min_size = Some((width, height));
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn maximized(mut self, maximized: bool) -> Self {
        self.maximized = maximized;
        self
    }

    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    /// winit attributes for these settings.
    pub(crate) fn attributes(&self) -> winit::window::WindowAttributes {
        let mut attributes = winit::window::WindowAttributes::default()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(self.size.0, self.size.1))
            .with_resizable(self.resizable)
            .with_maximized(self.maximized);
        if let Some((width, height)) = self.min_size {
            attributes = attributes.with_min_inner_size(winit::dpi::LogicalSize::new(width, height));
        }
        if self.fullscreen {
            attributes = attributes.with_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
        }
        attributes
    }

    pub(crate) fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let settings = WindowSettings::new()
            .title("atlas demo")
            .size(640, 480)
            .min_size(320, 240)
            .vsync(false);
        assert_eq!(settings.title, "atlas demo");
        assert_eq!(settings.size, (640, 480));
        assert_eq!(settings.min_size, Some((320, 240)));
        assert_eq!(settings.present_mode(), wgpu::PresentMode::AutoNoVsync);
        assert!(settings.resizable);
    }
}
