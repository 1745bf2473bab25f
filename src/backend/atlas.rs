//! Texture atlas bookkeeping
//!
//! Placement is decided elsewhere; the atlas only checks that regions fit
//! and forwards the pixels to the device.

use super::config::AtlasConfig;
use crate::core::texture::RGBA8_BYTES;
use crate::device::RenderDevice;
use crate::loader::Image;

/// CPU-side state of the single atlas texture.
#[derive(Debug)]
pub struct TextureAtlas {
    config: AtlasConfig,
    size: Option<(u32, u32)>,
    clear_buffer: Vec<u8>,
}

fn filled(texel: [u8; 4], width: u32, height: u32) -> Vec<u8> {
    let texels = width as usize * height as usize;
    let mut buffer = Vec::with_capacity(texels * RGBA8_BYTES as usize);
    for _ in 0..texels {
        buffer.extend_from_slice(&texel);
    }
    buffer
}

impl TextureAtlas {
    pub fn new(config: AtlasConfig) -> Self {
        Self {
            config,
            size: None,
            clear_buffer: Vec::new(),
        }
    }

    /// Size of the atlas, once created.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    /// Whether a `width` x `height` region at (`x`, `y`) lies inside the atlas.
    pub fn contains(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        let Some((atlas_width, atlas_height)) = self.size else {
            return false;
        };
        let right = x.checked_add(width);
        let bottom = y.checked_add(height);
        matches!((right, bottom), (Some(r), Some(b)) if r <= atlas_width && b <= atlas_height)
    }

    /// (Re)create the atlas texture filled with the initial pattern.
    ///
    /// Sizes the device cannot hold are logged and leave the current atlas
    /// untouched.
    pub fn create<D: RenderDevice>(&mut self, device: &mut D, width: u32, height: u32) {
        let max = device.max_texture_dimension();
        if width == 0 || height == 0 || width > max || height > max {
            tracing::warn!(
                "cannot create a {}x{} texture atlas, the device allows 1..={} per side",
                width,
                height,
                max
            );
            return;
        }
        tracing::debug!("creating {}x{} texture atlas", width, height);
        device.create_atlas(width, height, &filled(self.config.initial_fill, width, height));
        self.clear_buffer = filled(self.config.clear_fill, width, height);
        self.size = Some((width, height));
    }

    /// Overwrite the whole atlas with the clear pattern.
    ///
    /// The atlas keeps its creation size; a differing request is logged.
    pub fn clear<D: RenderDevice>(&mut self, device: &mut D, width: u32, height: u32) {
        let Some((atlas_width, atlas_height)) = self.size else {
            tracing::warn!("clear of a texture atlas that was never created");
            return;
        };
        if (width, height) != (atlas_width, atlas_height) {
            tracing::warn!(
                "clear requested for {}x{} but the atlas is {}x{}; clearing the whole atlas",
                width,
                height,
                atlas_width,
                atlas_height
            );
        }
        device.write_atlas(0, 0, atlas_width, atlas_height, &self.clear_buffer);
    }

    /// Upload `image` with its top-left corner at (`x`, `y`).
    pub fn add_image<D: RenderDevice>(&mut self, device: &mut D, image: &Image, x: u32, y: u32) {
        if image.is_empty() {
            return;
        }
        if self.size.is_none() {
            tracing::warn!("image added before the texture atlas was created");
            return;
        }
        if !self.contains(x, y, image.width(), image.height()) {
            tracing::warn!(
                "{}x{} image at ({}, {}) does not fit the {:?} atlas",
                image.width(),
                image.height(),
                x,
                y,
                self.size
            );
            return;
        }
        device.write_atlas(x, y, image.width(), image.height(), image.pixels());
    }

    /// Paint a freed region with the removal pattern.
    pub fn fill_removed<D: RenderDevice>(
        &mut self,
        device: &mut D,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) {
        if width == 0 || height == 0 {
            return;
        }
        if self.size.is_none() {
            tracing::warn!("region removed before the texture atlas was created");
            return;
        }
        if !self.contains(x, y, width, height) {
            tracing::warn!(
                "removed region {}x{} at ({}, {}) does not fit the {:?} atlas",
                width,
                height,
                x,
                y,
                self.size
            );
            return;
        }
        device.write_atlas(
            x,
            y,
            width,
            height,
            &filled(self.config.removed_fill, width, height),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceCommand, RecordingDevice};

    fn atlas_256(device: &mut RecordingDevice) -> TextureAtlas {
        let mut atlas = TextureAtlas::new(AtlasConfig::default());
        atlas.create(device, 256, 256);
        atlas
    }

    #[test]
    fn test_create_fills_mid_grey() {
        let mut device = RecordingDevice::default();
        let atlas = atlas_256(&mut device);

        assert_eq!(atlas.size(), Some((256, 256)));
        assert_eq!(
            device.commands(),
            &[DeviceCommand::CreateAtlas {
                width: 256,
                height: 256,
                fill: [0x80; 4]
            }]
        );
    }

    #[test]
    fn test_create_rejects_sizes_beyond_device_limit() {
        let mut device = RecordingDevice::default();
        device.set_max_texture_dimension(1024);
        let mut atlas = atlas_256(&mut device);
        device.take_commands();

        atlas.create(&mut device, 1025, 16);
        atlas.create(&mut device, 16, u32::MAX);
        atlas.create(&mut device, 0, 16);
        assert!(device.commands().is_empty());
        assert_eq!(atlas.size(), Some((256, 256)));

        // the old clear buffer still matches the kept atlas
        atlas.clear(&mut device, 256, 256);
        assert!(matches!(
            device.commands(),
            [DeviceCommand::WriteAtlas { len, .. }] if *len == 256 * 256 * 4
        ));

        atlas.create(&mut device, 1024, 1024);
        assert_eq!(atlas.size(), Some((1024, 1024)));
    }

    #[test]
    fn test_clear_uses_whole_atlas() {
        let mut device = RecordingDevice::default();
        let mut atlas = atlas_256(&mut device);
        device.take_commands();

        atlas.clear(&mut device, 128, 128);
        assert_eq!(
            device.commands(),
            &[DeviceCommand::WriteAtlas {
                x: 0,
                y: 0,
                width: 256,
                height: 256,
                first_texel: [0x00, 0xff, 0x00, 0xff],
                len: 256 * 256 * 4
            }]
        );
    }

    #[test]
    fn test_operations_before_create_are_ignored() {
        let mut device = RecordingDevice::default();
        let mut atlas = TextureAtlas::new(AtlasConfig::default());
        let image = Image::from_rgba(1, 1, vec![1, 2, 3, 4]).unwrap();

        atlas.clear(&mut device, 16, 16);
        atlas.add_image(&mut device, &image, 0, 0);
        atlas.fill_removed(&mut device, 0, 0, 1, 1);
        assert!(device.commands().is_empty());
    }

    #[test]
    fn test_add_image_bounds() {
        let mut device = RecordingDevice::default();
        let mut atlas = atlas_256(&mut device);
        device.take_commands();
        let image = Image::from_rgba(16, 16, vec![7; 16 * 16 * 4]).unwrap();

        atlas.add_image(&mut device, &image, 240, 240);
        atlas.add_image(&mut device, &image, 241, 0);
        atlas.add_image(&mut device, &image, u32::MAX, 0);
        atlas.add_image(&mut device, &Image::empty(), 0, 0);

        assert_eq!(device.atlas_writes(), 1);
        assert_eq!(
            device.commands()[0],
            DeviceCommand::WriteAtlas {
                x: 240,
                y: 240,
                width: 16,
                height: 16,
                first_texel: [7; 4],
                len: 16 * 16 * 4
            }
        );
    }

    #[test]
    fn test_fill_removed_writes_red() {
        let mut device = RecordingDevice::default();
        let mut atlas = atlas_256(&mut device);
        device.take_commands();

        atlas.fill_removed(&mut device, 8, 4, 2, 3);
        atlas.fill_removed(&mut device, 0, 0, 0, 3);
        assert_eq!(
            device.commands(),
            &[DeviceCommand::WriteAtlas {
                x: 8,
                y: 4,
                width: 2,
                height: 3,
                first_texel: [0xff, 0x00, 0x00, 0xff],
                len: 2 * 3 * 4
            }]
        );
    }
}
