//! Image and resource loading

mod decoder;
mod resource;

pub use decoder::{DecodeError, ImageDecoder, MAX_CURSOR_SIZE};
pub use resource::{FileResourceLoader, MemoryResourceLoader, ResourceError, ResourceLoader};

use crate::core::texture::RGBA8_BYTES;

/// Failure to load a named image.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Open `name` through `resources` and decode it with the decoder its
/// extension selects.
pub fn load_raw(resources: &dyn ResourceLoader, name: &str) -> Result<RawImage, LoadError> {
    let reader = resources.open(name)?;
    Ok(ImageDecoder::for_name(name).decode(reader)?)
}

/// Decoded pixels straight out of an [`ImageDecoder`].
///
/// Rows are tightly packed RGBA8, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// An image ready to be placed into the atlas.
///
/// A zero-sized image stands in for one that failed to load; placing it is
/// a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    /// The zero-sized placeholder image.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap tightly packed RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, DecodeError> {
        let expected = width as usize * height as usize * RGBA8_BYTES as usize;
        if pixels.len() != expected {
            return Err(DecodeError::SizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<RawImage> for Image {
    fn from(raw: RawImage) -> Self {
        Self {
            width: raw.width,
            height: raw.height,
            pixels: raw.pixels,
        }
    }
}
