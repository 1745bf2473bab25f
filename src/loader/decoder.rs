//! Image decoding
//!
//! Decoding goes through the `image` crate. TGA files have no magic number,
//! so they are selected by extension; everything else is sniffed from its
//! header.

use std::io::Read;
use std::path::Path;

use super::RawImage;

/// Failure to decode an image.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to read image data")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("image has no pixels")]
    Empty,
    #[error("{width}x{height} image exceeds the cursor size limit of {max}x{max}")]
    CursorTooLarge { width: u32, height: u32, max: u32 },
    #[error("pixel buffer holds {actual} bytes, {width}x{height} RGBA8 needs {expected}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Largest cursor edge native cursor APIs accept.
pub const MAX_CURSOR_SIZE: u32 = u16::MAX as u32;

/// Decoder variant, picked from the resource name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageDecoder {
    /// Truevision TGA.
    Tga,
    /// Any format the `image` crate can recognise from its header.
    Standard,
}

impl ImageDecoder {
    /// Pick the decoder for `name` by its extension.
    pub fn for_name(name: &str) -> Self {
        let is_tga = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("tga"));
        if is_tga {
            ImageDecoder::Tga
        } else {
            ImageDecoder::Standard
        }
    }

    /// Decode the whole stream into top-down RGBA8 rows.
    pub fn decode<R: Read>(&self, mut reader: R) -> Result<RawImage, DecodeError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let decoded = match self {
            ImageDecoder::Tga => image::load_from_memory_with_format(&bytes, image::ImageFormat::Tga)?,
            ImageDecoder::Standard => image::load_from_memory(&bytes)?,
        };
        let rgba = decoded.into_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(DecodeError::Empty);
        }

        Ok(RawImage {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Decode an image for use as a mouse cursor.
    pub fn decode_cursor<R: Read>(&self, reader: R) -> Result<RawImage, DecodeError> {
        let raw = self.decode(reader)?;
        if raw.width > MAX_CURSOR_SIZE || raw.height > MAX_CURSOR_SIZE {
            return Err(DecodeError::CursorTooLarge {
                width: raw.width,
                height: raw.height,
                max: MAX_CURSOR_SIZE,
            });
        }
        Ok(raw)
    }
}
