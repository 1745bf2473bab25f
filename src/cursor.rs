//! Mouse cursors
//!
//! A [`MouseCursor`] is a decoded image plus hotspot, independent of any
//! windowing system. Showing it is delegated to a [`CursorSink`].

use std::sync::Arc;

use crate::loader::{DecodeError, RawImage, ResourceError};

/// Failure to create or show a mouse cursor.
#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("hotspot ({x}, {y}) lies outside the {width}x{height} cursor image")]
    HotspotOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("platform rejected cursor: {0}")]
    Platform(String),
}

/// A cursor image with its hotspot, measured from the top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseCursor {
    id: u64,
    width: u32,
    height: u32,
    hotspot: (u32, u32),
    rgba: Arc<[u8]>,
}

impl MouseCursor {
    pub(crate) fn new(
        id: u64,
        image: RawImage,
        hotspot_x: u32,
        hotspot_y: u32,
    ) -> Result<Self, CursorError> {
        if hotspot_x >= image.width || hotspot_y >= image.height {
            return Err(CursorError::HotspotOutOfBounds {
                x: hotspot_x,
                y: hotspot_y,
                width: image.width,
                height: image.height,
            });
        }
        Ok(Self {
            id,
            width: image.width,
            height: image.height,
            hotspot: (hotspot_x, hotspot_y),
            rgba: image.pixels.into(),
        })
    }

    /// Identifier unique among cursors created by one backend.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn hotspot(&self) -> (u32, u32) {
        self.hotspot
    }

    /// Top-down RGBA8 pixels.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

/// Receives cursor changes and applies them to the platform.
pub trait CursorSink {
    /// Show `cursor`, or restore the platform default when `None`.
    fn set_cursor(&mut self, cursor: Option<&MouseCursor>) -> Result<(), CursorError>;

    /// Drop any native cursor built for the cursor with `id`.
    ///
    /// Sinks that keep no native resources per cursor can ignore this.
    fn release(&mut self, id: u64) {
        let _ = id;
    }
}
