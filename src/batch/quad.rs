//! Quad primitive
//!
//! The unit of drawing handed to the backend by the paint engine.

use glam::Vec2;

/// Opaque white.
pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// A rectangle in normalized atlas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TexRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TexRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalize a pixel rectangle of an atlas of the given size.
    pub fn from_pixels(x: u32, y: u32, width: u32, height: u32, atlas: (u32, u32)) -> Self {
        let (aw, ah) = (atlas.0.max(1) as f32, atlas.1.max(1) as f32);
        Self {
            x: x as f32 / aw,
            y: y as f32 / ah,
            width: width as f32 / aw,
            height: height as f32 / ah,
        }
    }
}

/// A screen-space quad with per-corner colors and an atlas region.
///
/// Corner colors are ordered top-left, top-right, bottom-left, bottom-right,
/// so a quad can carry a linear gradient instead of a flat color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Top-left corner in pixels (y grows downwards).
    pub position: Vec2,
    /// Width and height in pixels.
    pub size: Vec2,
    pub colors: [[f32; 4]; 4],
    pub texture: TexRect,
}

impl Quad {
    /// A white quad sampling the atlas origin.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(width, height),
            colors: [WHITE; 4],
            texture: TexRect::default(),
        }
    }

    /// Use one flat color for all corners.
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.colors = [color; 4];
        self
    }

    /// Set each corner color explicitly.
    pub fn with_corner_colors(
        mut self,
        top_left: [f32; 4],
        top_right: [f32; 4],
        bottom_left: [f32; 4],
        bottom_right: [f32; 4],
    ) -> Self {
        self.colors = [top_left, top_right, bottom_left, bottom_right];
        self
    }

    /// Top-to-bottom gradient.
    pub fn with_vertical_gradient(self, top: [f32; 4], bottom: [f32; 4]) -> Self {
        self.with_corner_colors(top, top, bottom, bottom)
    }

    /// Left-to-right gradient.
    pub fn with_horizontal_gradient(self, left: [f32; 4], right: [f32; 4]) -> Self {
        self.with_corner_colors(left, right, left, right)
    }

    /// Sample the given atlas region.
    pub fn with_texture(mut self, texture: TexRect) -> Self {
        self.texture = texture;
        self
    }

    pub fn top_left(&self) -> [f32; 4] {
        self.colors[0]
    }

    pub fn top_right(&self) -> [f32; 4] {
        self.colors[1]
    }

    pub fn bottom_left(&self) -> [f32; 4] {
        self.colors[2]
    }

    pub fn bottom_right(&self) -> [f32; 4] {
        self.colors[3]
    }
}
