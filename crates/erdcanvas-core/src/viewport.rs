//! Viewport module for viewport-space to canvas-space transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Viewport describes where the canvas surface sits on screen and how far
/// its content is scrolled.
///
/// Pointer coordinates from the host are viewport-space; everything stored
/// in the canvas is canvas-space, anchored to the content origin and
/// invariant under scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Top-left corner of the canvas surface in viewport coordinates.
    pub surface_origin: Point,
    /// Visible size of the canvas surface.
    pub surface_size: Size,
    /// Current scroll offset of the canvas content.
    pub scroll_offset: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            surface_origin: Point::ZERO,
            surface_size: Size::new(1280.0, 800.0),
            scroll_offset: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn new(surface_origin: Point, surface_size: Size) -> Self {
        Self {
            surface_origin,
            surface_size,
            scroll_offset: Vec2::ZERO,
        }
    }

    /// Get the transform from viewport coordinates to canvas coordinates.
    ///
    /// `canvas = client - surface_origin + scroll_offset`
    pub fn transform(&self) -> Affine {
        Affine::translate(self.scroll_offset - self.surface_origin.to_vec2())
    }

    /// Get the inverse transform, from canvas coordinates back to the viewport.
    pub fn inverse_transform(&self) -> Affine {
        Affine::translate(self.surface_origin.to_vec2() - self.scroll_offset)
    }

    /// Convert a viewport point to canvas coordinates.
    pub fn client_to_canvas(&self, client: Point) -> Point {
        self.transform() * client
    }

    /// Convert a canvas point to viewport coordinates.
    pub fn canvas_to_client(&self, canvas: Point) -> Point {
        self.inverse_transform() * canvas
    }

    /// The visible surface in viewport coordinates.
    pub fn surface_rect(&self) -> Rect {
        Rect::from_origin_size(self.surface_origin, self.surface_size)
    }

    /// Check whether a viewport point lies over the canvas surface.
    pub fn contains_client(&self, client: Point) -> bool {
        let rect = self.surface_rect();
        client.x >= rect.x0 && client.x <= rect.x1 && client.y >= rect.y0 && client.y <= rect.y1
    }

    /// Set the scroll offset.
    pub fn scroll_to(&mut self, offset: Vec2) {
        self.scroll_offset = offset;
    }

    /// Move the surface (e.g. after the host layout changed).
    pub fn set_surface(&mut self, origin: Point, size: Size) {
        self.surface_origin = origin;
        self.surface_size = size;
    }
}
