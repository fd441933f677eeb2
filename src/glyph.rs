//! Glyph index entries and the transient rendered form that feeds the
//! packer.

use crate::geom::{IVec2, IntRect};
use crate::image::Image;

/// One entry of a sprite-font index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    /// Sub-rectangle of the atlas page holding the bitmap.
    pub rect: IntRect,
    /// Pen-to-top-left displacement at render time: `x` is the horizontal
    /// bearing, `y` is ascender minus the vertical bearing.
    pub offset: IVec2,
    /// Horizontal pen advance in pixels.
    pub advance_x: i32,
    /// Index of the atlas page holding `rect`.
    pub page: i32,
}

impl Default for Glyph {
    fn default() -> Self {
        Self {
            rect: IntRect::ZERO,
            offset: IVec2::ZERO,
            advance_x: 0,
            page: i32::MAX,
        }
    }
}

/// A rasterized glyph on its way into the packer. Owns its bitmap, so it
/// is moved into the packer and onward, never copied.
///
/// The image is grayscale for the simple and contour recipes and RGBA for
/// the outlined one. `page` and `rect` stay unset until packing.
pub(crate) struct RenderedGlyph {
    pub image: Image,
    pub code_point: u32,
    pub offset: IVec2,
    pub advance_x: i32,
    /// Page index once packed; -1 until then.
    pub page: i32,
    pub rect: IntRect,
}

impl RenderedGlyph {
    pub fn new(image: Image, code_point: u32, offset: IVec2, advance_x: i32) -> Self {
        Self {
            image,
            code_point,
            offset,
            advance_x,
            page: -1,
            rect: IntRect::ZERO,
        }
    }

    /// Grows the bitmap by `radius` on every side and tent-blurs it. The
    /// blurred form sits behind a sharp copy as a shadow, so the offset
    /// moves back by the radius on both axes.
    pub fn blur(&mut self, radius: i32) {
        debug_assert!(radius >= 0);
        debug_assert_eq!(self.image.components(), 1);
        if radius <= 0 {
            return;
        }

        let mut expanded = Image::new(
            self.image.width() + radius * 2,
            self.image.height() + radius * 2,
            self.image.components(),
        );
        expanded.paste(&self.image, IVec2::splat(radius));
        expanded.blur_triangle(radius);
        self.image = expanded;
        self.offset -= radius;
    }
}
