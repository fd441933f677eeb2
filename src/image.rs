//! Owned pixel buffers for glyph bitmaps and atlas pages.

use std::path::Path;

use crate::color;
use crate::error::Result;
use crate::geom::IVec2;

/// A grayscale (1 component) or RGBA (4 component) pixel buffer.
///
/// Pixels are row-major, top-down: `(x, y)` starts at
/// `(y * width + x) * components`. The buffer is exclusively owned; images
/// move, they are never aliased.
pub struct Image {
    width: i32,
    height: i32,
    components: i32,
    data: Vec<u8>,
}

impl Image {
    /// A zero-filled image. `components` must be 1 or 4.
    pub fn new(width: i32, height: i32, components: i32) -> Self {
        debug_assert!(width >= 0 && height >= 0);
        debug_assert!(components == 1 || components == 4);
        Self {
            width,
            height,
            components,
            data: vec![0; (width * height * components) as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    #[inline]
    pub fn components(&self) -> i32 {
        self.components
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The components of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> &[u8] {
        let i = ((y * self.width + x) * self.components) as usize;
        &self.data[i..i + self.components as usize]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: i32, y: i32) -> &mut [u8] {
        let i = ((y * self.width + x) * self.components) as usize;
        &mut self.data[i..i + self.components as usize]
    }

    /// Copies `src` into this image with its top-left corner at `pos`.
    ///
    /// Component counts must match and `pos + src.size()` must stay inside
    /// this image; both are contract violations and panic.
    pub fn paste(&mut self, src: &Image, pos: IVec2) {
        assert_eq!(src.components, self.components);
        assert!(pos.x >= 0 && pos.y >= 0);
        assert!(pos.x + src.width <= self.width && pos.y + src.height <= self.height);

        let row = (src.width * src.components) as usize;
        for y in 0..src.height {
            let s = (y * src.width * src.components) as usize;
            let d = (((pos.y + y) * self.width + pos.x) * self.components) as usize;
            self.data[d..d + row].copy_from_slice(&src.data[s..s + row]);
        }
    }

    /// In-place separable triangular blur of the given radius. Grayscale
    /// only; edges clamp to the border. Each axis convolves with the tent
    /// kernel `(1, 2, .., r+1, .., 2, 1) / (r+1)^2`.
    pub fn blur_triangle(&mut self, radius: i32) {
        debug_assert!(radius >= 0);
        debug_assert_eq!(self.components, 1);
        if radius <= 0 || self.data.is_empty() {
            return;
        }

        let norm = ((radius + 1) * (radius + 1)) as u32;
        let mut tmp = vec![0u8; self.data.len()];

        for y in 0..self.height {
            for x in 0..self.width {
                let mut acc = 0u32;
                for d in -radius..=radius {
                    let sx = (x + d).clamp(0, self.width - 1);
                    let weight = (radius + 1 - d.abs()) as u32;
                    acc += weight * u32::from(self.data[(y * self.width + sx) as usize]);
                }
                tmp[(y * self.width + x) as usize] = (acc / norm) as u8;
            }
        }

        for y in 0..self.height {
            for x in 0..self.width {
                let mut acc = 0u32;
                for d in -radius..=radius {
                    let sy = (y + d).clamp(0, self.height - 1);
                    let weight = (radius + 1 - d.abs()) as u32;
                    acc += weight * u32::from(tmp[(sy * self.width + x) as usize]);
                }
                self.data[(y * self.width + x) as usize] = (acc / norm) as u8;
            }
        }
    }

    /// A new RGBA image: every gray value scales the alpha of `color`
    /// while RGB comes from `color` untouched. `color` is `0xAABBGGRR`.
    pub fn to_rgba(&self, color: u32) -> Image {
        debug_assert_eq!(self.components, 1);
        let mut out = Image::new(self.width, self.height, 4);
        let r = color::red(color) as u8;
        let g = color::green(color) as u8;
        let b = color::blue(color) as u8;
        let a = color::alpha(color);
        for (i, &mask) in self.data.iter().enumerate() {
            let px = &mut out.data[i * 4..i * 4 + 4];
            px[0] = r;
            px[1] = g;
            px[2] = b;
            px[3] = (u32::from(mask) * a / 255) as u8;
        }
        out
    }

    /// Writes the image as an 8-bit PNG.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let color = match self.components {
            1 => image::ColorType::L8,
            _ => image::ColorType::Rgba8,
        };
        image::save_buffer(
            path,
            &self.data,
            self.width as u32,
            self.height as u32,
            color,
        )?;
        Ok(())
    }

    /// Reads a PNG from disk, converting to RGBA.
    pub fn open_png(path: &Path) -> Result<Image> {
        let decoded = image::open(path)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        Ok(Image {
            width: width as i32,
            height: height as i32,
            components: 4,
            data: decoded.into_raw(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_addressing_is_row_major() {
        let mut img = Image::new(4, 3, 1);
        img.pixel_mut(2, 1)[0] = 7;
        assert_eq!(img.data()[1 * 4 + 2], 7);
        assert_eq!(img.pixel(2, 1)[0], 7);
    }

    #[test]
    fn paste_copies_region_and_leaves_rest() {
        let mut src = Image::new(2, 2, 1);
        src.data_mut().copy_from_slice(&[1, 2, 3, 4]);

        let mut dst = Image::new(4, 4, 1);
        dst.paste(&src, IVec2::new(1, 2));

        assert_eq!(dst.pixel(1, 2)[0], 1);
        assert_eq!(dst.pixel(2, 2)[0], 2);
        assert_eq!(dst.pixel(1, 3)[0], 3);
        assert_eq!(dst.pixel(2, 3)[0], 4);
        assert_eq!(dst.pixel(0, 0)[0], 0);
        assert_eq!(dst.pixel(3, 3)[0], 0);
    }

    #[test]
    #[should_panic]
    fn paste_rejects_overflow() {
        let src = Image::new(3, 3, 1);
        let mut dst = Image::new(4, 4, 1);
        dst.paste(&src, IVec2::new(2, 2));
    }

    #[test]
    fn blur_radius_zero_is_identity() {
        let mut img = Image::new(3, 3, 1);
        img.pixel_mut(1, 1)[0] = 200;
        let before = img.data().to_vec();
        img.blur_triangle(0);
        assert_eq!(img.data(), &before[..]);
    }

    #[test]
    fn blur_keeps_dimensions_and_spreads_symmetrically() {
        let mut img = Image::new(5, 5, 1);
        img.pixel_mut(2, 2)[0] = 255;
        img.blur_triangle(1);

        assert_eq!(img.size(), IVec2::new(5, 5));
        assert_eq!(img.pixel(1, 2)[0], img.pixel(3, 2)[0]);
        assert_eq!(img.pixel(2, 1)[0], img.pixel(2, 3)[0]);
        assert!(img.pixel(2, 2)[0] > img.pixel(1, 2)[0]);
        assert_eq!(img.pixel(0, 0)[0], 0);
    }

    #[test]
    fn to_rgba_scales_alpha_only() {
        let mut img = Image::new(2, 1, 1);
        img.pixel_mut(0, 0)[0] = 255;
        img.pixel_mut(1, 0)[0] = 128;

        let rgba = img.to_rgba(0x80FF40C0);
        assert_eq!(rgba.components(), 4);
        assert_eq!(rgba.pixel(0, 0), &[0xC0, 0x40, 0xFF, 0x80]);
        assert_eq!(rgba.pixel(1, 0), &[0xC0, 0x40, 0xFF, (128u32 * 0x80 / 255) as u8]);
    }
}
