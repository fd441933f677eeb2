//! Build settings for the three sprite-font recipes.

use std::path::PathBuf;

use crate::geom::IVec2;

/// Options every recipe shares.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Vector font file (TTF/OTF) to rasterize.
    pub src_path: PathBuf,
    /// Requested glyph height in pixels. The rendered height usually
    /// differs a little from the request.
    pub height: i32,
    /// When false, glyphs are hinted and rendered monochrome.
    pub anti_aliasing: bool,
    /// Dimensions of every atlas page.
    pub texture_size: IVec2,
}

impl Settings {
    pub fn new(src_path: impl Into<PathBuf>) -> Self {
        Self {
            src_path: src_path.into(),
            height: 20,
            anti_aliasing: true,
            texture_size: IVec2::new(1024, 1024),
        }
    }
}

/// Plain rendering, optionally blurred into a shadow.
#[derive(Clone, Debug)]
pub struct SimpleSettings {
    pub base: Settings,
    pub blur_radius: i32,
    /// `0xAABBGGRR`.
    pub color: u32,
}

impl SimpleSettings {
    pub fn new(src_path: impl Into<PathBuf>) -> Self {
        Self {
            base: Settings::new(src_path),
            blur_radius: 0,
            color: 0xFFFF_FFFF,
        }
    }
}

/// Only the stroked outline of each glyph.
#[derive(Clone, Debug)]
pub struct ContourSettings {
    pub base: Settings,
    /// Stroke thickness in pixels.
    pub thickness: f32,
    pub blur_radius: i32,
    /// `0xAABBGGRR`.
    pub color: u32,
}

impl ContourSettings {
    pub fn new(src_path: impl Into<PathBuf>) -> Self {
        Self {
            base: Settings::new(src_path),
            thickness: 1.2,
            blur_radius: 0,
            color: 0xFFFF_FFFF,
        }
    }
}

/// Solid body with a colored border around it.
#[derive(Clone, Debug)]
pub struct OutlinedSettings {
    pub base: Settings,
    /// Body color, `0xAABBGGRR`.
    pub main_color: u32,
    /// Border color, `0xAABBGGRR`.
    pub outline_color: u32,
    /// Border thickness in pixels.
    pub outline_thickness: f32,
    pub outline_blur_radius: i32,
}

impl OutlinedSettings {
    pub fn new(src_path: impl Into<PathBuf>) -> Self {
        Self {
            base: Settings::new(src_path),
            main_color: 0xFFFF_FFFF,
            outline_color: 0xFF00_0000,
            outline_thickness: 2.0,
            outline_blur_radius: 0,
        }
    }
}
