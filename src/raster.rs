//! The three glyph rasterization recipes.
//!
//! Every recipe loads one glyph into the face's slot, turns it into an
//! owned bitmap and fixes up the metrics the stroker leaves stale.

use freetype::bitmap::PixelMode;
use freetype::face::LoadFlag;
use freetype::{ffi, Bitmap, RenderMode};

use crate::color;
use crate::error::Result;
use crate::face::{round_26_6, FontFace, FontLibrary};
use crate::geom::IVec2;
use crate::glyph::RenderedGlyph;
use crate::image::Image;
use crate::settings::{ContourSettings, OutlinedSettings, Settings, SimpleSettings};

/// Ties a settings variant to its rasterization strategy so the build
/// loop stays generic over the recipe.
pub(crate) enum Recipe<'a> {
    Simple(&'a SimpleSettings),
    Contour(&'a ContourSettings),
    Outlined(&'a OutlinedSettings),
}

impl Recipe<'_> {
    pub fn base(&self) -> &Settings {
        match self {
            Recipe::Simple(s) => &s.base,
            Recipe::Contour(s) => &s.base,
            Recipe::Outlined(s) => &s.base,
        }
    }

    /// Component count of the atlas pages this recipe produces.
    pub fn page_components(&self) -> i32 {
        match self {
            Recipe::Simple(_) | Recipe::Contour(_) => 1,
            Recipe::Outlined(_) => 4,
        }
    }

    pub fn render(
        &self,
        library: &FontLibrary,
        face: &FontFace,
        code_point: u32,
        glyph_index: u32,
    ) -> Result<RenderedGlyph> {
        match self {
            Recipe::Simple(s) => render_simple(face, s, code_point, glyph_index),
            Recipe::Contour(s) => render_contour(library, face, s, code_point, glyph_index),
            Recipe::Outlined(s) => render_outlined(library, face, s, code_point, glyph_index),
        }
    }

    /// Stroked recipes grow the text vertically as well; the correction
    /// mirrors the per-glyph advance fixups.
    pub fn adjust_line_height(&self, line_height: i32) -> i32 {
        match self {
            Recipe::Simple(_) => line_height,
            Recipe::Contour(s) => (line_height as f32 + s.thickness) as i32,
            Recipe::Outlined(s) => line_height + (s.outline_thickness * 2.0) as i32,
        }
    }

    /// Turns a finished page into the RGBA image the texture will hold.
    pub fn colorize_page(&self, page: Image) -> Image {
        match self {
            Recipe::Simple(s) => page.to_rgba(s.color),
            Recipe::Contour(s) => page.to_rgba(s.color),
            // Outlined pages are composited in RGBA already.
            Recipe::Outlined(_) => page,
        }
    }
}

/// Expands a FreeType bitmap into an owned grayscale image. Mono bitmaps
/// pack eight pixels per byte; every bit becomes 0 or 255.
fn bitmap_to_image(bitmap: &Bitmap) -> Image {
    let width = bitmap.width();
    let rows = bitmap.rows();
    let mut out = Image::new(width, rows, 1);
    if width == 0 || rows == 0 {
        return out;
    }

    let pitch = bitmap.pitch();
    let src = bitmap.buffer();
    let mono = matches!(bitmap.pixel_mode(), Ok(PixelMode::Mono));

    for y in 0..rows {
        let row = &src[(y * pitch) as usize..];
        for x in 0..width {
            out.pixel_mut(x, y)[0] = if mono {
                let byte = row[(x >> 3) as usize];
                let mask = 0b1000_0000 >> (x & 7);
                if byte & mask != 0 {
                    255
                } else {
                    0
                }
            } else {
                row[x as usize]
            };
        }
    }

    out
}

/// Offset and advance for the glyph currently in the slot.
fn slot_metrics(face: &FontFace) -> (IVec2, i32) {
    let metrics = face.glyph().metrics();
    let offset = IVec2::new(
        round_26_6(i64::from(metrics.horiBearingX)),
        round_26_6(face.ascender_26_6() - i64::from(metrics.horiBearingY)),
    );
    (offset, round_26_6(i64::from(metrics.horiAdvance)))
}

fn render_mode(settings: &Settings) -> RenderMode {
    if settings.anti_aliasing {
        RenderMode::Normal
    } else {
        RenderMode::Mono
    }
}

fn hinting_target(settings: &Settings) -> LoadFlag {
    if settings.anti_aliasing {
        LoadFlag::empty()
    } else {
        LoadFlag::TARGET_MONO
    }
}

fn render_simple(
    face: &FontFace,
    settings: &SimpleSettings,
    code_point: u32,
    glyph_index: u32,
) -> Result<RenderedGlyph> {
    let mut flags = LoadFlag::RENDER;
    if !settings.base.anti_aliasing {
        // One bit per pixel, hinted for it.
        flags |= LoadFlag::MONOCHROME | LoadFlag::TARGET_MONO;
    }
    face.load_glyph(glyph_index, flags)?;

    let image = bitmap_to_image(&face.glyph().bitmap());
    let (offset, advance_x) = slot_metrics(face);

    let mut glyph = RenderedGlyph::new(image, code_point, offset, advance_x);
    glyph.blur(settings.blur_radius);
    Ok(glyph)
}

fn render_contour(
    library: &FontLibrary,
    face: &FontFace,
    settings: &ContourSettings,
    code_point: u32,
    glyph_index: u32,
) -> Result<RenderedGlyph> {
    face.load_glyph(glyph_index, hinting_target(&settings.base))?;

    // Replace the shape with its stroked outline. The stroker radius is
    // the half-stroke, hence thickness times 64/2.
    let stroker = library.new_stroker()?;
    stroker.set(
        (settings.thickness * 32.0) as ffi::FT_Fixed,
        freetype::StrokerLineCap::Round,
        freetype::StrokerLineJoin::Round,
        0,
    );
    let stroked = face.glyph().get_glyph()?.stroke(&stroker)?;
    let bitmap_glyph = stroked.to_bitmap(render_mode(&settings.base), None)?;
    let image = bitmap_to_image(&bitmap_glyph.bitmap());

    let (offset, advance_x) = slot_metrics(face);
    // Stroking grows the shape by about half the thickness per side but
    // leaves the slot metrics alone.
    let advance_x = (advance_x as f32 + settings.thickness) as i32;

    let mut glyph = RenderedGlyph::new(image, code_point, offset, advance_x);
    glyph.blur(settings.blur_radius);
    Ok(glyph)
}

fn render_outlined(
    library: &FontLibrary,
    face: &FontFace,
    settings: &OutlinedSettings,
    code_point: u32,
    glyph_index: u32,
) -> Result<RenderedGlyph> {
    face.load_glyph(glyph_index, hinting_target(&settings.base))?;
    let mode = render_mode(&settings.base);

    let (mut offset, advance) = slot_metrics(face);
    let advance_x = advance + (settings.outline_thickness * 2.0) as i32;

    // Body pass: the glyph as-is.
    let inner_glyph = face.glyph().get_glyph()?.to_bitmap(mode, None)?;
    let inner = bitmap_to_image(&inner_glyph.bitmap());
    let inner_left = inner_glyph.left();
    let inner_top = inner_glyph.top();

    // Border pass: the shape inflated outward by the outline thickness.
    let stroker = library.new_stroker()?;
    stroker.set(
        (settings.outline_thickness * 64.0) as ffi::FT_Fixed,
        freetype::StrokerLineCap::Round,
        freetype::StrokerLineJoin::Round,
        0,
    );
    let outer_glyph = face
        .glyph()
        .get_glyph()?
        .stroke_border(&stroker, false)?
        .to_bitmap(mode, None)?;
    let mut outer = bitmap_to_image(&outer_glyph.bitmap());
    let outer_left = outer_glyph.left();
    let outer_top = outer_glyph.top();

    // Body position inside the border bitmap. It is not always equal to
    // the outline thickness, so derive it from the reported origins.
    let mut delta = IVec2::new(inner_left - outer_left, outer_top - inner_top);

    let blur = settings.outline_blur_radius;
    if blur > 0 {
        let mut expanded = Image::new(outer.width() + blur * 2, outer.height() + blur * 2, 1);
        expanded.paste(&outer, IVec2::splat(blur));
        expanded.blur_triangle(blur);
        outer = expanded;
        offset -= blur;
        delta = delta + blur;
    }

    // With a blurred border the body stays visible even in matching
    // colors, which is what a soft shadow under an outlined glyph wants.
    let mut image = outer.to_rgba(settings.outline_color);

    if settings.main_color != settings.outline_color {
        composite_body(&mut image, &inner, delta, settings.main_color);
    }

    Ok(RenderedGlyph::new(image, code_point, offset, advance_x))
}

/// Lays the body over the border bitmap. This is a mask-weighted
/// overwrite, not alpha blending: wherever the body's coverage says so,
/// its color replaces the border pixel outright, and the partial-coverage
/// rim keeps the border showing through.
fn composite_body(image: &mut Image, body: &Image, delta: IVec2, main_color: u32) {
    for y in 0..body.height() {
        for x in 0..body.width() {
            let dx = x + delta.x;
            let dy = y + delta.y;
            if dx < 0 || dy < 0 || dx >= image.width() || dy >= image.height() {
                continue;
            }
            let mask = u32::from(body.pixel(x, y)[0]);
            let front = [
                color::red(main_color),
                color::green(main_color),
                color::blue(main_color),
                color::alpha(main_color),
            ];
            let dest = image.pixel_mut(dx, dy);
            for (channel, front_channel) in dest.iter_mut().zip(front) {
                let back = u32::from(*channel);
                *channel = ((front_channel * mask + back * (255 - mask)) / 255) as u8;
            }
        }
    }
}
