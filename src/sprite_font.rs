//! The sprite-font: building from a vector font, saving, loading.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use rustc_hash::FxHashMap;
use tracing::{debug, error};
use xmlwriter::{Indent, Options, XmlWriter};

use crate::error::{Error, Result};
use crate::face::{round_26_6, FontFace, FontLibrary};
use crate::geom::{IVec2, IntRect};
use crate::glyph::Glyph;
use crate::packer::GlyphPacker;
use crate::raster::Recipe;
use crate::settings::{ContourSettings, OutlinedSettings, SimpleSettings};
use crate::texture::{Texture, TextureCache};

/// A bitmap font: atlas page textures plus an index mapping code points
/// to their sub-rectangles and layout metrics.
///
/// Page textures are shared with the [`TextureCache`]; the font itself is
/// move-only.
pub struct SpriteFont {
    face_name: String,
    size: i32,
    line_height: i32,
    textures: Vec<Arc<Texture>>,
    glyphs: FxHashMap<u32, Glyph>,
}

impl SpriteFont {
    fn empty() -> Self {
        Self {
            face_name: String::new(),
            size: 0,
            line_height: 0,
            textures: Vec::new(),
            glyphs: FxHashMap::default(),
        }
    }

    /// Builds a plain sprite-font, optionally blurred into a shadow.
    ///
    /// On a global failure (unreadable font, broken charmap) the error is
    /// logged and the returned font is empty but valid. Failures on
    /// individual glyphs only lose those glyphs.
    pub fn build_simple(
        settings: &SimpleSettings,
        cache: &mut TextureCache,
        generation_time_ms: Option<&mut i64>,
    ) -> Self {
        Self::build(Recipe::Simple(settings), cache, generation_time_ms)
    }

    /// Builds a sprite-font of stroked glyph outlines.
    pub fn build_contour(
        settings: &ContourSettings,
        cache: &mut TextureCache,
        generation_time_ms: Option<&mut i64>,
    ) -> Self {
        Self::build(Recipe::Contour(settings), cache, generation_time_ms)
    }

    /// Builds a sprite-font of solid bodies with colored borders.
    pub fn build_outlined(
        settings: &OutlinedSettings,
        cache: &mut TextureCache,
        generation_time_ms: Option<&mut i64>,
    ) -> Self {
        Self::build(Recipe::Outlined(settings), cache, generation_time_ms)
    }

    fn build(
        recipe: Recipe<'_>,
        cache: &mut TextureCache,
        generation_time_ms: Option<&mut i64>,
    ) -> Self {
        let begin = Instant::now();

        let font = match Self::generate(&recipe, cache) {
            Ok(font) => font,
            Err(e) => {
                error!(
                    "sprite font generation from {} failed: {}",
                    recipe.base().src_path.display(),
                    e
                );
                Self::empty()
            }
        };

        let elapsed = begin.elapsed().as_millis() as i64;
        if let Some(out) = generation_time_ms {
            *out = elapsed;
        }
        debug!(
            "{} | generated in {} ms",
            recipe.base().src_path.display(),
            elapsed
        );
        font
    }

    fn generate(recipe: &Recipe<'_>, cache: &mut TextureCache) -> Result<Self> {
        let base = recipe.base();
        let library = FontLibrary::new()?;
        let face = FontFace::open(&library, &base.src_path, base.height)?;

        let mut packer = GlyphPacker::with_capacity(face.num_glyphs());
        let (mut code_point, mut glyph_index) = face.first_char();
        while glyph_index != 0 {
            match recipe.render(&library, &face, code_point, glyph_index) {
                Ok(rendered) => packer.add(rendered),
                Err(e) => error!("glyph U+{:04X}: {}", code_point, e),
            }
            (code_point, glyph_index) = face.next_char(code_point);
        }

        let (rendered_glyphs, pages) =
            packer.pack(base.texture_size, recipe.page_components());

        let mut font = Self::empty();
        font.face_name = face.family_name().unwrap_or_default();
        font.size = base.height;
        font.line_height = recipe.adjust_line_height(round_26_6(face.height_26_6()));

        for rendered in &rendered_glyphs {
            if rendered.page < 0 {
                // The packer left it unplaced: it cannot fit a page even
                // alone, so it is dropped from the index.
                let e = Error::OversizedGlyph {
                    code_point: rendered.code_point,
                    width: rendered.image.width(),
                    height: rendered.image.height(),
                    page_width: base.texture_size.x,
                    page_height: base.texture_size.y,
                };
                error!("glyph U+{:04X}: {}", rendered.code_point, e);
                continue;
            }
            font.glyphs.insert(
                rendered.code_point,
                Glyph {
                    rect: rendered.rect,
                    offset: rendered.offset,
                    advance_x: rendered.advance_x,
                    page: rendered.page,
                },
            );
        }

        for (i, page) in pages.into_iter().enumerate() {
            let texture = Arc::new(Texture::from_image(recipe.colorize_page(page)));
            cache.insert(
                format!("{}#{}", base.src_path.display(), i),
                &texture,
            );
            font.textures.push(texture);
        }

        Ok(font)
    }

    /// Loads a sprite-font from an index file saved by [`SpriteFont::save`].
    /// Page textures are acquired through the cache. On failure the error
    /// is logged and the returned font is empty but valid.
    ///
    /// Kerning pairs present in the index are not read back.
    pub fn load(path: &Path, cache: &mut TextureCache) -> Self {
        match Self::load_impl(path, cache) {
            Ok(font) => font,
            Err(e) => {
                error!("failed to load sprite font {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    fn load_impl(path: &Path, cache: &mut TextureCache) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.into(),
            source,
        })?;
        let doc = roxmltree::Document::parse(&text)?;

        let root = doc.root_element();
        if root.tag_name().name() != "font" {
            return Err(Error::IndexParse {
                path: path.into(),
                reason: "root element is not <font>".into(),
            });
        }
        let pages_node = root
            .children()
            .find(|n| n.has_tag_name("pages"))
            .ok_or_else(|| Error::IndexParse {
                path: path.into(),
                reason: "missing <pages> element".into(),
            })?;

        let mut font = Self::empty();

        if let Some(info) = root.children().find(|n| n.has_tag_name("info")) {
            font.face_name = info.attribute("face").unwrap_or_default().to_string();
            font.size = attr_i32(&info, "size");
        }

        let mut page_count = 0;
        if let Some(common) = root.children().find(|n| n.has_tag_name("common")) {
            font.line_height = attr_i32(&common, "lineHeight");
            page_count = attr_i32(&common, "pages");
        }

        let directory = path.parent().unwrap_or_else(|| Path::new(""));
        let mut page_nodes = pages_node.children().filter(|n| n.has_tag_name("page"));
        for _ in 0..page_count {
            let page = page_nodes.next().ok_or_else(|| Error::IndexParse {
                path: path.into(),
                reason: "fewer <page> elements than the declared page count".into(),
            })?;
            let file = page.attribute("file").unwrap_or_default();
            let texture_path = directory.join(file);
            let texture = cache
                .get(&texture_path)
                .ok_or(Error::PageTexture(texture_path))?;
            font.textures.push(texture);
        }

        if let Some(chars) = root.children().find(|n| n.has_tag_name("chars")) {
            for node in chars.children().filter(|n| n.has_tag_name("char")) {
                let glyph = Glyph {
                    rect: IntRect::new(
                        IVec2::new(attr_i32(&node, "x"), attr_i32(&node, "y")),
                        IVec2::new(attr_i32(&node, "width"), attr_i32(&node, "height")),
                    ),
                    offset: IVec2::new(attr_i32(&node, "xoffset"), attr_i32(&node, "yoffset")),
                    advance_x: attr_i32(&node, "advance_x"),
                    page: attr_i32(&node, "page"),
                };
                // Duplicate ids keep the last occurrence.
                font.glyphs.insert(attr_u32(&node, "id"), glyph);
            }
        }

        Ok(font)
    }

    /// Saves the font: one PNG per page next to the index, then the index
    /// itself. The extension, when present, must be `fnt`. Failures are
    /// logged and abort the save; pages already written stay on disk.
    pub fn save(&self, path: &Path) {
        if let Err(e) = self.save_impl(path) {
            error!("failed to save sprite font {}: {}", path.display(), e);
        }
    }

    fn save_impl(&self, path: &Path) -> Result<()> {
        if let Some(ext) = path.extension() {
            if ext != "fnt" {
                return Err(Error::UnsupportedExtension(path.into()));
            }
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let directory = path.parent().unwrap_or_else(|| Path::new(""));

        for (i, texture) in self.textures.iter().enumerate() {
            texture
                .image()
                .save_png(&directory.join(format!("{stem}_{i}.png")))?;
        }

        let mut w = XmlWriter::new(Options {
            indent: Indent::Spaces(4),
            ..Options::default()
        });
        w.write_declaration();
        w.start_element("font");

        w.start_element("info");
        w.write_attribute("face", &self.face_name);
        w.write_attribute("size", &self.size);
        w.end_element();

        w.start_element("chars");
        w.write_attribute("count", &self.glyphs.len());
        let mut code_points: Vec<u32> = self.glyphs.keys().copied().collect();
        code_points.sort_unstable();
        for code_point in code_points {
            let glyph = &self.glyphs[&code_point];
            w.start_element("char");
            w.write_attribute("id", &code_point);
            w.write_attribute("x", &glyph.rect.pos.x);
            w.write_attribute("y", &glyph.rect.pos.y);
            w.write_attribute("width", &glyph.rect.size.x);
            w.write_attribute("height", &glyph.rect.size.y);
            w.write_attribute("xoffset", &glyph.offset.x);
            w.write_attribute("yoffset", &glyph.offset.y);
            w.write_attribute("advance_x", &glyph.advance_x);
            w.write_attribute("page", &glyph.page);
            w.end_element();
        }
        w.end_element();

        w.start_element("common");
        w.write_attribute("lineHeight", &self.line_height);
        w.write_attribute("pages", &self.textures.len());
        w.end_element();

        w.start_element("pages");
        for i in 0..self.textures.len() {
            w.start_element("page");
            w.write_attribute("id", &i);
            w.write_attribute("file", &format!("{stem}_{i}.png"));
            w.end_element();
        }
        w.end_element();

        std::fs::write(path, w.end_document()).map_err(|source| Error::Io {
            path: path.into(),
            source,
        })?;
        Ok(())
    }

    /// Name of the face the font was generated from.
    pub fn face_name(&self) -> &str {
        &self.face_name
    }

    /// Pixel size of the source face.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Baseline-to-baseline distance in pixels.
    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    /// Atlas pages, in page-index order.
    pub fn textures(&self) -> &[Arc<Texture>] {
        &self.textures
    }

    pub fn glyphs(&self) -> &FxHashMap<u32, Glyph> {
        &self.glyphs
    }
}

fn attr_i32(node: &roxmltree::Node, name: &str) -> i32 {
    node.attribute(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn attr_u32(node: &roxmltree::Node, name: &str) -> u32 {
    node.attribute(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
