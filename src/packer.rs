//! Packs rendered glyphs into fixed-size atlas pages.

use crate::geom::{IVec2, IntRect};
use crate::glyph::RenderedGlyph;
use crate::image::Image;

/// Gap kept around every glyph so bilinear sampling cannot bleed
/// neighbors into each other.
const PADDING: i32 = 2;

#[derive(Copy, Clone)]
struct SkylineNode {
    x: i32,
    y: i32,
    width: i32,
}

/// Bottom-left skyline packer over a single page. Nodes tile `[0, width)`
/// and record the occupied height per column span.
struct Skyline {
    width: i32,
    height: i32,
    nodes: Vec<SkylineNode>,
}

impl Skyline {
    fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            nodes: vec![SkylineNode { x: 0, y: 0, width }],
        }
    }

    /// The y a rect of `width x height` would rest at when left-aligned to
    /// node `index`, or None when it cannot fit there.
    fn fit(&self, index: usize, width: i32, height: i32) -> Option<i32> {
        let x = self.nodes[index].x;
        if x + width > self.width {
            return None;
        }

        let mut y = 0;
        let mut remaining = width;
        let mut i = index;
        while remaining > 0 {
            let node = &self.nodes[i];
            y = y.max(node.y);
            if y + height > self.height {
                return None;
            }
            remaining -= node.width;
            i += 1;
        }
        Some(y)
    }

    /// Places a rect at the lowest fitting position, preferring the
    /// leftmost candidate on ties. Returns its top-left corner.
    fn place(&mut self, width: i32, height: i32) -> Option<(i32, i32)> {
        let mut best: Option<(usize, i32)> = None;
        for i in 0..self.nodes.len() {
            if let Some(y) = self.fit(i, width, height) {
                let better = match best {
                    None => true,
                    Some((best_i, best_y)) => {
                        y < best_y || (y == best_y && self.nodes[i].x < self.nodes[best_i].x)
                    }
                };
                if better {
                    best = Some((i, y));
                }
            }
        }

        let (index, y) = best?;
        let x = self.nodes[index].x;
        self.raise(
            index,
            SkylineNode {
                x,
                y: y + height,
                width,
            },
        );
        Some((x, y))
    }

    /// Inserts the new segment and re-normalizes the skyline: nodes it
    /// shadows shrink or disappear, runs of equal height merge.
    fn raise(&mut self, index: usize, node: SkylineNode) {
        self.nodes.insert(index, node);

        let mut i = index + 1;
        while i < self.nodes.len() {
            let prev_end = self.nodes[i - 1].x + self.nodes[i - 1].width;
            let current = self.nodes[i];
            if current.x >= prev_end {
                break;
            }
            let shrink = prev_end - current.x;
            if current.width <= shrink {
                self.nodes.remove(i);
            } else {
                self.nodes[i].x += shrink;
                self.nodes[i].width -= shrink;
                break;
            }
        }

        let mut i = 0;
        while i + 1 < self.nodes.len() {
            if self.nodes[i].y == self.nodes[i + 1].y {
                self.nodes[i].width += self.nodes[i + 1].width;
                self.nodes.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }
}

#[derive(Copy, Clone)]
struct PackRect {
    /// Index into the glyph list.
    id: usize,
    w: i32,
    h: i32,
}

/// Multi-page packer for rendered glyphs.
///
/// `pack` consumes the packer: the placement pass rewrites its working
/// state, so a second run would operate on garbage.
pub(crate) struct GlyphPacker {
    glyphs: Vec<RenderedGlyph>,
    rects: Vec<PackRect>,
}

impl GlyphPacker {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            glyphs: Vec::with_capacity(capacity),
            rects: Vec::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, glyph: RenderedGlyph) {
        self.rects.push(PackRect {
            id: self.glyphs.len(),
            w: glyph.image.width() + PADDING * 2,
            h: glyph.image.height() + PADDING * 2,
        });
        self.glyphs.push(glyph);
    }

    /// Packs every glyph into as many `page_size` pages as needed and
    /// pastes the bitmaps in place. Returns the glyphs (with `page` and
    /// `rect` filled in) and the pages.
    ///
    /// A glyph that cannot fit a page even alone is left unpacked,
    /// identifiable afterwards by its `page` staying -1; trying to place
    /// it would open fresh pages forever. The caller decides how to
    /// report it.
    pub fn pack(mut self, page_size: IVec2, components: i32) -> (Vec<RenderedGlyph>, Vec<Image>) {
        self.rects
            .retain(|rect| rect.w <= page_size.x && rect.h <= page_size.y);

        let mut pages = Vec::new();
        while !self.rects.is_empty() {
            let mut page = Image::new(page_size.x, page_size.y, components);
            let mut skyline = Skyline::new(page_size.x, page_size.y);

            let mut i = 0;
            while i < self.rects.len() {
                let rect = self.rects[i];
                if let Some((x, y)) = skyline.place(rect.w, rect.h) {
                    let glyph = &mut self.glyphs[rect.id];
                    let pos = IVec2::new(x + PADDING, y + PADDING);
                    page.paste(&glyph.image, pos);
                    glyph.page = pages.len() as i32;
                    glyph.rect = IntRect::new(pos, glyph.image.size());
                    // Swap-and-pop keeps the scan index in place.
                    self.rects.swap_remove(i);
                } else {
                    i += 1;
                }
            }

            pages.push(page);
        }

        // Oversized glyphs keep page == -1.
        (self.glyphs, pages)
    }
}
