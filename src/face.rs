//! Scoped handles over the FreeType engine plus 26.6 fixed-point helpers.
//!
//! All unsafe charmap calls missing from the safe wrapper live here.

use std::path::Path;

use freetype::face::LoadFlag;
use freetype::{ffi, GlyphSlot, Stroker};
use tracing::warn;

use crate::error::{Error, Result};

/// Rounds a signed 26.6 fixed-point value to whole pixels with ties
/// rounding up. Adding 32 before shifting would overflow near the
/// representable maximum, so floor and the fractional carry are computed
/// separately.
pub fn round_26_6(value: i64) -> i32 {
    let floor = value >> 6;
    let frac = value & 63;
    (floor + i64::from(frac >= 32)) as i32
}

/// Owns the FreeType library instance for the duration of one build.
pub struct FontLibrary {
    library: freetype::Library,
}

impl FontLibrary {
    pub fn new() -> Result<Self> {
        Ok(Self {
            library: freetype::Library::init()?,
        })
    }

    pub(crate) fn new_stroker(&self) -> Result<Stroker> {
        Ok(self.library.new_stroker()?)
    }
}

/// A font face fixed to one pixel size, with the Unicode charmap selected.
///
/// The face keeps the font file bytes alive for as long as the native
/// handle holds pointers into them; dropping the face releases both.
pub struct FontFace {
    face: freetype::Face,
}

impl FontFace {
    /// Reads the font file into memory and binds a face against it. Only
    /// the first face of a collection is used.
    pub fn open(library: &FontLibrary, path: &Path, pixel_height: i32) -> Result<Self> {
        let data = std::fs::read(path).map_err(|source| Error::Io {
            path: path.into(),
            source,
        })?;
        if data.is_empty() {
            return Err(Error::EmptyFontFile(path.into()));
        }

        let face = library.library.new_memory_face(data, 0)?;
        let this = Self { face };
        this.select_unicode_charmap()?;

        if this.face.raw().num_faces != 1 {
            warn!(
                "{} carries {} faces, using the first",
                path.display(),
                this.face.raw().num_faces
            );
        }

        // The face usually renders at a height slightly off the request.
        this.face.set_pixel_sizes(0, pixel_height as u32)?;
        Ok(this)
    }

    fn select_unicode_charmap(&self) -> Result<()> {
        let code = unsafe {
            ffi::FT_Select_Charmap(self.raw_handle(), ffi::FT_ENCODING_UNICODE)
        };
        if code == 0 {
            Ok(())
        } else {
            Err(Error::Charmap(code))
        }
    }

    #[inline]
    fn raw_handle(&self) -> ffi::FT_Face {
        self.face.raw() as *const ffi::FT_FaceRec as ffi::FT_Face
    }

    pub fn num_glyphs(&self) -> usize {
        self.face.raw().num_glyphs.max(0) as usize
    }

    /// Family name recorded in the face, when present.
    pub fn family_name(&self) -> Option<String> {
        self.face.family_name()
    }

    /// Baseline-to-ascender distance in 26.6 fixed point.
    pub fn ascender_26_6(&self) -> i64 {
        self.face
            .size_metrics()
            .map(|m| i64::from(m.ascender))
            .unwrap_or(0)
    }

    /// Baseline-to-baseline distance in 26.6 fixed point.
    pub fn height_26_6(&self) -> i64 {
        self.face
            .size_metrics()
            .map(|m| i64::from(m.height))
            .unwrap_or(0)
    }

    /// First code point of the charmap and its glyph index.
    pub fn first_char(&self) -> (u32, u32) {
        let mut glyph_index: ffi::FT_UInt = 0;
        let code_point =
            unsafe { ffi::FT_Get_First_Char(self.raw_handle(), &mut glyph_index) };
        (code_point as u32, glyph_index)
    }

    /// Next code point after `code_point` and its glyph index. A glyph
    /// index of zero marks the end of the charmap.
    pub fn next_char(&self, code_point: u32) -> (u32, u32) {
        let mut glyph_index: ffi::FT_UInt = 0;
        let next = unsafe {
            ffi::FT_Get_Next_Char(
                self.raw_handle(),
                ffi::FT_ULong::from(code_point),
                &mut glyph_index,
            )
        };
        (next as u32, glyph_index)
    }

    /// Loads (and depending on `flags`, renders) one glyph into the slot.
    pub fn load_glyph(&self, glyph_index: u32, flags: LoadFlag) -> Result<()> {
        self.face.load_glyph(glyph_index, flags)?;
        Ok(())
    }

    #[inline]
    pub fn glyph(&self) -> &GlyphSlot {
        self.face.glyph()
    }
}

#[cfg(test)]
mod tests {
    use super::round_26_6;

    fn reference(value: i64) -> i32 {
        let floor = value.div_euclid(64);
        let frac = value.rem_euclid(64);
        (floor + i64::from(frac >= 32)) as i32
    }

    #[test]
    fn rounds_whole_pixels() {
        assert_eq!(round_26_6(0), 0);
        assert_eq!(round_26_6(64), 1);
        assert_eq!(round_26_6(-64), -1);
        assert_eq!(round_26_6(640), 10);
    }

    #[test]
    fn ties_round_up() {
        assert_eq!(round_26_6(32), 1);
        assert_eq!(round_26_6(31), 0);
        assert_eq!(round_26_6(96), 2);
        // -1.5 px sits halfway between -2 and -1; up means toward +inf.
        assert_eq!(round_26_6(-96), -1);
        assert_eq!(round_26_6(-97), -2);
        assert_eq!(round_26_6(-32), 0);
        assert_eq!(round_26_6(-33), -1);
    }

    #[test]
    fn survives_the_representable_extremes() {
        let hi = i64::from(i32::MAX) - 64;
        let lo = -hi;
        assert_eq!(round_26_6(hi), reference(hi));
        assert_eq!(round_26_6(lo), reference(lo));
        for v in [hi - 1, hi - 32, lo + 1, lo + 32, 1, -1, 63, -63] {
            assert_eq!(round_26_6(v), reference(v), "value {v}");
        }
    }
}
