use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font file {0} is empty")]
    EmptyFontFile(PathBuf),

    #[error("freetype: {0}")]
    FreeType(#[from] freetype::Error),

    #[error("charmap selection failed (freetype error {0})")]
    Charmap(i32),

    #[error("png codec: {0}")]
    Png(#[from] image::ImageError),

    #[error("xml: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("{path}: {reason}")]
    IndexParse { path: PathBuf, reason: String },

    #[error("page texture {0} could not be acquired")]
    PageTexture(PathBuf),

    #[error("extension of {0} is not \"fnt\"")]
    UnsupportedExtension(PathBuf),

    #[error(
        "glyph U+{code_point:04X} ({width}x{height} px) exceeds the {page_width}x{page_height} page"
    )]
    OversizedGlyph {
        code_point: u32,
        width: i32,
        height: i32,
        page_width: i32,
        page_height: i32,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
