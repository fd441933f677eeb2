//! Sprite-font generation.
//!
//! Rasterizes every glyph of a vector font through FreeType in one of
//! three recipes (plain, stroked contour, outlined body), packs the
//! bitmaps into fixed-size texture atlas pages and exposes the result as
//! page textures plus a code-point index. The same font saves to PNG
//! pages with an XML index and loads back through a texture cache.

pub mod color;
mod error;
mod face;
mod geom;
mod glyph;
mod image;
mod packer;
mod raster;
mod settings;
mod sprite_font;
mod texture;

pub use crate::error::Error;
pub use crate::face::round_26_6;
pub use crate::geom::{IVec2, IntRect};
pub use crate::glyph::Glyph;
pub use crate::image::Image;
pub use crate::settings::{ContourSettings, OutlinedSettings, Settings, SimpleSettings};
pub use crate::sprite_font::SpriteFont;
pub use crate::texture::{MagFilter, MinFilter, Texture, TextureCache};
