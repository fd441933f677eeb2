//! Shared textures and the path-keyed texture cache.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use rustc_hash::FxHashMap;
use tracing::error;

use crate::image::Image;

/// Filter applied when the texture is sampled below its native size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MinFilter {
    Linear,
    LinearMipmapLinear,
}

/// Filter applied when the texture is sampled above its native size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MagFilter {
    Nearest,
    Linear,
}

/// A CPU-resident texture: the pixels plus the sampler configuration a
/// renderer should upload it with.
pub struct Texture {
    image: Image,
    min_filter: MinFilter,
    mag_filter: MagFilter,
}

impl Texture {
    /// Atlas pages want trilinear minification and linear magnification.
    pub fn from_image(image: Image) -> Self {
        Self {
            image,
            min_filter: MinFilter::LinearMipmapLinear,
            mag_filter: MagFilter::Linear,
        }
    }

    #[inline]
    pub fn image(&self) -> &Image {
        &self.image
    }

    #[inline]
    pub fn min_filter(&self) -> MinFilter {
        self.min_filter
    }

    #[inline]
    pub fn mag_filter(&self) -> MagFilter {
        self.mag_filter
    }
}

/// Maps paths (or synthesized handles) to shared textures.
///
/// Entries are weak: the cache co-owns nothing, so a texture lives
/// exactly as long as its strongest holder and a later `get` reloads it
/// from disk when everyone else has let go.
#[derive(Default)]
pub struct TextureCache {
    entries: FxHashMap<PathBuf, Weak<Texture>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a texture under an explicit key.
    pub fn insert(&mut self, key: impl Into<PathBuf>, texture: &Arc<Texture>) {
        self.entries.insert(key.into(), Arc::downgrade(texture));
    }

    /// The cached texture for `path`, or a fresh PNG load on a miss.
    /// Load failures are logged and yield None.
    pub fn get(&mut self, path: &Path) -> Option<Arc<Texture>> {
        if let Some(texture) = self.entries.get(path).and_then(Weak::upgrade) {
            return Some(texture);
        }
        match Image::open_png(path) {
            Ok(image) => {
                let texture = Arc::new(Texture::from_image(image));
                self.entries.insert(path.to_path_buf(), Arc::downgrade(&texture));
                Some(texture)
            }
            Err(e) => {
                error!("failed to load texture {}: {}", path.display(), e);
                None
            }
        }
    }
}
