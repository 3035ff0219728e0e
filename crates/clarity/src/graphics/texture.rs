//! # Texture — Decoded Images and the Texture Component
//!
//! Images are decoded once per file path into a [`TextureData`] held by the
//! texture [`Library`]. The [`Texture`] component keeps its own tint and
//! alpha, so two entities can share an image and still be colored apart.
//!
//! ## The 1x1 White Fallback
//!
//! A path that fails to load (missing file, undecodable data, an image that
//! is neither RGB nor RGBA) is logged and cached as a single white pixel.
//! The entity still draws, in its mesh color times its tint.

use std::path::Path;
use std::rc::{Rc, Weak};

use crate::ecs::{Component, ComponentKind};
use crate::error::AssetError;
use crate::library::Library;
use crate::math::Vec3;

/// RGBA8 pixels decoded from an image file.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    /// The library key: the path the image was requested from.
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureData {
    /// Decode an image. Sources with 3 channels gain an opaque alpha.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let image = image::open(path).map_err(|source| match source {
            image::ImageError::IoError(source) => AssetError::Io {
                path: path.to_owned(),
                source,
            },
            source => AssetError::Image {
                path: path.to_owned(),
                source,
            },
        })?;
        let channels = image.color().channel_count();
        if channels != 3 && channels != 4 {
            return Err(AssetError::UnsupportedChannels {
                path: path.to_owned(),
                channels,
            });
        }
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            path: path.display().to_string(),
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// A single opaque white pixel.
    pub fn white(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        }
    }

    /// [`load`](Self::load), falling back to [`white`](Self::white).
    pub fn load_or_white(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            log::error!("{err}; using a white texture instead");
            Self::white(path.display().to_string())
        })
    }
}

/// The `Texture` component.
#[derive(Debug)]
pub struct Texture {
    path: String,
    data: Weak<TextureData>,
    pub tint: Vec3,
    pub alpha: f32,
}

impl Component for Texture {
    const KIND: ComponentKind = ComponentKind::Texture;
}

impl Texture {
    /// Use the image at `path`, decoding it into `library` on first use.
    pub fn new(path: &Path, library: &mut Library<TextureData>) -> Self {
        Self::with_tint(path, library, Vec3::ONE, 1.0)
    }

    pub fn with_tint(path: &Path, library: &mut Library<TextureData>, tint: Vec3, alpha: f32) -> Self {
        let key = path.display().to_string();
        let data = match library.get(&key) {
            Some(data) => data,
            None => library.add_item(key.clone(), TextureData::load_or_white(path)),
        };
        Self {
            path: key,
            data,
            tint,
            alpha,
        }
    }

    /// Point this component at a different image.
    pub fn set_path(&mut self, path: &Path, library: &mut Library<TextureData>) {
        *self = Self::with_tint(path, library, self.tint, self.alpha);
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn data(&self) -> Option<Rc<TextureData>> {
        self.data.upgrade()
    }
}
