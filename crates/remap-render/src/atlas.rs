//! Fixed-grid sprite sheets.
//!
//! An [`Atlas`] is one image cut into equally sized tiles, addressed by a
//! row-major index: `index = row * cells_per_row + col`.

use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use remap_core::{Point, Range};

use crate::error::AtlasError;

/// A rectangle of an image, ready to be blitted.
#[derive(Copy, Clone, Debug)]
pub struct ImageRegion<'a> {
    pub image: &'a RgbaImage,
    /// Pixel rectangle inside `image`.
    pub rect: Range,
}

impl<'a> ImageRegion<'a> {
    /// The region covering the whole image.
    pub fn whole(image: &'a RgbaImage) -> Self {
        let (w, h) = image.dimensions();
        Self {
            image,
            rect: Range::new(0, 0, w as i32, h as i32),
        }
    }
}

/// A sprite sheet with a fixed tile size.
///
/// The pixel buffer is shared and never mutated, so cloning an atlas is
/// cheap and clones can be handed out freely (e.g. inside
/// [`CellDrawInfo`](crate::CellDrawInfo)).
#[derive(Clone, Debug)]
pub struct Atlas {
    image: Arc<RgbaImage>,
    tile_width: u32,
    tile_height: u32,
}

impl Atlas {
    /// Wrap an already decoded image.
    pub fn new(image: RgbaImage, tile_width: u32, tile_height: u32) -> Result<Self, AtlasError> {
        if tile_width == 0 || tile_height == 0 {
            return Err(AtlasError::ZeroTileSize {
                width: tile_width,
                height: tile_height,
            });
        }
        let (w, h) = image.dimensions();
        if w % tile_width != 0 || h % tile_height != 0 {
            log::warn!(
                "atlas image {}x{} is not a multiple of the {}x{} tile size; trailing pixels are ignored",
                w,
                h,
                tile_width,
                tile_height
            );
        }
        Ok(Self {
            image: Arc::new(image),
            tile_width,
            tile_height,
        })
    }

    /// Decode an encoded image (PNG) from memory.
    pub fn from_memory(bytes: &[u8], tile_width: u32, tile_height: u32) -> Result<Self, AtlasError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Self::new(image, tile_width, tile_height)
    }

    /// Read and decode an image file.
    pub fn open(path: impl AsRef<Path>, tile_width: u32, tile_height: u32) -> Result<Self, AtlasError> {
        let image = image::open(path)?.to_rgba8();
        Self::new(image, tile_width, tile_height)
    }

    /// The backing image.
    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    #[inline]
    pub fn tile_size(&self) -> Point {
        Point::new(self.tile_width as i32, self.tile_height as i32)
    }

    /// Image size in pixels.
    #[inline]
    pub fn atlas_size(&self) -> Point {
        let (w, h) = self.image.dimensions();
        Point::new(w as i32, h as i32)
    }

    /// Number of whole tiles per row and per column.
    #[inline]
    pub fn cell_count(&self) -> Point {
        let (w, h) = self.image.dimensions();
        Point::new((w / self.tile_width) as i32, (h / self.tile_height) as i32)
    }

    /// Pixel rectangle of the tile at `index`.
    ///
    /// The index is not checked; callers keep it below
    /// `cell_count().x * cell_count().y`. Indices past the sheet yield a
    /// rectangle outside the image, saturated at `i32::MAX`, which blits
    /// as nothing.
    pub fn extract_sub_image(&self, index: u32) -> Range {
        let cols = (self.image.width() / self.tile_width).max(1);
        let col = u64::from(index % cols);
        let row = u64::from(index / cols);
        let top_left = Point::new(
            pixel_coord(col * u64::from(self.tile_width)),
            pixel_coord(row * u64::from(self.tile_height)),
        );
        Range::with_size(top_left, self.tile_size())
    }

    /// The tile at `index` as a blittable region.
    #[inline]
    pub fn region(&self, index: u32) -> ImageRegion<'_> {
        ImageRegion {
            image: &self.image,
            rect: self.extract_sub_image(index),
        }
    }
}

#[inline]
fn pixel_coord(v: u64) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
