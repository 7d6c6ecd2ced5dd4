//! Outline fonts.
//!
//! The tile renderer talks to outline fonts only through [`FontFace`]:
//! per-glyph advances for layout, line metrics for measurement, and
//! coverage bitmaps for drawing. [`TtfFace`] implements it with `fontdue`.
//!
//! All values are in physical (device) pixels.

use fontdue::{Font, FontSettings};

use crate::error::FontError;

/// Vertical metrics of a face.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineMetrics {
    /// Distance from the baseline up to the top of the tallest glyphs.
    pub ascent: f32,
    /// Distance from the baseline down to the lowest descender (positive).
    pub descent: f32,
}

/// A rasterized glyph: an alpha coverage map plus its placement relative to
/// the pen position on the baseline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphBitmap {
    pub width: usize,
    pub height: usize,
    /// Horizontal offset of the bitmap's left edge from the pen.
    pub xmin: i32,
    /// Offset of the bitmap's bottom edge above the baseline.
    pub ymin: i32,
    /// `width * height` coverage values, row-major, top row first.
    pub coverage: Vec<u8>,
}

impl GlyphBitmap {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A sized outline font.
pub trait FontFace {
    /// Horizontal advance of `ch`. Missing glyphs advance by the face's
    /// fallback glyph, whatever that is.
    fn glyph_advance(&self, ch: char) -> f32;

    fn line_metrics(&self) -> LineMetrics;

    fn rasterize(&self, ch: char) -> GlyphBitmap;
}

/// A TrueType/OpenType face at a fixed pixel size.
pub struct TtfFace {
    font: Font,
    px: f32,
}

impl TtfFace {
    /// Parse font data and fix the rendering size to `px` device pixels.
    pub fn from_bytes(data: &[u8], px: f32) -> Result<Self, FontError> {
        if !(px > 0.0 && px.is_finite()) {
            return Err(FontError::InvalidSize(px));
        }
        let font = Font::from_bytes(data, FontSettings::default()).map_err(FontError::InvalidFont)?;
        Ok(Self { font, px })
    }

    /// Rendering size in device pixels.
    pub fn size(&self) -> f32 {
        self.px
    }
}

impl FontFace for TtfFace {
    fn glyph_advance(&self, ch: char) -> f32 {
        self.font.metrics(ch, self.px).advance_width
    }

    fn line_metrics(&self) -> LineMetrics {
        line_metrics_or_default(self.font.horizontal_line_metrics(self.px), self.px)
    }

    fn rasterize(&self, ch: char) -> GlyphBitmap {
        let (metrics, coverage) = self.font.rasterize(ch, self.px);
        GlyphBitmap {
            width: metrics.width,
            height: metrics.height,
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            coverage,
        }
    }
}

/// Converts fontdue's metrics (descent negative) to [`LineMetrics`]. Faces
/// without horizontal metrics get an 80/20 split of the pixel size.
fn line_metrics_or_default(metrics: Option<fontdue::LineMetrics>, px: f32) -> LineMetrics {
    match metrics {
        Some(m) => LineMetrics {
            ascent: m.ascent,
            descent: -m.descent,
        },
        None => LineMetrics {
            ascent: px * 0.8,
            descent: px * 0.2,
        },
    }
}
