//! Render targets.
//!
//! A [`RenderTarget`] is the single seam between the tile renderer and a
//! graphics backend: every primitive ends up as one
//! [`draw_image`](RenderTarget::draw_image) call. [`Canvas`] is the CPU
//! implementation over an [`RgbaImage`].

use image::{Rgba, RgbaImage};
use remap_core::{Color, Point};

use crate::atlas::ImageRegion;
use crate::transform::DrawOp;

/// A surface that image regions can be blitted onto.
pub trait RenderTarget {
    /// Size in physical pixels.
    fn size(&self) -> Point;

    /// Blit `src` through `op`.
    ///
    /// Source pixel `(u, v)` (relative to `src.rect.min`) lands at
    /// `op.transform.apply(u, v)`, with its colour multiplied by
    /// `op.color_scale` and blended source-over.
    fn draw_image(&mut self, src: ImageRegion<'_>, op: &DrawOp);
}

/// A software render target.
///
/// Sampling is nearest-neighbour at destination pixel centers, so integer
/// scales and mirrors reproduce the source exactly.
#[derive(Clone, Debug)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// A fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn clear(&mut self, color: Color) {
        let px = Rgba(color.to_bytes());
        for p in self.pixels.pixels_mut() {
            *p = px;
        }
    }

    /// Colour at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.pixels
            .get_pixel_checked(x, y)
            .map(|p| Color::from_bytes(p.0))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}

impl RenderTarget for Canvas {
    fn size(&self) -> Point {
        Point::new(self.pixels.width() as i32, self.pixels.height() as i32)
    }

    fn draw_image(&mut self, src: ImageRegion<'_>, op: &DrawOp) {
        let src_w = src.rect.width() as f64;
        let src_h = src.rect.height() as f64;
        if src_w <= 0.0 || src_h <= 0.0 {
            return;
        }
        let Some(inverse) = op.transform.invert() else {
            return;
        };

        // Destination bounding box of the transformed source rectangle.
        let corners = [
            op.transform.apply(0.0, 0.0),
            op.transform.apply(src_w, 0.0),
            op.transform.apply(0.0, src_h),
            op.transform.apply(src_w, src_h),
        ];
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (x, y) in corners {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        let (width, height) = (self.pixels.width() as f64, self.pixels.height() as f64);
        let x0 = min_x.floor().max(0.0) as u32;
        let y0 = min_y.floor().max(0.0) as u32;
        let x1 = max_x.ceil().min(width).max(0.0) as u32;
        let y1 = max_y.ceil().min(height).max(0.0) as u32;

        for py in y0..y1 {
            for px in x0..x1 {
                let (u, v) = inverse.apply(px as f64 + 0.5, py as f64 + 0.5);
                if u < 0.0 || v < 0.0 || u >= src_w || v >= src_h {
                    continue;
                }
                let sx = src.rect.min.x.saturating_add(u as i32);
                let sy = src.rect.min.y.saturating_add(v as i32);
                if sx < 0 || sy < 0 {
                    continue;
                }
                // Regions past the image edge (bad tile index) sample nothing.
                let Some(texel) = src.image.get_pixel_checked(sx as u32, sy as u32) else {
                    continue;
                };
                let dst = self.pixels.get_pixel_mut(px, py);
                *dst = blend(*dst, *texel, op.color_scale);
            }
        }
    }
}

/// Source-over blend of a colour-scaled texel onto `dst`, both in straight
/// (non-premultiplied) alpha.
fn blend(dst: Rgba<u8>, src: Rgba<u8>, scale: [f32; 4]) -> Rgba<u8> {
    let s = [
        src[0] as f32 / 255.0 * scale[0],
        src[1] as f32 / 255.0 * scale[1],
        src[2] as f32 / 255.0 * scale[2],
        src[3] as f32 / 255.0 * scale[3],
    ];
    let alpha = s[3].clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return dst;
    }
    let d = [
        dst[0] as f32 / 255.0,
        dst[1] as f32 / 255.0,
        dst[2] as f32 / 255.0,
        dst[3] as f32 / 255.0,
    ];
    // Weight of the destination colour under the source.
    let dst_weight = d[3] * (1.0 - alpha);
    let out_a = alpha + dst_weight;
    let channel = |i: usize| (s[i] * alpha + d[i] * dst_weight) / out_a;
    Rgba([channel(0), channel(1), channel(2), out_a].map(to_byte))
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
