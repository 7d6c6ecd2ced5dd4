//! The tile renderer and its per-frame drawing context.
//!
//! [`TileRenderer`] holds everything that persists across frames: scale
//! sources, fonts, the default atlas and colours. Drawing happens through a
//! [`Frame`], which borrows the renderer together with a [`RenderTarget`]
//! for the length of one render pass. Every primitive builds its own
//! transform and colour scale and ends in a single blit, so no draw state
//! leaks from one call into the next.
//!
//! Positions and sizes passed to a frame are device-independent pixels;
//! the live device scale converts them to target pixels on every call.

use std::collections::HashMap;

use image::{Rgba, RgbaImage};
use remap_core::{Color, Point, PointF, ScaleSource};

use crate::atlas::{Atlas, ImageRegion};
use crate::bitmap_font::BitmapFont;
use crate::config::RendererConfig;
use crate::font::{FontFace, GlyphBitmap};
use crate::target::RenderTarget;
use crate::text::{ColorResolver, NamedColors, layout_color_runs, parse_color_codes};
use crate::transform::{DrawOp, Transform};

/// Width of [`Frame::debug_line`] in target pixels.
const DEBUG_LINE_WIDTH: f64 = 10.0;

/// A glyph rasterized to a white, alpha-covered image.
struct CachedGlyph {
    /// `None` for glyphs without ink (space, missing glyphs).
    image: Option<RgbaImage>,
    xmin: i32,
    ymin: i32,
}

/// Long-lived drawing state.
pub struct TileRenderer {
    device_scale: Box<dyn ScaleSource>,
    tile_scale: Box<dyn ScaleSource>,
    config: RendererConfig,
    default_atlas: Option<Atlas>,
    font: Option<BitmapFont>,
    font_face: Option<Box<dyn FontFace>>,
    color_resolver: Box<dyn ColorResolver>,
    glyph_cache: HashMap<char, CachedGlyph>,
}

impl TileRenderer {
    pub fn new(
        device_scale: impl ScaleSource + 'static,
        tile_scale: impl ScaleSource + 'static,
    ) -> Self {
        Self {
            device_scale: Box::new(device_scale),
            tile_scale: Box::new(tile_scale),
            config: RendererConfig::default(),
            default_atlas: None,
            font: None,
            font_face: None,
            color_resolver: Box::new(NamedColors),
            glyph_cache: HashMap::new(),
        }
    }

    /// Replace the plain-data settings (builder).
    pub fn with_config(mut self, config: RendererConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Open a render pass on `target`.
    pub fn begin<'a>(&'a mut self, target: &'a mut dyn RenderTarget) -> Frame<'a> {
        Frame {
            renderer: self,
            target,
        }
    }

    // -- Scales --

    #[inline]
    pub fn device_scale(&self) -> f64 {
        self.device_scale.scale()
    }

    #[inline]
    pub fn tile_scale(&self) -> f64 {
        self.tile_scale.scale()
    }

    pub fn set_device_scale(&mut self, scale: impl ScaleSource + 'static) {
        self.device_scale = Box::new(scale);
    }

    pub fn set_tile_scale(&mut self, scale: impl ScaleSource + 'static) {
        self.tile_scale = Box::new(scale);
    }

    pub fn set_font_scale(&mut self, scale: f64) {
        self.config.font_scale = scale;
    }

    pub fn font_scale(&self) -> f64 {
        self.config.font_scale
    }

    // -- Resources --

    /// Atlas used by the index-only primitives and for the white tile.
    pub fn set_default_atlas(&mut self, atlas: Atlas) {
        self.default_atlas = Some(atlas);
    }

    pub fn default_atlas(&self) -> Option<&Atlas> {
        self.default_atlas.as_ref()
    }

    pub fn set_white_tile(&mut self, index: u32) {
        self.config.white_tile = index;
    }

    pub fn set_font(&mut self, font: BitmapFont) {
        self.font = Some(font);
    }

    /// Whether a bitmap font with at least one glyph is set.
    pub fn is_font_loaded(&self) -> bool {
        self.font.as_ref().is_some_and(BitmapFont::is_loaded)
    }

    /// Tile size of the bitmap font, or zero without one.
    pub fn font_grid_size(&self) -> Point {
        self.font
            .as_ref()
            .map(|f| f.atlas().tile_size())
            .unwrap_or(Point::ZERO)
    }

    pub fn set_font_face(&mut self, face: impl FontFace + 'static) {
        self.font_face = Some(Box::new(face));
        if !self.glyph_cache.is_empty() {
            log::debug!("font face changed, dropping {} cached glyphs", self.glyph_cache.len());
            self.glyph_cache.clear();
        }
    }

    pub fn has_font_face(&self) -> bool {
        self.font_face.is_some()
    }

    pub fn set_color_resolver(&mut self, resolver: impl ColorResolver + 'static) {
        self.color_resolver = Box::new(resolver);
    }

    pub fn set_default_colors(&mut self, border: Color, fill: Color) {
        self.config.default_border_color = border;
        self.config.default_fill_color = fill;
    }

    pub fn set_global_scale_color(&mut self, color: [f32; 4]) {
        self.config.global_scale_color = color;
    }

    pub fn global_scale_color(&self) -> [f32; 4] {
        self.config.global_scale_color
    }

    // -- Measurement --

    /// Size of `text` in the outline font, in device-independent pixels.
    ///
    /// Width is the rounded-up sum of glyph advances, height the rounded
    /// ascent plus descent. Without a font face both are zero.
    pub fn measure_string(&self, text: &str) -> (f64, f64) {
        let Some(face) = self.font_face.as_deref() else {
            log::warn!("measure_string called without a font face");
            return (0.0, 0.0);
        };
        let ds = self.device_scale();
        let advance: f32 = text.chars().map(|c| face.glyph_advance(c)).sum();
        let metrics = face.line_metrics();
        (
            advance.ceil() as f64 / ds,
            (metrics.ascent + metrics.descent).round() as f64 / ds,
        )
    }

    fn cached_glyph(&mut self, ch: char) -> &CachedGlyph {
        let face = self.font_face.as_deref();
        self.glyph_cache
            .entry(ch)
            .or_insert_with(|| match face {
                Some(face) => glyph_image(face.rasterize(ch)),
                None => CachedGlyph {
                    image: None,
                    xmin: 0,
                    ymin: 0,
                },
            })
    }
}

fn glyph_image(glyph: GlyphBitmap) -> CachedGlyph {
    let image = if glyph.is_empty() || glyph.coverage.len() < glyph.width * glyph.height {
        None
    } else {
        let w = glyph.width;
        Some(RgbaImage::from_fn(w as u32, glyph.height as u32, |x, y| {
            Rgba([255, 255, 255, glyph.coverage[y as usize * w + x as usize]])
        }))
    };
    CachedGlyph {
        image,
        xmin: glyph.xmin,
        ymin: glyph.ymin,
    }
}

/// The one path to the target: applies the global colour multiplier.
fn blit<T: RenderTarget + ?Sized>(
    target: &mut T,
    global: [f32; 4],
    src: ImageRegion<'_>,
    transform: Transform,
    tint: [f32; 4],
) {
    let op = DrawOp {
        transform,
        color_scale: [
            tint[0] * global[0],
            tint[1] * global[1],
            tint[2] * global[2],
            tint[3] * global[3],
        ],
    };
    target.draw_image(src, &op);
}

/// One render pass: a [`TileRenderer`] bound to a [`RenderTarget`].
pub struct Frame<'a> {
    renderer: &'a mut TileRenderer,
    target: &'a mut dyn RenderTarget,
}

impl Frame<'_> {
    pub fn renderer(&self) -> &TileRenderer {
        self.renderer
    }

    /// Target size in physical pixels.
    pub fn target_size(&self) -> Point {
        self.target.size()
    }

    // -- Tiles --

    /// Draw tile `index` of `atlas` with its top-left corner at
    /// `(screen_x, screen_y)`.
    ///
    /// `scale` is multiplied by the device scale. The tint is normalized to
    /// `0..=1` and multiplied by the global scale colour. A horizontal flip
    /// mirrors the tile inside the same bounding box.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_tile(
        &mut self,
        screen_x: f64,
        screen_y: f64,
        atlas: &Atlas,
        index: u32,
        scale: PointF,
        tint: Color,
        flip_x: bool,
    ) {
        let ds = self.renderer.device_scale();
        let s = scale * ds;
        let mut transform = Transform::IDENTITY;
        let mut tx = screen_x * ds;
        if flip_x {
            transform.scale(-s.x, s.y);
            tx += atlas.tile_size().x as f64 * s.x;
        } else {
            transform.scale(s.x, s.y);
        }
        transform.translate(tx, screen_y * ds);
        let global = self.renderer.config.global_scale_color;
        blit(&mut *self.target, global, atlas.region(index), transform, tint.to_f32());
    }

    pub fn draw_tile_with_default_orientation(
        &mut self,
        screen_x: f64,
        screen_y: f64,
        atlas: &Atlas,
        index: u32,
        scale: PointF,
        tint: Color,
    ) {
        self.draw_tile(screen_x, screen_y, atlas, index, scale, tint, false);
    }

    /// Draw at the current tile scale.
    pub fn draw_default_scale_tile(
        &mut self,
        screen_x: f64,
        screen_y: f64,
        atlas: &Atlas,
        index: u32,
        tint: Color,
    ) {
        let scale = PointF::splat(self.renderer.tile_scale());
        self.draw_tile(screen_x, screen_y, atlas, index, scale, tint, false);
    }

    pub fn draw_default_scale_tile_with_flip(
        &mut self,
        screen_x: f64,
        screen_y: f64,
        atlas: &Atlas,
        index: u32,
        tint: Color,
        flip_x: bool,
    ) {
        let scale = PointF::splat(self.renderer.tile_scale());
        self.draw_tile(screen_x, screen_y, atlas, index, scale, tint, flip_x);
    }

    /// Draw at the current tile scale times `scale`.
    pub fn draw_scaled_tile(
        &mut self,
        screen_x: f64,
        screen_y: f64,
        atlas: &Atlas,
        index: u32,
        scale: PointF,
        tint: Color,
    ) {
        self.draw_scaled_tile_with_flip(screen_x, screen_y, atlas, index, scale, tint, false);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_scaled_tile_with_flip(
        &mut self,
        screen_x: f64,
        screen_y: f64,
        atlas: &Atlas,
        index: u32,
        scale: PointF,
        tint: Color,
        flip_x: bool,
    ) {
        let scale = PointF::splat(self.renderer.tile_scale()).scale_by(scale);
        self.draw_tile(screen_x, screen_y, atlas, index, scale, tint, flip_x);
    }

    // -- Default-atlas shortcuts --

    fn default_atlas(&self) -> Option<Atlas> {
        let atlas = self.renderer.default_atlas.clone();
        if atlas.is_none() {
            log::warn!("no default atlas set, skipping draw");
        }
        atlas
    }

    /// Untinted default-atlas tile at the current tile scale.
    pub fn draw_on_screen(&mut self, screen_x: i32, screen_y: i32, index: u32) {
        let Some(atlas) = self.default_atlas() else {
            return;
        };
        self.draw_default_scale_tile(screen_x as f64, screen_y as f64, &atlas, index, Color::WHITE);
    }

    pub fn draw_on_screen_with_scale(&mut self, screen_x: i32, screen_y: i32, index: u32, scale: f64) {
        let Some(atlas) = self.default_atlas() else {
            return;
        };
        self.draw_tile(
            screen_x as f64,
            screen_y as f64,
            &atlas,
            index,
            PointF::splat(scale),
            Color::WHITE,
            false,
        );
    }

    /// Default-atlas tile on the grid of scaled tiles.
    pub fn draw_on_grid(&mut self, grid_x: i32, grid_y: i32, index: u32) {
        let Some(atlas) = self.default_atlas() else {
            return;
        };
        let cell = atlas.tile_size().to_f() * self.renderer.tile_scale();
        self.draw_default_scale_tile(
            grid_x as f64 * cell.x,
            grid_y as f64 * cell.y,
            &atlas,
            index,
            Color::WHITE,
        );
    }

    /// Default-atlas tile on the bitmap-font grid, at font scale.
    pub fn draw_on_font_grid(&mut self, grid_x: i32, grid_y: i32, index: u32) {
        let font_cell = self.renderer.font_grid_size();
        if font_cell == Point::ZERO {
            log::warn!("draw_on_font_grid called without a bitmap font");
            return;
        }
        let Some(atlas) = self.default_atlas() else {
            return;
        };
        let font_scale = self.renderer.font_scale();
        let cell = font_cell.to_f() * font_scale;
        self.draw_tile(
            grid_x as f64 * cell.x,
            grid_y as f64 * cell.y,
            &atlas,
            index,
            PointF::splat(font_scale),
            Color::WHITE,
            false,
        );
    }

    // -- Solid shapes --

    /// Stretch the white tile over a rectangle given in target pixels.
    fn stretch_white(&mut self, atlas: &Atlas, pos: PointF, size: PointF, color: Color) {
        let tile = atlas.tile_size().to_f();
        let mut transform = Transform::IDENTITY;
        transform.scale(size.x / tile.x, size.y / tile.y);
        transform.translate(pos.x, pos.y);
        let global = self.renderer.config.global_scale_color;
        let white = atlas.region(self.renderer.config.white_tile);
        blit(&mut *self.target, global, white, transform, color.to_f32());
    }

    pub fn draw_colored_rect(&mut self, top_left: Point, size: Point, fill: Color) {
        let Some(atlas) = self.default_atlas() else {
            return;
        };
        let ds = self.renderer.device_scale();
        self.stretch_white(&atlas, top_left.to_f() * ds, size.to_f() * ds, fill);
    }

    /// A filled rectangle with a one-pixel border.
    ///
    /// The border is a rectangle one device-scaled pixel larger on every
    /// side, drawn first and then covered by the fill.
    pub fn draw_colored_border(&mut self, top_left: Point, size: Point, fill: Color, border: Color) {
        let Some(atlas) = self.default_atlas() else {
            return;
        };
        let ds = self.renderer.device_scale();
        let pos = top_left.to_f() * ds;
        let target = size.to_f() * ds;
        let border_size = PointF::splat(ds);
        self.stretch_white(
            &atlas,
            pos - border_size,
            target + border_size * 2.0,
            border,
        );
        self.stretch_white(&atlas, pos, target, fill);
    }

    /// [`draw_colored_border`](Frame::draw_colored_border) with the
    /// configured default colours.
    pub fn draw_default_border(&mut self, top_left: Point, size: Point) {
        let fill = self.renderer.config.default_fill_color;
        let border = self.renderer.config.default_border_color;
        self.draw_colored_border(top_left, size, fill, border);
    }

    /// A white line `DEBUG_LINE_WIDTH` target pixels wide.
    pub fn debug_line(&mut self, start: Point, end: Point) {
        let Some(atlas) = self.default_atlas() else {
            return;
        };
        let ds = self.renderer.device_scale();
        let from = start.to_f() * ds;
        let delta = end.to_f() * ds - from;
        let length = delta.x.hypot(delta.y);
        if length == 0.0 {
            return;
        }
        let tile = atlas.tile_size().to_f();
        let mut transform = Transform::IDENTITY;
        transform.scale(length / tile.x, DEBUG_LINE_WIDTH / tile.y);
        transform.translate(0.0, -DEBUG_LINE_WIDTH / 2.0);
        transform.rotate(delta.y.atan2(delta.x));
        transform.translate(from.x, from.y);
        let global = self.renderer.config.global_scale_color;
        let white = atlas.region(self.renderer.config.white_tile);
        blit(&mut *self.target, global, white, transform, Color::WHITE.to_f32());
    }

    /// Draw a whole image stretched over `size` device-independent pixels.
    pub fn draw_image_on_screen(&mut self, screen_x: i32, screen_y: i32, size: Point, image: &RgbaImage) {
        let ds = self.renderer.device_scale();
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return;
        }
        let mut transform = Transform::IDENTITY;
        transform.scale(size.x as f64 * ds / w as f64, size.y as f64 * ds / h as f64);
        transform.translate(screen_x as f64 * ds, screen_y as f64 * ds);
        let global = self.renderer.config.global_scale_color;
        blit(
            &mut *self.target,
            global,
            ImageRegion::whole(image),
            transform,
            Color::WHITE.to_f32(),
        );
    }

    // -- Bitmap font --

    /// The bitmap font's atlas and the tile of `ch`.
    ///
    /// `None` if the character is unmapped or no font is loaded (the latter
    /// is logged).
    fn bitmap_glyph(&self, ch: char) -> Option<(Atlas, u32)> {
        match self.renderer.font.as_ref() {
            Some(font) if font.is_loaded() => font.glyph(ch).map(|i| (font.atlas().clone(), i)),
            _ => {
                log::warn!("bitmap font not loaded");
                None
            }
        }
    }

    /// One bitmap-font glyph, `scale` relative to its tile size.
    pub fn draw_char_on_screen(&mut self, screen_x: f64, screen_y: f64, ch: char, scale: f64, color: Color) {
        let Some((atlas, index)) = self.bitmap_glyph(ch) else {
            return;
        };
        self.draw_tile(
            screen_x,
            screen_y,
            &atlas,
            index,
            PointF::splat(scale),
            color,
            false,
        );
    }

    pub fn draw_default_scale_char_on_screen(&mut self, screen_x: f64, screen_y: f64, ch: char, color: Color) {
        let scale = self.renderer.font_scale();
        self.draw_char_on_screen(screen_x, screen_y, ch, scale, color);
    }

    /// A line of bitmap-font text on a monospace grid.
    ///
    /// Unmapped characters leave their cell empty.
    pub fn draw_string(&mut self, screen_x: f64, screen_y: f64, text: &str, color: Color) {
        if !self.renderer.is_font_loaded() {
            log::warn!("bitmap font not loaded");
            return;
        }
        let advance = self.renderer.font_grid_size().x as f64 * self.renderer.font_scale();
        for (i, ch) in text.chars().enumerate() {
            self.draw_default_scale_char_on_screen(screen_x + i as f64 * advance, screen_y, ch, color);
        }
    }

    pub fn draw_multi_string(&mut self, screen_x: f64, screen_y: f64, lines: &[&str], color: Color) {
        let line_height = self.renderer.font_grid_size().y as f64 * self.renderer.font_scale();
        for (i, line) in lines.iter().enumerate() {
            self.draw_string(screen_x, screen_y + i as f64 * line_height, line, color);
        }
    }

    pub fn draw_string_on_grid(&mut self, grid_x: i32, grid_y: i32, text: &str, color: Color) {
        let cell = self.renderer.font_grid_size().to_f() * self.renderer.font_scale();
        self.draw_string(grid_x as f64 * cell.x, grid_y as f64 * cell.y, text, color);
    }

    pub fn draw_char_on_grid(&mut self, grid_x: i32, grid_y: i32, ch: char, color: Color) {
        let cell = self.renderer.font_grid_size().to_f() * self.renderer.font_scale();
        self.draw_default_scale_char_on_screen(grid_x as f64 * cell.x, grid_y as f64 * cell.y, ch, color);
    }

    // -- Outline font --

    /// Outline-font text with the baseline at `screen_y`.
    pub fn draw_text(&mut self, screen_x: f64, screen_y: f64, text: &str, color: Color) {
        if !self.renderer.has_font_face() {
            log::warn!("draw_text called without a font face");
            return;
        }
        let ds = self.renderer.device_scale();
        let global = self.renderer.config.global_scale_color;
        let tint = color.to_f32();
        let baseline = screen_y * ds;
        let mut pen = screen_x * ds;
        for ch in text.chars() {
            let advance = match self.renderer.font_face.as_deref() {
                Some(face) => face.glyph_advance(ch) as f64,
                None => return,
            };
            let glyph = self.renderer.cached_glyph(ch);
            if let Some(image) = &glyph.image {
                let mut transform = Transform::IDENTITY;
                transform.translate(
                    pen + glyph.xmin as f64,
                    baseline - glyph.ymin as f64 - image.height() as f64,
                );
                blit(&mut *self.target, global, ImageRegion::whole(image), transform, tint);
            }
            pen += advance;
        }
    }

    /// Outline-font text with inline `[:colour]` directives.
    ///
    /// See [`parse_color_codes`] for the syntax. Runs are separated by the
    /// width of one space.
    pub fn draw_text_with_color_codes(&mut self, screen_x: f64, screen_y: f64, text: &str) {
        let Some(face) = self.renderer.font_face.as_deref() else {
            log::warn!("draw_text_with_color_codes called without a font face");
            return;
        };
        let space_advance = face.glyph_advance(' ').round() as f64 / self.renderer.device_scale();
        let runs = parse_color_codes(text, &*self.renderer.color_resolver);
        let renderer = &*self.renderer;
        let parts = layout_color_runs(&runs, |s| renderer.measure_string(s).0, space_advance);
        for part in parts {
            self.draw_text(screen_x + part.x_offset, screen_y, part.text, part.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::tests::indexed_atlas;
    use crate::bitmap_font::FontAtlasDescription;
    use crate::font::tests::BlockFace;
    use crate::target::Canvas;
    use remap_core::{FixedScale, SharedScale};

    const RED: Color = Color::from_rgb(255, 0, 0);
    const BLUE: Color = Color::from_rgb(0, 0, 255);

    fn renderer(ds: f64) -> TileRenderer {
        TileRenderer::new(FixedScale(ds), FixedScale(1.0))
    }

    /// A 16x8 atlas of 8px tiles: tile 0 solid white, tile 1 a pattern.
    fn ui_atlas() -> Atlas {
        let img = RgbaImage::from_fn(16, 8, |x, y| {
            if x < 8 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([(x - 8) as u8 * 30, y as u8 * 30, 9, 255])
            }
        });
        Atlas::new(img, 8, 8).unwrap()
    }

    fn block_face() -> BlockFace {
        BlockFace {
            advance: 4.0,
            ascent: 6.0,
            descent: 2.0,
        }
    }

    /// Bounding box of non-transparent pixels.
    fn ink_bounds(canvas: &Canvas) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, p) in canvas.image().enumerate_pixels() {
            if p.0[3] == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x + 1, y + 1),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
            });
        }
        bounds
    }

    #[test]
    fn draw_tile_applies_device_scale_to_position_and_size() {
        let atlas = indexed_atlas(4, 4, 4);
        let mut r = renderer(2.0);
        let mut canvas = Canvas::new(32, 32);
        r.begin(&mut canvas)
            .draw_tile(3.0, 1.0, &atlas, 5, PointF::splat(1.0), Color::WHITE, false);
        assert_eq!(ink_bounds(&canvas), Some((6, 2, 14, 10)));
        assert_eq!(canvas.pixel(6, 2), Some(Color::from_rgb(5, 250, 0)));
        assert_eq!(canvas.pixel(13, 9), Some(Color::from_rgb(5, 250, 0)));
    }

    #[test]
    fn flipped_tile_mirrors_inside_same_box() {
        let img = RgbaImage::from_fn(4, 4, |x, y| Rgba([x as u8 * 60, y as u8 * 60, 0, 255]));
        let atlas = Atlas::new(img, 4, 4).unwrap();
        let mut r = renderer(1.0);
        let mut plain = Canvas::new(12, 8);
        let mut flipped = Canvas::new(12, 8);
        let scale = PointF::new(2.0, 1.0);
        r.begin(&mut plain)
            .draw_tile(1.0, 1.0, &atlas, 0, scale, Color::WHITE, false);
        r.begin(&mut flipped)
            .draw_tile(1.0, 1.0, &atlas, 0, scale, Color::WHITE, true);

        assert_eq!(ink_bounds(&plain), Some((1, 1, 9, 5)));
        assert_eq!(ink_bounds(&flipped), ink_bounds(&plain));
        for y in 1..5 {
            for x in 1..9 {
                assert_eq!(flipped.pixel(x, y), plain.pixel(9 - x, y), "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn tint_is_multiplied_by_global_scale_color() {
        let mut r = renderer(1.0);
        r.set_global_scale_color([0.5, 1.0, 1.0, 1.0]);
        let mut canvas = Canvas::new(8, 8);
        r.begin(&mut canvas).draw_tile(
            0.0,
            0.0,
            &ui_atlas(),
            0,
            PointF::splat(1.0),
            Color::from_rgb(255, 128, 0),
            false,
        );
        assert_eq!(canvas.pixel(3, 3), Some(Color::from_rgb(128, 128, 0)));
    }

    #[test]
    fn default_scale_tile_reads_tile_scale_live() {
        let zoom = SharedScale::new(1.0);
        let mut r = TileRenderer::new(FixedScale(1.0), zoom.clone());
        let atlas = ui_atlas();
        let mut canvas = Canvas::new(32, 32);
        r.begin(&mut canvas)
            .draw_default_scale_tile(0.0, 0.0, &atlas, 0, Color::WHITE);
        assert_eq!(ink_bounds(&canvas), Some((0, 0, 8, 8)));

        zoom.set(3.0);
        let mut canvas = Canvas::new(32, 32);
        r.begin(&mut canvas)
            .draw_scaled_tile(0.0, 0.0, &atlas, 0, PointF::new(1.0, 0.5), Color::WHITE);
        assert_eq!(ink_bounds(&canvas), Some((0, 0, 24, 12)));
    }

    #[test]
    fn colored_rect_stretches_white_tile() {
        let mut r = renderer(1.0);
        r.set_default_atlas(ui_atlas());
        let mut canvas = Canvas::new(8, 8);
        r.begin(&mut canvas)
            .draw_colored_rect(Point::new(1, 1), Point::new(3, 2), RED);
        assert_eq!(ink_bounds(&canvas), Some((1, 1, 4, 3)));
        assert_eq!(canvas.pixel(2, 2), Some(RED));
    }

    #[test]
    fn border_is_drawn_by_overdraw() {
        let mut r = renderer(1.0);
        r.set_default_atlas(ui_atlas());
        let mut canvas = Canvas::new(8, 8);
        r.begin(&mut canvas)
            .draw_colored_border(Point::new(2, 2), Point::new(3, 3), BLUE, RED);
        assert_eq!(ink_bounds(&canvas), Some((1, 1, 6, 6)));
        assert_eq!(canvas.pixel(1, 1), Some(RED));
        assert_eq!(canvas.pixel(5, 5), Some(RED));
        assert_eq!(canvas.pixel(1, 3), Some(RED));
        assert_eq!(canvas.pixel(2, 2), Some(BLUE));
        assert_eq!(canvas.pixel(4, 4), Some(BLUE));
    }

    #[test]
    fn border_grows_with_device_scale() {
        let mut r = renderer(2.0).with_config(RendererConfig {
            default_border_color: RED,
            default_fill_color: BLUE,
            ..RendererConfig::default()
        });
        r.set_default_atlas(ui_atlas());
        let mut canvas = Canvas::new(16, 16);
        r.begin(&mut canvas)
            .draw_default_border(Point::new(2, 2), Point::new(2, 2));
        assert_eq!(ink_bounds(&canvas), Some((2, 2, 10, 10)));
        assert_eq!(canvas.pixel(3, 3), Some(RED));
        assert_eq!(canvas.pixel(4, 4), Some(BLUE));
    }

    #[test]
    fn shapes_without_default_atlas_are_skipped() {
        let mut r = renderer(1.0);
        let mut canvas = Canvas::new(8, 8);
        let mut frame = r.begin(&mut canvas);
        frame.draw_colored_rect(Point::ZERO, Point::new(4, 4), RED);
        frame.draw_on_screen(0, 0, 0);
        frame.debug_line(Point::ZERO, Point::new(5, 5));
        assert_eq!(ink_bounds(&canvas), None);
    }

    #[test]
    fn grid_helpers_use_tile_size() {
        let mut r = TileRenderer::new(FixedScale(1.0), FixedScale(2.0));
        r.set_default_atlas(ui_atlas());
        let mut canvas = Canvas::new(64, 64);
        r.begin(&mut canvas).draw_on_grid(1, 2, 0);
        // cell = 8 * 2 = 16px, tile drawn at tile scale 2
        assert_eq!(ink_bounds(&canvas), Some((16, 32, 32, 48)));

        let mut canvas = Canvas::new(64, 64);
        r.begin(&mut canvas).draw_on_screen_with_scale(5, 6, 1, 0.5);
        assert_eq!(ink_bounds(&canvas), Some((5, 6, 9, 10)));
    }

    #[test]
    fn debug_line_is_ten_pixels_wide() {
        let mut r = renderer(1.0);
        r.set_default_atlas(ui_atlas());
        let mut canvas = Canvas::new(32, 32);
        r.begin(&mut canvas)
            .debug_line(Point::new(0, 10), Point::new(20, 10));
        assert_eq!(ink_bounds(&canvas), Some((0, 5, 20, 15)));
    }

    #[test]
    fn image_on_screen_fills_requested_size() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        let mut r = renderer(2.0);
        let mut canvas = Canvas::new(16, 16);
        r.begin(&mut canvas)
            .draw_image_on_screen(1, 1, Point::new(4, 3), &img);
        assert_eq!(ink_bounds(&canvas), Some((2, 2, 10, 8)));
        assert_eq!(canvas.pixel(9, 7), Some(Color::from_rgb(1, 2, 3)));
    }

    #[test]
    fn bitmap_string_is_monospace_and_skips_unmapped() {
        // 8x8 sheet of 2px tiles; 'A' at 0, so 'B' at 1, 'C' at 2.
        let font_atlas = indexed_atlas(8, 8, 2);
        let mut r = renderer(1.0);
        r.set_font(BitmapFont::from_description(
            font_atlas,
            &FontAtlasDescription::default(),
        ));
        r.set_font_scale(2.0);
        assert_eq!(r.font_grid_size(), Point::new(2, 2));
        let mut canvas = Canvas::new(32, 8);
        r.begin(&mut canvas).draw_string(0.0, 0.0, "A~C", Color::WHITE);
        // Each glyph is 4px wide; '~' leaves 4..8 empty.
        assert_eq!(canvas.pixel(0, 0), Some(Color::from_rgb(0, 255, 0)));
        assert_eq!(canvas.pixel(5, 1), Some(Color::TRANSPARENT));
        assert_eq!(canvas.pixel(8, 0), Some(Color::from_rgb(2, 253, 0)));
        assert_eq!(ink_bounds(&canvas), Some((0, 0, 12, 4)));
    }

    #[test]
    fn bitmap_lines_and_grid() {
        let mut r = renderer(1.0);
        r.set_font(BitmapFont::from_description(
            indexed_atlas(8, 8, 2),
            &FontAtlasDescription::default(),
        ));
        let mut canvas = Canvas::new(16, 16);
        {
            let mut frame = r.begin(&mut canvas);
            frame.draw_multi_string(0.0, 0.0, &["AB", "C"], Color::WHITE);
            frame.draw_char_on_grid(3, 3, 'B', Color::WHITE);
            frame.draw_string_on_grid(0, 5, "A", Color::WHITE);
        }
        assert_eq!(canvas.pixel(2, 0), Some(Color::from_rgb(1, 254, 0)));
        assert_eq!(canvas.pixel(0, 2), Some(Color::from_rgb(2, 253, 0)));
        assert_eq!(canvas.pixel(6, 6), Some(Color::from_rgb(1, 254, 0)));
        assert_eq!(canvas.pixel(0, 10), Some(Color::from_rgb(0, 255, 0)));
    }

    #[test]
    fn bitmap_text_without_font_is_a_no_op() {
        let mut r = renderer(1.0);
        let mut canvas = Canvas::new(8, 8);
        let mut frame = r.begin(&mut canvas);
        frame.draw_string(0.0, 0.0, "AB", Color::WHITE);
        frame.draw_char_on_screen(0.0, 0.0, 'A', 1.0, Color::WHITE);
        frame.draw_on_font_grid(0, 0, 0);
        assert_eq!(ink_bounds(&canvas), None);
    }

    #[test]
    fn measure_string_divides_by_device_scale() {
        let mut r = renderer(2.0);
        assert_eq!(r.measure_string("ab"), (0.0, 0.0));
        r.set_font_face(BlockFace {
            advance: 4.5,
            ascent: 6.0,
            descent: 2.0,
        });
        // ceil(9.0) / 2, round(8.0) / 2
        assert_eq!(r.measure_string("ab"), (4.5, 4.0));
    }

    #[test]
    fn text_sits_on_the_baseline() {
        let mut r = renderer(1.0);
        r.set_font_face(block_face());
        let mut canvas = Canvas::new(16, 16);
        r.begin(&mut canvas).draw_text(0.0, 6.0, "a b", RED);
        // Blocks span ascent above and descent below the baseline.
        assert_eq!(ink_bounds(&canvas), Some((0, 0, 12, 8)));
        assert_eq!(canvas.pixel(1, 1), Some(RED));
        assert_eq!(canvas.pixel(5, 1), Some(Color::TRANSPARENT));
        assert_eq!(canvas.pixel(9, 7), Some(RED));
    }

    #[test]
    fn text_without_face_is_a_no_op() {
        let mut r = renderer(1.0);
        let mut canvas = Canvas::new(8, 8);
        let mut frame = r.begin(&mut canvas);
        frame.draw_text(0.0, 6.0, "abc", RED);
        frame.draw_text_with_color_codes(0.0, 6.0, "[:red]abc");
        assert_eq!(ink_bounds(&canvas), None);
    }

    #[test]
    fn color_coded_runs_are_padded_by_a_space() {
        let mut r = renderer(1.0);
        r.set_font_face(block_face());
        let mut canvas = Canvas::new(32, 8);
        r.begin(&mut canvas)
            .draw_text_with_color_codes(0.0, 6.0, "[:red]ab[:0,0,255]c");
        // "ab" is 8px wide, then 4px of padding, then "c" at 12.
        assert_eq!(canvas.pixel(1, 1), Some(RED));
        assert_eq!(canvas.pixel(7, 1), Some(RED));
        assert_eq!(canvas.pixel(9, 1), Some(Color::TRANSPARENT));
        assert_eq!(canvas.pixel(13, 1), Some(BLUE));
        assert_eq!(ink_bounds(&canvas), Some((0, 0, 16, 8)));
    }

    #[test]
    fn custom_color_resolver() {
        let mut r = renderer(1.0);
        r.set_font_face(block_face());
        r.set_color_resolver(|_: &str| Color::from_rgb(7, 7, 7));
        let mut canvas = Canvas::new(8, 8);
        r.begin(&mut canvas)
            .draw_text_with_color_codes(0.0, 6.0, "[:whatever]x");
        assert_eq!(canvas.pixel(0, 0), Some(Color::from_rgb(7, 7, 7)));
    }

    #[test]
    fn changing_face_drops_glyph_cache() {
        let mut r = renderer(1.0);
        r.set_font_face(block_face());
        let mut canvas = Canvas::new(16, 16);
        r.begin(&mut canvas).draw_text(0.0, 6.0, "x", RED);
        assert_eq!(r.glyph_cache.len(), 1);
        r.set_font_face(block_face());
        assert!(r.glyph_cache.is_empty());
    }
}
