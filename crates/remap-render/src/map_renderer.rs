//! Grid rendering on top of a [`MapWindow`], plus the minimap.

use image::{Rgba, RgbaImage};
use remap_core::{Color, MapWindow, Point, PointF, Range};

use crate::atlas::Atlas;
use crate::renderer::Frame;

/// One thing to draw in a cell.
#[derive(Clone, Debug)]
pub struct CellDrawInfo {
    pub atlas: Atlas,
    pub index: u32,
    pub color: Color,
}

/// Supplies the draw list of a map cell.
///
/// Implementations append to `out`, which arrives empty. `tick` is passed
/// through untouched for caller-side animation.
pub trait CellLookup {
    fn cells_at(&self, cell: Point, tick: u64, out: &mut Vec<CellDrawInfo>);
}

impl<F> CellLookup for F
where
    F: Fn(Point, u64, &mut Vec<CellDrawInfo>),
{
    fn cells_at(&self, cell: Point, tick: u64, out: &mut Vec<CellDrawInfo>) {
        self(cell, tick, out)
    }
}

/// Colour of a map cell in the minimap, as RGBA bytes.
pub trait MiniMapColor {
    fn minimap_color(&self, cell: Point) -> [u8; 4];
}

impl<F> MiniMapColor for F
where
    F: Fn(Point) -> [u8; 4],
{
    fn minimap_color(&self, cell: Point) -> [u8; 4] {
        self(cell)
    }
}

fn opaque_white(_: Point) -> [u8; 4] {
    [255; 4]
}

/// Draws the visible part of a map through a [`Frame`].
///
/// Tiles are drawn with the frame's current tile scale. Give the renderer
/// and the window the same [`SharedScale`](remap_core::SharedScale) so that
/// drawn tiles and window arithmetic agree.
pub struct MapRenderer {
    window: MapWindow,
    lookup: Box<dyn CellLookup>,
    minimap_color: Box<dyn MiniMapColor>,
    minimap: RgbaImage,
    scratch: Vec<CellDrawInfo>,
}

impl MapRenderer {
    /// Takes ownership of the window and builds the minimap once.
    pub fn new(window: MapWindow, lookup: impl CellLookup + 'static) -> Self {
        let size = window.map_size();
        let mut renderer = Self {
            window,
            lookup: Box::new(lookup),
            minimap_color: Box::new(opaque_white),
            minimap: RgbaImage::new(size.x.max(0) as u32, size.y.max(0) as u32),
            scratch: Vec::new(),
        };
        renderer.update_minimap();
        renderer
    }

    #[inline]
    pub fn window(&self) -> &MapWindow {
        &self.window
    }

    #[inline]
    pub fn window_mut(&mut self) -> &mut MapWindow {
        &mut self.window
    }

    pub fn visible_map(&self) -> Range {
        self.window.visible_map()
    }

    pub fn scaled_tile_size(&self) -> PointF {
        self.window.scaled_tile_size()
    }

    pub fn set_lookup(&mut self, lookup: impl CellLookup + 'static) {
        self.lookup = Box::new(lookup);
    }

    /// Screen position of a continuous map position, unrounded.
    fn screen_pos(&self, pos: PointF) -> PointF {
        pos.scale_by(self.window.scaled_tile_size()) - self.window.scroll_offset().to_f()
    }

    /// Draw every visible cell that exists on the map, row by row.
    pub fn draw(&mut self, frame: &mut Frame<'_>, tick: u64) {
        let visible = self.window.visible_map().intersect(self.window.map_bounds());
        for cell in visible {
            self.scratch.clear();
            self.lookup.cells_at(cell, tick, &mut self.scratch);
            if self.scratch.is_empty() {
                continue;
            }
            let pos = self.screen_pos(cell.to_f());
            for info in &self.scratch {
                frame.draw_default_scale_tile(pos.x, pos.y, &info.atlas, info.index, info.color);
            }
        }
    }

    /// Draw one tile in `cell`, skipped if the cell is not visible.
    pub fn draw_on_map(&self, frame: &mut Frame<'_>, cell: Point, atlas: &Atlas, index: u32, tint: Color) {
        if !self.window.is_map_cell_visible(cell) {
            return;
        }
        let pos = self.screen_pos(cell.to_f());
        frame.draw_default_scale_tile(pos.x, pos.y, atlas, index, tint);
    }

    /// Like [`draw_on_map`](Self::draw_on_map) at a fractional position.
    /// Culling uses the cell containing `pos`.
    pub fn draw_on_map_f(&self, frame: &mut Frame<'_>, pos: PointF, atlas: &Atlas, index: u32, tint: Color) {
        if !self.window.is_map_cell_visible(pos.floor()) {
            return;
        }
        let screen = self.screen_pos(pos);
        frame.draw_default_scale_tile(screen.x, screen.y, atlas, index, tint);
    }

    /// Outline-font text anchored at the top-left of `cell`, moved by
    /// `offset` pixels. `offset.y` is where the baseline lands.
    pub fn draw_string_on_map_with_offset(
        &self,
        frame: &mut Frame<'_>,
        cell: Point,
        offset: Point,
        text: &str,
        color: Color,
    ) {
        if !self.window.is_map_cell_visible(cell) {
            return;
        }
        let pos = self.screen_pos(cell.to_f());
        frame.draw_text(pos.x + offset.x as f64, pos.y + offset.y as f64, text, color);
    }

    // -- Minimap --

    /// Takes effect on the next [`update_minimap`](Self::update_minimap).
    pub fn set_minimap_color_handler(&mut self, handler: impl MiniMapColor + 'static) {
        self.minimap_color = Box::new(handler);
    }

    /// Rebuild the whole minimap, one pixel per map cell.
    pub fn update_minimap(&mut self) {
        let (w, h) = self.minimap.dimensions();
        log::debug!("rebuilding {w}x{h} minimap");
        for (x, y, pixel) in self.minimap.enumerate_pixels_mut() {
            *pixel = Rgba(self.minimap_color.minimap_color(Point::new(x as i32, y as i32)));
        }
    }

    pub fn minimap(&self) -> &RgbaImage {
        &self.minimap
    }
}
