//! The [`MapWindow`] viewport model.
//!
//! A map window maps a large virtual grid of cells onto a fixed-size screen
//! region. It owns the scroll offset and performs every map↔screen
//! conversion; it never draws anything itself.

use crate::geom::{Point, PointF, Range};
use crate::scale::ScaleSource;

/// A scrollable viewport over a grid of `map_size` cells.
///
/// All pixel quantities are device-independent. The on-screen size of a cell
/// is `grid_size * tile_scale`, where the tile scale is read from its source
/// on every call so zoom changes apply without re-creating the window.
pub struct MapWindow {
    tile_scale: Box<dyn ScaleSource>,
    /// In pixels.
    window_size: Point,
    /// In cells.
    map_size: Point,
    /// In pixels, top-left corner of the viewport.
    scroll_offset: Point,
    /// In pixels, size of one unscaled cell.
    grid_size: Point,
}

impl MapWindow {
    pub fn new(
        window_size: Point,
        map_size: Point,
        grid_size: Point,
        tile_scale: impl ScaleSource + 'static,
    ) -> Self {
        Self {
            tile_scale: Box::new(tile_scale),
            window_size,
            map_size,
            scroll_offset: Point::ZERO,
            grid_size,
        }
    }

    /// Current tile scale, read live.
    #[inline]
    pub fn tile_scale(&self) -> f64 {
        self.tile_scale.scale()
    }

    /// Replace the tile-scale source and re-clamp the scroll offset.
    pub fn set_tile_scale(&mut self, tile_scale: impl ScaleSource + 'static) {
        self.tile_scale = Box::new(tile_scale);
        self.clamp_scroll();
    }

    #[inline]
    pub fn grid_size(&self) -> Point {
        self.grid_size
    }

    #[inline]
    pub fn map_size(&self) -> Point {
        self.map_size
    }

    /// The cells that exist: `[0, map_size)`.
    #[inline]
    pub fn map_bounds(&self) -> Range {
        Range::with_size(Point::ZERO, self.map_size)
    }

    #[inline]
    pub fn window_size_in_pixels(&self) -> Point {
        self.window_size
    }

    #[inline]
    pub fn scroll_offset(&self) -> Point {
        self.scroll_offset
    }

    /// On-screen size of one cell at the current tile scale.
    #[inline]
    pub fn scaled_tile_size(&self) -> PointF {
        self.grid_size.to_f() * self.tile_scale()
    }

    /// Size of the whole map in pixels at the current tile scale.
    pub fn map_size_in_pixels(&self) -> Point {
        self.map_size.to_f().scale_by(self.scaled_tile_size()).floor()
    }

    // -- Scrolling --

    /// Set the scroll offset, clamping each axis to
    /// `[0, max(0, map_px - window_px)]`.
    ///
    /// An axis on which the whole map fits into the window is pinned to 0.
    pub fn set_scroll_offset(&mut self, x: i32, y: i32) {
        let map_px = self.map_size_in_pixels();
        self.scroll_offset = Point::new(
            clamp_axis(x, map_px.x, self.window_size.x),
            clamp_axis(y, map_px.y, self.window_size.y),
        );
    }

    pub fn scroll_by(&mut self, delta: Point) {
        let current = self.scroll_offset;
        self.set_scroll_offset(
            current.x.saturating_add(delta.x),
            current.y.saturating_add(delta.y),
        );
    }

    /// Scroll so the center of `cell` sits in the middle of the window.
    pub fn center_on(&mut self, cell: Point) {
        let center = self.pixel_offset_center(cell);
        let half = self.window_size / 2;
        self.set_scroll_offset(center.x.saturating_sub(half.x), center.y.saturating_sub(half.y));
    }

    /// Scroll so the continuous map position `pos` sits in the middle of
    /// the window.
    pub fn center_on_float(&mut self, pos: PointF) {
        let tile = self.scaled_tile_size();
        let half = self.window_size / 2;
        let target = PointF::new(
            pos.x * tile.x - half.x as f64,
            pos.y * tile.y - half.y as f64,
        )
        .floor();
        self.set_scroll_offset(target.x, target.y);
    }

    pub fn reset_scrolling(&mut self) {
        self.scroll_offset = Point::ZERO;
    }

    /// Record a new window size and re-clamp the scroll offset against it.
    pub fn on_screen_size_changed(&mut self, new_window_size: Point) {
        self.window_size = new_window_size;
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let current = self.scroll_offset;
        self.set_scroll_offset(current.x, current.y);
    }

    // -- Visibility --

    /// The cells touched by the viewport.
    ///
    /// Spans `ceil(window / tile) + 1` cells per axis starting at the cell
    /// under the top-left pixel. The extra cell over-covers on purpose so
    /// partially visible edge cells are never culled. The range is not
    /// clipped to the map bounds.
    pub fn visible_map(&self) -> Range {
        let tile = self.scaled_tile_size();
        let first = PointF::new(
            self.scroll_offset.x as f64 / tile.x,
            self.scroll_offset.y as f64 / tile.y,
        )
        .floor();
        let count_x = (self.window_size.x as f64 / tile.x).ceil() as i32;
        let count_y = (self.window_size.y as f64 / tile.y).ceil() as i32;
        Range::new(
            first.x,
            first.y,
            first.x.saturating_add(count_x).saturating_add(1),
            first.y.saturating_add(count_y).saturating_add(1),
        )
    }

    #[inline]
    pub fn is_map_cell_visible(&self, cell: Point) -> bool {
        self.visible_map().contains(cell)
    }

    // -- Conversions --

    /// Pixel position of the top-left corner of `cell`, ignoring scroll.
    pub fn pixel_offset_top_left(&self, cell: Point) -> Point {
        cell.to_f().scale_by(self.scaled_tile_size()).floor()
    }

    /// Pixel position of the center of `cell`, ignoring scroll.
    pub fn pixel_offset_center(&self, cell: Point) -> Point {
        let tile = self.scaled_tile_size();
        PointF::new(
            (cell.x as f64 + 0.5) * tile.x,
            (cell.y as f64 + 0.5) * tile.y,
        )
        .floor()
    }

    /// Screen position of the top-left corner of `cell`.
    pub fn map_to_screen(&self, cell: Point) -> Point {
        sub_scroll(self.pixel_offset_top_left(cell), self.scroll_offset)
    }

    /// Screen position of a continuous map position.
    pub fn map_float_to_screen(&self, pos: PointF) -> Point {
        sub_scroll(pos.scale_by(self.scaled_tile_size()).floor(), self.scroll_offset)
    }

    /// The cell under the screen pixel `pixels`.
    pub fn map_cell_at_screen_pos(&self, pixels: Point) -> Point {
        self.exact_map_position_from_screen_pos(pixels).floor()
    }

    /// The continuous map position under the screen pixel `pixels`.
    pub fn exact_map_position_from_screen_pos(&self, pixels: Point) -> PointF {
        let tile = self.scaled_tile_size();
        PointF::new(
            (pixels.x as f64 + self.scroll_offset.x as f64) / tile.x,
            (pixels.y as f64 + self.scroll_offset.y as f64) / tile.y,
        )
    }
}

#[inline]
fn sub_scroll(p: Point, scroll: Point) -> Point {
    Point::new(p.x.saturating_sub(scroll.x), p.y.saturating_sub(scroll.y))
}

#[inline]
fn clamp_axis(value: i32, map_px: i32, window_px: i32) -> i32 {
    value.clamp(0, map_px.saturating_sub(window_px).max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{FixedScale, SharedScale};

    fn editor_window() -> MapWindow {
        MapWindow::new(
            Point::new(320, 240),
            Point::new(100, 100),
            Point::new(16, 16),
            FixedScale(2.0),
        )
    }

    #[test]
    fn map_size_in_pixels_uses_tile_scale() {
        let w = editor_window();
        assert_eq!(w.map_size_in_pixels(), Point::new(3200, 3200));
        assert_eq!(w.scaled_tile_size(), PointF::new(32.0, 32.0));
    }

    #[test]
    fn center_on_float_hits_cell_corner() {
        let mut w = editor_window();
        w.center_on_float(PointF::new(50.0, 50.0));
        assert_eq!(w.scroll_offset(), Point::new(1440, 1480));
    }

    #[test]
    fn center_on_targets_cell_center() {
        let mut w = editor_window();
        w.center_on(Point::new(50, 50));
        // (50 + 0.5) * 32 = 1616; minus half the window.
        assert_eq!(w.scroll_offset(), Point::new(1456, 1496));
    }

    #[test]
    fn center_on_clamps_at_edges() {
        let mut w = editor_window();
        w.center_on(Point::new(0, 0));
        assert_eq!(w.scroll_offset(), Point::ZERO);
        w.center_on(Point::new(99, 99));
        assert_eq!(w.scroll_offset(), Point::new(3200 - 320, 3200 - 240));
    }

    #[test]
    fn scroll_by_stays_in_bounds() {
        let mut w = editor_window();
        let max = Point::new(3200 - 320, 3200 - 240);
        let deltas = [
            Point::new(100, 50),
            Point::new(-300, 10),
            Point::new(5000, 5000),
            Point::new(-1, -1),
            Point::new(-10000, 3),
            Point::new(17, -20000),
            Point::new(2900, 2999),
        ];
        for d in deltas {
            w.scroll_by(d);
            let s = w.scroll_offset();
            assert!(s.x >= 0 && s.x <= max.x, "x out of bounds: {s}");
            assert!(s.y >= 0 && s.y <= max.y, "y out of bounds: {s}");
        }
        assert_eq!(w.scroll_offset(), Point::new(2880, 2960));
    }

    #[test]
    fn axis_pinned_to_zero_when_map_fits() {
        // 10 cells * 16px = 160px wide fits in 320; 100 cells tall does not.
        let mut w = MapWindow::new(
            Point::new(320, 240),
            Point::new(10, 100),
            Point::new(16, 16),
            FixedScale(1.0),
        );
        w.scroll_by(Point::new(50, 50));
        assert_eq!(w.scroll_offset(), Point::new(0, 50));
        w.set_scroll_offset(-5, -5);
        assert_eq!(w.scroll_offset(), Point::ZERO);
    }

    #[test]
    fn visible_map_overscans_by_one_cell() {
        let mut w = editor_window();
        assert_eq!(w.visible_map(), Range::new(0, 0, 11, 9));
        w.set_scroll_offset(40, 70);
        // first = (1, 2); count = (10, 8)
        assert_eq!(w.visible_map(), Range::new(1, 2, 12, 11));
        assert!(w.is_map_cell_visible(Point::new(11, 10)));
        assert!(!w.is_map_cell_visible(Point::new(12, 10)));
    }

    #[test]
    fn visible_map_covers_every_screen_pixel() {
        let scales = [1.0, 1.5, 2.0, 3.0];
        let scrolls = [Point::new(0, 0), Point::new(7, 13), Point::new(33, 95), Point::new(250, 181)];
        for scale in scales {
            let mut w = MapWindow::new(
                Point::new(100, 70),
                Point::new(64, 64),
                Point::new(10, 10),
                FixedScale(scale),
            );
            for s in scrolls {
                w.set_scroll_offset(s.x, s.y);
                let visible = w.visible_map();
                for y in 0..70 {
                    for x in 0..100 {
                        let cell = w.map_cell_at_screen_pos(Point::new(x, y));
                        assert!(visible.contains(cell), "{cell} not in {visible} (scale {scale})");
                    }
                }
            }
        }
    }

    #[test]
    fn map_to_screen_round_trip() {
        let mut w = editor_window();
        w.set_scroll_offset(123, 77);
        for cell in Range::new(0, 0, 20, 20) {
            let screen = w.map_to_screen(cell);
            assert_eq!(w.map_cell_at_screen_pos(screen), cell);
            assert_eq!(w.map_to_screen(w.map_cell_at_screen_pos(screen)), screen);
        }
    }

    #[test]
    fn screen_to_map_floors_negative_positions() {
        let w = editor_window();
        assert_eq!(w.map_cell_at_screen_pos(Point::new(-1, -33)), Point::new(-1, -2));
        let exact = w.exact_map_position_from_screen_pos(Point::new(48, 16));
        assert_eq!(exact, PointF::new(1.5, 0.5));
    }

    #[test]
    fn map_float_to_screen_subtracts_scroll() {
        let mut w = editor_window();
        w.set_scroll_offset(10, 20);
        assert_eq!(w.map_float_to_screen(PointF::new(1.5, 2.25)), Point::new(38, 52));
    }

    #[test]
    fn tile_scale_is_read_live() {
        let zoom = SharedScale::new(1.0);
        let mut w = MapWindow::new(
            Point::new(320, 240),
            Point::new(100, 100),
            Point::new(16, 16),
            zoom.clone(),
        );
        assert_eq!(w.map_size_in_pixels(), Point::new(1600, 1600));
        zoom.set(0.5);
        assert_eq!(w.map_size_in_pixels(), Point::new(800, 800));
        w.scroll_by(Point::new(10_000, 10_000));
        assert_eq!(w.scroll_offset(), Point::new(800 - 320, 800 - 240));
    }

    #[test]
    fn resizing_reclamps_scroll() {
        let mut w = editor_window();
        w.scroll_by(Point::new(10_000, 10_000));
        w.on_screen_size_changed(Point::new(640, 480));
        assert_eq!(w.window_size_in_pixels(), Point::new(640, 480));
        assert_eq!(w.scroll_offset(), Point::new(3200 - 640, 3200 - 480));
        w.reset_scrolling();
        assert_eq!(w.scroll_offset(), Point::ZERO);
    }

    #[test]
    fn zero_scale_degrades_without_overflow() {
        let mut w = MapWindow::new(
            Point::new(320, 240),
            Point::new(100, 100),
            Point::new(16, 16),
            FixedScale(0.0),
        );
        assert_eq!(w.map_size_in_pixels(), Point::ZERO);
        let visible = w.visible_map();
        assert!(visible.contains(Point::ZERO));
        assert_eq!(visible.max, Point::new(i32::MAX, i32::MAX));
        w.scroll_by(Point::new(i32::MAX, i32::MAX));
        assert_eq!(w.scroll_offset(), Point::ZERO);
        w.center_on(Point::new(i32::MIN, i32::MIN));
        assert_eq!(w.scroll_offset(), Point::ZERO);
        assert_eq!(w.map_to_screen(Point::new(40, 40)), Point::ZERO);
        let _ = w.map_cell_at_screen_pos(Point::new(10, 10));
    }
}
