//! Renderer configuration.

use remap_core::Color;

/// Tunables of a [`TileRenderer`](crate::TileRenderer) that are plain data.
///
/// With the `serde` feature enabled this can be loaded from the editor's
/// settings file; missing fields fall back to [`Default`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RendererConfig {
    /// Index of a solid white tile in the default atlas, stretched for
    /// rectangles, borders and lines.
    pub white_tile: u32,
    /// Scale of bitmap-font glyphs relative to their tile size.
    pub font_scale: f64,
    /// Border colour for [`Frame::draw_default_border`](crate::Frame::draw_default_border).
    pub default_border_color: Color,
    /// Fill colour for [`Frame::draw_default_border`](crate::Frame::draw_default_border).
    pub default_fill_color: Color,
    /// Multiplied onto every draw's colour, `[r, g, b, a]`.
    pub global_scale_color: [f32; 4],
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            white_tile: 0,
            font_scale: 1.0,
            default_border_color: Color::WHITE,
            default_fill_color: Color::BLACK,
            global_scale_color: [1.0; 4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_identity() {
        let c = RendererConfig::default();
        assert_eq!(c.global_scale_color, [1.0; 4]);
        assert_eq!(c.font_scale, 1.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let c: RendererConfig =
            serde_json::from_str(r#"{"white_tile": 219, "global_scale_color": [0.5, 0.5, 1.0, 1.0]}"#)
                .unwrap();
        assert_eq!(c.white_tile, 219);
        assert_eq!(c.global_scale_color, [0.5, 0.5, 1.0, 1.0]);
        assert_eq!(c.font_scale, 1.0);
        assert_eq!(c.default_fill_color, Color::BLACK);
    }
}
