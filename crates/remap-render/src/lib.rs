//! **remap-render** — tile atlas rendering for the remap map editor.
//!
//! This crate draws tiles, bitmap and outline text, and whole maps onto a
//! [`RenderTarget`]. The main pieces:
//!
//! - [`Atlas`]: an image cut into a grid of equally sized tiles.
//! - [`TileRenderer`] and [`Frame`]: drawing primitives for one render pass.
//! - [`MapRenderer`]: draws the visible part of a [`MapWindow`] and keeps a
//!   one-pixel-per-cell minimap.
//! - [`Canvas`]: a software render target backed by an RGBA image.
//!
//! Coordinates given to drawing calls are device-independent pixels.
//!
//! [`MapWindow`]: remap_core::MapWindow

pub mod atlas;
pub mod bitmap_font;
pub mod config;
pub mod error;
pub mod font;
pub mod map_renderer;
pub mod renderer;
pub mod target;
pub mod text;
pub mod transform;

pub use atlas::{Atlas, ImageRegion};
pub use bitmap_font::{BitmapFont, FontAtlasDescription, SpecialCharacterChain, font_index_from_description};
pub use config::RendererConfig;
pub use error::{AtlasError, FontError};
pub use font::{FontFace, GlyphBitmap, LineMetrics, TtfFace};
pub use map_renderer::{CellDrawInfo, CellLookup, MapRenderer, MiniMapColor};
pub use renderer::{Frame, TileRenderer};
pub use target::{Canvas, RenderTarget};
pub use text::{ColorResolver, ColorRun, ColoredTextPart, NamedColors, layout_color_runs, parse_color_codes};
pub use transform::{DrawOp, Transform};

pub use remap_core;
