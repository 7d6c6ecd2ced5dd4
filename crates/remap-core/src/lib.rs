//! **remap-core** — geometry, colour and viewport types for the remap tile
//! renderer.
//!
//! This crate has no rendering dependencies. It provides integer and
//! floating-point points, half-open ranges, packed RGBA colours, live scale
//! sources and the [`MapWindow`] viewport model used by `remap-render`.

pub mod color;
pub mod geom;
pub mod map_window;
pub mod scale;

pub use color::Color;
pub use geom::{Point, PointF, Range};
pub use map_window::MapWindow;
pub use scale::{FixedScale, ScaleSource, SharedScale};
