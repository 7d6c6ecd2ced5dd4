//! Live scale factors.
//!
//! Device scale and tile scale can change between frames (DPI switches,
//! zooming), so consumers hold a [`ScaleSource`] and read it on every use
//! instead of caching a number.

use std::cell::Cell;
use std::rc::Rc;

/// Something that yields the current value of a scale factor.
pub trait ScaleSource {
    fn scale(&self) -> f64;
}

impl<F> ScaleSource for F
where
    F: Fn() -> f64,
{
    #[inline]
    fn scale(&self) -> f64 {
        self()
    }
}

/// A scale that never changes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedScale(pub f64);

impl ScaleSource for FixedScale {
    #[inline]
    fn scale(&self) -> f64 {
        self.0
    }
}

/// A scale shared between several readers and one writer.
///
/// Clones observe the same value, so the editor can hand one clone to the
/// tile renderer and one to the map window and zoom both with a single
/// [`set`](SharedScale::set).
#[derive(Clone, Debug)]
pub struct SharedScale(Rc<Cell<f64>>);

impl SharedScale {
    pub fn new(value: f64) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    pub fn get(&self) -> f64 {
        self.0.get()
    }

    pub fn set(&self, value: f64) {
        self.0.set(value);
    }
}

impl Default for SharedScale {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ScaleSource for SharedScale {
    #[inline]
    fn scale(&self) -> f64 {
        self.get()
    }
}
