//! Affine transforms and per-draw operations.

/// A 2D affine transform mapping source image coordinates to target pixels:
///
/// ```text
/// x' = a * x + b * y + tx
/// y' = c * x + d * y + ty
/// ```
///
/// Operations compose in call order: `t.scale(..)` followed by
/// `t.translate(..)` scales first, then translates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Append a scale.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.a *= sx;
        self.b *= sx;
        self.tx *= sx;
        self.c *= sy;
        self.d *= sy;
        self.ty *= sy;
    }

    /// Append a translation.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.tx += dx;
        self.ty += dy;
    }

    /// Append a rotation by `theta` radians (clockwise in screen space).
    pub fn rotate(&mut self, theta: f64) {
        let (sin, cos) = theta.sin_cos();
        let Self { a, b, c, d, tx, ty } = *self;
        self.a = cos * a - sin * c;
        self.b = cos * b - sin * d;
        self.tx = cos * tx - sin * ty;
        self.c = sin * a + cos * c;
        self.d = sin * b + cos * d;
        self.ty = sin * tx + cos * ty;
    }

    /// Map a point.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.b * y + self.tx,
            self.c * x + self.d * y + self.ty,
        )
    }

    /// The inverse transform, or `None` if this one collapses an axis.
    pub fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(Self {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            tx: (self.b * self.ty - self.d * self.tx) * inv,
            ty: (self.c * self.tx - self.a * self.ty) * inv,
        })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Everything a render target needs to blit one image region: where it
/// goes and how its colours are scaled.
///
/// Built fresh for every draw call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawOp {
    pub transform: Transform,
    /// Per-channel multiplier `[r, g, b, a]` in `0.0..=1.0`.
    pub color_scale: [f32; 4],
}

impl Default for DrawOp {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            color_scale: [1.0; 4],
        }
    }
}
