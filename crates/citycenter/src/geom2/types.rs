//! Basic 2D types and tolerances used by the feature primitives.
//!
//! - `GeomCfg`: centralizes the membership slack used when clipping.
//! - `Hs2`: closed half‑space `n·x <= c` with helper predicates.
//! - `Segment2`: finite two-point segment, the unit every feature is built from.
//!
//! Code cross-refs: `util::ConvexPoly2`, `clip::segment_polygon_intersection_ratio`

use nalgebra::Vector2;

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Slack added to `c` when testing `n·x <= c`. Absolute, in map units.
    pub eps_feas: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self { eps_feas: 1e-9 }
    }
}

/// Closed half‑space `n · x <= c`.
#[derive(Clone, Copy, Debug)]
pub struct Hs2 {
    pub n: Vector2<f64>,
    pub c: f64,
}

impl Hs2 {
    #[inline]
    pub fn new(n: Vector2<f64>, c: f64) -> Self {
        Self { n, c }
    }
    #[inline]
    pub fn satisfies_eps(&self, p: Vector2<f64>, eps: f64) -> bool {
        self.n.dot(&p) <= self.c + eps
    }
}

/// Finite segment from `a` to `b`.
///
/// Orientation matters only for `slope` sign conventions and parametrization
/// (`point_at(0) == a`, `point_at(1) == b`); lengths and distances are symmetric.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment2 {
    pub a: Vector2<f64>,
    pub b: Vector2<f64>,
}

impl Segment2 {
    #[inline]
    pub fn new(a: Vector2<f64>, b: Vector2<f64>) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn from_coords(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(Vector2::new(x0, y0), Vector2::new(x1, y1))
    }

    /// Direction vector `b - a`.
    #[inline]
    pub fn dir(&self) -> Vector2<f64> {
        self.b - self.a
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.dir().norm()
    }

    /// Exact test `x1 == x0`. Zero-length segments are vertical too.
    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.b.x - self.a.x == 0.0
    }

    #[inline]
    pub fn point_at(&self, t: f64) -> Vector2<f64> {
        self.a + self.dir() * t
    }

    /// Axis-aligned bounding box as `(min, max)` corners.
    #[inline]
    pub fn bounds(&self) -> (Vector2<f64>, Vector2<f64>) {
        (self.a.inf(&self.b), self.a.sup(&self.b))
    }
}
