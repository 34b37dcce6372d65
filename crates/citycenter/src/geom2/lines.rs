//! Line primitives: slope, line-to-line angle, distances.
//!
//! - `slope`: `Δy/Δx`, `None` for vertical segments.
//! - `angle_between`: absolute angle between the supporting lines of two segments.
//! - `point_to_segment_distance`, `euclidian_distance`: planar distances.
//!
//! Degeneracy policy
//! - Verticality is the exact test `x1 == x0`; a zero-length segment is vertical.
//! - Perpendicular non-vertical lines (`1 + m1·m2 == 0`) saturate to `π/2`.
use std::f64::consts::FRAC_PI_2;

use nalgebra::Vector2;

use super::types::Segment2;

/// Slope `(y1-y0)/(x1-x0)`, or `None` when the segment is vertical.
#[inline]
pub fn slope(s: &Segment2) -> Option<f64> {
    if s.is_vertical() {
        return None;
    }
    let d = s.dir();
    Some(d.y / d.x)
}

/// Absolute angle in radians between the lines through `a` and `b`.
///
/// Cases
/// - Both non-vertical: `|atan((m1-m2)/(1+m1·m2))|`, in `[0, π/2]`.
/// - Both vertical: `0.0` (parallel).
/// - Exactly one vertical: `|π/2 − atan(m)|` with `m` the other slope, in `[0, π)`.
/// - `1 + m1·m2 == 0`: `π/2`.
///
/// Symmetric in its arguments.
pub fn angle_between(a: &Segment2, b: &Segment2) -> f64 {
    match (slope(a), slope(b)) {
        (None, None) => 0.0,
        (None, Some(m)) | (Some(m), None) => (FRAC_PI_2 - m.atan()).abs(),
        (Some(m1), Some(m2)) => {
            let denom = 1.0 + m1 * m2;
            if denom == 0.0 {
                return FRAC_PI_2;
            }
            ((m1 - m2) / denom).abs().atan()
        }
    }
}

/// Shortest distance from `p` to the finite segment `s`.
///
/// Projects onto the supporting line and clamps the parameter to `[0, 1]`;
/// a zero-length segment degrades to point distance.
pub fn point_to_segment_distance(p: Vector2<f64>, s: &Segment2) -> f64 {
    let d = s.dir();
    let len2 = d.norm_squared();
    if len2 == 0.0 {
        return (p - s.a).norm();
    }
    let t = ((p - s.a).dot(&d) / len2).clamp(0.0, 1.0);
    (p - s.point_at(t)).norm()
}

/// Planar distance between `(x_one, y_one)` and `(x_two, y_two)`.
#[inline]
pub fn euclidian_distance(x_one: f64, y_one: f64, x_two: f64, y_two: f64) -> f64 {
    (x_one - x_two).hypot(y_one - y_two)
}
