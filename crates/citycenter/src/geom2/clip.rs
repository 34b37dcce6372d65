//! Segment vs. convex polygon clipping.
//!
//! The segment `a + t·(b − a)`, `t ∈ [0, 1]`, is clipped against every half-space
//! `n·x <= c` of the polygon. Each constraint bounds `t` from one side; the
//! surviving interval `[t_lo, t_hi]` is the part of the segment inside the
//! closed polygon, and its width is the length fraction.
//!
//! `GeomCfg::eps_feas` only applies to segments parallel to an edge; interval
//! bounds are exact so that a segment touching a vertex gets width `0`.
//!
//! Code cross-refs: `util::ConvexPoly2`, `types::{Segment2, GeomCfg}`
use super::types::{GeomCfg, Segment2};
use super::util::ConvexPoly2;

/// Parameter interval of `seg` that lies inside `poly`, or `None` if they are disjoint.
///
/// A zero-length segment returns `Some((0, 1))` when its point is inside
/// (boundary included) and `None` otherwise.
pub fn clip_segment(seg: &Segment2, poly: &ConvexPoly2, cfg: GeomCfg) -> Option<(f64, f64)> {
    let dir = seg.dir();
    let mut t_lo = 0.0_f64;
    let mut t_hi = 1.0_f64;
    for h in &poly.hs {
        let nd = h.n.dot(&dir);
        let rhs = h.c - h.n.dot(&seg.a);
        if nd == 0.0 {
            // parallel to this edge: either always inside or always outside
            if rhs < -cfg.eps_feas {
                return None;
            }
        } else if nd > 0.0 {
            t_hi = t_hi.min(rhs / nd);
        } else {
            t_lo = t_lo.max(rhs / nd);
        }
        if t_lo > t_hi {
            return None;
        }
    }
    Some((t_lo, t_hi))
}

/// Fraction of `seg`'s length inside `poly`.
///
/// - Disjoint → `0.0`.
/// - Zero-length and inside → `1.0` (a "point" trajectory is fully inside).
/// - Otherwise `len(seg ∩ poly) / len(seg)` clamped to `[0, 1]`; touching at
///   a single point yields `0.0`.
pub fn segment_polygon_intersection_ratio(
    seg: &Segment2,
    poly: &ConvexPoly2,
    cfg: GeomCfg,
) -> f64 {
    let Some((t_lo, t_hi)) = clip_segment(seg, poly, cfg) else {
        return 0.0;
    };
    if seg.length() == 0.0 {
        return 1.0;
    }
    (t_hi - t_lo).clamp(0.0, 1.0)
}
