use nalgebra::Vector2;

use super::types::Hs2;

#[inline]
fn unit(n: Vector2<f64>) -> Option<Vector2<f64>> {
    let norm = n.norm();
    if !(norm.is_finite()) || norm <= 0.0 {
        return None;
    }
    Some(n / norm)
}

/// z-component of `(b - a) × (c - b)`; positive for a left turn at `b`.
#[inline]
fn turn(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let u = b - a;
    let v = c - b;
    u.x * v.y - u.y * v.x
}

/// Closed convex polygon kept in both representations.
///
/// Invariants:
/// - `vertices` in CCW order, every corner a strict left turn, at least 3.
/// - `hs[k]` is the outward unit half-space of edge `vertices[k] → vertices[k+1]`.
#[derive(Clone, Debug)]
pub struct ConvexPoly2 {
    pub vertices: Vec<Vector2<f64>>,
    pub hs: Vec<Hs2>,
}

impl ConvexPoly2 {
    /// Build from vertices already in counter-clockwise order.
    ///
    /// Returns `None` for fewer than 3 vertices, non-finite coordinates,
    /// repeated consecutive vertices, or any corner that is not a strict left
    /// turn (clockwise, collinear or reflex input).
    pub fn from_ccw_vertices(vertices: &[Vector2<f64>]) -> Option<Self> {
        let m = vertices.len();
        if m < 3 || vertices.iter().any(|v| !(v.x.is_finite() && v.y.is_finite())) {
            return None;
        }
        let mut hs = Vec::with_capacity(m);
        for k in 0..m {
            let p = vertices[k];
            let q = vertices[(k + 1) % m];
            let r = vertices[(k + 2) % m];
            if turn(p, q, r) <= 0.0 {
                return None;
            }
            let edge = q - p;
            // outward normal of a CCW edge is the edge rotated 90° clockwise
            let n = unit(Vector2::new(edge.y, -edge.x))?;
            // offset from the unit normal keeps axis-aligned edges exact
            hs.push(Hs2::new(n, n.dot(&p)));
        }
        Some(Self {
            vertices: vertices.to_vec(),
            hs,
        })
    }

    /// Membership check with custom slack (eps); boundary counts as inside.
    #[inline]
    pub fn contains_eps(&self, p: Vector2<f64>, eps: f64) -> bool {
        self.hs.iter().all(|h| h.satisfies_eps(p, eps))
    }

    /// Shoelace area (positive for CCW).
    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        let mut a = 0.0;
        for i in 0..n {
            let p = self.vertices[i];
            let q = self.vertices[(i + 1) % n];
            a += p.x * q.y - q.x * p.y;
        }
        0.5 * a
    }

    /// WKT `POLYGON ((...))` with the ring closed on the first vertex.
    pub fn to_wkt(&self) -> String {
        let mut ring: Vec<String> = self
            .vertices
            .iter()
            .map(|v| format!("{} {}", v.x, v.y))
            .collect();
        if let Some(first) = self.vertices.first() {
            ring.push(format!("{} {}", first.x, first.y));
        }
        format!("POLYGON (({}))", ring.join(", "))
    }
}
