//! Planar geometry primitives behind the center-zone features.
//!
//! Purpose
//! - Provide the few exact, branch-explicit 2D operations the features need:
//!   slope, line angle, point/segment distance, and segment ∩ convex-polygon
//!   length ratio.
//! - Keep numerics explicit: every degenerate input (vertical, zero-length,
//!   perpendicular) maps to a documented value instead of NaN/inf.
//!
//! Coordinates are a planar projection (map units), not lat/lon.
//!
//! Code cross-refs: `Segment2`, `ConvexPoly2`, `GeomCfg`

mod clip;
mod lines;
mod types;
mod util;

pub use clip::{clip_segment, segment_polygon_intersection_ratio};
pub use lines::{angle_between, euclidian_distance, point_to_segment_distance, slope};
pub use types::{GeomCfg, Hs2, Segment2};
pub use util::ConvexPoly2;
