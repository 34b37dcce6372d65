//! Geometric trip features relative to a fixed city-center rectangle.
//!
//! Layout (leaves first)
//! - `zone`: the immutable center rectangle (bounds, midpoint, borders, polygon).
//! - `geom2`: planar primitives (slope, line angle, distances, segment clipping).
//! - `features`: pure per-row feature functions.
//! - `batch`: data-parallel table passes and whole-table helpers.
//! - `synth`: seeded synthetic trip tables.
//!
//! Missing inputs propagate as `None`; only caller misuse is an `Error`.

pub mod batch;
pub mod error;
pub mod features;
pub mod geom2;
pub mod synth;
pub mod trip;
pub mod zone;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::batch::{trip_features, TripFeatures};
    pub use crate::features::{
        center_permanency, dist_to_center, entry_border_distance, entry_border_distance_named,
        entry_to_center_angles, euclidian_distance, is_inside_city, CenterAngles,
    };
    pub use crate::geom2::{GeomCfg, Segment2};
    pub use crate::trip::TripRow;
    pub use crate::zone::{Axis, Border, Zone, ZoneBounds};
    pub use crate::{Error, Result};
}
