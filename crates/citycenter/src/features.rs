//! Per-row feature functions.
//!
//! All functions are pure: they read a `TripRow` (or plain coordinates) and the
//! shared `Zone`, and return new values. Missing inputs propagate as `None`.

use nalgebra::Vector2;

use crate::error::Result;
use crate::geom2::{self, GeomCfg, Segment2};
use crate::trip::TripRow;
use crate::zone::{Border, Zone};

/// Angles (radians) between the travel direction `last_entry → entry` and the
/// lines from `last_entry` to the zone middle and to each corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CenterAngles {
    pub cc_middle_angle: Option<f64>,
    pub cc_xmin_ymin_angle: Option<f64>,
    pub cc_xmax_ymin_angle: Option<f64>,
    pub cc_xmin_ymax_angle: Option<f64>,
    pub cc_xmax_ymax_angle: Option<f64>,
}

impl CenterAngles {
    pub const MISSING: CenterAngles = CenterAngles {
        cc_middle_angle: None,
        cc_xmin_ymin_angle: None,
        cc_xmax_ymin_angle: None,
        cc_xmin_ymax_angle: None,
        cc_xmax_ymax_angle: None,
    };

    /// Output column names, in the order of [`CenterAngles::values`].
    pub const COLUMNS: [&'static str; 5] = [
        "cc_middle_angle",
        "cc_xmin_ymin_angle",
        "cc_xmax_ymin_angle",
        "cc_xmin_ymax_angle",
        "cc_xmax_ymax_angle",
    ];

    pub fn values(&self) -> [Option<f64>; 5] {
        [
            self.cc_middle_angle,
            self.cc_xmin_ymin_angle,
            self.cc_xmax_ymin_angle,
            self.cc_xmin_ymax_angle,
            self.cc_xmax_ymax_angle,
        ]
    }

    pub fn is_missing(&self) -> bool {
        self.values().iter().all(Option::is_none)
    }
}

/// Heading of the travel segment relative to the zone middle and corners.
///
/// All five outputs are missing when the previous entry (or the entry itself)
/// is missing; otherwise every output is `angle_between(travel, reference)`.
pub fn entry_to_center_angles(row: &TripRow, zone: &Zone) -> CenterAngles {
    let (Some(last), Some(entry)) = (row.last_entry(), row.entry()) else {
        return CenterAngles::MISSING;
    };
    let travel = Segment2::new(last, entry);
    let toward = |x: f64, y: f64| {
        let reference = Segment2::new(last, Vector2::new(x, y));
        Some(geom2::angle_between(&travel, &reference))
    };
    CenterAngles {
        cc_middle_angle: toward(zone.x_mid, zone.y_mid),
        cc_xmin_ymin_angle: toward(zone.x_min, zone.y_min),
        cc_xmax_ymin_angle: toward(zone.x_max, zone.y_min),
        cc_xmin_ymax_angle: toward(zone.x_min, zone.y_max),
        cc_xmax_ymax_angle: toward(zone.x_max, zone.y_max),
    }
}

/// Distance from the entry point to one border segment of the zone.
///
/// `None` when the entry point is missing.
pub fn entry_border_distance(row: &TripRow, border: Border, zone: &Zone) -> Option<f64> {
    let p = row.entry()?;
    Some(geom2::point_to_segment_distance(p, zone.border(border)))
}

/// Like [`entry_border_distance`], with the border given by name.
///
/// Fails with `Error::UnknownBorder` for anything but `left`, `right`,
/// `lower`, `upper` (optionally suffixed `_border`).
pub fn entry_border_distance_named(row: &TripRow, border: &str, zone: &Zone) -> Result<Option<f64>> {
    let border: Border = border.parse()?;
    Ok(entry_border_distance(row, border, zone))
}

/// Closed-rectangle membership; the boundary counts as inside.
#[inline]
pub fn is_inside_city(x: f64, y: f64, zone: &Zone) -> bool {
    (zone.x_min..=zone.x_max).contains(&x) && (zone.y_min..=zone.y_max).contains(&y)
}

pub use geom2::euclidian_distance;

/// Normalized distance of each value to the zone midpoint on one axis.
///
/// `|v − midpoint| / max |v − midpoint|`, so the farthest value maps to `1.0`.
///
/// Policy
/// - Empty input → empty output.
/// - All deviations zero → all zeros.
/// - NaN stays NaN and is ignored when taking the maximum.
/// - An infinite value makes every finite output NaN; table columns drop
///   non-finite values through `trip::coord` before they get here.
pub fn dist_to_center(values: &[f64], midpoint: f64) -> Vec<f64> {
    let dist: Vec<f64> = values.iter().map(|v| (v - midpoint).abs()).collect();
    let max = dist.iter().copied().fold(0.0_f64, f64::max);
    if max == 0.0 {
        return dist.iter().map(|d| if d.is_nan() { f64::NAN } else { 0.0 }).collect();
    }
    dist.into_iter().map(|d| d / max).collect()
}

/// Fraction of the entry → exit segment that lies inside the zone polygon.
///
/// `None` when the exit (or entry) point is missing; `0` when the segment
/// misses the zone; `1` for a zero-length segment inside the zone.
pub fn center_permanency(row: &TripRow, zone: &Zone, cfg: GeomCfg) -> Option<f64> {
    let seg = row.entry_exit()?;
    Some(geom2::segment_polygon_intersection_ratio(&seg, &zone.polygon, cfg))
}
