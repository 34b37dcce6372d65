//! The city-center zone: a fixed axis-aligned rectangle in projected coordinates.
//!
//! A `Zone` is built once from `ZoneBounds` and then only read. Every derived
//! field (midpoint, borders, polygon) is a pure function of the four bounds.

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geom2::{ConvexPoly2, Segment2};

/// Rectangle bounds. `Default` is the fixed city-center rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneBounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl ZoneBounds {
    pub const CITY_CENTER: ZoneBounds = ZoneBounds {
        x_min: 3750901.5068,
        y_min: -19268905.6133,
        x_max: 3770901.5068,
        y_max: -19208905.6133,
    };
}

impl Default for ZoneBounds {
    fn default() -> Self {
        Self::CITY_CENTER
    }
}

/// Coordinate axis, used to pick the midpoint component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// One of the four rectangle borders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Border {
    Left,
    Right,
    Lower,
    Upper,
}

impl Border {
    pub const ALL: [Border; 4] = [Border::Left, Border::Right, Border::Lower, Border::Upper];

    pub fn name(self) -> &'static str {
        match self {
            Border::Left => "left",
            Border::Right => "right",
            Border::Lower => "lower",
            Border::Upper => "upper",
        }
    }
}

impl fmt::Display for Border {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Border {
    type Err = Error;

    /// Accepts `left` or `left_border` (and likewise for the others).
    fn from_str(s: &str) -> Result<Self> {
        match s.strip_suffix("_border").unwrap_or(s) {
            "left" => Ok(Border::Left),
            "right" => Ok(Border::Right),
            "lower" => Ok(Border::Lower),
            "upper" => Ok(Border::Upper),
            _ => Err(Error::UnknownBorder(s.to_string())),
        }
    }
}

/// Immutable description of the center rectangle.
#[derive(Clone, Debug)]
pub struct Zone {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
    pub x_mid: f64,
    pub y_mid: f64,
    pub left: Segment2,
    pub right: Segment2,
    pub lower: Segment2,
    pub upper: Segment2,
    pub polygon: ConvexPoly2,
}

impl Zone {
    /// Derive midpoint, borders and polygon from the bounds.
    ///
    /// Fails with `Error::InvalidBounds` unless all bounds are finite and
    /// `x_min < x_max`, `y_min < y_max`.
    pub fn new(b: ZoneBounds) -> Result<Self> {
        let finite = [b.x_min, b.y_min, b.x_max, b.y_max]
            .iter()
            .all(|v| v.is_finite());
        let invalid = || Error::InvalidBounds {
            x_min: b.x_min,
            y_min: b.y_min,
            x_max: b.x_max,
            y_max: b.y_max,
        };
        if !finite || b.x_min >= b.x_max || b.y_min >= b.y_max {
            return Err(invalid());
        }
        let x_mid = b.x_min + (b.x_max - b.x_min) / 2.0;
        let y_mid = b.y_min + (b.y_max - b.y_min) / 2.0;
        let corners = [
            Vector2::new(b.x_min, b.y_min),
            Vector2::new(b.x_max, b.y_min),
            Vector2::new(b.x_max, b.y_max),
            Vector2::new(b.x_min, b.y_max),
        ];
        let polygon = ConvexPoly2::from_ccw_vertices(&corners).ok_or_else(invalid)?;
        Ok(Self {
            x_min: b.x_min,
            y_min: b.y_min,
            x_max: b.x_max,
            y_max: b.y_max,
            x_mid,
            y_mid,
            left: Segment2::from_coords(b.x_min, b.y_min, b.x_min, b.y_max),
            right: Segment2::from_coords(b.x_max, b.y_min, b.x_max, b.y_max),
            lower: Segment2::from_coords(b.x_min, b.y_min, b.x_max, b.y_min),
            upper: Segment2::from_coords(b.x_min, b.y_max, b.x_max, b.y_max),
            polygon,
        })
    }

    pub fn bounds(&self) -> ZoneBounds {
        ZoneBounds {
            x_min: self.x_min,
            y_min: self.y_min,
            x_max: self.x_max,
            y_max: self.y_max,
        }
    }

    #[inline]
    pub fn middle(&self) -> Vector2<f64> {
        Vector2::new(self.x_mid, self.y_mid)
    }

    #[inline]
    pub fn mid(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x_mid,
            Axis::Y => self.y_mid,
        }
    }

    #[inline]
    pub fn border(&self, border: Border) -> &Segment2 {
        match border {
            Border::Left => &self.left,
            Border::Right => &self.right,
            Border::Lower => &self.lower,
            Border::Upper => &self.upper,
        }
    }

    pub fn polygon_wkt(&self) -> String {
        self.polygon.to_wkt()
    }
}

impl Default for Zone {
    fn default() -> Self {
        // CITY_CENTER satisfies every check in `new`.
        match Zone::new(ZoneBounds::CITY_CENTER) {
            Ok(z) => z,
            Err(e) => unreachable!("built-in zone bounds rejected: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_zone_matches_constants() {
        let z = Zone::default();
        assert_eq!(z.x_min, 3750901.5068);
        assert_eq!(z.y_min, -19268905.6133);
        assert_eq!(z.x_max, 3770901.5068);
        assert_eq!(z.y_max, -19208905.6133);
        assert!((z.x_mid - 3760901.5068).abs() < 1e-6);
        assert!((z.y_mid - -19238905.6133).abs() < 1e-6);
        assert_eq!(z.polygon.vertices.len(), 4);
        assert!((z.polygon.area() - 20000.0 * 60000.0).abs() < 1.0);
    }

    #[test]
    fn borders_span_the_rectangle() {
        let z = Zone::default();
        assert!(z.left.is_vertical() && z.right.is_vertical());
        assert!(!z.lower.is_vertical() && !z.upper.is_vertical());
        assert_eq!(z.border(Border::Upper).a.y, z.y_max);
        assert_eq!(z.border(Border::Right).a.x, z.x_max);
        assert!((z.lower.length() - (z.x_max - z.x_min)).abs() < 1e-9);
    }

    #[test]
    fn border_names_parse() {
        assert_eq!("left".parse::<Border>().unwrap(), Border::Left);
        assert_eq!("upper_border".parse::<Border>().unwrap(), Border::Upper);
        for b in Border::ALL {
            assert_eq!(b.to_string().parse::<Border>().unwrap(), b);
        }
        let err = "middle".parse::<Border>().unwrap_err();
        assert_eq!(err, Error::UnknownBorder("middle".into()));
    }

    #[test]
    fn invalid_bounds_rejected() {
        let flipped = ZoneBounds {
            x_min: 1.0,
            y_min: 0.0,
            x_max: 0.0,
            y_max: 1.0,
        };
        assert!(matches!(Zone::new(flipped), Err(Error::InvalidBounds { .. })));
        let nan = ZoneBounds {
            x_min: f64::NAN,
            ..ZoneBounds::default()
        };
        assert!(Zone::new(nan).is_err());
    }

    #[test]
    fn bounds_from_json() {
        let b: ZoneBounds =
            serde_json::from_str(r#"{"x_min":0.0,"y_min":0.0,"x_max":2.0,"y_max":4.0}"#).unwrap();
        let z = Zone::new(b).unwrap();
        assert_eq!(z.middle(), Vector2::new(1.0, 2.0));
        assert_eq!(z.mid(Axis::Y), 2.0);
        assert_eq!(z.bounds(), b);
    }
}
