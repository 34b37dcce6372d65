//! Trip-segment rows.
//!
//! One `TripRow` per trajectory segment: an entry point, an exit point, the
//! entry point of the same entity's previous segment, and times of day.
//! Missing coordinates are `None`; NaN or ±inf read from a table is
//! normalized to `None` by [`coord`].

use chrono::NaiveTime;
use nalgebra::Vector2;

use crate::error::{Error, Result};
use crate::geom2::Segment2;

/// Treat non-finite values (NaN, ±inf) as missing.
#[inline]
pub fn coord(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

/// Parse a wall-clock time `HH:MM:SS` (fractional seconds accepted).
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| Error::InvalidTime(s.to_string()))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TripRow {
    /// Entity (device) identifier.
    pub hash: Option<String>,
    pub x_entry: Option<f64>,
    pub y_entry: Option<f64>,
    pub x_exit: Option<f64>,
    pub y_exit: Option<f64>,
    pub last_x_entry: Option<f64>,
    pub last_y_entry: Option<f64>,
    pub time_entry: Option<NaiveTime>,
    pub time_exit: Option<NaiveTime>,
}

impl TripRow {
    /// Row with entry and exit set; the other fields stay missing.
    pub fn segment(x_entry: f64, y_entry: f64, x_exit: f64, y_exit: f64) -> Self {
        Self {
            x_entry: coord(Some(x_entry)),
            y_entry: coord(Some(y_entry)),
            x_exit: coord(Some(x_exit)),
            y_exit: coord(Some(y_exit)),
            ..Self::default()
        }
    }

    pub fn with_last_entry(mut self, last_x_entry: f64, last_y_entry: f64) -> Self {
        self.last_x_entry = coord(Some(last_x_entry));
        self.last_y_entry = coord(Some(last_y_entry));
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn with_times(mut self, time_entry: NaiveTime, time_exit: NaiveTime) -> Self {
        self.time_entry = Some(time_entry);
        self.time_exit = Some(time_exit);
        self
    }

    /// Replace non-finite coordinates by `None`.
    pub fn normalized(mut self) -> Self {
        for v in [
            &mut self.x_entry,
            &mut self.y_entry,
            &mut self.x_exit,
            &mut self.y_exit,
            &mut self.last_x_entry,
            &mut self.last_y_entry,
        ] {
            *v = coord(*v);
        }
        self
    }

    pub fn entry(&self) -> Option<Vector2<f64>> {
        Some(Vector2::new(coord(self.x_entry)?, coord(self.y_entry)?))
    }

    pub fn exit(&self) -> Option<Vector2<f64>> {
        Some(Vector2::new(coord(self.x_exit)?, coord(self.y_exit)?))
    }

    pub fn last_entry(&self) -> Option<Vector2<f64>> {
        Some(Vector2::new(coord(self.last_x_entry)?, coord(self.last_y_entry)?))
    }

    /// Segment entry → exit, if both points are present.
    pub fn entry_exit(&self) -> Option<Segment2> {
        Some(Segment2::new(self.entry()?, self.exit()?))
    }

    /// `LINESTRING (x_entry y_entry, x_exit y_exit)` for external plotting.
    pub fn segment_wkt(&self) -> Option<String> {
        let s = self.entry_exit()?;
        Some(format!(
            "LINESTRING ({} {}, {} {})",
            s.a.x, s.a.y, s.b.x, s.b.y
        ))
    }
}
