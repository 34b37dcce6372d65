//! Table-level passes over trip rows.
//!
//! Row features are independent, so the per-row passes run as rayon parallel
//! maps over the slice; outputs keep the input order. The remaining helpers
//! (`link_previous_entries`, `time_window`, `entity_means`,
//! `dist_to_center_column`) need the whole table and run sequentially.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveTime;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::features::{self, CenterAngles};
use crate::geom2::GeomCfg;
use crate::trip::{coord, TripRow};
use crate::zone::{Axis, Border, Zone};

/// Every per-row feature for one trip segment.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TripFeatures {
    pub angles: CenterAngles,
    pub dist_left: Option<f64>,
    pub dist_right: Option<f64>,
    pub dist_lower: Option<f64>,
    pub dist_upper: Option<f64>,
    pub entry_inside_city: Option<bool>,
    pub exit_inside_city: Option<bool>,
    pub center_permanency: Option<f64>,
}

impl TripFeatures {
    pub fn of(row: &TripRow, zone: &Zone, cfg: GeomCfg) -> Self {
        let dist = |b: Border| features::entry_border_distance(row, b, zone);
        Self {
            angles: features::entry_to_center_angles(row, zone),
            dist_left: dist(Border::Left),
            dist_right: dist(Border::Right),
            dist_lower: dist(Border::Lower),
            dist_upper: dist(Border::Upper),
            entry_inside_city: row.entry().map(|p| features::is_inside_city(p.x, p.y, zone)),
            exit_inside_city: row.exit().map(|p| features::is_inside_city(p.x, p.y, zone)),
            center_permanency: features::center_permanency(row, zone, cfg),
        }
    }

    pub fn border_distance(&self, border: Border) -> Option<f64> {
        match border {
            Border::Left => self.dist_left,
            Border::Right => self.dist_right,
            Border::Lower => self.dist_lower,
            Border::Upper => self.dist_upper,
        }
    }
}

/// All per-row features, in parallel.
pub fn trip_features(rows: &[TripRow], zone: &Zone, cfg: GeomCfg) -> Vec<TripFeatures> {
    let out: Vec<TripFeatures> = rows
        .par_iter()
        .map(|row| TripFeatures::of(row, zone, cfg))
        .collect();
    tracing::debug!(
        rows = out.len(),
        missing_angles = out.iter().filter(|f| f.angles.is_missing()).count(),
        missing_permanency = out.iter().filter(|f| f.center_permanency.is_none()).count(),
        "trip_features"
    );
    out
}

/// `entry_to_center_angles` for every row, in parallel.
pub fn center_angles(rows: &[TripRow], zone: &Zone) -> Vec<CenterAngles> {
    rows.par_iter()
        .map(|row| features::entry_to_center_angles(row, zone))
        .collect()
}

/// `center_permanency` for every row, in parallel.
pub fn center_permanency(rows: &[TripRow], zone: &Zone, cfg: GeomCfg) -> Vec<Option<f64>> {
    rows.par_iter()
        .map(|row| features::center_permanency(row, zone, cfg))
        .collect()
}

/// `entry_border_distance` for every row, in parallel.
pub fn entry_border_distance(rows: &[TripRow], border: Border, zone: &Zone) -> Vec<Option<f64>> {
    rows.par_iter()
        .map(|row| features::entry_border_distance(row, border, zone))
        .collect()
}

/// Fill `last_x_entry`/`last_y_entry` from the previous row of the same entity.
///
/// Rows are visited in slice order; the first row of each `hash` gets missing
/// values. Rows without a `hash` are never linked.
pub fn link_previous_entries(rows: &mut [TripRow]) {
    let mut last: HashMap<String, (Option<f64>, Option<f64>)> = HashMap::new();
    for row in rows.iter_mut() {
        let Some(hash) = row.hash.clone() else {
            row.last_x_entry = None;
            row.last_y_entry = None;
            continue;
        };
        let (lx, ly) = last
            .insert(hash, (coord(row.x_entry), coord(row.y_entry)))
            .unwrap_or((None, None));
        row.last_x_entry = lx;
        row.last_y_entry = ly;
    }
}

/// Indices of rows with `time_entry >= start` and `time_exit <= end`.
///
/// Rows missing either time are left out. `start > end` is an error.
pub fn time_window(rows: &[TripRow], start: NaiveTime, end: NaiveTime) -> Result<Vec<usize>> {
    if start > end {
        return Err(Error::InvalidWindow { start, end });
    }
    Ok(rows
        .iter()
        .enumerate()
        .filter(|(_, r)| match (r.time_entry, r.time_exit) {
            (Some(te), Some(tx)) => te >= start && tx <= end,
            _ => false,
        })
        .map(|(i, _)| i)
        .collect())
}

/// Mean of `values[i]` per `rows[i].hash`, skipping missing and non-finite values.
///
/// Entities with no present value are omitted. `values` must be as long as
/// `rows`, otherwise `Error::LengthMismatch`.
pub fn entity_means(rows: &[TripRow], values: &[Option<f64>]) -> Result<BTreeMap<String, f64>> {
    if rows.len() != values.len() {
        return Err(Error::LengthMismatch {
            rows: rows.len(),
            values: values.len(),
        });
    }
    let mut acc: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for (row, v) in rows.iter().zip(values) {
        let (Some(hash), Some(v)) = (row.hash.as_ref(), coord(*v)) else {
            continue;
        };
        let e = acc.entry(hash.clone()).or_insert((0.0, 0));
        e.0 += v;
        e.1 += 1;
    }
    Ok(acc
        .into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect())
}

/// `dist_to_center` over the entry coordinate on `axis` of the selected rows.
///
/// Rows rejected by `select`, or missing the coordinate, get `None`; the
/// normalization maximum is taken over the selected, present values only.
pub fn dist_to_center_column<F>(rows: &[TripRow], axis: Axis, zone: &Zone, select: F) -> Vec<Option<f64>>
where
    F: Fn(&TripRow) -> bool,
{
    let pick = |r: &TripRow| match axis {
        Axis::X => coord(r.x_entry),
        Axis::Y => coord(r.y_entry),
    };
    let idx: Vec<(usize, f64)> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| select(r))
        .filter_map(|(i, r)| pick(r).map(|v| (i, v)))
        .collect();
    let values: Vec<f64> = idx.iter().map(|&(_, v)| v).collect();
    let normalized = features::dist_to_center(&values, zone.mid(axis));
    let mut out = vec![None; rows.len()];
    for (&(i, _), d) in idx.iter().zip(normalized) {
        out[i] = Some(d);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::parse_time_of_day;

    fn t(s: &str) -> NaiveTime {
        parse_time_of_day(s).unwrap()
    }

    fn sample_rows(zone: &Zone) -> Vec<TripRow> {
        vec![
            TripRow::segment(zone.x_mid, zone.y_mid, zone.x_mid + 10.0, zone.y_mid).with_hash("a"),
            TripRow::segment(0.0, 0.0, 0.0, 0.0).with_hash("b"),
            TripRow::segment(zone.x_min - 50.0, zone.y_mid, zone.x_min + 50.0, zone.y_mid)
                .with_hash("a"),
            TripRow {
                x_entry: Some(zone.x_max),
                y_entry: Some(zone.y_max),
                ..TripRow::default()
            },
        ]
    }

    #[test]
    fn features_keep_row_order() {
        let zone = Zone::default();
        let cfg = GeomCfg::default();
        let mut rows = sample_rows(&zone);
        link_previous_entries(&mut rows);
        let out = trip_features(&rows, &zone, cfg);
        assert_eq!(out.len(), rows.len());
        assert_eq!(out[0].center_permanency, Some(1.0));
        assert_eq!(out[1].center_permanency, Some(0.0));
        assert!((out[2].center_permanency.unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(out[3].center_permanency, None);
        assert_eq!(out[3].entry_inside_city, Some(true));
        assert_eq!(out[3].exit_inside_city, None);
        assert_eq!(out[1].entry_inside_city, Some(false));
        // only row 2 has a previous entry (row 0, same hash)
        assert!(out[0].angles.is_missing());
        assert!(out[1].angles.is_missing());
        assert!(!out[2].angles.is_missing());
        assert!(out[3].angles.is_missing());
        assert_eq!(out[3].border_distance(Border::Upper), Some(0.0));
    }

    #[test]
    fn column_passes_match_row_functions() {
        let zone = Zone::default();
        let cfg = GeomCfg::default();
        let rows = sample_rows(&zone);
        let perm = center_permanency(&rows, &zone, cfg);
        let left = entry_border_distance(&rows, Border::Left, &zone);
        let angles = center_angles(&rows, &zone);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(perm[i], features::center_permanency(row, &zone, cfg));
            assert_eq!(left[i], features::entry_border_distance(row, Border::Left, &zone));
            assert_eq!(angles[i], features::entry_to_center_angles(row, &zone));
        }
    }

    #[test]
    fn previous_entries_follow_entity() {
        let mut rows = vec![
            TripRow::segment(1.0, 1.0, 2.0, 2.0).with_hash("a"),
            TripRow::segment(5.0, 5.0, 6.0, 6.0).with_hash("b"),
            TripRow::segment(3.0, 4.0, 2.0, 2.0).with_hash("a"),
            TripRow::segment(7.0, 7.0, 8.0, 8.0),
            TripRow::segment(9.0, 9.0, 8.0, 8.0).with_hash("a"),
        ];
        link_previous_entries(&mut rows);
        assert_eq!((rows[0].last_x_entry, rows[0].last_y_entry), (None, None));
        assert_eq!((rows[1].last_x_entry, rows[1].last_y_entry), (None, None));
        assert_eq!((rows[2].last_x_entry, rows[2].last_y_entry), (Some(1.0), Some(1.0)));
        assert_eq!((rows[3].last_x_entry, rows[3].last_y_entry), (None, None));
        assert_eq!((rows[4].last_x_entry, rows[4].last_y_entry), (Some(3.0), Some(4.0)));
    }

    #[test]
    fn window_selects_contained_trips() {
        let base = TripRow::segment(0.0, 0.0, 1.0, 1.0);
        let rows = vec![
            base.clone().with_times(t("15:00:00"), t("15:10:00")),
            base.clone().with_times(t("14:59:59"), t("15:10:00")),
            base.clone().with_times(t("15:30:00"), t("16:00:00")),
            base.clone().with_times(t("15:50:00"), t("16:00:01")),
            base,
        ];
        let idx = time_window(&rows, t("15:00:00"), t("16:00:00")).unwrap();
        assert_eq!(idx, vec![0, 2]);
        assert!(matches!(
            time_window(&rows, t("16:00:00"), t("15:00:00")),
            Err(Error::InvalidWindow { .. })
        ));
    }

    #[test]
    fn means_per_entity_skip_missing() {
        let rows = vec![
            TripRow::default().with_hash("a"),
            TripRow::default().with_hash("b"),
            TripRow::default().with_hash("a"),
            TripRow::default().with_hash("c"),
            TripRow::default(),
        ];
        let values = vec![Some(1.0), Some(4.0), Some(3.0), None, Some(100.0)];
        let means = entity_means(&rows, &values).unwrap();
        assert_eq!(means.len(), 2);
        assert_eq!(means["a"], 2.0);
        assert_eq!(means["b"], 4.0);
    }

    #[test]
    fn means_reject_short_value_column() {
        let rows = vec![TripRow::default().with_hash("a"); 3];
        assert_eq!(
            entity_means(&rows, &[Some(1.0), Some(2.0)]),
            Err(Error::LengthMismatch { rows: 3, values: 2 })
        );
    }

    #[test]
    fn dist_column_respects_selection() {
        let zone = Zone::default();
        let rows = vec![
            TripRow::segment(zone.x_mid + 10.0, 0.0, 0.0, 0.0),
            TripRow::segment(zone.x_mid - 40.0, 0.0, 0.0, 0.0),
            TripRow::segment(zone.x_mid + 1000.0, 0.0, 0.0, 0.0),
            TripRow::default(),
        ];
        let out = dist_to_center_column(&rows, Axis::X, &zone, |r| {
            r.x_entry.is_some_and(|x| x < zone.x_mid + 500.0)
        });
        assert!((out[0].unwrap() - 0.25).abs() < 1e-9);
        assert_eq!(out[1], Some(1.0));
        assert_eq!(out[2], None);
        assert_eq!(out[3], None);
    }

    #[test]
    fn dist_column_skips_infinite_entries() {
        let zone = Zone::default();
        let rows = vec![
            TripRow::segment(f64::INFINITY, 0.0, 0.0, 0.0),
            TripRow::segment(zone.x_mid + 10.0, 0.0, 0.0, 0.0),
            TripRow::segment(zone.x_mid - 20.0, 0.0, 0.0, 0.0),
        ];
        let out = dist_to_center_column(&rows, Axis::X, &zone, |_| true);
        assert_eq!(out[0], None);
        assert!((out[1].unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(out[2], Some(1.0));
    }
}
