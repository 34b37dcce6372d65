//! Property checks for the feature primitives.

use citycenter::geom2::{angle_between, segment_polygon_intersection_ratio, GeomCfg, Segment2};
use citycenter::prelude::*;
use proptest::prelude::*;
use std::f64::consts::{FRAC_PI_2, PI};

fn zone() -> Zone {
    Zone::default()
}

fn coord() -> impl Strategy<Value = f64> {
    -1.0e3..1.0e3
}

fn segment() -> impl Strategy<Value = Segment2> {
    (coord(), coord(), coord(), coord()).prop_map(|(x0, y0, x1, y1)| Segment2::from_coords(x0, y0, x1, y1))
}

proptest! {
    #[test]
    fn inside_city_on_closed_rectangle(u in 0.0..=1.0f64, v in 0.0..=1.0f64) {
        let z = zone();
        let x = z.x_min + u * (z.x_max - z.x_min);
        let y = z.y_min + v * (z.y_max - z.y_min);
        prop_assert!(is_inside_city(x.min(z.x_max), y.min(z.y_max), &z));
    }

    #[test]
    fn outside_city_when_any_bound_exceeded(d in 1e-3..1e6f64, v in 0.0..=1.0f64, side in 0usize..4) {
        let z = zone();
        let y_in = z.y_min + v * (z.y_max - z.y_min);
        let x_in = z.x_min + v * (z.x_max - z.x_min);
        let (x, y) = match side {
            0 => (z.x_min - d, y_in),
            1 => (z.x_max + d, y_in),
            2 => (x_in, z.y_min - d),
            _ => (x_in, z.y_max + d),
        };
        prop_assert!(!is_inside_city(x, y, &z));
    }

    #[test]
    fn angle_with_itself_is_zero(s in segment()) {
        prop_assert_eq!(angle_between(&s, &s), 0.0);
    }

    #[test]
    fn angle_is_symmetric_and_bounded(a in segment(), b in segment()) {
        let ab = angle_between(&a, &b);
        let ba = angle_between(&b, &a);
        prop_assert_eq!(ab, ba);
        prop_assert!(ab.is_finite());
        prop_assert!((0.0..=PI).contains(&ab));
        if !a.is_vertical() && !b.is_vertical() {
            prop_assert!(ab <= FRAC_PI_2);
        }
    }

    #[test]
    fn vertical_pairs_are_parallel(x0 in coord(), x1 in coord(), ys in (coord(), coord(), coord(), coord())) {
        let a = Segment2::from_coords(x0, ys.0, x0, ys.1);
        let b = Segment2::from_coords(x1, ys.2, x1, ys.3);
        prop_assert_eq!(angle_between(&a, &b), 0.0);
    }

    #[test]
    fn intersection_ratio_in_unit_interval(s in segment()) {
        let unit = Zone::new(ZoneBounds { x_min: -100.0, y_min: -200.0, x_max: 300.0, y_max: 50.0 }).unwrap();
        let r = segment_polygon_intersection_ratio(&s, &unit.polygon, GeomCfg::default());
        prop_assert!((0.0..=1.0).contains(&r));
    }

    #[test]
    fn zero_length_segment_inside_is_one(u in 0.0..=1.0f64, v in 0.0..=1.0f64) {
        let z = zone();
        let x = (z.x_min + u * (z.x_max - z.x_min)).min(z.x_max);
        let y = (z.y_min + v * (z.y_max - z.y_min)).min(z.y_max);
        let s = Segment2::from_coords(x, y, x, y);
        prop_assert_eq!(segment_polygon_intersection_ratio(&s, &z.polygon, GeomCfg::default()), 1.0);
    }

    #[test]
    fn ratio_zero_when_bbox_outside(s in segment()) {
        // shift the segment's bounding box fully to the right of the zone
        let z = zone();
        let (lo, _) = s.bounds();
        let dx = z.x_max + 1.0 - lo.x;
        let shifted = Segment2::from_coords(s.a.x + dx, s.a.y, s.b.x + dx, s.b.y);
        prop_assert_eq!(segment_polygon_intersection_ratio(&shifted, &z.polygon, GeomCfg::default()), 0.0);
    }

    #[test]
    fn angles_missing_without_previous_entry(x in coord(), y in coord(), ly in proptest::option::of(coord())) {
        let row = TripRow {
            x_entry: Some(x),
            y_entry: Some(y),
            last_x_entry: None,
            last_y_entry: ly,
            ..TripRow::default()
        };
        prop_assert!(entry_to_center_angles(&row, &zone()).is_missing());
    }

    #[test]
    fn dist_to_center_single_maximum(values in proptest::collection::vec(coord(), 2..50), mid in coord()) {
        let dev: Vec<f64> = values.iter().map(|v| (v - mid).abs()).collect();
        let max = dev.iter().copied().fold(0.0, f64::max);
        prop_assume!(max > 0.0);
        prop_assume!(dev.iter().filter(|d| **d == max).count() == 1);
        let out = dist_to_center(&values, mid);
        prop_assert_eq!(out.iter().filter(|d| **d == 1.0).count(), 1);
        prop_assert!(out.iter().all(|d| (0.0..=1.0).contains(d)));
    }
}
