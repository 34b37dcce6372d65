//! Feature values for a handful of hand-picked trips.
//!
//! Purpose
//! - Show the end-to-end behavior on the fixed city-center zone: a heading
//!   toward the middle, a zero-length trip inside, and a trip far outside.
//!
//! Run: `cargo run -p citycenter --example center_angles`

use citycenter::prelude::*;

fn main() {
    let zone = Zone::default();
    let cfg = GeomCfg::default();
    let rows = [
        TripRow::segment(3761000.0, -19231000.0, 3762500.0, -19233000.0)
            .with_last_entry(3760000.0, -19230000.0),
        TripRow::segment(3760901.5068, -19218905.6133, 3760901.5068, -19218905.6133),
        TripRow::segment(0.0, 0.0, 0.0, 0.0),
    ];
    println!("zone={}", zone.polygon_wkt());
    for (i, f) in trip_features(&rows, &zone, cfg).iter().enumerate() {
        let fmt = |v: Option<f64>| v.map_or_else(|| "NA".to_string(), |v| format!("{v:.6}"));
        let angles: Vec<String> = f.angles.values().into_iter().map(fmt).collect();
        println!(
            "row={i} angles=[{}] dist_left={} inside={:?} permanency={}",
            angles.join(", "),
            fmt(f.dist_left),
            f.entry_inside_city,
            fmt(f.center_permanency)
        );
    }
}
