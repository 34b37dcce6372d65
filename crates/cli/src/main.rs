use anyhow::{Context, Result};
use chrono::NaiveTime;
use citycenter::batch::{dist_to_center_column, link_previous_entries, time_window, trip_features};
use citycenter::geom2::GeomCfg;
use citycenter::synth::{draw_trips, SynthCfg};
use citycenter::trip::parse_time_of_day;
use citycenter::zone::{Axis, Zone, ZoneBounds};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod table;

use provenance::Payload;
use table::LAST_ENTRY_COLUMNS;

#[derive(Parser)]
#[command(name = "citycenter")]
#[command(about = "Trip features relative to the city-center rectangle")]
struct Cmd {
    /// JSON file with `x_min, y_min, x_max, y_max`; defaults to the built-in city center
    #[arg(long, global = true)]
    zone: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Append per-row features to a trip table (CSV or Parquet)
    Run {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Recompute last_x_entry/last_y_entry from `hash` order even if present
        #[arg(long)]
        link_previous: bool,
    },
    /// Keep rows inside a time-of-day window and attach segment WKT
    Sample {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_parser = parse_time_of_day, default_value = "15:00:00")]
        start: NaiveTime,
        #[arg(long, value_parser = parse_time_of_day, default_value = "16:00:00")]
        end: NaiveTime,
    },
    /// Write a seeded synthetic trip table
    Synth {
        #[arg(long, default_value_t = 100)]
        entities: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let zone = load_zone(cmd.zone.as_deref())?;
    match cmd.action {
        Action::Run {
            input,
            out,
            link_previous,
        } => run(&zone, &input, &out, link_previous),
        Action::Sample {
            input,
            out,
            start,
            end,
        } => sample(&zone, &input, &out, start, end),
        Action::Synth {
            entities,
            seed,
            out,
        } => synth(&zone, entities, seed, &out),
        Action::Report => report(&zone),
    }
}

fn load_zone(path: Option<&Path>) -> Result<Zone> {
    let bounds = match path {
        None => ZoneBounds::default(),
        Some(p) => {
            let raw = std::fs::read(p).with_context(|| format!("reading zone {}", p.display()))?;
            serde_json::from_slice(&raw).with_context(|| format!("parsing zone {}", p.display()))?
        }
    };
    Ok(Zone::new(bounds)?)
}

fn run(zone: &Zone, input: &Path, out: &Path, link_previous: bool) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), link_previous, "run");
    let mut df = table::read_table(input)?;
    let mut rows = table::trip_rows(&df)?;

    let has_last = LAST_ENTRY_COLUMNS.iter().all(|c| table::has_column(&df, c));
    let linked = link_previous || !has_last;
    if linked {
        if !table::has_column(&df, "hash") {
            tracing::warn!("no hash column; previous entries stay missing");
        }
        link_previous_entries(&mut rows);
        table::set_last_entries(&mut df, &rows)?;
    }

    let feats = trip_features(&rows, zone, GeomCfg::default());
    table::append_features(&mut df, &feats)?;
    for (axis, name) in [(Axis::X, "x_entry_dist_to_center"), (Axis::Y, "y_entry_dist_to_center")] {
        table::append_f64(&mut df, name, dist_to_center_column(&rows, axis, zone, |_| true))?;
    }
    table::write_table(&mut df, out)?;

    let params = json!({
        "input": input,
        "rows": rows.len(),
        "linked_previous": linked
    });
    let prov = provenance::write_sidecar(out, Payload::new("run", params, zone.bounds()))?;
    tracing::info!(provenance = %prov.display(), "done");
    Ok(())
}

fn sample(zone: &Zone, input: &Path, out: &Path, start: NaiveTime, end: NaiveTime) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), %start, %end, "sample");
    let df = table::read_table(input)?;
    let rows = table::trip_rows(&df)?;
    let idx = time_window(&rows, start, end)?;
    tracing::info!(kept = idx.len(), of = rows.len(), "time_window");

    let mut sub = table::take_rows(&df, &idx)?;
    let geometry = idx.iter().map(|&i| rows[i].segment_wkt()).collect();
    table::append_str(&mut sub, "geometry", geometry)?;
    table::write_table(&mut sub, out)?;

    let zone_path = provenance::sidecar_path(out, "zone.wkt");
    std::fs::write(&zone_path, zone.polygon_wkt())
        .with_context(|| format!("writing {}", zone_path.display()))?;

    let params = json!({
        "input": input,
        "start": start.format("%H:%M:%S").to_string(),
        "end": end.format("%H:%M:%S").to_string(),
        "kept": idx.len()
    });
    provenance::write_sidecar(out, Payload::new("sample", params, zone.bounds()))?;
    Ok(())
}

fn synth(zone: &Zone, entities: usize, seed: u64, out: &Path) -> Result<()> {
    let cfg = SynthCfg {
        entities,
        ..SynthCfg::default()
    };
    let rows = draw_trips(zone, &cfg, seed);
    tracing::info!(entities, seed, rows = rows.len(), "synth");
    let mut df = table::rows_to_frame(&rows)?;
    table::write_table(&mut df, out)?;
    let params = json!({ "entities": entities, "seed": seed });
    provenance::write_sidecar(out, Payload::new("synth", params, zone.bounds()))?;
    Ok(())
}

fn report(zone: &Zone) -> Result<()> {
    let obj = provenance::document(&Payload::new("report", json!({}), zone.bounds()), &[]);
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
