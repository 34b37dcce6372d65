//! Polars <-> `TripRow` conversion and table I/O.
//!
//! CSV and Parquet are picked by file extension. Coordinate columns are cast
//! to Float64 (nulls and NaN become `None`); time columns are read as
//! `HH:MM:SS` strings.

use anyhow::{bail, Context, Result};
use chrono::NaiveTime;
use citycenter::batch::TripFeatures;
use citycenter::features::CenterAngles;
use citycenter::trip::{coord, parse_time_of_day, TripRow};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

pub const LAST_ENTRY_COLUMNS: [&str; 2] = ["last_x_entry", "last_y_entry"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Csv,
    Parquet,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => Ok(Format::Csv),
        Some("parquet") | Some("pq") => Ok(Format::Parquet),
        _ => bail!("unsupported table format: {} (expected .csv or .parquet)", path.display()),
    }
}

pub fn read_table(path: &Path) -> Result<DataFrame> {
    let lf = match format_of(path)? {
        Format::Csv => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(1000))
            .finish(),
        Format::Parquet => LazyFrame::scan_parquet(path, ScanArgsParquet::default()),
    };
    let df = lf
        .and_then(|lf| lf.collect())
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::info!(rows = df.height(), cols = df.width(), "input_shape");
    Ok(df)
}

pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let format = format_of(path)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    match format {
        Format::Csv => CsvWriter::new(&mut file).include_header(true).finish(df)?,
        Format::Parquet => {
            ParquetWriter::new(&mut file).finish(df)?;
        }
    }
    tracing::info!(rows = df.height(), cols = df.width(), out = %path.display(), "output_written");
    Ok(())
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let s = df
        .column(name)
        .with_context(|| format!("missing column {name}"))?
        .cast(&DataType::Float64)?;
    Ok(s.f64()?.into_iter().map(coord).collect())
}

fn str_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let s = df.column(name)?.cast(&DataType::String)?;
    Ok(s.str()?.into_iter().map(|v| v.map(str::to_string)).collect())
}

/// Parse time-of-day strings; unparseable values become `None` and are counted
/// in a single warning.
fn times(name: &str, raw: &[Option<String>]) -> Vec<Option<NaiveTime>> {
    let mut bad = 0usize;
    let out = raw
        .iter()
        .map(|v| {
            let v = v.as_deref()?;
            let t = parse_time_of_day(v).ok();
            if t.is_none() {
                bad += 1;
            }
            t
        })
        .collect();
    if bad > 0 {
        tracing::warn!(column = name, bad, "unparseable times read as missing");
    }
    out
}

fn optional<T: Clone>(df: &DataFrame, name: &str, read: fn(&DataFrame, &str) -> Result<Vec<Option<T>>>) -> Result<Vec<Option<T>>> {
    if has_column(df, name) {
        read(df, name)
    } else {
        Ok(vec![None; df.height()])
    }
}

/// Build one `TripRow` per table row.
///
/// Entry/exit columns are required; `last_*`, `time_*` and `hash` are optional.
/// A time value that is not `HH:MM[:SS]` reads as missing.
pub fn trip_rows(df: &DataFrame) -> Result<Vec<TripRow>> {
    let x_entry = f64_column(df, "x_entry")?;
    let y_entry = f64_column(df, "y_entry")?;
    let x_exit = f64_column(df, "x_exit")?;
    let y_exit = f64_column(df, "y_exit")?;
    let last_x = optional(df, "last_x_entry", f64_column)?;
    let last_y = optional(df, "last_y_entry", f64_column)?;
    let hash = optional(df, "hash", str_column)?;
    let time_entry = times("time_entry", &optional(df, "time_entry", str_column)?);
    let time_exit = times("time_exit", &optional(df, "time_exit", str_column)?);

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        rows.push(TripRow {
            hash: hash[i].clone(),
            x_entry: x_entry[i],
            y_entry: y_entry[i],
            x_exit: x_exit[i],
            y_exit: y_exit[i],
            last_x_entry: last_x[i],
            last_y_entry: last_y[i],
            time_entry: time_entry[i],
            time_exit: time_exit[i],
        });
    }
    Ok(rows)
}

/// Inverse of [`trip_rows`]: times are written as `HH:MM:SS`.
pub fn rows_to_frame(rows: &[TripRow]) -> Result<DataFrame> {
    let f = |get: fn(&TripRow) -> Option<f64>| rows.iter().map(get).collect::<Vec<_>>();
    let t = |get: fn(&TripRow) -> Option<NaiveTime>| {
        rows.iter()
            .map(|r| get(r).map(|t| t.format("%H:%M:%S").to_string()))
            .collect::<Vec<_>>()
    };
    let df = df!(
        "hash" => rows.iter().map(|r| r.hash.clone()).collect::<Vec<_>>(),
        "time_entry" => t(|r| r.time_entry),
        "time_exit" => t(|r| r.time_exit),
        "x_entry" => f(|r| r.x_entry),
        "y_entry" => f(|r| r.y_entry),
        "x_exit" => f(|r| r.x_exit),
        "y_exit" => f(|r| r.y_exit),
        "last_x_entry" => f(|r| r.last_x_entry),
        "last_y_entry" => f(|r| r.last_y_entry)
    )?;
    Ok(df)
}

/// Overwrite (or add) the previous-entry columns from `rows`.
pub fn set_last_entries(df: &mut DataFrame, rows: &[TripRow]) -> Result<()> {
    let xs: Vec<Option<f64>> = rows.iter().map(|r| r.last_x_entry).collect();
    let ys: Vec<Option<f64>> = rows.iter().map(|r| r.last_y_entry).collect();
    df.with_column(Series::new(LAST_ENTRY_COLUMNS[0].into(), xs))?;
    df.with_column(Series::new(LAST_ENTRY_COLUMNS[1].into(), ys))?;
    Ok(())
}

/// Append every feature column, in a fixed order.
pub fn append_features(df: &mut DataFrame, feats: &[TripFeatures]) -> Result<()> {
    let angles: Vec<[Option<f64>; 5]> = feats.iter().map(|f| f.angles.values()).collect();
    for (k, name) in CenterAngles::COLUMNS.iter().enumerate() {
        let col: Vec<Option<f64>> = angles.iter().map(|a| a[k]).collect();
        df.with_column(Series::new((*name).into(), col))?;
    }
    let f64s: [(&str, fn(&TripFeatures) -> Option<f64>); 5] = [
        ("dist_left", |f| f.dist_left),
        ("dist_right", |f| f.dist_right),
        ("dist_lower", |f| f.dist_lower),
        ("dist_upper", |f| f.dist_upper),
        ("center_permanency", |f| f.center_permanency),
    ];
    for (name, get) in f64s {
        let col: Vec<Option<f64>> = feats.iter().map(get).collect();
        df.with_column(Series::new(name.into(), col))?;
    }
    let flags: [(&str, fn(&TripFeatures) -> Option<bool>); 2] = [
        ("entry_inside_city", |f| f.entry_inside_city),
        ("exit_inside_city", |f| f.exit_inside_city),
    ];
    for (name, get) in flags {
        let col: Vec<Option<bool>> = feats.iter().map(get).collect();
        df.with_column(Series::new(name.into(), col))?;
    }
    Ok(())
}

pub fn append_f64(df: &mut DataFrame, name: &str, values: Vec<Option<f64>>) -> Result<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

pub fn append_str(df: &mut DataFrame, name: &str, values: Vec<Option<String>>) -> Result<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

/// Rows at `idx`, in that order.
pub fn take_rows(df: &DataFrame, idx: &[usize]) -> Result<DataFrame> {
    let idx: Vec<IdxSize> = idx.iter().map(|&i| i as IdxSize).collect();
    let idx = IdxCa::from_vec("idx".into(), idx);
    Ok(df.take(&idx)?)
}
