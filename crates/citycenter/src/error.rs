use thiserror::Error;

/// Caller misuse. Missing coordinates and numeric degeneracies are not errors;
/// they surface as `None` or documented saturation values instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("unknown border {0:?} (expected left, right, lower or upper)")]
    UnknownBorder(String),

    #[error("invalid zone bounds: x [{x_min}, {x_max}], y [{y_min}, {y_max}]")]
    InvalidBounds {
        x_min: f64,
        y_min: f64,
        x_max: f64,
        y_max: f64,
    },

    #[error("invalid time window: start {start} is after end {end}")]
    InvalidWindow {
        start: chrono::NaiveTime,
        end: chrono::NaiveTime,
    },

    #[error("invalid time of day {0:?} (expected HH:MM:SS)")]
    InvalidTime(String),

    #[error("column length {values} does not match {rows} rows")]
    LengthMismatch { rows: usize, values: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
