//! Synthetic trip tables around a zone (random walks + replay tokens).
//!
//! Purpose
//! - Deterministic input for benchmarks, examples and CLI smoke runs when no
//!   real trip export is at hand.
//!
//! Model
//! - Each entity starts at a uniform point in the zone's bounding box inflated
//!   by `margin` (relative to the zone size) and takes `segments` straight hops
//!   with uniform heading and exponential-ish length.
//! - Each segment lasts a random number of seconds; times start at `day_start`.
//! - With probability `missing_exit` a segment loses its exit point.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG,
//!   one token per entity.

use chrono::{Duration, NaiveTime};
use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::batch::link_previous_entries;
use crate::trip::TripRow;
use crate::zone::Zone;

/// Segment count distribution.
#[derive(Clone, Copy, Debug)]
pub enum SegmentCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}

impl SegmentCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            SegmentCount::Fixed(n) => n.max(1),
            SegmentCount::Uniform { min, max } => {
                let lo = min.max(1);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SynthCfg {
    pub entities: usize,
    pub segments: SegmentCount,
    /// Bounding-box inflation, as a fraction of the zone width/height per side.
    pub margin: f64,
    /// Mean hop length in map units.
    pub mean_hop: f64,
    /// Probability that a segment's exit point is missing. Clamped to [0, 1].
    pub missing_exit: f64,
    pub day_start: NaiveTime,
    /// Segment duration range in seconds.
    pub duration_secs: (i64, i64),
}

impl Default for SynthCfg {
    fn default() -> Self {
        Self {
            entities: 100,
            segments: SegmentCount::Uniform { min: 1, max: 8 },
            margin: 0.5,
            mean_hop: 2_000.0,
            missing_exit: 0.05,
            day_start: NaiveTime::from_hms_opt(14, 30, 0).unwrap_or_default(),
            duration_secs: (30, 900),
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Trip rows of a single entity, previous entries already linked.
pub fn draw_entity(zone: &Zone, cfg: &SynthCfg, tok: ReplayToken) -> Vec<TripRow> {
    let mut rng = tok.to_std_rng();
    let w = zone.x_max - zone.x_min;
    let h = zone.y_max - zone.y_min;
    let m = cfg.margin.max(0.0);
    let mut p = Vector2::new(
        rng.gen_range((zone.x_min - m * w)..=(zone.x_max + m * w)),
        rng.gen_range((zone.y_min - m * h)..=(zone.y_max + m * h)),
    );
    let n = cfg.segments.sample(&mut rng);
    let d_lo = cfg.duration_secs.0.max(0);
    let d_hi = cfg.duration_secs.1.max(d_lo);
    let hash = format!("e{:06}", tok.index);
    let mut t = cfg.day_start;
    let mut rows = Vec::with_capacity(n);
    for _ in 0..n {
        let theta = rng.gen::<f64>() * std::f64::consts::TAU;
        // -ln(U) with U in (0, 1]: exponential with unit mean
        let hop = -(1.0 - rng.gen::<f64>()).ln() * cfg.mean_hop.max(0.0);
        let q = p + Vector2::new(theta.cos(), theta.sin()) * hop;
        let dt = Duration::seconds(rng.gen_range(d_lo..=d_hi));
        let t_exit = t + dt;
        let mut row = TripRow::segment(p.x, p.y, q.x, q.y)
            .with_hash(hash.clone())
            .with_times(t, t_exit);
        if rng.gen::<f64>() < cfg.missing_exit.clamp(0.0, 1.0) {
            row.x_exit = None;
            row.y_exit = None;
        }
        rows.push(row);
        // next segment enters a little after the previous exit
        t = t_exit + Duration::seconds(rng.gen_range(0..=120));
        p = q;
    }
    link_previous_entries(&mut rows);
    rows
}

/// `cfg.entities` entities, each drawn with token `(seed, index)`.
pub fn draw_trips(zone: &Zone, cfg: &SynthCfg, seed: u64) -> Vec<TripRow> {
    (0..cfg.entities as u64)
        .flat_map(|index| draw_entity(zone, cfg, ReplayToken { seed, index }))
        .collect()
}
