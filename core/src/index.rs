//! Consumer index tables: the cross-sectional snapshot and the
//! monthly time series.
//!
//! The snapshot is an independent draw per region. The time series is
//! base level + linear trend + tiled seasonal curve + Gaussian noise,
//! with three sibling series jittered off the clamped headline value.
//! Every series value is clamped to the configured index band.

use crate::{
    config::SeriesConfig,
    error::{DashError, DashResult},
    region::RegionRecord,
    rng::TableRng,
    types::RegionName,
};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub region: RegionName,
    pub consumer_activity_index: i64,
    pub catering_tx_index: i64,
    pub apparel_tx_index: i64,
    pub services_tx_index: i64,
    pub average_receipt: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexTimePoint {
    pub region: RegionName,
    /// Last calendar day of the month.
    pub date: NaiveDate,
    pub consumer_activity_index: f64,
    pub catering_tx_index: f64,
    pub apparel_tx_index: f64,
    pub services_tx_index: f64,
}

impl IndexTimePoint {
    pub fn values(&self) -> [f64; 4] {
        [
            self.consumer_activity_index,
            self.catering_tx_index,
            self.apparel_tx_index,
            self.services_tx_index,
        ]
    }
}

// ── Snapshot ───────────────────────────────────────────────────────

pub fn generate_snapshot(regions: &[RegionRecord], rng: &mut TableRng) -> Vec<IndexSnapshot> {
    regions
        .iter()
        .map(|r| IndexSnapshot {
            region: r.name.clone(),
            consumer_activity_index: rng.int_in(90, 120),
            catering_tx_index: rng.int_in(85, 125),
            apparel_tx_index: rng.int_in(80, 130),
            services_tx_index: rng.int_in(85, 115),
            average_receipt: rng.int_in(500, 3000),
        })
        .collect()
}

// ── Time series ────────────────────────────────────────────────────

/// `sin(linspace(0, 2π, n)) × amplitude + offset`, endpoint included.
pub fn seasonal_curve(n: usize, amplitude: f64, offset: f64) -> Vec<f64> {
    if n == 1 {
        return vec![offset];
    }
    (0..n)
        .map(|i| {
            let x = TAU * i as f64 / (n - 1) as f64;
            x.sin() * amplitude + offset
        })
        .collect()
}

/// Month-end dates for `months` consecutive months from `start`'s month.
pub fn month_ends(start: NaiveDate, months: u32) -> DashResult<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(start.year(), start.month(), 1)
        .ok_or_else(|| DashError::invalid_config(format!("bad series start {start}")))?;
    (0..months)
        .map(|i| {
            first
                .checked_add_months(Months::new(i + 1))
                .and_then(|d| d.pred_opt())
                .ok_or_else(|| {
                    DashError::invalid_config(format!("series month {i} past calendar range"))
                })
        })
        .collect()
}

pub fn generate_time_series(
    regions: &[RegionRecord],
    cfg: &SeriesConfig,
    rng: &mut TableRng,
) -> DashResult<Vec<IndexTimePoint>> {
    let dates = month_ends(cfg.start, cfg.months)?;
    let season = seasonal_curve(
        cfg.season_length as usize,
        cfg.seasonal_amplitude,
        cfg.seasonal_offset,
    );
    let clamp = |v: f64| v.clamp(cfg.index_floor, cfg.index_ceiling);
    let noise = &cfg.noise;

    let mut out = Vec::with_capacity(regions.len() * dates.len());
    for region in regions {
        let base = rng.int_in(cfg.base_min, cfg.base_max) as f64;
        for (i, date) in dates.iter().enumerate() {
            let trend = i as f64 * cfg.trend_per_month;
            let value = clamp(base + trend + season[i % season.len()] + rng.normal(0.0, noise.base));
            out.push(IndexTimePoint {
                region: region.name.clone(),
                date: *date,
                consumer_activity_index: value,
                catering_tx_index: clamp(value + rng.normal(0.0, noise.catering)),
                apparel_tx_index: clamp(value + rng.normal(0.0, noise.apparel)),
                services_tx_index: clamp(value + rng.normal(0.0, noise.services)),
            });
        }
    }
    log::debug!("{}: {} points over {} months", rng.name, out.len(), dates.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seasonal_curve_spans_full_period() {
        let curve = seasonal_curve(12, 10.0, 5.0);
        assert_eq!(curve.len(), 12);
        // Endpoint included: both ends sit at sin(0) and sin(2π).
        assert!((curve[0] - 5.0).abs() < 1e-9);
        assert!((curve[11] - 5.0).abs() < 1e-9);
        assert!(curve.iter().all(|v| (-5.0..=15.0).contains(v)));
    }

    #[test]
    fn month_ends_cross_year_boundary() {
        let start = NaiveDate::from_ymd_opt(2022, 11, 15).unwrap();
        let dates = month_ends(start, 4).unwrap();
        let expected: Vec<NaiveDate> = [(2022, 11, 30), (2022, 12, 31), (2023, 1, 31), (2023, 2, 28)]
            .iter()
            .map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
            .collect();
        assert_eq!(dates, expected);
    }

    #[test]
    fn leap_february_ends_on_29th() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let dates = month_ends(start, 1).unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
