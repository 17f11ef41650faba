//! The dataset snapshot: four read-only tables built once per session.
//!
//! RULE: Nothing mutates a Dataset after the generator returns it.
//! Consumers share it through `Arc<Dataset>` and only read.

use crate::{
    error::{DashError, DashResult},
    index::{IndexSnapshot, IndexTimePoint},
    municipal::MunicipalRecord,
    region::RegionRecord,
    types::Seed,
};
use chrono::{Datelike, NaiveDate};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct Dataset {
    seed: Seed,
    regions: Vec<RegionRecord>,
    municipalities: Vec<MunicipalRecord>,
    index_snapshot: Vec<IndexSnapshot>,
    time_series: Vec<IndexTimePoint>,
    region_pos: HashMap<String, usize>,
}

impl Dataset {
    pub(crate) fn new(
        seed: Seed,
        regions: Vec<RegionRecord>,
        municipalities: Vec<MunicipalRecord>,
        index_snapshot: Vec<IndexSnapshot>,
        time_series: Vec<IndexTimePoint>,
    ) -> Self {
        let region_pos = regions
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();
        Self {
            seed,
            regions,
            municipalities,
            index_snapshot,
            time_series,
            region_pos,
        }
    }

    /// Master seed the tables were generated from.
    pub fn seed(&self) -> Seed {
        self.seed
    }

    // ── Tables ─────────────────────────────────────────────────

    pub fn regions(&self) -> &[RegionRecord] {
        &self.regions
    }

    pub fn municipalities(&self) -> &[MunicipalRecord] {
        &self.municipalities
    }

    pub fn index_snapshot(&self) -> &[IndexSnapshot] {
        &self.index_snapshot
    }

    pub fn time_series(&self) -> &[IndexTimePoint] {
        &self.time_series
    }

    // ── Keyed lookups ──────────────────────────────────────────

    pub fn region(&self, name: &str) -> Option<&RegionRecord> {
        self.region_pos.get(name).map(|&i| &self.regions[i])
    }

    pub fn municipality(&self, name: &str) -> Option<&MunicipalRecord> {
        self.municipalities.iter().find(|m| m.municipality == name)
    }

    pub fn municipalities_of<'a>(
        &'a self,
        region: &'a str,
    ) -> impl Iterator<Item = &'a MunicipalRecord> + 'a {
        self.municipalities.iter().filter(move |m| m.region == region)
    }

    pub fn snapshot_of(&self, region: &str) -> Option<&IndexSnapshot> {
        self.index_snapshot.iter().find(|s| s.region == region)
    }

    pub fn series_of<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a IndexTimePoint> + 'a {
        self.time_series.iter().filter(move |p| p.region == region)
    }

    /// Points with `from <= date <= to`, all regions.
    pub fn series_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = &IndexTimePoint> + '_ {
        self.time_series
            .iter()
            .filter(move |p| p.date >= from && p.date <= to)
    }

    /// Earliest and latest series dates.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.time_series.iter().map(|p| p.date).min()?;
        let max = self.time_series.iter().map(|p| p.date).max()?;
        Some((min, max))
    }

    pub fn max_municipal_population(&self) -> i64 {
        self.municipalities
            .iter()
            .map(|m| m.population)
            .max()
            .unwrap_or(0)
    }

    /// Distinct regions present in the time series.
    pub fn regions_with_series(&self) -> usize {
        self.time_series
            .iter()
            .map(|p| p.region.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    // ── Integrity ──────────────────────────────────────────────

    /// Check referential integrity, value bounds and series shape.
    pub fn validate(&self, index_floor: f64, index_ceiling: f64, months: usize) -> DashResult<()> {
        if self.region_pos.len() != self.regions.len() {
            return Err(DashError::integrity("regions", "duplicate region name"));
        }
        for r in &self.regions {
            if r.population < 0 || r.average_wage < 0 {
                return Err(DashError::integrity("regions", format!("negative value in {}", r.name)));
            }
        }

        for m in &self.municipalities {
            if self.region(&m.region).is_none() {
                return Err(DashError::integrity(
                    "municipalities",
                    format!("{} references unknown region {}", m.municipality, m.region),
                ));
            }
            if m.population < 0 || m.average_wage < 0 {
                return Err(DashError::integrity(
                    "municipalities",
                    format!("negative value in {}", m.municipality),
                ));
            }
        }

        for s in &self.index_snapshot {
            if self.region(&s.region).is_none() {
                return Err(DashError::integrity(
                    "index_snapshot",
                    format!("unknown region {}", s.region),
                ));
            }
        }

        let mut per_region: HashMap<&str, Vec<NaiveDate>> = HashMap::new();
        for p in &self.time_series {
            if self.region(&p.region).is_none() {
                return Err(DashError::integrity(
                    "time_series",
                    format!("unknown region {}", p.region),
                ));
            }
            if p.values().iter().any(|v| *v < index_floor || *v > index_ceiling) {
                return Err(DashError::integrity(
                    "time_series",
                    format!("{} {} outside [{index_floor}, {index_ceiling}]", p.region, p.date),
                ));
            }
            per_region.entry(p.region.as_str()).or_default().push(p.date);
        }
        for region in &self.regions {
            let region = region.name.as_str();
            let dates = per_region.get(region).map(Vec::as_slice).unwrap_or(&[]);
            if dates.len() != months {
                return Err(DashError::integrity(
                    "time_series",
                    format!("{region} has {} points, expected {months}", dates.len()),
                ));
            }
            if dates.windows(2).any(|w| months_between(w[0], w[1]) != 1) {
                return Err(DashError::integrity(
                    "time_series",
                    format!("{region} dates are not consecutive months"),
                ));
            }
        }
        Ok(())
    }
}

/// Whole calendar months from `a` to `b`.
pub fn months_between(a: NaiveDate, b: NaiveDate) -> i32 {
    (b.year() - a.year()) * 12 + b.month() as i32 - a.month() as i32
}
