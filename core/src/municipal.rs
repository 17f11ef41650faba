//! Municipal table generation.
//!
//! Each region is split into municipalities according to its layout.
//! The tier decides the population sampling range; every other column
//! is derived from population or from the parent region in one pass.

use crate::{
    region::{layout_of, MunicipalLayout, RegionRecord},
    rng::TableRng,
    types::{MunicipalityName, RegionName},
};
use serde::{Deserialize, Serialize};

pub const DISTRICTS_PER_FEDERAL_CITY: u32 = 5;
pub const MID_CITIES_PER_REGION: u32 = 3;
pub const SMALL_CITIES_PER_REGION: u32 = 3;

/// Municipal wage = regional wage × uniform(WAGE_FACTOR_MIN, WAGE_FACTOR_MAX).
pub const WAGE_FACTOR_MIN: f64 = 0.7;
pub const WAGE_FACTOR_MAX: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeTier {
    District,
    AdministrativeCenter,
    MidCity,
    SmallCity,
}

impl SizeTier {
    /// Half-open population sampling range.
    pub fn population_range(&self) -> (i64, i64) {
        match self {
            Self::District             => (200_000, 500_000),
            Self::AdministrativeCenter => (300_000, 1_000_000),
            Self::MidCity              => (50_000, 300_000),
            Self::SmallCity            => (10_000, 50_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MunicipalRecord {
    pub municipality: MunicipalityName,
    pub region: RegionName,
    pub tier: SizeTier,
    pub population: i64,
    pub average_wage: i64,
    pub enterprise_count: i64,
    pub retail_turnover_millions: i64,
    pub consumption_index: i64,
}

/// Names and tiers of every municipality of one region, in display order.
fn municipal_slots(region: &str) -> Vec<(String, SizeTier)> {
    match layout_of(region) {
        MunicipalLayout::Districts => (1..=DISTRICTS_PER_FEDERAL_CITY)
            .map(|i| (format!("{region} - Район {i}"), SizeTier::District))
            .collect(),
        MunicipalLayout::Tiered => {
            let mut slots = vec![(
                format!("{region} - Административный центр"),
                SizeTier::AdministrativeCenter,
            )];
            // Mid cities are numbered from 2: the center counts as city 1.
            slots.extend(
                (2..2 + MID_CITIES_PER_REGION)
                    .map(|i| (format!("{region} - Город {i}"), SizeTier::MidCity)),
            );
            slots.extend(
                (1..=SMALL_CITIES_PER_REGION)
                    .map(|i| (format!("{region} - Малый город {i}"), SizeTier::SmallCity)),
            );
            slots
        }
    }
}

/// Generate the municipal table for the given regions.
pub fn generate_municipal(regions: &[RegionRecord], rng: &mut TableRng) -> Vec<MunicipalRecord> {
    let mut out = Vec::new();
    for region in regions {
        // Wage joins on the parent row directly; no draft value is drawn.
        let regional_wage = region.average_wage;
        for (municipality, tier) in municipal_slots(&region.name) {
            let (lo, hi) = tier.population_range();
            let population = rng.int_in(lo, hi);
            let average_wage =
                (regional_wage as f64 * rng.uniform(WAGE_FACTOR_MIN, WAGE_FACTOR_MAX)) as i64;
            let enterprise_count = (population as f64 / 100.0 * rng.uniform(0.8, 1.2)) as i64;
            let retail_turnover_millions =
                (population as f64 / 10.0 * rng.uniform(0.7, 1.5)) as i64;
            let consumption_index = rng.int_in(80, 130);

            out.push(MunicipalRecord {
                municipality,
                region: region.name.clone(),
                tier,
                population,
                average_wage,
                enterprise_count,
                retail_turnover_millions,
                consumption_index,
            });
        }
    }
    log::debug!("{}: {} municipalities for {} regions", rng.name, out.len(), regions.len());
    out
}
