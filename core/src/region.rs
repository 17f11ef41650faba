//! Regional table. A static lookup, not a generated one.
//!
//! Values are hand-authored and never randomized. The municipal
//! layout of each region lives here too so the municipal generator
//! can key its special case on region identity without string matching.

use crate::types::RegionName;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub name: RegionName,
    pub population: i64,
    pub average_wage: i64,
    pub investment_billions: i64,
    pub consumption_index: i64,
}

/// How a region is split into municipalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MunicipalLayout {
    /// Federal cities: five equally sampled districts.
    Districts,
    /// Administrative center plus mid and small cities.
    Tiered,
}

struct RegionEntry {
    name: &'static str,
    population: i64,
    average_wage: i64,
    investment_billions: i64,
    consumption_index: i64,
    layout: MunicipalLayout,
}

const fn entry(
    name: &'static str,
    population: i64,
    average_wage: i64,
    investment_billions: i64,
    consumption_index: i64,
    layout: MunicipalLayout,
) -> RegionEntry {
    RegionEntry {
        name,
        population,
        average_wage,
        investment_billions,
        consumption_index,
        layout,
    }
}

use self::MunicipalLayout::{Districts, Tiered};

// Table order is the display order and the default selection order.
static REGIONS: [RegionEntry; 12] = [
    entry("Москва",                  12_600_000, 100_000, 3_500, 120, Districts),
    entry("Санкт-Петербург",          5_400_000,  75_000, 1_200, 110, Districts),
    entry("Владимирская область",     1_350_000,  35_000,    90,  95, Tiered),
    entry("Краснодарский край",       5_600_000,  42_000,   420, 105, Tiered),
    entry("Свердловская область",     4_300_000,  47_000,   450, 100, Tiered),
    entry("Новосибирская область",    2_800_000,  45_000,   230,  98, Tiered),
    entry("Татарстан",                3_900_000,  43_000,   380, 103, Tiered),
    entry("Калининградская область",  1_000_000,  39_000,   110,  97, Tiered),
    entry("Нижегородская область",    3_200_000,  41_000,   350, 102, Tiered),
    entry("Приморский край",          1_900_000,  48_000,   280, 104, Tiered),
    entry("Хабаровский край",         1_300_000,  46_000,   240,  99, Tiered),
    entry("Тюменская область",        1_500_000,  52_000,   390, 107, Tiered),
];

/// Build the regional table in display order.
pub fn regional_table() -> Vec<RegionRecord> {
    REGIONS
        .iter()
        .map(|r| RegionRecord {
            name: r.name.to_string(),
            population: r.population,
            average_wage: r.average_wage,
            investment_billions: r.investment_billions,
            consumption_index: r.consumption_index,
        })
        .collect()
}

/// Municipal layout for a region name. Unknown names are tiered.
pub fn layout_of(region: &str) -> MunicipalLayout {
    REGIONS
        .iter()
        .find(|r| r.name == region)
        .map(|r| r.layout)
        .unwrap_or(Tiered)
}
