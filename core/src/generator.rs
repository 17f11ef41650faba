//! The dataset generator. Builds every table from one master seed.
//!
//! GENERATION ORDER (fixed, documented, never reordered):
//!   1. Regional table        (static lookup, no randomness)
//!   2. Municipal table       (joins on regional wage)
//!   3. Index snapshot        (independent draw per region)
//!   4. Index time series     (trend + season + noise per region)
//!
//! RULES:
//!   - Each table draws only from its own RngBank slot.
//!   - Later tables may read earlier tables, never the reverse.
//!   - The result is validated before it is handed out.

use crate::{
    config::DashboardConfig,
    dataset::Dataset,
    error::DashResult,
    index::{generate_snapshot, generate_time_series},
    municipal::generate_municipal,
    region::regional_table,
    rng::{RngBank, TableSlot},
    types::Seed,
};

pub struct DatasetGenerator {
    pub rng_bank: RngBank,
    config: DashboardConfig,
}

impl DatasetGenerator {
    /// Build a generator. Without a configured seed, one is drawn
    /// from OS entropy and logged so the session can be replayed.
    pub fn new(config: DashboardConfig) -> DashResult<Self> {
        config.validate()?;
        let seed: Seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                log::info!("no seed configured, drew master seed {seed}");
                seed
            }
        };
        Ok(Self {
            rng_bank: RngBank::new(seed),
            config,
        })
    }

    pub fn seed(&self) -> Seed {
        self.rng_bank.master_seed()
    }

    pub fn generate(&self) -> DashResult<Dataset> {
        let series = &self.config.series;

        let regions = regional_table();

        let mut rng = self.rng_bank.for_table(TableSlot::Municipal);
        let municipalities = generate_municipal(&regions, &mut rng);

        let mut rng = self.rng_bank.for_table(TableSlot::IndexSnapshot);
        let index_snapshot = generate_snapshot(&regions, &mut rng);

        let mut rng = self.rng_bank.for_table(TableSlot::TimeSeries);
        let time_series = generate_time_series(&regions, series, &mut rng)?;

        let dataset = Dataset::new(
            self.seed(),
            regions,
            municipalities,
            index_snapshot,
            time_series,
        );
        dataset.validate(series.index_floor, series.index_ceiling, series.months as usize)?;

        log::info!(
            "dataset generated: seed={} regions={} municipalities={} series_points={}",
            dataset.seed(),
            dataset.regions().len(),
            dataset.municipalities().len(),
            dataset.time_series().len()
        );
        Ok(dataset)
    }
}

impl Dataset {
    /// Generate with default settings and a fresh entropy seed.
    pub fn generate() -> DashResult<Self> {
        DatasetGenerator::new(DashboardConfig::default())?.generate()
    }

    /// Generate with default settings and a fixed seed.
    pub fn with_seed(seed: Seed) -> DashResult<Self> {
        DatasetGenerator::new(DashboardConfig::default().with_seed(seed))?.generate()
    }

    pub fn from_config(config: &DashboardConfig) -> DashResult<Self> {
        DatasetGenerator::new(config.clone())?.generate()
    }
}
