use crate::{
    error::{DashError, DashResult},
    types::Seed,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ── Time series shape ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub base: f64,
    pub catering: f64,
    pub apparel: f64,
    pub services: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            base: 3.0,
            catering: 5.0,
            apparel: 7.0,
            services: 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// First month of the series. Only year and month are used.
    pub start: NaiveDate,
    pub months: u32,
    /// Length of one seasonal cycle, tiled across the series.
    pub season_length: u32,
    pub seasonal_amplitude: f64,
    pub seasonal_offset: f64,
    pub trend_per_month: f64,
    /// Half-open integer range of the per-region base level.
    pub base_min: i64,
    pub base_max: i64,
    pub index_floor: f64,
    pub index_ceiling: f64,
    pub noise: NoiseConfig,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or(NaiveDate::MIN),
            months: 24,
            season_length: 12,
            seasonal_amplitude: 10.0,
            seasonal_offset: 5.0,
            trend_per_month: 0.2,
            base_min: 90,
            base_max: 110,
            index_floor: 80.0,
            index_ceiling: 130.0,
            noise: NoiseConfig::default(),
        }
    }
}

// ── View defaults ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewDefaults {
    /// Regions preselected on the regional and comparison pages.
    pub regional_selection: usize,
    /// Regions preselected on the index dynamics page.
    pub index_selection: usize,
    /// Municipalities preselected on the municipal comparison page.
    pub municipal_selection: usize,
    pub top_wage_count: usize,
    pub leading_region_count: usize,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            regional_selection: 5,
            index_selection: 3,
            municipal_selection: 5,
            top_wage_count: 10,
            leading_region_count: 5,
        }
    }
}

// ── Root ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Fixed master seed. `None` draws one from OS entropy per session.
    pub seed: Option<Seed>,
    pub series: SeriesConfig,
    pub views: ViewDefaults,
}

impl DashboardConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    /// In tests, use DashboardConfig::default_test().
    pub fn load(path: &str) -> DashResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashboardConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("config loaded from {path}");
        Ok(config)
    }

    /// Config with a fixed seed for use in tests.
    pub fn default_test() -> Self {
        Self {
            seed: Some(42),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> DashResult<()> {
        let s = &self.series;
        if s.months == 0 {
            return Err(DashError::invalid_config("series.months must be > 0"));
        }
        if s.season_length == 0 {
            return Err(DashError::invalid_config("series.season_length must be > 0"));
        }
        if s.base_max <= s.base_min {
            return Err(DashError::invalid_config(format!(
                "series base range [{}, {}) is empty",
                s.base_min, s.base_max
            )));
        }
        if !s.index_floor.is_finite()
            || !s.index_ceiling.is_finite()
            || s.index_ceiling < s.index_floor
        {
            return Err(DashError::invalid_config(format!(
                "index ceiling {} below floor {}",
                s.index_ceiling, s.index_floor
            )));
        }
        // Every base level must be a value the index band can hold.
        if (s.base_min as f64) < s.index_floor || ((s.base_max - 1) as f64) > s.index_ceiling {
            return Err(DashError::invalid_config(format!(
                "series base range [{}, {}) outside index band [{}, {}]",
                s.base_min, s.base_max, s.index_floor, s.index_ceiling
            )));
        }
        let n = &s.noise;
        if [n.base, n.catering, n.apparel, n.services]
            .iter()
            .any(|sigma| !sigma.is_finite() || *sigma < 0.0)
        {
            return Err(DashError::invalid_config("noise sigmas must be finite and >= 0"));
        }
        if !(1900..=2200).contains(&s.start.year()) {
            return Err(DashError::invalid_config(format!(
                "series.start year {} out of supported range",
                s.start.year()
            )));
        }
        Ok(())
    }
}
