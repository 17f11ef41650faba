//! View requests and view-models.
//!
//! Every user action is one `ViewRequest`; every answer is one
//! `ViewModel`. Models carry the data a chart or table is drawn from,
//! never presentation state.

use crate::{
    chat::ChatMessage,
    index::{IndexSnapshot, IndexTimePoint},
    municipal::MunicipalRecord,
    query::{
        CorrelationMatrix, IndexMetric, MonthlyAverage, MunicipalMetric, PopulationCategory,
        RegionMetric,
    },
    region::RegionRecord,
    stats::{CorrelationStrength, FiveNumberSummary, LinearFit},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const NO_MATCHING_DATA: &str = "Нет данных, соответствующих выбранным фильтрам.";
pub const SELECT_REGIONS_AND_METRICS: &str =
    "Пожалуйста, выберите регионы и показатели для сравнения.";
pub const SELECT_MUNICIPALITIES_AND_METRICS: &str =
    "Пожалуйста, выберите муниципалитеты и показатели для сравнения.";

// ── Requests ───────────────────────────────────────────────────────

/// Axes of the correlation page, typed per source table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CorrelationAxes {
    Regional { x: RegionMetric, y: RegionMetric },
    Municipal { x: MunicipalMetric, y: MunicipalMetric },
    IndexSnapshot { x: IndexMetric, y: IndexMetric },
}

/// All user actions.
/// Omitted selections fall back to the configured view defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewRequest {
    Overview,
    RegionalStats {
        regions: Option<Vec<String>>,
        #[serde(default)]
        metric: RegionMetric,
    },
    MunicipalStats {
        region: Option<String>,
        /// Inclusive bounds in thousands of residents.
        population_thousands: Option<(i64, i64)>,
        #[serde(default)]
        metric: MunicipalMetric,
    },
    IndexDynamics {
        regions: Option<Vec<String>>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        #[serde(default)]
        metric: IndexMetric,
    },
    RegionComparison {
        regions: Option<Vec<String>>,
        #[serde(default = "default_region_metrics")]
        metrics: Vec<RegionMetric>,
    },
    MunicipalComparison {
        region: Option<String>,
        municipalities: Option<Vec<String>>,
        #[serde(default = "default_municipal_metrics")]
        metrics: Vec<MunicipalMetric>,
    },
    Correlation {
        axes: CorrelationAxes,
    },
    TopWageReport {
        #[serde(default = "default_wage_report_cap")]
        max_population_thousands: i64,
    },
    ConsumerActivityReport,
    PostMessage {
        text: String,
    },
    ChatHistory,
}

pub fn default_region_metrics() -> Vec<RegionMetric> {
    vec![RegionMetric::AverageWage, RegionMetric::ConsumptionIndex]
}

pub fn default_municipal_metrics() -> Vec<MunicipalMetric> {
    vec![MunicipalMetric::AverageWage, MunicipalMetric::ConsumptionIndex]
}

fn default_wage_report_cap() -> i64 {
    100
}

// ── Chart data ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub column: &'static str,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesLine {
    pub region: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub label: String,
    pub group: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryWages {
    pub category: PopulationCategory,
    pub label: &'static str,
    pub wages: FiveNumberSummary,
}

// ── Pages ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct OverviewView {
    pub region_count: usize,
    pub municipality_count: usize,
    pub series_region_count: usize,
    pub regions: Vec<RegionRecord>,
    pub municipalities: Vec<MunicipalRecord>,
    pub index_snapshot: Vec<IndexSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionalStatsView {
    pub chart: BarChart,
    pub rows: Vec<RegionRecord>,
    pub correlation: CorrelationMatrix,
}

#[derive(Debug, Clone, Serialize)]
pub struct MunicipalStatsView {
    pub region: String,
    pub population_thousands: (i64, i64),
    pub chart: BarChart,
    pub rows: Vec<MunicipalRecord>,
    pub wage_by_category: Vec<CategoryWages>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexDynamicsView {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub column: &'static str,
    /// Empty for snapshot-only metrics.
    pub lines: Vec<SeriesLine>,
    pub current: BarChart,
    pub seasonality: Vec<MonthlyAverage>,
    pub rows: Vec<IndexTimePoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionComparisonView {
    pub axes: Vec<&'static str>,
    /// Values scaled so the best region per metric scores 100.
    pub radar: Vec<ComparisonRow>,
    pub rows: Vec<ComparisonRow>,
    pub charts: Vec<BarChart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MunicipalComparisonView {
    pub region: String,
    pub columns: Vec<&'static str>,
    pub rows: Vec<ComparisonRow>,
    pub charts: Vec<BarChart>,
    pub turnover_per_capita: BarChart,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationView {
    pub source: &'static str,
    pub matrix: CorrelationMatrix,
    pub x_column: &'static str,
    pub y_column: &'static str,
    pub points: Vec<ScatterPoint>,
    pub pearson: Option<f64>,
    pub strength: Option<CorrelationStrength>,
    pub summary: Option<&'static str>,
    pub trend: Option<LinearFit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopWageView {
    pub max_population_thousands: i64,
    pub chart: BarChart,
    pub rows: Vec<MunicipalRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsumerActivityView {
    pub regions: Vec<String>,
    pub lines: Vec<SeriesLine>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewModel {
    NoData { message: String },
    Overview(OverviewView),
    RegionalStats(RegionalStatsView),
    MunicipalStats(MunicipalStatsView),
    IndexDynamics(IndexDynamicsView),
    RegionComparison(RegionComparisonView),
    MunicipalComparison(MunicipalComparisonView),
    Correlation(CorrelationView),
    TopWageReport(TopWageView),
    ConsumerActivityReport(ConsumerActivityView),
    Chat { messages: Vec<ChatMessage> },
}

impl ViewModel {
    pub fn no_data(message: &str) -> Self {
        Self::NoData {
            message: message.to_string(),
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}
