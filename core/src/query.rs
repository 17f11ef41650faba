//! Read-only queries over a Dataset.
//!
//! RULE: Queries never copy or mutate table rows; they return borrows
//! in table order so views can render them directly.

use crate::{
    dataset::Dataset,
    index::{IndexSnapshot, IndexTimePoint},
    municipal::MunicipalRecord,
    region::RegionRecord,
    stats::{five_number_summary, mean, pearson, FiveNumberSummary},
    types::PopulationRange,
};
use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

// ── Metrics ────────────────────────────────────────────────────────

/// A numeric column of one table.
pub trait Metric: Copy + PartialEq + 'static {
    type Row;

    /// Every column of the table, in display order.
    const ALL: &'static [Self];

    /// Display header of the column.
    fn column(&self) -> &'static str;

    fn value(&self, row: &Self::Row) -> f64;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionMetric {
    #[default]
    Population,
    AverageWage,
    InvestmentBillions,
    ConsumptionIndex,
}

impl Metric for RegionMetric {
    type Row = RegionRecord;

    const ALL: &'static [Self] = &[
        Self::Population,
        Self::AverageWage,
        Self::InvestmentBillions,
        Self::ConsumptionIndex,
    ];

    fn column(&self) -> &'static str {
        match self {
            Self::Population         => "Население",
            Self::AverageWage        => "Средняя зарплата",
            Self::InvestmentBillions => "Инвестиции, млрд",
            Self::ConsumptionIndex   => "Индекс потребления",
        }
    }

    fn value(&self, row: &RegionRecord) -> f64 {
        match self {
            Self::Population         => row.population as f64,
            Self::AverageWage        => row.average_wage as f64,
            Self::InvestmentBillions => row.investment_billions as f64,
            Self::ConsumptionIndex   => row.consumption_index as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MunicipalMetric {
    #[default]
    Population,
    AverageWage,
    EnterpriseCount,
    RetailTurnoverMillions,
    ConsumptionIndex,
}

impl Metric for MunicipalMetric {
    type Row = MunicipalRecord;

    const ALL: &'static [Self] = &[
        Self::Population,
        Self::AverageWage,
        Self::EnterpriseCount,
        Self::RetailTurnoverMillions,
        Self::ConsumptionIndex,
    ];

    fn column(&self) -> &'static str {
        match self {
            Self::Population             => "Население",
            Self::AverageWage            => "Средняя зарплата",
            Self::EnterpriseCount        => "Количество предприятий",
            Self::RetailTurnoverMillions => "Оборот розничной торговли, млн",
            Self::ConsumptionIndex       => "Индекс потребления",
        }
    }

    fn value(&self, row: &MunicipalRecord) -> f64 {
        match self {
            Self::Population             => row.population as f64,
            Self::AverageWage            => row.average_wage as f64,
            Self::EnterpriseCount        => row.enterprise_count as f64,
            Self::RetailTurnoverMillions => row.retail_turnover_millions as f64,
            Self::ConsumptionIndex       => row.consumption_index as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexMetric {
    #[default]
    ConsumerActivity,
    CateringTx,
    ApparelTx,
    ServicesTx,
    AverageReceipt,
}

impl IndexMetric {
    /// Series value at one point. The receipt exists only in the snapshot.
    pub fn series_value(&self, point: &IndexTimePoint) -> Option<f64> {
        match self {
            Self::ConsumerActivity => Some(point.consumer_activity_index),
            Self::CateringTx       => Some(point.catering_tx_index),
            Self::ApparelTx        => Some(point.apparel_tx_index),
            Self::ServicesTx       => Some(point.services_tx_index),
            Self::AverageReceipt   => None,
        }
    }
}

impl Metric for IndexMetric {
    type Row = IndexSnapshot;

    const ALL: &'static [Self] = &[
        Self::ConsumerActivity,
        Self::CateringTx,
        Self::ApparelTx,
        Self::ServicesTx,
        Self::AverageReceipt,
    ];

    fn column(&self) -> &'static str {
        match self {
            Self::ConsumerActivity => "Индекс потребительской активности",
            Self::CateringTx       => "Индекс транзакций: общепит",
            Self::ApparelTx        => "Индекс транзакций: одежда",
            Self::ServicesTx       => "Индекс транзакций: услуги",
            Self::AverageReceipt   => "Средний чек",
        }
    }

    fn value(&self, row: &IndexSnapshot) -> f64 {
        match self {
            Self::ConsumerActivity => row.consumer_activity_index as f64,
            Self::CateringTx       => row.catering_tx_index as f64,
            Self::ApparelTx        => row.apparel_tx_index as f64,
            Self::ServicesTx       => row.services_tx_index as f64,
            Self::AverageReceipt   => row.average_receipt as f64,
        }
    }
}

pub fn column_values<M: Metric>(rows: &[&M::Row], metric: M) -> Vec<f64> {
    rows.iter().map(|r| metric.value(r)).collect()
}

// ── Correlation ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<&'static str>,
    /// `cells[i][j]` is Pearson r of columns i and j; `None` when undefined.
    pub cells: Vec<Vec<Option<f64>>>,
}

/// Pairwise Pearson correlation over every column of the table.
pub fn correlation_matrix<M: Metric>(rows: &[&M::Row]) -> CorrelationMatrix {
    let columns: Vec<Vec<f64>> = M::ALL.iter().map(|m| column_values(rows, *m)).collect();
    let cells = columns
        .iter()
        .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
        .collect();
    CorrelationMatrix {
        columns: M::ALL.iter().map(|m| m.column()).collect(),
        cells,
    }
}

// ── Filters ────────────────────────────────────────────────────────

/// Regions whose name is in `selection`, in table order.
pub fn regions_in<'a>(ds: &'a Dataset, selection: &[String]) -> Vec<&'a RegionRecord> {
    ds.regions()
        .iter()
        .filter(|r| selection.iter().any(|s| *s == r.name))
        .collect()
}

pub fn snapshots_in<'a>(ds: &'a Dataset, selection: &[String]) -> Vec<&'a IndexSnapshot> {
    ds.index_snapshot()
        .iter()
        .filter(|s| selection.iter().any(|n| *n == s.region))
        .collect()
}

/// Municipalities of one region with population inside the inclusive range.
pub fn municipalities_filtered<'a>(
    ds: &'a Dataset,
    region: &str,
    (min, max): PopulationRange,
) -> Vec<&'a MunicipalRecord> {
    ds.municipalities()
        .iter()
        .filter(|m| m.region == region && m.population >= min && m.population <= max)
        .collect()
}

/// Series points of the selected regions with `from <= date <= to`.
pub fn time_series_filtered<'a>(
    ds: &'a Dataset,
    selection: &[String],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<&'a IndexTimePoint> {
    ds.series_between(from, to)
        .filter(|p| selection.iter().any(|s| *s == p.region))
        .collect()
}

/// The first `n` names, used when the caller made no selection.
pub fn default_selection<'a>(names: impl Iterator<Item = &'a str>, n: usize) -> Vec<String> {
    names.take(n).map(str::to_string).collect()
}

// ── Seasonality ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAverage {
    pub region: String,
    pub month: u32,
    pub month_name: &'static str,
    pub consumer_activity_index: f64,
}

/// Mean consumer activity per (region, calendar month), January first.
/// Regions keep the order in which they first appear in `points`.
pub fn monthly_seasonality(points: &[&IndexTimePoint]) -> Vec<MonthlyAverage> {
    let mut regions: Vec<&str> = Vec::new();
    for p in points {
        if !regions.contains(&p.region.as_str()) {
            regions.push(&p.region);
        }
    }

    let mut out = Vec::new();
    for month in 1..=12u32 {
        for region in &regions {
            let values: Vec<f64> = points
                .iter()
                .filter(|p| p.region == *region && p.date.month() == month)
                .map(|p| p.consumer_activity_index)
                .collect();
            if let Some(avg) = mean(&values) {
                out.push(MonthlyAverage {
                    region: region.to_string(),
                    month,
                    month_name: month_name(month),
                    consumer_activity_index: avg,
                });
            }
        }
    }
    out
}

fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("")
}

// ── Population categories ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationCategory {
    Small,
    Medium,
    Large,
    Major,
    Megapolis,
}

impl PopulationCategory {
    pub fn of(population: i64) -> Self {
        match population {
            p if p < 50_000    => Self::Small,
            p if p < 100_000   => Self::Medium,
            p if p < 250_000   => Self::Large,
            p if p < 1_000_000 => Self::Major,
            _                  => Self::Megapolis,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Small     => "Малый город (до 50 тыс.)",
            Self::Medium    => "Средний город (50-100 тыс.)",
            Self::Large     => "Большой город (100-250 тыс.)",
            Self::Major     => "Крупный город (250 тыс.-1 млн.)",
            Self::Megapolis => "Мегаполис (более 1 млн.)",
        }
    }
}

/// Wage distribution per population category, smallest category first.
/// Categories with no rows are omitted.
pub fn wage_by_category(rows: &[&MunicipalRecord]) -> Vec<(PopulationCategory, FiveNumberSummary)> {
    let mut cats: Vec<PopulationCategory> =
        rows.iter().map(|m| PopulationCategory::of(m.population)).collect();
    cats.sort();
    cats.dedup();
    cats.into_iter()
        .filter_map(|cat| {
            let wages: Vec<f64> = rows
                .iter()
                .filter(|m| PopulationCategory::of(m.population) == cat)
                .map(|m| m.average_wage as f64)
                .collect();
            five_number_summary(&wages).map(|s| (cat, s))
        })
        .collect()
}

// ── Reports ────────────────────────────────────────────────────────

/// Top `n` municipalities by wage among those with population <= cap.
pub fn top_by_wage(ds: &Dataset, max_population: i64, n: usize) -> Vec<&MunicipalRecord> {
    let mut rows: Vec<&MunicipalRecord> = ds
        .municipalities()
        .iter()
        .filter(|m| m.population <= max_population)
        .collect();
    rows.sort_by(|a, b| b.average_wage.cmp(&a.average_wage));
    rows.truncate(n);
    rows
}

/// Top `n` regions by snapshot consumer activity.
pub fn leading_regions(ds: &Dataset, n: usize) -> Vec<&IndexSnapshot> {
    let mut rows: Vec<&IndexSnapshot> = ds.index_snapshot().iter().collect();
    rows.sort_by(|a, b| b.consumer_activity_index.cmp(&a.consumer_activity_index));
    rows.truncate(n);
    rows
}

/// Retail turnover per resident, in roubles.
pub fn turnover_per_capita(m: &MunicipalRecord) -> Option<f64> {
    if m.population <= 0 {
        return None;
    }
    Some(m.retail_turnover_millions as f64 * 1_000_000.0 / m.population as f64)
}
