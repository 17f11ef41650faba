//! The dashboard: one handler per user action.
//!
//! RULES:
//!   - Handlers only read the shared Dataset; the conversation log is
//!     the only session state that changes.
//!   - An empty or unmatched selection yields `ViewModel::NoData`,
//!     never an error.

use crate::{
    cache::DatasetCache,
    chat::ConversationLog,
    config::ViewDefaults,
    dataset::Dataset,
    error::DashResult,
    index::{IndexSnapshot, IndexTimePoint},
    municipal::MunicipalRecord,
    region::RegionRecord,
    query::{
        column_values, correlation_matrix, default_selection, leading_regions,
        monthly_seasonality, municipalities_filtered, regions_in, snapshots_in,
        time_series_filtered, top_by_wage, turnover_per_capita, wage_by_category, IndexMetric,
        Metric, MunicipalMetric, RegionMetric,
    },
    stats::{linear_fit, normalize_to_max, pearson, CorrelationStrength},
    view::{
        Bar, BarChart, CategoryWages, ComparisonRow, ConsumerActivityView, CorrelationAxes,
        CorrelationView, IndexDynamicsView, MunicipalComparisonView, MunicipalStatsView,
        OverviewView, RegionComparisonView, RegionalStatsView, ScatterPoint, SeriesLine,
        SeriesPoint, TopWageView, ViewModel, ViewRequest, NO_MATCHING_DATA,
        SELECT_MUNICIPALITIES_AND_METRICS, SELECT_REGIONS_AND_METRICS,
    },
};
use chrono::NaiveDate;
use std::sync::Arc;

pub struct Dashboard {
    dataset: Arc<Dataset>,
    defaults: ViewDefaults,
    chat: ConversationLog,
}

impl Dashboard {
    pub fn new(dataset: Arc<Dataset>, defaults: ViewDefaults) -> Self {
        Self {
            dataset,
            defaults,
            chat: ConversationLog::new(),
        }
    }

    /// Open a session on the cached dataset, generating it if needed.
    pub fn from_cache(cache: &DatasetCache) -> DashResult<Self> {
        Ok(Self::new(cache.get()?, cache.config().views.clone()))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn chat(&self) -> &ConversationLog {
        &self.chat
    }

    pub fn handle(&mut self, request: ViewRequest) -> ViewModel {
        match request {
            ViewRequest::Overview => self.overview(),
            ViewRequest::RegionalStats { regions, metric } => self.regional_stats(regions, metric),
            ViewRequest::MunicipalStats {
                region,
                population_thousands,
                metric,
            } => self.municipal_stats(region, population_thousands, metric),
            ViewRequest::IndexDynamics {
                regions,
                from,
                to,
                metric,
            } => self.index_dynamics(regions, from, to, metric),
            ViewRequest::RegionComparison { regions, metrics } => {
                self.region_comparison(regions, metrics)
            }
            ViewRequest::MunicipalComparison {
                region,
                municipalities,
                metrics,
            } => self.municipal_comparison(region, municipalities, metrics),
            ViewRequest::Correlation { axes } => self.correlation(axes),
            ViewRequest::TopWageReport {
                max_population_thousands,
            } => self.top_wage_report(max_population_thousands),
            ViewRequest::ConsumerActivityReport => self.consumer_activity_report(),
            ViewRequest::PostMessage { text } => {
                if self.chat.post(&text).is_none() {
                    log::debug!("chat: ignored blank message");
                }
                self.chat_history()
            }
            ViewRequest::ChatHistory => self.chat_history(),
        }
    }

    // ── Selection defaults ─────────────────────────────────────

    fn region_names(&self) -> impl Iterator<Item = &str> {
        self.dataset.regions().iter().map(|r| r.name.as_str())
    }

    fn regions_or_default(&self, regions: Option<Vec<String>>, n: usize) -> Vec<String> {
        regions.unwrap_or_else(|| default_selection(self.region_names(), n))
    }

    /// Alphabetically first region, as the municipal pages preselect.
    fn first_region_sorted(&self) -> Option<String> {
        self.region_names().min().map(str::to_string)
    }

    // ── Pages ──────────────────────────────────────────────────

    fn overview(&self) -> ViewModel {
        let ds = &self.dataset;
        ViewModel::Overview(OverviewView {
            region_count: ds.regions().len(),
            municipality_count: ds.municipalities().len(),
            series_region_count: ds.regions_with_series(),
            regions: ds.regions().to_vec(),
            municipalities: ds.municipalities().to_vec(),
            index_snapshot: ds.index_snapshot().to_vec(),
        })
    }

    fn regional_stats(&self, regions: Option<Vec<String>>, metric: RegionMetric) -> ViewModel {
        let selection = self.regions_or_default(regions, self.defaults.regional_selection);
        let rows = regions_in(&self.dataset, &selection);
        if rows.is_empty() {
            return ViewModel::no_data(NO_MATCHING_DATA);
        }
        ViewModel::RegionalStats(RegionalStatsView {
            chart: bar_chart(
                format!("{} по регионам", metric.column()),
                metric,
                &rows,
                |r: &RegionRecord| r.name.clone(),
            ),
            correlation: correlation_matrix::<RegionMetric>(&rows),
            rows: rows.into_iter().cloned().collect(),
        })
    }

    fn municipal_stats(
        &self,
        region: Option<String>,
        population_thousands: Option<(i64, i64)>,
        metric: MunicipalMetric,
    ) -> ViewModel {
        let Some(region) = region.or_else(|| self.first_region_sorted()) else {
            return ViewModel::no_data(NO_MATCHING_DATA);
        };
        // Round the default ceiling up so the largest municipality is included.
        let max_thousands = (self.dataset.max_municipal_population() + 999) / 1000;
        let (lo, hi) = population_thousands.unwrap_or((0, max_thousands));
        let bounds = (lo.saturating_mul(1000), hi.saturating_mul(1000));
        let rows = municipalities_filtered(&self.dataset, &region, bounds);
        if rows.is_empty() {
            return ViewModel::no_data(NO_MATCHING_DATA);
        }

        let wage_by_category = wage_by_category(&rows)
            .into_iter()
            .map(|(category, wages)| CategoryWages {
                category,
                label: category.label(),
                wages,
            })
            .collect();
        ViewModel::MunicipalStats(MunicipalStatsView {
            chart: bar_chart(
                format!("{} по муниципалитетам {region}", metric.column()),
                metric,
                &rows,
                |m: &MunicipalRecord| m.municipality.clone(),
            ),
            region,
            population_thousands: (lo, hi),
            rows: rows.into_iter().cloned().collect(),
            wage_by_category,
        })
    }

    fn index_dynamics(
        &self,
        regions: Option<Vec<String>>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        metric: IndexMetric,
    ) -> ViewModel {
        let Some((min, max)) = self.dataset.date_bounds() else {
            return ViewModel::no_data(NO_MATCHING_DATA);
        };
        let (from, to) = (from.unwrap_or(min), to.unwrap_or(max));
        let selection = self.regions_or_default(regions, self.defaults.index_selection);
        let points = time_series_filtered(&self.dataset, &selection, from, to);
        if points.is_empty() {
            return ViewModel::no_data(NO_MATCHING_DATA);
        }

        let snapshots = snapshots_in(&self.dataset, &selection);
        ViewModel::IndexDynamics(IndexDynamicsView {
            from,
            to,
            column: metric.column(),
            lines: series_lines(&points, metric),
            current: bar_chart(
                format!("Текущие значения {} по регионам", metric.column()),
                metric,
                &snapshots,
                |s: &IndexSnapshot| s.region.clone(),
            ),
            seasonality: monthly_seasonality(&points),
            rows: points.into_iter().cloned().collect(),
        })
    }

    fn region_comparison(
        &self,
        regions: Option<Vec<String>>,
        metrics: Vec<RegionMetric>,
    ) -> ViewModel {
        let selection = self.regions_or_default(regions, self.defaults.regional_selection);
        let rows = regions_in(&self.dataset, &selection);
        if rows.is_empty() || metrics.is_empty() {
            return ViewModel::no_data(SELECT_REGIONS_AND_METRICS);
        }

        let normalized: Vec<Vec<f64>> = metrics
            .iter()
            .map(|m| normalize_to_max(&column_values::<RegionMetric>(&rows, *m)))
            .collect();
        let radar = rows
            .iter()
            .enumerate()
            .map(|(i, r)| ComparisonRow {
                name: r.name.clone(),
                values: normalized.iter().map(|col| col[i]).collect(),
            })
            .collect();

        ViewModel::RegionComparison(RegionComparisonView {
            axes: metrics.iter().map(|m| m.column()).collect(),
            radar,
            rows: comparison_rows::<RegionMetric>(&rows, &metrics, |r: &RegionRecord| {
                r.name.clone()
            }),
            charts: metrics
                .iter()
                .map(|m| {
                    bar_chart(
                        format!("Сравнение регионов по показателю: {}", m.column()),
                        *m,
                        &rows,
                        |r: &RegionRecord| r.name.clone(),
                    )
                })
                .collect(),
        })
    }

    fn municipal_comparison(
        &self,
        region: Option<String>,
        municipalities: Option<Vec<String>>,
        metrics: Vec<MunicipalMetric>,
    ) -> ViewModel {
        let Some(region) = region.or_else(|| self.first_region_sorted()) else {
            return ViewModel::no_data(SELECT_MUNICIPALITIES_AND_METRICS);
        };
        let in_region: Vec<&MunicipalRecord> = self
            .dataset
            .municipalities()
            .iter()
            .filter(|m| m.region == region)
            .collect();
        let selection = municipalities.unwrap_or_else(|| {
            default_selection(
                in_region.iter().map(|m| m.municipality.as_str()),
                self.defaults.municipal_selection,
            )
        });
        let rows: Vec<_> = in_region
            .into_iter()
            .filter(|m| selection.iter().any(|s| *s == m.municipality))
            .collect();
        if rows.is_empty() || metrics.is_empty() {
            return ViewModel::no_data(SELECT_MUNICIPALITIES_AND_METRICS);
        }

        let per_capita = rows
            .iter()
            .filter_map(|m| {
                turnover_per_capita(m).map(|value| Bar {
                    label: m.municipality.clone(),
                    value,
                })
            })
            .collect();

        ViewModel::MunicipalComparison(MunicipalComparisonView {
            columns: metrics.iter().map(|m| m.column()).collect(),
            rows: comparison_rows::<MunicipalMetric>(
                &rows,
                &metrics,
                |m: &MunicipalRecord| m.municipality.clone(),
            ),
            charts: metrics
                .iter()
                .map(|metric| {
                    bar_chart(
                        format!("Сравнение муниципалитетов по показателю: {}", metric.column()),
                        *metric,
                        &rows,
                        |m: &MunicipalRecord| m.municipality.clone(),
                    )
                })
                .collect(),
            turnover_per_capita: BarChart {
                title: "Оборот розничной торговли на душу населения (руб.)".into(),
                column: "Оборот на душу населения",
                bars: per_capita,
            },
            region,
        })
    }

    fn correlation(&self, axes: CorrelationAxes) -> ViewModel {
        let ds = &self.dataset;
        match axes {
            CorrelationAxes::Regional { x, y } => {
                let rows: Vec<&RegionRecord> = ds.regions().iter().collect();
                correlation_view("Региональные данные", x, y, &rows, |r: &RegionRecord| {
                    (r.name.clone(), r.name.clone())
                })
            }
            CorrelationAxes::Municipal { x, y } => {
                let rows: Vec<&MunicipalRecord> = ds.municipalities().iter().collect();
                correlation_view("Муниципальные данные", x, y, &rows, |m: &MunicipalRecord| {
                    (m.municipality.clone(), m.region.clone())
                })
            }
            CorrelationAxes::IndexSnapshot { x, y } => {
                let rows: Vec<&IndexSnapshot> = ds.index_snapshot().iter().collect();
                correlation_view("СберИндекс", x, y, &rows, |s: &IndexSnapshot| {
                    (s.region.clone(), s.region.clone())
                })
            }
        }
    }

    fn top_wage_report(&self, max_population_thousands: i64) -> ViewModel {
        let rows = top_by_wage(
            &self.dataset,
            max_population_thousands.saturating_mul(1000),
            self.defaults.top_wage_count,
        );
        if rows.is_empty() {
            return ViewModel::no_data(NO_MATCHING_DATA);
        }
        ViewModel::TopWageReport(TopWageView {
            max_population_thousands,
            chart: bar_chart(
                format!(
                    "Топ-{} муниципалитетов с населением до {max_population_thousands} тыс. человек по средней зарплате",
                    self.defaults.top_wage_count
                ),
                MunicipalMetric::AverageWage,
                &rows,
                |m: &MunicipalRecord| m.municipality.clone(),
            ),
            rows: rows.into_iter().cloned().collect(),
        })
    }

    fn consumer_activity_report(&self) -> ViewModel {
        let regions: Vec<String> = leading_regions(&self.dataset, self.defaults.leading_region_count)
            .into_iter()
            .map(|s| s.region.clone())
            .collect();
        let points: Vec<&IndexTimePoint> = self
            .dataset
            .time_series()
            .iter()
            .filter(|p| regions.contains(&p.region))
            .collect();
        if points.is_empty() {
            return ViewModel::no_data(NO_MATCHING_DATA);
        }
        ViewModel::ConsumerActivityReport(ConsumerActivityView {
            lines: series_lines(&points, IndexMetric::ConsumerActivity),
            regions,
        })
    }

    fn chat_history(&self) -> ViewModel {
        ViewModel::Chat {
            messages: self.chat.messages().to_vec(),
        }
    }
}

// ── Builders ───────────────────────────────────────────────────────

fn bar_chart<M: Metric>(
    title: String,
    metric: M,
    rows: &[&M::Row],
    label: impl Fn(&M::Row) -> String,
) -> BarChart {
    BarChart {
        title,
        column: metric.column(),
        bars: rows
            .iter()
            .map(|r| Bar {
                label: label(*r),
                value: metric.value(*r),
            })
            .collect(),
    }
}

fn comparison_rows<M: Metric>(
    rows: &[&M::Row],
    metrics: &[M],
    name: impl Fn(&M::Row) -> String,
) -> Vec<ComparisonRow> {
    rows.iter()
        .map(|r| ComparisonRow {
            name: name(*r),
            values: metrics.iter().map(|m| m.value(*r)).collect(),
        })
        .collect()
}

/// One line per region, in order of first appearance.
fn series_lines(points: &[&IndexTimePoint], metric: IndexMetric) -> Vec<SeriesLine> {
    let mut lines: Vec<SeriesLine> = Vec::new();
    for p in points {
        let Some(value) = metric.series_value(p) else {
            continue;
        };
        let point = SeriesPoint {
            date: p.date,
            value,
        };
        match lines.iter_mut().find(|l| l.region == p.region) {
            Some(line) => line.points.push(point),
            None => lines.push(SeriesLine {
                region: p.region.clone(),
                points: vec![point],
            }),
        }
    }
    lines
}

/// `label` returns (hover label, colour group) for a row.
fn correlation_view<M: Metric>(
    source: &'static str,
    x: M,
    y: M,
    rows: &[&M::Row],
    label: impl Fn(&M::Row) -> (String, String),
) -> ViewModel {
    // The y axis never offers the column already chosen for x.
    if rows.is_empty() || x == y {
        return ViewModel::no_data(NO_MATCHING_DATA);
    }
    let xs = column_values(rows, x);
    let ys = column_values(rows, y);
    let points = rows
        .iter()
        .zip(xs.iter().zip(&ys))
        .map(|(r, (&xv, &yv))| {
            let (name, group) = label(*r);
            ScatterPoint {
                label: name,
                group,
                x: xv,
                y: yv,
            }
        })
        .collect();
    let r = pearson(&xs, &ys);
    let strength = r.map(CorrelationStrength::classify);
    ViewModel::Correlation(CorrelationView {
        source,
        matrix: correlation_matrix::<M>(rows),
        x_column: x.column(),
        y_column: y.column(),
        points,
        pearson: r,
        strength,
        summary: strength.map(|s| s.label()),
        trend: linear_fit(&xs, &ys),
    })
}
