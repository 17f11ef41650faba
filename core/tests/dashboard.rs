//! Dashboard handlers end to end: request in, view-model out.

use rosstat_core::{
    config::{DashboardConfig, ViewDefaults},
    dashboard::Dashboard,
    dataset::Dataset,
    query::{IndexMetric, Metric, MunicipalMetric, RegionMetric},
    stats::CorrelationStrength,
    view::{
        CorrelationAxes, ViewModel, ViewRequest, NO_MATCHING_DATA, SELECT_REGIONS_AND_METRICS,
    },
};
use chrono::NaiveDate;
use std::sync::Arc;

fn dashboard() -> Dashboard {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = DashboardConfig::default_test();
    let ds = Dataset::from_config(&config).expect("dataset");
    Dashboard::new(Arc::new(ds), ViewDefaults::default())
}

fn parse(json: &str) -> ViewRequest {
    serde_json::from_str(json).expect("valid request")
}

#[test]
fn overview_lists_all_tables() {
    let mut dash = dashboard();
    let ViewModel::Overview(view) = dash.handle(ViewRequest::Overview) else {
        panic!("expected overview");
    };
    assert_eq!(view.region_count, 12);
    assert_eq!(view.municipality_count, 80);
    assert_eq!(view.series_region_count, 12);
    assert_eq!(view.index_snapshot.len(), 12);
}

#[test]
fn regional_stats_defaults_to_first_five() {
    let mut dash = dashboard();
    let ViewModel::RegionalStats(view) = dash.handle(parse(r#"{"view":"regional_stats"}"#)) else {
        panic!("expected regional stats");
    };
    assert_eq!(view.rows.len(), 5);
    assert_eq!(view.rows[0].name, "Москва");
    assert_eq!(view.chart.column, RegionMetric::Population.column());
    assert_eq!(view.chart.bars.len(), 5);
    assert_eq!(view.correlation.columns.len(), 4);
}

#[test]
fn empty_selection_yields_no_data() {
    let mut dash = dashboard();
    let model = dash.handle(ViewRequest::RegionalStats {
        regions: Some(vec![]),
        metric: RegionMetric::AverageWage,
    });
    assert!(model.is_no_data());
    let ViewModel::NoData { message } = model else { unreachable!() };
    assert_eq!(message, NO_MATCHING_DATA);

    let model = dash.handle(ViewRequest::RegionComparison {
        regions: None,
        metrics: vec![],
    });
    let ViewModel::NoData { message } = model else {
        panic!("expected no data");
    };
    assert_eq!(message, SELECT_REGIONS_AND_METRICS);
}

#[test]
fn municipal_stats_defaults_to_alphabetical_first_region() {
    let mut dash = dashboard();
    let model = dash.handle(ViewRequest::MunicipalStats {
        region: None,
        population_thousands: None,
        metric: MunicipalMetric::AverageWage,
    });
    let ViewModel::MunicipalStats(view) = model else {
        panic!("expected municipal stats");
    };
    assert_eq!(view.region, "Владимирская область");
    assert_eq!(view.rows.len(), 7);
    assert!(!view.wage_by_category.is_empty());
}

#[test]
fn municipal_stats_population_window() {
    let mut dash = dashboard();
    let model = dash.handle(ViewRequest::MunicipalStats {
        region: Some("Татарстан".into()),
        population_thousands: Some((0, 50)),
        metric: MunicipalMetric::Population,
    });
    let ViewModel::MunicipalStats(view) = model else {
        panic!("expected municipal stats");
    };
    assert_eq!(view.population_thousands, (0, 50));
    // Small cities are always below 50k.
    assert!(view.rows.len() >= 3);
    assert!(view.rows.iter().all(|m| m.population <= 50_000));
}

#[test]
fn index_dynamics_date_window() {
    let mut dash = dashboard();
    let model = dash.handle(parse(
        r#"{"view":"index_dynamics","regions":["Москва"],"from":"2023-01-01","to":"2023-06-30","metric":"catering_tx"}"#,
    ));
    let ViewModel::IndexDynamics(view) = model else {
        panic!("expected index dynamics");
    };
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].points.len(), 6);
    assert_eq!(view.rows.len(), 6);
    assert_eq!(view.from, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    assert_eq!(view.current.bars.len(), 1);
    assert_eq!(view.seasonality.len(), 6);
}

#[test]
fn average_receipt_has_no_series_lines() {
    let mut dash = dashboard();
    let model = dash.handle(ViewRequest::IndexDynamics {
        regions: None,
        from: None,
        to: None,
        metric: IndexMetric::AverageReceipt,
    });
    let ViewModel::IndexDynamics(view) = model else {
        panic!("expected index dynamics");
    };
    assert!(view.lines.is_empty());
    assert_eq!(view.current.bars.len(), 3);
}

#[test]
fn index_dynamics_outside_series_is_no_data() {
    let mut dash = dashboard();
    let model = dash.handle(ViewRequest::IndexDynamics {
        regions: None,
        from: NaiveDate::from_ymd_opt(2030, 1, 1),
        to: NaiveDate::from_ymd_opt(2030, 12, 31),
        metric: IndexMetric::ConsumerActivity,
    });
    assert!(model.is_no_data());
}

#[test]
fn region_comparison_radar_peaks_at_100() {
    let mut dash = dashboard();
    let model = dash.handle(ViewRequest::RegionComparison {
        regions: Some(vec!["Москва".into(), "Татарстан".into()]),
        metrics: vec![RegionMetric::AverageWage, RegionMetric::InvestmentBillions],
    });
    let ViewModel::RegionComparison(view) = model else {
        panic!("expected region comparison");
    };
    assert_eq!(view.radar.len(), 2);
    // Moscow leads both columns.
    assert_eq!(view.radar[0].name, "Москва");
    assert_eq!(view.radar[0].values, vec![100.0, 100.0]);
    assert!((view.radar[1].values[0] - 43.0).abs() < 1e-9);
    assert_eq!(view.rows[1].values, vec![43_000.0, 380.0]);
    assert_eq!(view.charts.len(), 2);
}

#[test]
fn municipal_comparison_defaults() {
    let mut dash = dashboard();
    let model = dash.handle(parse(r#"{"view":"municipal_comparison","region":"Москва"}"#));
    let ViewModel::MunicipalComparison(view) = model else {
        panic!("expected municipal comparison");
    };
    assert_eq!(view.rows.len(), 5);
    assert_eq!(view.columns.len(), 2);
    assert_eq!(view.turnover_per_capita.bars.len(), 5);
    assert!(view.turnover_per_capita.bars.iter().all(|b| b.value > 0.0));
}

#[test]
fn enterprise_count_tracks_population() {
    let mut dash = dashboard();
    let model = dash.handle(ViewRequest::Correlation {
        axes: CorrelationAxes::Municipal {
            x: MunicipalMetric::Population,
            y: MunicipalMetric::EnterpriseCount,
        },
    });
    let ViewModel::Correlation(view) = model else {
        panic!("expected correlation");
    };
    assert_eq!(view.points.len(), 80);
    assert!(view.pearson.unwrap() > 0.7);
    assert_eq!(view.strength, Some(CorrelationStrength::Strong));
    assert!(view.trend.unwrap().slope > 0.0);
}

#[test]
fn correlation_needs_two_distinct_columns() {
    let mut dash = dashboard();
    let model = dash.handle(ViewRequest::Correlation {
        axes: CorrelationAxes::Regional {
            x: RegionMetric::AverageWage,
            y: RegionMetric::AverageWage,
        },
    });
    assert!(model.is_no_data());
}

#[test]
fn correlation_request_parses_from_json() {
    let mut dash = dashboard();
    let model = dash.handle(parse(
        r#"{"view":"correlation","axes":{"source":"regional","x":"average_wage","y":"consumption_index"}}"#,
    ));
    let ViewModel::Correlation(view) = model else {
        panic!("expected correlation");
    };
    assert_eq!(view.points.len(), 12);
    assert_eq!(view.summary.is_some(), view.pearson.is_some());
}

#[test]
fn reports() {
    let mut dash = dashboard();
    let ViewModel::TopWageReport(top) = dash.handle(parse(r#"{"view":"top_wage_report"}"#)) else {
        panic!("expected top wage report");
    };
    assert_eq!(top.max_population_thousands, 100);
    assert!(top.rows.len() <= 10);
    assert!(top.rows.iter().all(|m| m.population <= 100_000));

    let ViewModel::ConsumerActivityReport(activity) =
        dash.handle(ViewRequest::ConsumerActivityReport)
    else {
        panic!("expected consumer activity report");
    };
    assert_eq!(activity.regions.len(), 5);
    assert_eq!(activity.lines.len(), 5);
    assert!(activity.lines.iter().all(|l| l.points.len() == 24));
}

#[test]
fn chat_ignores_blank_messages() {
    let mut dash = dashboard();
    dash.handle(ViewRequest::PostMessage { text: "   ".into() });
    assert!(dash.chat().is_empty());

    let model = dash.handle(ViewRequest::PostMessage {
        text: " Какой регион лидирует? ".into(),
    });
    let ViewModel::Chat { messages } = model else {
        panic!("expected chat");
    };
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "Какой регион лидирует?");

    let ViewModel::Chat { messages } = dash.handle(parse(r#"{"view":"chat_history"}"#)) else {
        panic!("expected chat");
    };
    assert_eq!(messages.len(), 1);
}

#[test]
fn view_model_serializes_with_tag() {
    let mut dash = dashboard();
    let json = serde_json::to_value(dash.handle(ViewRequest::Overview)).unwrap();
    assert_eq!(json["view"], "overview");
    assert_eq!(json["region_count"], 12);

    let json = serde_json::to_value(ViewModel::no_data(NO_MATCHING_DATA)).unwrap();
    assert_eq!(json["view"], "no_data");
}

#[test]
fn unknown_request_fails_to_parse() {
    assert!(serde_json::from_str::<ViewRequest>(r#"{"view":"investment_report"}"#).is_err());
}

#[test]
fn huge_population_bounds_do_not_overflow() {
    let mut dash = dashboard();
    let model = dash.handle(parse(
        r#"{"view":"municipal_stats","region":"Татарстан","population_thousands":[0, 9223372036854775807]}"#,
    ));
    let ViewModel::MunicipalStats(view) = model else {
        panic!("expected municipal stats");
    };
    assert_eq!(view.rows.len(), 7);

    let model = dash.handle(parse(
        r#"{"view":"top_wage_report","max_population_thousands":9223372036854775807}"#,
    ));
    let ViewModel::TopWageReport(top) = model else {
        panic!("expected top wage report");
    };
    assert_eq!(top.rows.len(), 10);

    let model = dash.handle(ViewRequest::MunicipalStats {
        region: Some("Татарстан".into()),
        population_thousands: Some((i64::MIN, i64::MIN)),
        metric: MunicipalMetric::Population,
    });
    assert!(model.is_no_data());
}

#[test]
fn negative_population_bounds_yield_no_data() {
    let mut dash = dashboard();
    let model = dash.handle(ViewRequest::TopWageReport {
        max_population_thousands: -5,
    });
    assert!(model.is_no_data());

    let model = dash.handle(ViewRequest::MunicipalStats {
        region: Some("Москва".into()),
        population_thousands: Some((-10, -1)),
        metric: MunicipalMetric::AverageWage,
    });
    assert!(model.is_no_data());
}
