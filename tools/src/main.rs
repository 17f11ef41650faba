//! dashboard-runner: headless runner for the regional statistics dashboard.
//!
//! Usage:
//!   dashboard-runner --seed 12345
//!   dashboard-runner --config dashboard.json --ipc-mode

use anyhow::Result;
use rosstat_core::{
    cache::DatasetCache,
    config::DashboardConfig,
    dashboard::Dashboard,
    dataset::Dataset,
    query::{leading_regions, top_by_wage},
    view::ViewRequest,
};
use std::env;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let config_path = args
        .windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| w[1].as_str());

    let mut config = match config_path {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(seed) = parse_arg::<u64>(&args, "--seed") {
        config = config.with_seed(seed);
    }

    if !ipc_mode {
        println!("РосСтат Аналитик — dashboard-runner");
        println!("  config:  {}", config_path.unwrap_or("(defaults)"));
        match config.seed {
            Some(seed) => println!("  seed:    {seed}"),
            None => println!("  seed:    (entropy)"),
        }
        println!();
    }

    let cache = DatasetCache::new(config);
    let mut dashboard = Dashboard::from_cache(&cache)?;

    if ipc_mode {
        run_ipc_loop(&mut dashboard)?;
    } else {
        print_summary(dashboard.dataset());
    }
    Ok(())
}

/// One JSON request per stdin line, one JSON view-model per stdout line.
fn run_ipc_loop(dashboard: &mut Dashboard) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let value: serde_json::Value = match serde_json::from_str(&buffer) {
            Ok(v) => v,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };
        if value["view"] == "quit" {
            break;
        }

        match serde_json::from_value::<ViewRequest>(value) {
            Ok(request) => {
                let model = dashboard.handle(request);
                writeln!(stdout, "{}", serde_json::to_string(&model)?)?;
            }
            Err(e) => {
                log::warn!("Unknown request: {e}");
                write_error(&mut stdout, &e.to_string())?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{err_json}")?;
    out.flush()?;
    Ok(())
}

fn print_summary(ds: &Dataset) {
    println!("=== DATASET SUMMARY ===");
    println!("  seed:            {}", ds.seed());
    println!("  regions:         {}", ds.regions().len());
    println!("  municipalities:  {}", ds.municipalities().len());
    println!("  series regions:  {}", ds.regions_with_series());
    println!("  series points:   {}", ds.time_series().len());
    if let Some((from, to)) = ds.date_bounds() {
        println!("  series period:   {from} .. {to}");
    }

    println!();
    println!("=== TOP WAGES (population <= 100k) ===");
    for m in top_by_wage(ds, 100_000, 10) {
        println!(
            "  {:<45} | {:>8} | wage {:>7}",
            m.municipality, m.population, m.average_wage
        );
    }

    println!();
    println!("=== CONSUMER ACTIVITY LEADERS ===");
    for s in leading_regions(ds, 5) {
        println!(
            "  {:<25} | activity {:>3} | receipt {:>5}",
            s.region, s.consumer_activity_index, s.average_receipt
        );
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
}
