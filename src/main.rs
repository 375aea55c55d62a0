use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use sales_insight::{Session, ViewData, ViewRequest};

/// Load a sales CSV, clean it, and print the aggregated views.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Path to a comma-delimited sales file with a header row.
    path: PathBuf,

    /// How many customers the top-customers view keeps.
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// Emit one JSON document instead of text tables.
    #[arg(long)]
    json: bool,
}

const VIEWS: [(&str, fn(usize) -> ViewRequest); 5] = [
    ("summary", |_| ViewRequest::Summary),
    ("top_customers", ViewRequest::TopCustomers),
    ("product_performance", |_| ViewRequest::ProductPerformance),
    ("sales_trend", |_| ViewRequest::SalesTrend),
    ("regional_distribution", |_| ViewRequest::RegionalDistribution),
];

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let mut session = Session::new();
    let report = session
        .load(&args.path)
        .with_context(|| format!("loading {}", args.path.display()))?;

    if args.json {
        let mut views = serde_json::Map::new();
        for (name, request) in VIEWS {
            let data = session.view(request(args.top))?;
            views.insert(name.to_string(), serde_json::to_value(&data)?);
        }
        let doc = serde_json::json!({ "report": report, "views": views });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!(
        "Loaded {} ({} rows, {} duplicates removed, {} cells imputed)",
        args.path.display(),
        report.rows_after,
        report.duplicates_removed,
        report.cells_imputed,
    );

    for (name, request) in VIEWS {
        println!("\n== {name} ==");
        print_view(&session.view(request(args.top))?);
    }
    Ok(())
}

fn print_view(data: &ViewData) {
    match data {
        ViewData::Scalars(rows) => {
            let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
            for (label, value) in rows {
                println!("  {label:<width$}  {value}");
            }
        }
        ViewData::Series(pairs) => {
            if pairs.is_empty() {
                println!("  (no rows)");
                return;
            }
            let width = pairs.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
            for (label, value) in pairs {
                println!("  {label:<width$}  {value:>12.2}");
            }
        }
    }
}
