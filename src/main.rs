mod catalogue;
mod collect;
mod config;
mod convert;
mod fx;
mod models;
mod report;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "bookprices",
    about = "Scrape book listings and convert their prices into another currency"
)]
struct Args {
    /// How many listings to collect (prompted for when omitted)
    #[arg(long)]
    limit: Option<usize>,

    /// Target currency code, e.g. KES or EUR (prompted for when omitted)
    #[arg(long)]
    currency: Option<String>,

    /// Skip the price chart
    #[arg(long)]
    no_chart: bool,

    /// Accept all configured defaults without prompting
    #[arg(long)]
    yes: bool,

    /// Directory for the CSV and chart output
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = config::load_config().unwrap_or_else(|_| Config::default());

    let limit = match args.limit {
        Some(n) if n > 0 => n,
        Some(_) => cfg.default_limit,
        None if args.yes => cfg.default_limit,
        None => prompt_limit(&cfg),
    };

    println!(
        "📚 Scraping up to {} book listings from {} ...",
        limit, cfg.catalogue_base_url
    );

    let source = catalogue::HttpSource::new(Duration::from_secs(cfg.http_timeout_secs))?;
    let reader = catalogue::CatalogueReader::new(
        source,
        cfg.catalogue_base_url.clone(),
        cfg.source_currency.clone(),
    );
    let listings = collect::collect_listings(
        &reader,
        limit,
        cfg.max_pages,
        Duration::from_millis(cfg.page_delay_ms),
    )
    .await;

    if listings.is_empty() {
        anyhow::bail!(
            "❌ No listings collected from {} — nothing to convert",
            cfg.catalogue_base_url
        );
    }
    println!("✅ Collected {} listings", listings.len());

    let target = match args.currency {
        Some(code) if !code.trim().is_empty() => code.trim().to_uppercase(),
        _ if args.yes => cfg.default_target_currency.clone(),
        Some(_) => cfg.default_target_currency.clone(),
        None => prompt_currency(&cfg),
    };

    let fx = fx::FxClient::new(&cfg)?;
    let listings = convert::normalize(listings, &target, &fx, &cfg).await;

    report::display_table(&listings, &cfg.source_currency_symbol);

    let output_dir = args
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&cfg.output_dir));
    report::export_csv(&listings, &output_dir, &target)?;

    let show_chart = if args.no_chart {
        false
    } else if args.yes {
        true
    } else {
        prompt_chart()
    };
    if show_chart {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let chart_path = output_dir.join(format!("book_prices_{}_{}.png", target, timestamp));
        report::render_chart(&listings, &chart_path)?;
    }

    Ok(())
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line).ok()?;
    Some(line.trim().to_string())
}

// Malformed input silently becomes the configured default.
fn prompt_limit(cfg: &Config) -> usize {
    let answer = read_line(&format!("How many books? (default {}): ", cfg.default_limit));
    match answer.as_deref().map(str::parse::<usize>) {
        Some(Ok(n)) if n > 0 => n,
        _ => cfg.default_limit,
    }
}

fn prompt_currency(cfg: &Config) -> String {
    let answer = read_line(&format!(
        "Target currency (default {}): ",
        cfg.default_target_currency
    ));
    match answer {
        Some(code) if !code.is_empty() => code.to_uppercase(),
        _ => cfg.default_target_currency.clone(),
    }
}

fn prompt_chart() -> bool {
    let answer = read_line("Generate price chart? [Y/n]: ");
    !matches!(answer.as_deref(), Some("n") | Some("N") | Some("no") | Some("NO"))
}
