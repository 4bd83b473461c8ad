use anyhow::Result;
use chrono::Local;
use csv::Writer;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

use crate::models::Listing;

const EXPORT_HEADER: [&str; 9] = [
    "Title",
    "Price (GBP)",
    "Source Currency",
    "Price (USD)",
    "Converted Price",
    "Target Currency",
    "Conversion Rate",
    "Conversion Timestamp",
    "Detail URL",
];

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

/// Print the batch as an aligned console table. Formatting only, no
/// computation.
pub fn display_table(listings: &[Listing], source_symbol: &str) {
    println!();
    println!(
        "{:<46} {:>14} {:>18}",
        "Title", "Original Price", "Converted Price"
    );
    println!("{}", "-".repeat(80));

    for listing in listings {
        let original = format!("{}{:.2}", source_symbol, listing.source_price);
        let converted = match (listing.converted_price, &listing.target_currency) {
            (Some(price), Some(code)) => format!("{:.2} {}", price, code),
            _ => String::new(),
        };
        println!(
            "{:<46} {:>14} {:>18}",
            truncate(&listing.title, 46),
            original,
            converted
        );
    }
    println!();
}

/// Write the batch to a timestamped CSV under `output_dir` with a fixed
/// column order. Fields that were never populated become empty cells.
pub fn export_csv(listings: &[Listing], output_dir: &Path, target: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let csv_path = output_dir.join(format!("book_prices_{}_{}.csv", target, timestamp));
    let mut writer = Writer::from_path(&csv_path)?;

    writer.write_record(EXPORT_HEADER)?;

    for listing in listings {
        writer.write_record(&[
            listing.title.clone(),
            format!("{:.2}", listing.source_price),
            listing.source_currency.clone(),
            fmt_opt(listing.usd_price),
            fmt_opt(listing.converted_price),
            listing.target_currency.clone().unwrap_or_default(),
            listing
                .conversion_rate
                .map(|r| format!("{:.4}", r))
                .unwrap_or_default(),
            listing.conversion_timestamp.clone().unwrap_or_default(),
            listing.source_url.clone().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    println!("✅ Saved to {}", csv_path.display());
    Ok(csv_path)
}

/// Render original and converted prices as grouped bars. The converted
/// series is scaled by max(converted)/max(original) so both fit one axis.
pub fn render_chart(listings: &[Listing], output_path: &Path) -> Result<()> {
    if listings.is_empty() {
        println!("📊 Nothing to chart, skipping");
        return Ok(());
    }

    let max_source = listings
        .iter()
        .map(|l| l.source_price)
        .fold(0.0_f64, f64::max);
    let max_converted = listings
        .iter()
        .filter_map(|l| l.converted_price)
        .fold(0.0_f64, f64::max);
    let scale = chart_scale(max_source, max_converted);

    let target_label = listings
        .first()
        .and_then(|l| l.target_currency.clone())
        .unwrap_or_else(|| "target".to_string());
    let titles: Vec<String> = listings.iter().map(|l| truncate(&l.title, 12)).collect();

    let root_area = BitMapBackend::new(output_path, (1200, 800)).into_drawing_area();
    root_area.fill(&WHITE)?;

    let y_range = 0.0..(max_source * 1.1);
    let mut chart = ChartBuilder::on(&root_area)
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 60)
        .caption("Original vs Converted Prices", ("sans-serif", 30))
        .build_cartesian_2d(0.0..listings.len() as f64, y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(listings.len())
        .x_label_formatter(&|x| {
            titles
                .get(*x as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_desc("Price")
        .draw()?;

    chart
        .draw_series(listings.iter().enumerate().map(|(i, listing)| {
            let x = i as f64;
            Rectangle::new(
                [(x + 0.1, 0.0), (x + 0.5, listing.source_price)],
                BLUE.mix(0.4).filled(),
            )
        }))?
        .label("GBP")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], BLUE.mix(0.4).filled()));

    chart
        .draw_series(listings.iter().enumerate().map(|(i, listing)| {
            let x = i as f64;
            let converted = listing.converted_price.unwrap_or(0.0);
            Rectangle::new(
                [(x + 0.5, 0.0), (x + 0.9, converted / scale)],
                RED.mix(0.4).filled(),
            )
        }))?
        .label(format!("{} (scaled)", target_label))
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], RED.mix(0.4).filled()));

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root_area.present()?;
    println!("✅ Chart generated: {}", output_path.display());
    Ok(())
}

/// Visual scale for the converted series; a degenerate all-zero source
/// axis falls back to 1 so the division stays defined.
fn chart_scale(max_source: f64, max_converted: f64) -> f64 {
    if max_source == 0.0 {
        1.0
    } else {
        max_converted / max_source
    }
}
