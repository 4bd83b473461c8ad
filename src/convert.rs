// SPDX-FileCopyrightText: 2025 Joost van der Laan
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::Local;

use crate::config::Config;
use crate::fx::FxClient;
use crate::models::Listing;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Fill the derived price fields on every listing. Pure function of the
/// inputs: the same prices and rates always produce the same batch.
pub fn convert_batch(
    mut listings: Vec<Listing>,
    target: &str,
    usd_to_target: f64,
    gbp_to_usd: f64,
    timestamp: String,
) -> Vec<Listing> {
    let composite_rate = round4(gbp_to_usd * usd_to_target);

    for listing in &mut listings {
        let usd = round2(listing.source_price * gbp_to_usd);
        listing.usd_price = Some(usd);
        listing.converted_price = Some(round2(usd * usd_to_target));
        listing.target_currency = Some(target.to_string());
        listing.conversion_rate = Some(composite_rate);
        listing.conversion_timestamp = Some(timestamp.clone());
    }

    listings
}

/// Normalize a collected batch into the target currency. The rate table is
/// consulted exactly once and one timestamp is shared across the batch.
pub async fn normalize(
    listings: Vec<Listing>,
    target: &str,
    fx: &FxClient,
    cfg: &Config,
) -> Vec<Listing> {
    let usd_to_target = fx.resolve(target).await;
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    convert_batch(listings, target, usd_to_target, cfg.gbp_to_usd_rate, timestamp)
}
