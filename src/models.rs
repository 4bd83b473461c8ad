use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One catalogue entry. The reader fills the identity fields; the
/// derived fields stay `None` until the batch is normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub source_price: f64,
    pub source_currency: String,
    pub source_url: Option<String>,
    pub usd_price: Option<f64>,
    pub converted_price: Option<f64>,
    pub target_currency: Option<String>,
    pub conversion_rate: Option<f64>,
    pub conversion_timestamp: Option<String>,
}

impl Listing {
    pub fn new(
        title: String,
        source_price: f64,
        source_currency: String,
        source_url: Option<String>,
    ) -> Self {
        Self {
            title,
            source_price,
            source_currency,
            source_url,
            usd_price: None,
            converted_price: None,
            target_currency: None,
            conversion_rate: None,
            conversion_timestamp: None,
        }
    }
}

/// USD-based rate table as returned by the FX endpoint. Fetched once
/// per run, never persisted.
#[derive(Debug, Deserialize)]
pub struct RateTable {
    pub rates: HashMap<String, f64>,
}
