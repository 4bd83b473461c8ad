use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub catalogue_base_url: String,
    pub fx_url: String,
    pub source_currency: String,
    pub source_currency_symbol: String,
    pub gbp_to_usd_rate: f64,
    pub fallback_rate: f64,
    pub default_target_currency: String,
    pub default_limit: usize,
    pub max_pages: usize,
    pub page_delay_ms: u64,
    pub http_timeout_secs: u64,
    pub output_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalogue_base_url: "https://books.toscrape.com".to_string(),
            fx_url: "https://api.exchangerate-api.com/v4/latest/USD".to_string(),
            source_currency: "GBP".to_string(),
            source_currency_symbol: "£".to_string(),
            // 1 GBP = 1.35 USD (live quote was 0.741 the other way)
            gbp_to_usd_rate: 1.0 / 0.741,
            fallback_rate: 129.28,
            default_target_currency: "KES".to_string(),
            default_limit: 10,
            max_pages: 5,
            page_delay_ms: 500,
            http_timeout_secs: 10,
            output_dir: "output".to_string(),
        }
    }
}

fn get_config_path() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("config.toml");
    path
}

pub fn load_config() -> anyhow::Result<Config> {
    let config_path = get_config_path();
    let config_str = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
