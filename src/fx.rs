// SPDX-FileCopyrightText: 2025 Joost van der Laan
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use crate::config::Config;
use crate::models::RateTable;

pub struct FxClient {
    client: Client,
    url: String,
    fallback_rate: f64,
}

impl FxClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: cfg.fx_url.clone(),
            fallback_rate: cfg.fallback_rate,
        })
    }

    pub async fn fetch_rate_table(&self) -> Result<RateTable> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to send FX request")?;

        let status = response.status();
        let text = response.text().await.context("Failed to get response text")?;

        if !status.is_success() {
            anyhow::bail!("FX request failed: {} - {}", status, text);
        }

        let table: RateTable =
            serde_json::from_str(&text).context("Failed to parse FX response")?;
        Ok(table)
    }

    /// Resolve the USD→target multiplier. Never fails: an unknown code or
    /// any fetch/parse problem degrades to the configured fallback rate.
    pub async fn resolve(&self, target: &str) -> f64 {
        match self.fetch_rate_table().await {
            Ok(table) => table.rates.get(target).copied().unwrap_or(self.fallback_rate),
            Err(e) => {
                eprintln!("⚠️  FX fetch failed, using fallback: {}", e);
                self.fallback_rate
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[tokio::test]
    async fn test_resolve_falls_back_when_unreachable() -> Result<()> {
        let cfg = Config {
            fx_url: "http://127.0.0.1:9/latest/USD".to_string(),
            http_timeout_secs: 1,
            ..Config::default()
        };
        let fx = FxClient::new(&cfg)?;

        let rate = fx.resolve("XYZ").await;
        assert_relative_eq!(rate, cfg.fallback_rate, epsilon = 1e-9);

        Ok(())
    }

    #[test]
    fn test_rate_table_parses_fx_body() -> Result<()> {
        let body = r#"{"base":"USD","date":"2025-08-05","rates":{"KES":129.28,"EUR":0.92}}"#;
        let table: RateTable = serde_json::from_str(body)?;

        assert_relative_eq!(table.rates["KES"], 129.28, epsilon = 1e-9);
        assert_relative_eq!(table.rates["EUR"], 0.92, epsilon = 1e-9);
        assert!(table.rates.get("XYZ").is_none());

        Ok(())
    }
}
