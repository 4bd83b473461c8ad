use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

use crate::models::Listing;

/// Narrow fetch capability so the catalogue source can be swapped for a
/// fixture in tests without touching collection logic.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        response.text().await.context("Failed to get response text")
    }
}

/// Contract the collector drives: one page in, partial listings plus a
/// has-next flag out.
#[async_trait]
pub trait PageReader {
    async fn read_page(&self, page: usize) -> (Vec<Listing>, bool);
}

pub struct CatalogueReader<S> {
    source: S,
    base_url: String,
    source_currency: String,
}

impl<S: DocumentSource> CatalogueReader<S> {
    pub fn new(source: S, base_url: String, source_currency: String) -> Self {
        Self {
            source,
            base_url,
            source_currency,
        }
    }

    fn page_url(&self, page: usize) -> String {
        format!("{}/catalogue/page-{}.html", self.base_url, page)
    }

    fn parse_listing_page(&self, html: &str) -> (Vec<Listing>, bool) {
        let document = Html::parse_document(html);

        let product_sel = match Selector::parse("article.product_pod") {
            Ok(s) => s,
            Err(_) => return (Vec::new(), false),
        };
        let link_sel = match Selector::parse("h3 a") {
            Ok(s) => s,
            Err(_) => return (Vec::new(), false),
        };
        let price_sel = match Selector::parse("p.price_color") {
            Ok(s) => s,
            Err(_) => return (Vec::new(), false),
        };

        let mut listings = Vec::new();
        for block in document.select(&product_sel) {
            let anchor = match block.select(&link_sel).next() {
                Some(a) => a,
                None => continue,
            };
            let title = match anchor.value().attr("title") {
                Some(t) if !t.is_empty() => t.to_string(),
                _ => continue,
            };

            let price_text = block
                .select(&price_sel)
                .next()
                .map(|el| el.text().collect::<String>())
                .unwrap_or_default();
            let price = match parse_price(&price_text) {
                Some(p) => p,
                None => {
                    eprintln!(
                        "⚠️  Skipping '{}': unreadable price '{}'",
                        title,
                        price_text.trim()
                    );
                    continue;
                }
            };

            let source_url = anchor
                .value()
                .attr("href")
                .map(|href| absolutize(href, &self.base_url));

            listings.push(Listing::new(
                title,
                price,
                self.source_currency.clone(),
                source_url,
            ));
        }

        let has_next = Selector::parse("li.next a")
            .map(|sel| document.select(&sel).next().is_some())
            .unwrap_or(false);

        (listings, has_next)
    }
}

#[async_trait]
impl<S: DocumentSource> PageReader for CatalogueReader<S> {
    /// A fetch failure or a page with no products both signal end-of-data;
    /// the caller decides whether that is fatal.
    async fn read_page(&self, page: usize) -> (Vec<Listing>, bool) {
        let url = self.page_url(page);
        let html = match self.source.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                eprintln!("⚠️  Failed to fetch page {}: {}", page, e);
                return (Vec::new(), false);
            }
        };

        let (listings, has_next) = self.parse_listing_page(&html);
        if listings.is_empty() {
            return (Vec::new(), false);
        }
        (listings, has_next)
    }
}

/// Strip the currency glyph prefix (also its mojibake form) and parse the
/// remainder as a positive price.
fn parse_price(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_start_matches(|c: char| !c.is_ascii_digit());
    let price: f64 = cleaned.parse().ok()?;
    if price > 0.0 {
        Some(price)
    } else {
        None
    }
}

/// Rewrite the two known relative href shapes against the catalogue base;
/// anything else is passed through untouched.
fn absolutize(href: &str, base_url: &str) -> String {
    if let Some(rest) = href.strip_prefix("../../../") {
        format!("{}/catalogue/{}", base_url, rest)
    } else if let Some(rest) = href.strip_prefix("catalogue/") {
        format!("{}/catalogue/{}", base_url, rest)
    } else {
        href.to_string()
    }
}
