use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::time::sleep;

use crate::catalogue::PageReader;
use crate::models::Listing;

/// Walk the catalogue from page 1 until `limit` listings are collected,
/// the catalogue reports no next page, or `max_pages` pages have been
/// consulted. A failed page read counts as exhaustion, so the result may
/// hold fewer than `limit` listings.
pub async fn collect_listings<R: PageReader>(
    reader: &R,
    limit: usize,
    max_pages: usize,
    delay: Duration,
) -> Vec<Listing> {
    let mut collected: Vec<Listing> = Vec::new();
    if limit == 0 || max_pages == 0 {
        return collected;
    }

    let progress = ProgressBar::new(max_pages as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    for page in 1..=max_pages {
        // Politeness delay between consecutive fetches only
        if page > 1 {
            sleep(delay).await;
        }

        progress.set_message(format!("Fetching catalogue page {}...", page));
        let (listings, has_next) = reader.read_page(page).await;
        progress.inc(1);

        if listings.is_empty() {
            break;
        }

        let remaining = limit - collected.len();
        collected.extend(listings.into_iter().take(remaining));

        if collected.len() >= limit || !has_next {
            break;
        }
    }

    progress.finish_and_clear();
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::PageReader;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted reader: `pages[i]` is the item count for page i+1; the last
    /// scripted page reports no next page.
    struct ScriptedReader {
        pages: Vec<usize>,
        reads: AtomicUsize,
    }

    impl ScriptedReader {
        fn new(pages: Vec<usize>) -> Self {
            Self {
                pages,
                reads: AtomicUsize::new(0),
            }
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageReader for ScriptedReader {
        async fn read_page(&self, page: usize) -> (Vec<Listing>, bool) {
            self.reads.fetch_add(1, Ordering::SeqCst);
            match self.pages.get(page - 1) {
                Some(&count) if count > 0 => {
                    let listings = (0..count)
                        .map(|i| {
                            Listing::new(
                                format!("Book {}-{}", page, i),
                                10.0 + i as f64,
                                "GBP".to_string(),
                                None,
                            )
                        })
                        .collect();
                    (listings, page < self.pages.len())
                }
                _ => (Vec::new(), false),
            }
        }
    }

    fn no_delay() -> Duration {
        Duration::from_millis(0)
    }

    #[tokio::test]
    async fn test_collect_truncates_final_page_contribution() {
        // 4 items on each of 3 pages, nothing after page 3
        let reader = ScriptedReader::new(vec![4, 4, 4]);
        let collected = collect_listings(&reader, 10, 5, no_delay()).await;

        assert_eq!(collected.len(), 10);
        assert_eq!(reader.reads(), 3);
        // 4 + 4 + 2: the last page contributes only up to the limit
        assert_eq!(collected[8].title, "Book 3-0");
        assert_eq!(collected[9].title, "Book 3-1");
    }

    #[tokio::test]
    async fn test_collect_stops_when_catalogue_exhausted() {
        let reader = ScriptedReader::new(vec![3, 2]);
        let collected = collect_listings(&reader, 10, 5, no_delay()).await;

        assert_eq!(collected.len(), 5);
        assert_eq!(reader.reads(), 2);
    }

    #[tokio::test]
    async fn test_collect_respects_max_pages() {
        let reader = ScriptedReader::new(vec![2, 2, 2, 2, 2, 2]);
        let collected = collect_listings(&reader, 100, 3, no_delay()).await;

        assert_eq!(collected.len(), 6);
        assert_eq!(reader.reads(), 3);
    }

    #[tokio::test]
    async fn test_collect_never_exceeds_limit() {
        for limit in [0usize, 1, 3, 7, 12, 50] {
            let reader = ScriptedReader::new(vec![4, 4, 4]);
            let collected = collect_listings(&reader, limit, 5, no_delay()).await;
            assert!(collected.len() <= limit);
            assert_eq!(collected.len(), limit.min(12));
        }
    }

    #[tokio::test]
    async fn test_collect_read_failure_returns_partial_batch() {
        // Page 2 yields nothing (the reader absorbed a fetch error)
        let reader = ScriptedReader::new(vec![4, 0, 4]);
        let collected = collect_listings(&reader, 10, 5, no_delay()).await;

        assert_eq!(collected.len(), 4);
        assert_eq!(reader.reads(), 2);
    }

    #[tokio::test]
    async fn test_collect_stops_at_exact_limit_without_extra_read() {
        let reader = ScriptedReader::new(vec![4, 4, 4]);
        let collected = collect_listings(&reader, 4, 5, no_delay()).await;

        assert_eq!(collected.len(), 4);
        assert_eq!(reader.reads(), 1);
    }
}
