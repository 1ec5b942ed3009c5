use crate::error::ScrapeError;
use crate::models::BookingData;
use crate::scrapers::detail::extract_detail;
use crate::scrapers::listing::ListingDiscovery;
use crate::scrapers::reviews::ReviewPaginator;
use crate::scrapers::selectors::Selectors;
use crate::scrapers::traits::BrowserSession;
use crate::scrapers::types::{CrawlConfig, CrawlLimits, SearchQuery};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// A listing that was left out of the dataset
#[derive(Debug, Clone)]
pub struct SkippedItem {
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct CrawlReport {
    pub discovered: usize,
    pub records: Vec<BookingData>,
    pub skipped: Vec<SkippedItem>,
    /// Stopped early on user request
    pub interrupted: bool,
}

/// Drives a whole crawl through one browser session, one listing at a time
pub struct CrawlOrchestrator<'a, S: BrowserSession> {
    session: &'a S,
    selectors: &'a Selectors,
    config: &'a CrawlConfig,
}

impl<'a, S: BrowserSession> CrawlOrchestrator<'a, S> {
    pub fn new(session: &'a S, selectors: &'a Selectors, config: &'a CrawlConfig) -> Self {
        Self {
            session,
            selectors,
            config,
        }
    }

    /// Discovers listings for `query` and extracts up to `max_item` of them.
    ///
    /// A failing listing is logged and skipped. `cancel` is only checked
    /// between listings, so every returned record is complete.
    pub fn run(
        &self,
        query: &SearchQuery,
        limits: CrawlLimits,
        cancel: &AtomicBool,
    ) -> Result<CrawlReport, ScrapeError> {
        let search_url = query.search_url()?;
        let urls = ListingDiscovery::new(self.session, self.selectors, self.config)
            .discover(&search_url)?;

        let mut report = CrawlReport {
            discovered: urls.len(),
            ..Default::default()
        };
        if urls.is_empty() {
            warn!("Search returned zero items to crawl");
            return Ok(report);
        }

        let total = limits.max_item.map_or(urls.len(), |max| max.min(urls.len()));
        for (idx, url) in urls.into_iter().take(total).enumerate() {
            if cancel.load(Ordering::SeqCst) {
                info!("Interrupted, stopping before item {}/{}", idx + 1, total);
                report.interrupted = true;
                break;
            }

            info!("[{}/{}] {}", idx + 1, total, url);
            match self.crawl_item(&url, limits.max_page) {
                Ok(data) => report.records.push(data),
                Err(e) => {
                    warn!("Skipping {}: {}", url, e);
                    report.skipped.push(SkippedItem {
                        url,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Crawl finished: {} records, {} skipped, {} discovered",
            report.records.len(),
            report.skipped.len(),
            report.discovered
        );
        Ok(report)
    }

    fn crawl_item(&self, url: &str, max_page: Option<usize>) -> Result<BookingData, ScrapeError> {
        let (mut data, document) = extract_detail(self.session, url, self.selectors, self.config)?;
        let pagination = ReviewPaginator::new(self.session, self.selectors, self.config, max_page)
            .collect(&document, &mut data.user_review);
        debug!(
            "{}: {} review pages, stopped by {:?}",
            data.name, pagination.pages, pagination.stop
        );
        if pagination.skipped_blocks > 0 {
            warn!("{}: dropped {} unreadable reviews", data.name, pagination.skipped_blocks);
        }
        Ok(data)
    }
}
