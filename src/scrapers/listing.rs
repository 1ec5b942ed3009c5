use crate::error::ScrapeError;
use crate::scrapers::selectors::Selectors;
use crate::scrapers::traits::{
    poll, wait_for_change, wait_until, BrowserSession, ElementState, WaitFor,
};
use crate::scrapers::types::CrawlConfig;
use reqwest::Url;
use scraper::Html;
use tracing::{debug, info, warn};

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight)";
const PAGE_HEIGHT: &str = "document.body.scrollHeight";

/// Collects detail-page links from a lazily loaded search results page
pub struct ListingDiscovery<'a, S: BrowserSession> {
    session: &'a S,
    selectors: &'a Selectors,
    config: &'a CrawlConfig,
}

impl<'a, S: BrowserSession> ListingDiscovery<'a, S> {
    pub fn new(session: &'a S, selectors: &'a Selectors, config: &'a CrawlConfig) -> Self {
        Self {
            session,
            selectors,
            config,
        }
    }

    /// Opens `search_url`, loads every result and returns the result card
    /// links in document order. An empty list is a valid outcome.
    pub fn discover(&self, search_url: &Url) -> Result<Vec<String>, ScrapeError> {
        info!("Opening search results: {}", search_url);
        self.session.navigate(search_url.as_str())?;

        let height = self.scroll_until_stable()?;
        debug!("Results page scrolled to height {}", height);
        self.expand_load_more()?;

        let html = self.session.snapshot()?;
        let urls = self.card_links(&html, search_url);
        info!("Found {} result cards", urls.len());
        Ok(urls)
    }

    /// Scrolls to the bottom until the page stops growing for a whole wait
    /// window. Returns the settled height.
    fn scroll_until_stable(&self) -> Result<u64, ScrapeError> {
        self.session.execute_script(SCROLL_TO_BOTTOM)?;
        let mut height = self.page_height()?;

        for round in 1..=self.config.max_scroll_rounds {
            let grown = poll(self.config, || {
                let current = self.page_height()?;
                Ok((current > height).then_some(current))
            })?;
            let Some(new_height) = grown else {
                debug!("Page height settled at {} after {} rounds", height, round - 1);
                return Ok(height);
            };

            debug!("Scroll round {}: height {} -> {}", round, height, new_height);
            height = new_height;
            self.session.execute_script(SCROLL_TO_BOTTOM)?;
        }

        warn!(
            "Page height still growing after {} scroll rounds, continuing",
            self.config.max_scroll_rounds
        );
        Ok(height)
    }

    fn page_height(&self) -> Result<u64, ScrapeError> {
        Ok(height_of(self.session.execute_script(PAGE_HEIGHT)?))
    }

    /// Clicks the "load more" control until it is gone, stays disabled, or a
    /// click stops adding results
    fn expand_load_more(&self) -> Result<(), ScrapeError> {
        let load_more = &self.selectors.load_more;
        let card_count = |html: &str| {
            let count = Html::parse_document(html)
                .select(&self.selectors.result_card_link)
                .count();
            Some(count.to_string())
        };

        for clicks in 0..self.config.max_load_more_clicks {
            if self.session.probe(load_more)? == ElementState::Absent {
                debug!("Load-more control gone after {} clicks", clicks);
                return Ok(());
            }
            if !wait_until(self.session, load_more, WaitFor::Clickable, self.config)? {
                debug!("Load-more control stayed disabled after {} clicks", clicks);
                return Ok(());
            }

            let before = card_count(&self.session.snapshot()?).unwrap_or_default();
            self.session.click(load_more)?;
            if !wait_for_change(self.session, &before, card_count, self.config)? {
                warn!(
                    "Load-more click {} added no results within {:?}, stopping",
                    clicks + 1,
                    self.config.wait_timeout
                );
                return Ok(());
            }
        }

        warn!(
            "Stopped clicking load-more after {} clicks",
            self.config.max_load_more_clicks
        );
        Ok(())
    }

    fn card_links(&self, html: &str, base: &Url) -> Vec<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.selectors.result_card_link)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .filter_map(|href| match base.join(href) {
                Ok(url) => Some(url.to_string()),
                Err(e) => {
                    warn!("Skipping unparsable link {:?}: {}", href, e);
                    None
                }
            })
            .collect()
    }
}

fn height_of(value: serde_json::Value) -> u64 {
    value
        .as_u64()
        .or_else(|| value.as_f64().map(|h| h as u64))
        .unwrap_or(0)
}
