use crate::error::ScrapeError;
use chrono::NaiveDate;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SEARCH_ENDPOINT: &str = "https://www.booking.com/searchresults.zh-tw.html";

/// Search parameters for a crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Destination or property keyword
    pub search: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub num_adults: u32,
    pub num_children: u32,
    pub num_rooms: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            check_in: None,
            check_out: None,
            num_adults: 2,
            num_children: 0,
            num_rooms: 1,
        }
    }
}

impl SearchQuery {
    /// Checks the stay dates against `today`: both or neither, none in the
    /// past, and check-out strictly after check-in.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ScrapeError> {
        if self.search.trim().is_empty() {
            return Err(ScrapeError::InvalidQuery("search keyword is empty".into()));
        }

        match (self.check_in, self.check_out) {
            (None, None) => Ok(()),
            (Some(check_in), Some(check_out)) => {
                if check_in < today {
                    return Err(ScrapeError::InvalidQuery(format!(
                        "check-in {check_in} is in the past"
                    )));
                }
                if check_out <= check_in {
                    return Err(ScrapeError::InvalidQuery(format!(
                        "check-out {check_out} must be after check-in {check_in}"
                    )));
                }
                Ok(())
            }
            _ => Err(ScrapeError::InvalidQuery(
                "check-in and check-out must be given together".into(),
            )),
        }
    }

    /// Builds the search results URL for this query
    pub fn search_url(&self) -> Result<Url, ScrapeError> {
        let mut params = vec![("ss", self.search.clone())];
        if let Some(check_in) = self.check_in {
            params.push(("checkin", check_in.format("%Y-%m-%d").to_string()));
        }
        if let Some(check_out) = self.check_out {
            params.push(("checkout", check_out.format("%Y-%m-%d").to_string()));
        }
        params.push(("group_adults", self.num_adults.to_string()));
        params.push(("no_rooms", self.num_rooms.to_string()));
        params.push(("group_children", self.num_children.to_string()));

        Url::parse_with_params(SEARCH_ENDPOINT, &params)
            .map_err(|e| ScrapeError::Url(e.to_string()))
    }
}

/// Upper bounds on how much a crawl visits. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrawlLimits {
    pub max_item: Option<usize>,
    pub max_page: Option<usize>,
}

/// Wait and loop bounds for driving the browser
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// How long a single wait-until-condition may poll
    pub wait_timeout: Duration,
    /// Delay between two polls of a condition
    pub poll_interval: Duration,
    pub max_scroll_rounds: usize,
    pub max_load_more_clicks: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_secs(20),
            poll_interval: Duration::from_millis(250),
            max_scroll_rounds: 50,
            max_load_more_clicks: 50,
        }
    }
}
