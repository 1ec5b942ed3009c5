use crate::error::ScrapeError;
use crate::models::{Review, UserReview};
use crate::scrapers::parse::{
    parse_count, parse_nights, parse_year_month, parse_year_month_day, score_after,
};
use crate::scrapers::selectors::{user_type_for, Selectors};
use crate::scrapers::snapshot::{element_text, Lookup};
use crate::scrapers::traits::{
    wait_for_change, wait_until, BrowserSession, ElementState, WaitFor,
};
use crate::scrapers::types::CrawlConfig;
use scraper::{ElementRef, Html};
use tracing::{debug, info, warn};

/// Why pagination stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No review count on the page; the panel was never opened
    NoReviews,
    MaxPageReached,
    NoMorePages,
    /// The panel did not render as expected; whatever was collected is kept
    LayoutChanged,
}

/// Outcome of walking the review panel of one listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationReport {
    pub pages: usize,
    pub skipped_blocks: usize,
    pub stop: StopReason,
}

struct Pagination {
    reviews: Vec<Review>,
    pages: usize,
    skipped_blocks: usize,
    stop: StopReason,
}

/// Walks the review panel of the currently loaded detail page
pub struct ReviewPaginator<'a, S: BrowserSession> {
    session: &'a S,
    selectors: &'a Selectors,
    config: &'a CrawlConfig,
    max_page: Option<usize>,
}

impl<'a, S: BrowserSession> ReviewPaginator<'a, S> {
    pub fn new(
        session: &'a S,
        selectors: &'a Selectors,
        config: &'a CrawlConfig,
        max_page: Option<usize>,
    ) -> Self {
        Self {
            session,
            selectors,
            config,
            max_page,
        }
    }

    /// Reads the review count from `detail` and collects reviews into
    /// `user_review`. Never fails: layout problems end pagination early.
    /// A missing or zero count leaves the panel closed.
    pub fn collect(&self, detail: &Html, user_review: &mut UserReview) -> PaginationReport {
        let count = detail
            .find_text(&self.selectors.review_count)
            .as_deref()
            .and_then(parse_count)
            .unwrap_or(0);
        user_review.count = count;
        if count == 0 {
            debug!("No reviews on page, skipping review panel");
            return PaginationReport {
                pages: 0,
                skipped_blocks: 0,
                stop: StopReason::NoReviews,
            };
        }

        let mut pagination = Pagination {
            reviews: Vec::new(),
            pages: 0,
            skipped_blocks: 0,
            stop: StopReason::LayoutChanged,
        };
        if let Err(e) = self.paginate(&mut pagination) {
            warn!("Review panel failed after {} pages: {}", pagination.pages, e);
            pagination.stop = StopReason::LayoutChanged;
        }

        info!(
            "Collected {} of {} reviews over {} pages ({:?}, {} blocks skipped)",
            pagination.reviews.len(),
            count,
            pagination.pages,
            pagination.stop,
            pagination.skipped_blocks
        );
        user_review.extend_reviews(pagination.reviews);
        PaginationReport {
            pages: pagination.pages,
            skipped_blocks: pagination.skipped_blocks,
            stop: pagination.stop,
        }
    }

    fn paginate(&self, state: &mut Pagination) -> Result<(), ScrapeError> {
        let selectors = self.selectors;

        self.session.click(&selectors.reviews_tab)?;
        let list_locator = &selectors.review_list_locator;
        if !wait_until(self.session, list_locator, WaitFor::Present, self.config)? {
            return Err(ScrapeError::Timeout {
                what: list_locator.to_string(),
                after: self.config.wait_timeout,
            });
        }
        state.pages = 1;

        loop {
            let html = self.session.snapshot()?;
            let document = Html::parse_document(&html);
            let list = (&document)
                .find_first(&selectors.review_list)
                .ok_or(ScrapeError::missing("review list"))?;

            for block in list.find_all(&selectors.review_block) {
                match parse_review(block, selectors) {
                    Ok(review) => state.reviews.push(review),
                    Err(e) => {
                        warn!("Skipping review on page {}: {}", state.pages, e);
                        state.skipped_blocks += 1;
                    }
                }
            }

            if self.max_page.is_some_and(|max| state.pages >= max) {
                state.stop = StopReason::MaxPageReached;
                return Ok(());
            }
            if self.session.probe(&selectors.next_page)? != ElementState::Clickable {
                state.stop = StopReason::NoMorePages;
                return Ok(());
            }

            let before = self.list_fingerprint(&html).unwrap_or_default();
            self.session.click(&selectors.next_page)?;
            let fingerprint = |html: &str| self.list_fingerprint(html);
            if !wait_for_change(self.session, &before, fingerprint, self.config)? {
                return Err(ScrapeError::Timeout {
                    what: format!("review page {}", state.pages + 1),
                    after: self.config.wait_timeout,
                });
            }
            state.pages += 1;
        }
    }

    /// Markup of the review list, `None` while it is not rendered
    fn list_fingerprint(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let list = (&document).find_first(&self.selectors.review_list);
        list.map(|el| el.html())
    }
}

/// Extracts one review block. Missing name, room or title, or a malformed
/// date or score, rejects the block.
pub fn parse_review(block: ElementRef<'_>, selectors: &Selectors) -> Result<Review, ScrapeError> {
    let user_name = block
        .find_text(&selectors.reviewer_name)
        .ok_or(ScrapeError::missing("user_name"))?;
    let room_name = block
        .find_text(&selectors.room_name)
        .ok_or(ScrapeError::missing("room_name"))?;
    let nights = block
        .find_text(&selectors.stay_nights)
        .ok_or(ScrapeError::missing("num_stay_night"))?;
    let stay_date = block
        .find_text(&selectors.stay_date)
        .ok_or(ScrapeError::missing("stay_date"))?;
    let review_date = block
        .find_text(&selectors.review_date)
        .ok_or(ScrapeError::missing("review_date"))?;
    let title = block
        .find_text(&selectors.review_title)
        .ok_or(ScrapeError::missing("title"))?;
    let score = block
        .find_first(&selectors.review_score)
        .and_then(element_text)
        .ok_or(ScrapeError::missing("rating"))?;

    Ok(Review {
        user_name,
        user_type: block
            .find_text(&selectors.user_type)
            .map(|label| user_type_for(&label))
            .unwrap_or_default(),
        country: block.find_text(&selectors.reviewer_country),
        room_name,
        num_stay_night: parse_nights(&nights)?,
        stay_date: parse_year_month(&stay_date)?,
        review_date: parse_year_month_day(&review_date)?,
        title,
        positive_description: block.find_text(&selectors.positive_text),
        negative_description: block.find_text(&selectors.negative_text),
        rating: score_after(&score, &selectors.review_score_separator)?,
    })
}
