use crate::error::ScrapeError;
use crate::models::{BookingData, OverallRating, RatingType, Star, StarType};
use crate::scrapers::parse::{first_decimal, parse_score, split_subrating};
use crate::scrapers::selectors::{subrating_for, Selectors};
use crate::scrapers::snapshot::{element_text, leading_text, Lookup};
use crate::scrapers::traits::{wait_until, BrowserSession, WaitFor};
use crate::scrapers::types::CrawlConfig;
use scraper::Html;
use tracing::{debug, warn};

/// Loads a detail page and extracts its basic info, stars and scores.
///
/// Returns the parsed document as well so the review pre-check can read it
/// without another snapshot.
pub fn extract_detail<S: BrowserSession>(
    session: &S,
    url: &str,
    selectors: &Selectors,
    config: &CrawlConfig,
) -> Result<(BookingData, Html), ScrapeError> {
    session.navigate(url)?;

    if !wait_until(session, &selectors.detail_ready, WaitFor::Present, config)? {
        debug!("Hotel name did not render within {:?}", config.wait_timeout);
    }

    let document = Html::parse_document(&session.snapshot()?);
    let data = parse_detail(&document, selectors)?;
    Ok((data, document))
}

/// Extracts a `BookingData` from a detail page snapshot. Only name, address
/// and description are mandatory; the review section is left empty.
pub fn parse_detail(document: &Html, selectors: &Selectors) -> Result<BookingData, ScrapeError> {
    let doc = document;

    let name = doc.find_text(&selectors.name).ok_or(ScrapeError::missing("name"))?;
    let address = doc
        .find_first(&selectors.address)
        .and_then(leading_text)
        .ok_or(ScrapeError::missing("address"))?;
    let description = doc
        .find_text(&selectors.description)
        .ok_or(ScrapeError::missing("description"))?;

    let mut data = BookingData {
        name,
        address,
        slogan: doc.find_text(&selectors.slogan),
        description,
        star: parse_star(document, selectors),
        ..Default::default()
    };
    data.user_review.overall_rating = parse_overall_rating(document, selectors);

    Ok(data)
}

fn parse_star(document: &Html, selectors: &Selectors) -> Star {
    let Some(container) = document.find_first(&selectors.star_container) else {
        return Star::default();
    };

    let count = container.find_all(&selectors.star_icon).len();
    let kind = match container.find_attr(&selectors.star_marker, &selectors.star_marker_attr) {
        Some(marker) if marker == selectors.official_star_value => StarType::Official,
        _ => StarType::Booking,
    };
    Star::new(count, kind)
}

fn parse_overall_rating(document: &Html, selectors: &Selectors) -> OverallRating {
    let doc = document;
    let mut rating = OverallRating::default();

    if doc.find_first(&selectors.score_widget).is_some() {
        rating.kind = RatingType::Booking;
        rating.average = doc
            .find_attr(&selectors.score_widget, &selectors.score_attr)
            .and_then(|score| parse_score(&score).ok());

        for entry in doc.find_all(&selectors.subrating) {
            let Some(text) = element_text(entry) else {
                continue;
            };
            match split_subrating(&text) {
                Some((label, score)) => match subrating_for(&label) {
                    Some(field) => rating.set(field, score),
                    None => warn!("Ignoring unknown subrating label {:?}", label),
                },
                None => debug!("Unparsable subrating entry {:?}", text),
            }
        }
        return rating;
    }

    let external = doc.find_text(&selectors.external_score);
    if let Some(average) = external.as_deref().and_then(first_decimal) {
        rating.kind = RatingType::External;
        rating.average = Some(average);
    }
    rating
}
