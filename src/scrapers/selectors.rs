//! Page structure as configuration data.
//!
//! `SiteSelectors` holds the raw CSS selectors and labels for the zh-TW
//! Booking.com pages; any field can be overridden from a JSON file. `Selectors`
//! is the compiled form handed to the extractors.

use crate::error::ScrapeError;
use crate::models::{Subrating, UserType};
use crate::scrapers::traits::Locator;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Localized subrating labels
pub const SUBRATING_LABELS: &[(&str, Subrating)] = &[
    ("員工素質", Subrating::Staff),
    ("設施", Subrating::Facilities),
    ("清潔程度", Subrating::Cleanliness),
    ("舒適程度", Subrating::Comfort),
    ("性價比", Subrating::Value),
    ("住宿地點", Subrating::Location),
    ("免費 WiFi", Subrating::Wifi),
];

/// Localized traveller categories
pub const USER_TYPE_LABELS: &[(&str, UserType)] = &[
    ("團體", UserType::Group),
    ("家庭", UserType::Family),
    ("獨行旅客", UserType::Single),
    ("情侶", UserType::Couple),
];

pub fn subrating_for(label: &str) -> Option<Subrating> {
    SUBRATING_LABELS
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, field)| *field)
}

pub fn user_type_for(label: &str) -> UserType {
    USER_TYPE_LABELS
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, kind)| *kind)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    // search results
    pub result_card_link: String,
    pub load_more: String,

    // detail page
    pub name: String,
    pub address: String,
    pub slogan: String,
    pub description: String,
    pub star_container: String,
    pub star_icon: String,
    pub star_marker: String,
    pub star_marker_attr: String,
    pub official_star_value: String,
    pub score_widget: String,
    pub score_attr: String,
    pub subrating: String,
    pub external_score: String,

    // review panel
    pub review_count: String,
    pub reviews_tab_id: String,
    pub review_list: String,
    pub review_block: String,
    pub reviewer_name: String,
    pub reviewer_country: String,
    pub room_name: String,
    pub stay_nights: String,
    pub stay_date: String,
    pub user_type: String,
    pub review_date: String,
    pub review_title: String,
    pub positive_text: String,
    pub negative_text: String,
    pub review_score: String,
    pub review_score_separator: String,
    pub next_page_label: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            result_card_link: "a.a78ca197d0".into(),
            load_more: "button.a83ed08757.c21c56c305.bf0537ecb5".into(),

            name: "h2.pp-header__title".into(),
            address: "div.a53cbfa6de.f17adf7576".into(),
            slogan: "h3.e1eebb6a1e.b484330d89".into(),
            description: "p.a53cbfa6de.b3efd73f69".into(),
            star_container: "span.hp__hotel_ratings".into(),
            star_icon: "span.fcd9eec8fb.d31eda6efc.c25361c37f".into(),
            star_marker: "span.a455730030.d542f184f1".into(),
            star_marker_attr: "data-testid".into(),
            official_star_value: "rating_stars".into(),
            score_widget: "div#js--hp-gallery-scorecard".into(),
            score_attr: "data-review-score".into(),
            subrating: "div[data-testid=\"review-subscore\"]".into(),
            external_score: "div.a3b8729ab1.e6208ee469.cb2cbb3ccb".into(),

            review_count: "div[data-testid=\"review-score-link\"] div.abf093bdfe".into(),
            reviews_tab_id: "reviews-tab-trigger".into(),
            review_list: "div[data-testid=\"review-list-container\"]".into(),
            review_block: "div[data-testid=\"review-card\"]".into(),
            reviewer_name: "div[data-testid=\"review-avatar\"] div.a3332d346a".into(),
            reviewer_country: "div[data-testid=\"review-avatar\"] span.afac1f68d9".into(),
            room_name: "span[data-testid=\"review-room-name\"]".into(),
            stay_nights: "span[data-testid=\"review-num-nights\"]".into(),
            stay_date: "span[data-testid=\"review-stay-date\"]".into(),
            user_type: "span[data-testid=\"review-traveler-type\"]".into(),
            review_date: "span[data-testid=\"review-date\"]".into(),
            review_title: "h3[data-testid=\"review-title\"]".into(),
            positive_text: "div[data-testid=\"review-positive-text\"]".into(),
            negative_text: "div[data-testid=\"review-negative-text\"]".into(),
            review_score: "div[data-testid=\"review-score\"]".into(),
            review_score_separator: "評分".into(),
            next_page_label: "下一頁".into(),
        }
    }
}

impl SiteSelectors {
    /// Loads overrides from a JSON file; missing keys keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self, ScrapeError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn compile(&self) -> Result<Selectors, ScrapeError> {
        Ok(Selectors {
            result_card_link: parse(&self.result_card_link)?,
            load_more: Locator::Css(self.load_more.clone()),

            detail_ready: Locator::Css(self.name.clone()),
            name: parse(&self.name)?,
            address: parse(&self.address)?,
            slogan: parse(&self.slogan)?,
            description: parse(&self.description)?,
            star_container: parse(&self.star_container)?,
            star_icon: parse(&self.star_icon)?,
            star_marker: parse(&self.star_marker)?,
            star_marker_attr: self.star_marker_attr.clone(),
            official_star_value: self.official_star_value.clone(),
            score_widget: parse(&self.score_widget)?,
            score_attr: self.score_attr.clone(),
            subrating: parse(&self.subrating)?,
            external_score: parse(&self.external_score)?,

            review_count: parse(&self.review_count)?,
            reviews_tab: Locator::Id(self.reviews_tab_id.clone()),
            review_list_locator: Locator::Css(self.review_list.clone()),
            review_list: parse(&self.review_list)?,
            review_block: parse(&self.review_block)?,
            reviewer_name: parse(&self.reviewer_name)?,
            reviewer_country: parse(&self.reviewer_country)?,
            room_name: parse(&self.room_name)?,
            stay_nights: parse(&self.stay_nights)?,
            stay_date: parse(&self.stay_date)?,
            user_type: parse(&self.user_type)?,
            review_date: parse(&self.review_date)?,
            review_title: parse(&self.review_title)?,
            positive_text: parse(&self.positive_text)?,
            negative_text: parse(&self.negative_text)?,
            review_score: parse(&self.review_score)?,
            review_score_separator: self.review_score_separator.clone(),
            next_page: Locator::Label(self.next_page_label.clone()),
        })
    }
}

fn parse(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::InvalidSelector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Compiled selectors and live-page locators
#[derive(Debug, Clone)]
pub struct Selectors {
    pub result_card_link: Selector,
    pub load_more: Locator,

    pub detail_ready: Locator,
    pub name: Selector,
    pub address: Selector,
    pub slogan: Selector,
    pub description: Selector,
    pub star_container: Selector,
    pub star_icon: Selector,
    pub star_marker: Selector,
    pub star_marker_attr: String,
    pub official_star_value: String,
    pub score_widget: Selector,
    pub score_attr: String,
    pub subrating: Selector,
    pub external_score: Selector,

    pub review_count: Selector,
    pub reviews_tab: Locator,
    pub review_list_locator: Locator,
    pub review_list: Selector,
    pub review_block: Selector,
    pub reviewer_name: Selector,
    pub reviewer_country: Selector,
    pub room_name: Selector,
    pub stay_nights: Selector,
    pub stay_date: Selector,
    pub user_type: Selector,
    pub review_date: Selector,
    pub review_title: Selector,
    pub positive_text: Selector,
    pub negative_text: Selector,
    pub review_score: Selector,
    pub review_score_separator: String,
    pub next_page: Locator,
}

#[cfg(test)]
impl Selectors {
    /// Compiled built-in selector set
    pub fn booking() -> Result<Self, ScrapeError> {
        SiteSelectors::default().compile()
    }
}
