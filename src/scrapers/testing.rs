//! Scripted browser session for exercising the crawl without Chrome.

use crate::scrapers::traits::{BrowserSession, ElementState, Locator};
use anyhow::{anyhow, bail, Result};
use scraper::{Html, Selector};
use serde_json::json;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

/// Serves a fixed list of HTML states per URL. Every successful click moves
/// the current page to its next state; a loading state moves on by itself
/// after it has been read a set number of times.
#[derive(Default)]
pub struct FakeSession {
    pages: HashMap<String, Vec<String>>,
    loading: HashMap<(String, usize), usize>,
    current: RefCell<Option<(String, usize)>>,
    reads: RefCell<usize>,
    heights: RefCell<VecDeque<u64>>,
    clicks: RefCell<Vec<Locator>>,
    visits: RefCell<Vec<String>>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, states: Vec<String>) -> Self {
        self.pages.insert(url.to_string(), states);
        self
    }

    /// Marks state `state` of `url` as transient: it is served for `reads`
    /// probes or snapshots, then the page moves to the next state
    pub fn with_loading_state(mut self, url: &str, state: usize, reads: usize) -> Self {
        self.loading.insert((url.to_string(), state), reads);
        self
    }

    /// Successive values returned for page-height scripts; the last one repeats
    pub fn with_heights(self, heights: Vec<u64>) -> Self {
        *self.heights.borrow_mut() = heights.into();
        self
    }

    pub fn clicks(&self) -> Vec<Locator> {
        self.clicks.borrow().clone()
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }

    fn current_html(&self) -> Result<String> {
        let mut current = self.current.borrow_mut();
        let (url, state) = current.as_mut().ok_or_else(|| anyhow!("no page loaded"))?;
        let html = self.pages[url.as_str()][*state].clone();

        if let Some(&limit) = self.loading.get(&(url.clone(), *state)) {
            let mut reads = self.reads.borrow_mut();
            *reads += 1;
            if *reads >= limit {
                *reads = 0;
                *state = (*state + 1).min(self.pages[url.as_str()].len() - 1);
            }
        }
        Ok(html)
    }
}

impl BrowserSession for FakeSession {
    fn navigate(&self, url: &str) -> Result<()> {
        self.visits.borrow_mut().push(url.to_string());
        if !self.pages.contains_key(url) {
            bail!("net::ERR_NAME_NOT_RESOLVED at {url}");
        }
        *self.current.borrow_mut() = Some((url.to_string(), 0));
        *self.reads.borrow_mut() = 0;
        Ok(())
    }

    fn execute_script(&self, script: &str) -> Result<serde_json::Value> {
        if script.starts_with("window.scrollTo") {
            return Ok(serde_json::Value::Null);
        }
        let mut heights = self.heights.borrow_mut();
        let height = if heights.len() > 1 {
            heights.pop_front()
        } else {
            heights.front().copied()
        };
        Ok(json!(height.unwrap_or(0)))
    }

    fn probe(&self, locator: &Locator) -> Result<ElementState> {
        let html = Html::parse_document(&self.current_html()?);
        let selector = Selector::parse(&locator.css()).map_err(|e| anyhow!("{e}"))?;
        let state = match html.select(&selector).next() {
            None => ElementState::Absent,
            Some(el)
                if el.value().attr("disabled").is_some()
                    || el.value().attr("aria-disabled") == Some("true") =>
            {
                ElementState::Present
            }
            Some(_) => ElementState::Clickable,
        };
        Ok(state)
    }

    fn click(&self, locator: &Locator) -> Result<()> {
        if self.probe(locator)? != ElementState::Clickable {
            bail!("{locator} is not clickable");
        }
        self.clicks.borrow_mut().push(locator.clone());

        let mut current = self.current.borrow_mut();
        if let Some((url, state)) = current.as_mut() {
            let last = self.pages[url.as_str()].len() - 1;
            *state = (*state + 1).min(last);
        }
        *self.reads.borrow_mut() = 0;
        Ok(())
    }

    fn snapshot(&self) -> Result<String> {
        self.current_html()
    }
}

/// HTML builders shaped like the zh-TW detail page
pub mod fixtures {
    pub const STARS_OFFICIAL: &str = r#"<span class="hp__hotel_ratings">
        <span class="a455730030 d542f184f1" data-testid="rating_stars">
            <span class="fcd9eec8fb d31eda6efc c25361c37f"></span>
            <span class="fcd9eec8fb d31eda6efc c25361c37f"></span>
            <span class="fcd9eec8fb d31eda6efc c25361c37f"></span>
            <span class="fcd9eec8fb d31eda6efc c25361c37f"></span>
        </span></span>"#;

    pub const SCORECARD: &str = r#"<div id="js--hp-gallery-scorecard" data-review-score="8.6"></div>
        <div data-testid="review-subscore"><span>員工素質</span> <span>8.5</span></div>
        <div data-testid="review-subscore"><span>設施</span> <span>8.1</span></div>
        <div data-testid="review-subscore"><span>清潔程度</span> <span>8.9</span></div>
        <div data-testid="review-subscore"><span>舒適程度</span> <span>8.7</span></div>
        <div data-testid="review-subscore"><span>性價比</span> <span>8.0</span></div>
        <div data-testid="review-subscore"><span>住宿地點</span> <span>9.4</span></div>
        <div data-testid="review-subscore"><span>免費 WiFi</span> <span>7.9</span></div>"#;

    /// Detail page body; `extra` is inserted verbatim before the review panel
    pub fn detail_page(name: &str, extra: &str, review_count: Option<&str>, panel: &str) -> String {
        let count = review_count
            .map(|text| {
                format!(
                    r#"<div data-testid="review-score-link"><div class="abf093bdfe">{text}</div></div>"#
                )
            })
            .unwrap_or_default();
        format!(
            r#"<html><body>
            <h2 class="pp-header__title">{name}</h2>
            <div class="a53cbfa6de f17adf7576">台北市中正區忠孝西路一段 100 號<div>絕佳位置</div></div>
            <h3 class="e1eebb6a1e b484330d89">車站旁的舒適住宿</h3>
            <p class="a53cbfa6de b3efd73f69">步行即可抵達台北車站。</p>
            {extra}
            {count}
            <button id="reviews-tab-trigger">評語</button>
            {panel}
            </body></html>"#
        )
    }

    pub fn review_card(user: &str, rating: &str) -> String {
        format!(
            r#"<div data-testid="review-card">
                <div data-testid="review-avatar"><div class="a3332d346a">{user}</div><span class="afac1f68d9">台灣</span></div>
                <span data-testid="review-room-name">標準雙人房</span>
                <span data-testid="review-num-nights">2 晚</span>
                <span data-testid="review-stay-date">2023 年 5 月</span>
                <span data-testid="review-traveler-type">情侶</span>
                <span data-testid="review-date">評語日期：2023 年 5 月 9 日</span>
                <h3 data-testid="review-title">很棒的住宿</h3>
                <div data-testid="review-positive-text">早餐好吃</div>
                <div data-testid="review-score">獲得評分 {rating}</div>
            </div>"#
        )
    }

    /// Review list container with a "next page" control
    pub fn review_panel(cards: &[String], next_enabled: bool) -> String {
        let disabled = if next_enabled { "" } else { " disabled" };
        format!(
            r#"<div data-testid="review-list-container">{}</div>
            <button aria-label="下一頁"{disabled}>›</button>"#,
            cards.concat()
        )
    }
}
