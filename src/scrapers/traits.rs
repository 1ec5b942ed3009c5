use crate::error::ScrapeError;
use crate::models::BookingData;
use crate::scrapers::types::CrawlConfig;
use anyhow::Result;
use async_trait::async_trait;
use std::thread;
use std::time::Instant;
use tracing::debug;

/// How an element on the live page is located
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    Id(String),
    /// Accessible label, matched against `aria-label`
    Label(String),
}

impl Locator {
    pub fn css(&self) -> String {
        match self {
            Locator::Css(css) => css.clone(),
            Locator::Id(id) => format!("[id=\"{}\"]", id.replace('"', "\\\"")),
            Locator::Label(label) => format!("[aria-label=\"{}\"]", label.replace('"', "\\\"")),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Css(css) => write!(f, "css `{css}`"),
            Locator::Id(id) => write!(f, "#{id}"),
            Locator::Label(label) => write!(f, "label `{label}`"),
        }
    }
}

/// What a probe found for a locator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    Absent,
    /// In the DOM but hidden or disabled
    Present,
    Clickable,
}

/// Condition a wait polls for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitFor {
    Present,
    Clickable,
}

impl WaitFor {
    fn satisfied_by(self, state: ElementState) -> bool {
        match self {
            WaitFor::Present => state != ElementState::Absent,
            WaitFor::Clickable => state == ElementState::Clickable,
        }
    }
}

/// Blocking browser capability the crawl is driven through.
///
/// Every call returns only once the browser acknowledged it; callers must
/// take a fresh `snapshot` after any call that mutates the page.
pub trait BrowserSession {
    /// Loads `url` and waits for the navigation to settle
    fn navigate(&self, url: &str) -> Result<()>;

    /// Evaluates a JavaScript expression and returns its value
    fn execute_script(&self, script: &str) -> Result<serde_json::Value>;

    fn probe(&self, locator: &Locator) -> Result<ElementState>;

    /// Scrolls the element into view and clicks it
    fn click(&self, locator: &Locator) -> Result<()>;

    /// Serialized HTML of the current document
    fn snapshot(&self) -> Result<String>;
}

/// Calls `check` every poll interval until it yields a value or the
/// configured timeout elapses
pub fn poll<T, F>(config: &CrawlConfig, mut check: F) -> Result<Option<T>, ScrapeError>
where
    F: FnMut() -> Result<Option<T>, ScrapeError>,
{
    let started = Instant::now();
    loop {
        if let Some(value) = check()? {
            return Ok(Some(value));
        }
        if started.elapsed() >= config.wait_timeout {
            return Ok(None);
        }
        thread::sleep(config.poll_interval);
    }
}

/// Polls `locator` until `condition` holds or the configured timeout elapses.
/// Returns whether the condition was met.
pub fn wait_until<S: BrowserSession + ?Sized>(
    session: &S,
    locator: &Locator,
    condition: WaitFor,
    config: &CrawlConfig,
) -> Result<bool, ScrapeError> {
    let met = poll(config, || {
        Ok(condition.satisfied_by(session.probe(locator)?).then_some(()))
    })?;
    if met.is_none() {
        debug!("Gave up waiting for {} to be {:?}", locator, condition);
    }
    Ok(met.is_some())
}

/// Polls the page until `fingerprint` of the current snapshot yields a value
/// other than `before`. A `None` fingerprint means the watched region is not
/// rendered yet and never counts as a change.
pub fn wait_for_change<S, F>(
    session: &S,
    before: &str,
    fingerprint: F,
    config: &CrawlConfig,
) -> Result<bool, ScrapeError>
where
    S: BrowserSession + ?Sized,
    F: Fn(&str) -> Option<String>,
{
    let changed = poll(config, || {
        let current = fingerprint(&session.snapshot()?);
        Ok(current.filter(|now| now != before))
    })?;
    Ok(changed.is_some())
}

/// Destination for the records of a finished or interrupted crawl
#[async_trait]
pub trait DatasetSink: Send + Sync {
    async fn persist(&self, records: &[BookingData]) -> Result<()>;

    /// Human readable name of the destination
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::testing::FakeSession;
    use std::time::Duration;

    const URL: &str = "https://www.booking.com/hotel/tw/inn.html";

    fn config() -> CrawlConfig {
        CrawlConfig {
            wait_timeout: Duration::from_secs(1),
            poll_interval: Duration::ZERO,
            ..Default::default()
        }
    }

    fn body_text(html: &str) -> Option<String> {
        let start = html.find("<p>")? + 3;
        let end = html.find("</p>")?;
        Some(html[start..end].to_string())
    }

    #[test]
    fn unrendered_region_is_not_a_change() {
        let session = FakeSession::new()
            .with_page(
                URL,
                vec![
                    "<html><body><div>loading</div></body></html>".to_string(),
                    "<html><body><p>old</p></body></html>".to_string(),
                    "<html><body><p>new</p></body></html>".to_string(),
                ],
            )
            .with_loading_state(URL, 0, 3)
            .with_loading_state(URL, 1, 1);
        session.navigate(URL).unwrap();

        assert!(wait_for_change(&session, "old", body_text, &config()).unwrap());
        assert_eq!(body_text(&session.snapshot().unwrap()).as_deref(), Some("new"));
    }

    #[test]
    fn wait_until_gives_up_after_timeout() {
        let session = FakeSession::new()
            .with_page(URL, vec!["<html><body><button disabled>go</button></body></html>".into()]);
        session.navigate(URL).unwrap();
        let config = CrawlConfig {
            wait_timeout: Duration::ZERO,
            ..config()
        };
        let button = Locator::Css("button".to_string());

        assert!(wait_until(&session, &button, WaitFor::Present, &config).unwrap());
        assert!(!wait_until(&session, &button, WaitFor::Clickable, &config).unwrap());
    }
}
