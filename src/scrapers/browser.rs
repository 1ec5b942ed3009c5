use crate::scrapers::traits::{BrowserSession, ElementState, Locator};
use anyhow::{bail, Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Called with a CSS selector; reports whether the matched element exists and,
/// if so, whether it is visible and enabled.
const PROBE_FN: &str = r#"
    ((selector) => {
        const el = document.querySelector(selector);
        if (!el) return "absent";
        const rect = el.getBoundingClientRect();
        const visible = !!(el.offsetParent || rect.width || rect.height);
        const enabled = !el.disabled && el.getAttribute("aria-disabled") !== "true";
        return visible && enabled ? "clickable" : "present";
    })
"#;

/// `BrowserSession` backed by a single headless Chrome tab
pub struct ChromeSession {
    // Keeps the Chrome process alive for as long as the tab is used
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    /// Launches Chrome and opens the tab the whole crawl runs in
    pub fn launch(headless: bool, timeout: Duration) -> Result<Self> {
        info!("Launching {} Chrome...", if headless { "headless" } else { "visible" });

        let options = LaunchOptions::default_builder()
            .headless(headless)
            .window_size(Some((1920, 1080)))
            .idle_browser_timeout(timeout.max(Duration::from_secs(60)))
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;
        tab.set_default_timeout(timeout);

        Ok(Self {
            _browser: browser,
            tab,
        })
    }
}

impl BrowserSession for ChromeSession {
    fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .with_context(|| format!("Failed to load {url}"))?;
        Ok(())
    }

    fn execute_script(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .with_context(|| format!("Script failed: {script}"))?;
        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    fn probe(&self, locator: &Locator) -> Result<ElementState> {
        let selector = serde_json::to_string(&locator.css())?;
        let state = self.execute_script(&format!("{PROBE_FN}({selector})"))?;
        match state.as_str() {
            Some("absent") => Ok(ElementState::Absent),
            Some("present") => Ok(ElementState::Present),
            Some("clickable") => Ok(ElementState::Clickable),
            other => bail!("Unexpected probe result for {locator}: {other:?}"),
        }
    }

    fn click(&self, locator: &Locator) -> Result<()> {
        debug!("Clicking {}", locator);
        let element = self
            .tab
            .find_element(&locator.css())
            .with_context(|| format!("Element {locator} not found"))?;
        element.scroll_into_view()?;
        element.click().with_context(|| format!("Failed to click {locator}"))?;
        Ok(())
    }

    fn snapshot(&self) -> Result<String> {
        self.tab.get_content().context("Could not get HTML from page")
    }
}
