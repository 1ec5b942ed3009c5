pub mod browser;
pub mod detail;
pub mod listing;
pub mod orchestrator;
pub mod parse;
pub mod reviews;
pub mod selectors;
pub mod snapshot;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use browser::ChromeSession;
pub use orchestrator::CrawlOrchestrator;
pub use selectors::SiteSelectors;
pub use traits::DatasetSink;
pub use types::{CrawlConfig, CrawlLimits, SearchQuery};
