use crate::scrapers::{CrawlConfig, CrawlLimits, SearchQuery};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Crawl hotel details and guest reviews from Booking.com search results
#[derive(Parser, Debug)]
#[command(name = "booking-scout")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, help = "Search keywords")]
    pub search: String,

    #[arg(long, value_parser = parse_date, help = "Check-in date, yyyy-MM-dd")]
    pub check_in: Option<NaiveDate>,

    #[arg(long, value_parser = parse_date, help = "Check-out date, yyyy-MM-dd")]
    pub check_out: Option<NaiveDate>,

    #[arg(long, default_value_t = 2, help = "Number of adults")]
    pub num_adults: u32,

    #[arg(long, default_value_t = 0, help = "Number of children")]
    pub num_children: u32,

    #[arg(long, default_value_t = 1, help = "Number of rooms")]
    pub num_rooms: u32,

    #[arg(
        long,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Maximum review pages per hotel (default: all)"
    )]
    pub max_page: Option<u64>,

    #[arg(
        long,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Maximum hotels to crawl (default: all)"
    )]
    pub max_item: Option<u64>,

    #[arg(short, long, default_value = "result", help = "Directory for the JSON output")]
    pub output_dir: PathBuf,

    #[arg(long, help = "JSON file overriding the page selectors")]
    pub selectors: Option<PathBuf>,

    #[arg(long, help = "Show the browser window")]
    pub headful: bool,

    #[arg(long, default_value_t = 20, help = "Seconds to wait for a page or element")]
    pub timeout_secs: u64,

    #[arg(
        long,
        default_value_t = 250,
        help = "Milliseconds between two checks of a wait condition"
    )]
    pub poll_ms: u64,

    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected yyyy-MM-dd: {e}"))
}

impl Cli {
    pub fn query(&self) -> SearchQuery {
        SearchQuery {
            search: self.search.clone(),
            check_in: self.check_in,
            check_out: self.check_out,
            num_adults: self.num_adults,
            num_children: self.num_children,
            num_rooms: self.num_rooms,
        }
    }

    pub fn limits(&self) -> CrawlLimits {
        CrawlLimits {
            max_item: self.max_item.map(|n| n as usize),
            max_page: self.max_page.map(|n| n as usize),
        }
    }

    pub fn config(&self) -> CrawlConfig {
        CrawlConfig {
            wait_timeout: self.timeout(),
            poll_interval: Duration::from_millis(self.poll_ms),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_a_two_adult_single_room_search() {
        let cli = Cli::try_parse_from(["booking-scout", "-s", "台北"]).unwrap();
        let query = cli.query();

        assert_eq!(query.num_adults, 2);
        assert_eq!(query.num_children, 0);
        assert_eq!(query.num_rooms, 1);
        assert_eq!(query.check_in, None);
        assert!(cli.limits().max_item.is_none());
        assert!(cli.limits().max_page.is_none());
        assert_eq!(cli.output_dir, PathBuf::from("result"));
    }

    #[test]
    fn parses_dates_and_limits() {
        let cli = Cli::try_parse_from([
            "booking-scout",
            "--search",
            "Tainan",
            "--check-in",
            "2030-01-02",
            "--check-out",
            "2030-01-05",
            "--max-item",
            "2",
            "--max-page",
            "1",
        ])
        .unwrap();

        assert_eq!(cli.check_in, NaiveDate::from_ymd_opt(2030, 1, 2));
        assert_eq!(cli.limits().max_item, Some(2));
        assert_eq!(cli.limits().max_page, Some(1));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Cli::try_parse_from(["booking-scout"]).is_err());
        let bad_date = ["booking-scout", "-s", "x", "--check-in", "02/01/2030"];
        assert!(Cli::try_parse_from(bad_date).is_err());
        assert!(Cli::try_parse_from(["booking-scout", "-s", "x", "--max-page", "0"]).is_err());
    }
}
