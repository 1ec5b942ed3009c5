//! Parsing of localized numbers and dates as rendered on zh-TW pages.

use crate::error::ScrapeError;
use chrono::NaiveDate;
use lazy_regex::regex;

pub const MAX_SCORE: f64 = 10.0;

/// Parses a 0.0-10.0 score, accepting a decimal comma
pub fn parse_score(text: &str) -> Result<f64, ScrapeError> {
    let caps = regex!(r"\d+(?:[.,]\d+)?")
        .find(text)
        .ok_or_else(|| ScrapeError::mismatch("score", text))?;
    let score: f64 = caps
        .as_str()
        .replace(',', ".")
        .parse()
        .map_err(|_| ScrapeError::mismatch("score", text))?;

    if (0.0..=MAX_SCORE).contains(&score) {
        Ok(score)
    } else {
        Err(ScrapeError::mismatch("score in range 0-10", text))
    }
}

/// Score following `separator`, e.g. `獲得評分 9.0` with separator `評分`
pub fn score_after(text: &str, separator: &str) -> Result<f64, ScrapeError> {
    let (_, tail) = text
        .split_once(separator)
        .ok_or_else(|| ScrapeError::mismatch("score label", text))?;
    parse_score(tail)
}

/// First `d.d` number in a free-text summary
pub fn first_decimal(text: &str) -> Option<f64> {
    regex!(r"\d+\.\d+")
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .filter(|score| (0.0..=MAX_SCORE).contains(score))
}

/// Splits `"<label> <score>"`; the label may itself contain spaces
pub fn split_subrating(text: &str) -> Option<(String, f64)> {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    let score = parse_score(tokens.pop()?).ok()?;
    if tokens.is_empty() {
        return None;
    }
    Some((tokens.join(" "), score))
}

/// First digit group, thousands separators removed: `"1,234 則評語"` → 1234
pub fn parse_count(text: &str) -> Option<u32> {
    regex!(r"\d[\d,]*")
        .find(text)
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

/// Leading integer of a label such as `"2 晚"`
pub fn parse_nights(text: &str) -> Result<u32, ScrapeError> {
    regex!(r"^\s*(\d+)")
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .ok_or_else(|| ScrapeError::mismatch("number of nights", text))
}

/// `"2023 年 5 月"` → `"2023-05"`
pub fn parse_year_month(text: &str) -> Result<String, ScrapeError> {
    let caps = regex!(r"(\d{4})\s*年\s*(\d{1,2})\s*月")
        .captures(text)
        .ok_or_else(|| ScrapeError::mismatch("stay date", text))?;
    let date =
        ymd(&caps[1], &caps[2], "1").ok_or_else(|| ScrapeError::mismatch("stay date", text))?;
    Ok(date.format("%Y-%m").to_string())
}

/// `"2023 年 5 月 9 日"` → `"2023-05-09"`
pub fn parse_year_month_day(text: &str) -> Result<String, ScrapeError> {
    let caps = regex!(r"(\d{4})\s*年\s*(\d{1,2})\s*月\s*(\d{1,2})\s*日")
        .captures(text)
        .ok_or_else(|| ScrapeError::mismatch("review date", text))?;
    let date = ymd(&caps[1], &caps[2], &caps[3])
        .ok_or_else(|| ScrapeError::mismatch("review date", text))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}
