//! Publication year recovery.
//!
//! Order: structured `Year`, then the `MedlineDate` free text (leading year,
//! first four-digit run, fuzzy two-digit year or bare month). Failure is a
//! silent `None`.

use chrono::{Datelike, Local};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FOUR_DIGITS: Regex = Regex::new(r"\d{4}").unwrap();
}

pub fn resolve_year(year: Option<&str>, medline_date: Option<&str>) -> Option<i32> {
    year.and_then(|y| y.trim().parse::<i32>().ok())
        .or_else(|| medline_date.and_then(year_from_medline_date))
}

/// Extract a year from a MedlineDate such as "1998 Dec-1999 Jan" or "Winter '98".
pub fn year_from_medline_date(text: &str) -> Option<i32> {
    let text = text.trim();
    if let Some(year) = text.get(..4).and_then(|head| head.parse::<i32>().ok()) {
        return Some(year);
    }
    if let Some(m) = FOUR_DIGITS.find(text) {
        return m.as_str().parse().ok();
    }
    fuzzy_year(text, Local::now().year())
}

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

fn is_month(token: &str) -> bool {
    let token = token.to_ascii_lowercase();
    token.len() >= 3 && MONTHS.iter().any(|m| m.starts_with(&token))
}

/// Two-digit years, read in the century keeping them within 50 years of
/// `current_year`. A number up to 31 next to a month name is a day; a month
/// with no year at all falls in `current_year`.
fn fuzzy_year(text: &str, current_year: i32) -> Option<i32> {
    let tokens: Vec<&str> = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|tok| !tok.is_empty())
        .collect();
    let has_month = tokens.iter().any(|tok| is_month(tok));
    let two_digit: Vec<i32> = tokens
        .iter()
        .filter(|tok| tok.len() == 2 && tok.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|tok| tok.parse().ok())
        .collect();

    let yy = match two_digit.iter().copied().find(|&n| n > 31) {
        Some(yy) => yy,
        None if has_month => return Some(current_year),
        None => *two_digit.first()?,
    };

    let mut year = current_year - current_year % 100 + yy;
    if year >= current_year + 50 {
        year -= 100;
    } else if year < current_year - 50 {
        year += 100;
    }
    Some(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_year_preferred() {
        assert_eq!(resolve_year(Some(" 2019 "), Some("1998 Dec")), Some(2019));
    }

    #[test]
    fn test_unparsable_year_falls_back_to_medline_date() {
        assert_eq!(resolve_year(Some("19xx"), Some("2001 Spring")), Some(2001));
        assert_eq!(resolve_year(None, None), None);
    }

    #[test]
    fn test_medline_date_leading_year() {
        assert_eq!(year_from_medline_date("1998 Dec-1999 Jan"), Some(1998));
    }

    #[test]
    fn test_medline_date_first_four_digit_run() {
        assert_eq!(year_from_medline_date("Winter 2004-2005"), Some(2004));
        assert_eq!(year_from_medline_date("Dec-Jan 1999"), Some(1999));
    }

    #[test]
    fn test_fuzzy_two_digit_year() {
        assert_eq!(fuzzy_year("Winter '98", 2026), Some(1998));
        assert_eq!(fuzzy_year("Spring 45", 2026), Some(2045));
    }

    #[test]
    fn test_fuzzy_small_two_digit_year() {
        assert_eq!(fuzzy_year("Spring 05", 2026), Some(2005));
        assert_eq!(fuzzy_year("Summer-Fall 12", 2026), Some(2012));
    }

    #[test]
    fn test_fuzzy_day_next_to_month_defaults_to_current_year() {
        assert_eq!(fuzzy_year("Dec 12", 2026), Some(2026));
        assert_eq!(fuzzy_year("Sept", 2026), Some(2026));
        assert_eq!(fuzzy_year("Dec 98", 2026), Some(1998));
    }

    #[test]
    fn test_unknown_year_is_none() {
        assert_eq!(year_from_medline_date("Spring-Summer"), None);
        assert_eq!(year_from_medline_date(""), None);
    }
}
