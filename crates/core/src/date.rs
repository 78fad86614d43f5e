//! Year-less statement dates and their reconciliation against the
//! statement's own covering range.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::error::{LedgridError, Result};

/// A printed `MM/DD` date with no year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Validates against a leap year, so `02/29` is accepted here and only
    /// rejected once a candidate year is known.
    pub fn new(month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }

    /// Parse `M/D` or `MM/DD`.
    pub fn parse(s: &str) -> Result<Self> {
        let (m, d) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| LedgridError::InvalidDate(s.to_string()))?;
        let month = m.parse().map_err(|_| LedgridError::InvalidDate(s.to_string()))?;
        let day = d.parse().map_err(|_| LedgridError::InvalidDate(s.to_string()))?;
        Self::new(month, day).ok_or_else(|| LedgridError::InvalidDate(s.to_string()))
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn with_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.day)
    }
}

/// Resolve a year-less date inside `[start, end]`.
///
/// Only `start.year()` and `end.year()` are candidates. The candidate in
/// range wins; otherwise the one nearest to `start`.
pub fn closest_date(partial: MonthDay, start: NaiveDate, end: NaiveDate) -> Result<NaiveDate> {
    let mut years = vec![start.year()];
    if end.year() != start.year() {
        years.push(end.year());
    }
    let candidates: Vec<NaiveDate> = years
        .into_iter()
        .filter_map(|y| partial.with_year(y))
        .collect();

    if let Some(inside) = candidates.iter().find(|d| start <= **d && **d <= end) {
        return Ok(*inside);
    }
    candidates
        .into_iter()
        .min_by_key(|d| (*d - start).num_days().abs())
        .ok_or(LedgridError::UnresolvableDate {
            month: partial.month,
            day: partial.day,
        })
}

/// Parse a full statement date: `MM/DD/YY`, `MM/DD/YYYY`, or
/// `Month D, YYYY`.
pub fn parse_statement_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    let invalid = || LedgridError::InvalidDate(s.to_string());

    if s.contains('/') {
        let year = s.rsplit('/').next().ok_or_else(invalid)?;
        let fmt = if year.len() == 2 { "%m/%d/%y" } else { "%m/%d/%Y" };
        return NaiveDate::parse_from_str(s, fmt).map_err(|_| invalid());
    }
    NaiveDate::parse_from_str(s, "%B %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%b %d, %Y"))
        .map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_day_accepts_leap_day() {
        assert!(MonthDay::parse("02/29").is_ok());
        assert!(MonthDay::parse("02/30").is_err());
        assert!(MonthDay::parse("13/01").is_err());
        assert!(MonthDay::parse("1205").is_err());
    }

    #[test]
    fn statement_date_formats() {
        assert_eq!(parse_statement_date("12/31/19").unwrap(), ymd(2019, 12, 31));
        assert_eq!(parse_statement_date("01/15/2020").unwrap(), ymd(2020, 1, 15));
        assert_eq!(parse_statement_date("March 3, 2021").unwrap(), ymd(2021, 3, 3));
        assert!(parse_statement_date("someday").is_err());
    }

    #[test]
    fn out_of_range_picks_nearest_to_start() {
        let md = MonthDay::parse("11/20").unwrap();
        let got = closest_date(md, ymd(2019, 12, 15), ymd(2020, 1, 15)).unwrap();
        assert_eq!(got, ymd(2019, 11, 20));
    }

    #[test]
    fn leap_day_without_leap_candidate_fails() {
        let md = MonthDay::parse("02/29").unwrap();
        let err = closest_date(md, ymd(2019, 2, 1), ymd(2019, 3, 1)).unwrap_err();
        assert!(matches!(err, LedgridError::UnresolvableDate { month: 2, day: 29 }));
    }
}
