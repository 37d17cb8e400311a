//! Search parsing and list filters for the admin changelists.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::modules::storage::DateRange;

/// Split a search box value into terms.
///
/// Terms are separated by whitespace; a double-quoted phrase is one term.
/// An unterminated quote runs to the end of the input.
pub fn search_terms(input: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                if !current.is_empty() {
                    terms.push(std::mem::take(&mut current));
                }
                quoted = !quoted;
            }
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    terms.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        terms.push(current);
    }

    terms
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Date choices offered for a timestamp field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DateFilter {
    Today,
    #[serde(rename = "past_7_days")]
    Past7Days,
    ThisMonth,
    ThisYear,
}

impl DateFilter {
    pub const ALL: [DateFilter; 4] = [
        DateFilter::Today,
        DateFilter::Past7Days,
        DateFilter::ThisMonth,
        DateFilter::ThisYear,
    ];

    /// Query value
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFilter::Today => "today",
            DateFilter::Past7Days => "past_7_days",
            DateFilter::ThisMonth => "this_month",
            DateFilter::ThisYear => "this_year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateFilter::Today => "Today",
            DateFilter::Past7Days => "Past 7 days",
            DateFilter::ThisMonth => "This month",
            DateFilter::ThisYear => "This year",
        }
    }

    /// UTC range covered at `now`.
    ///
    /// `today` and `past_7_days` end at the start of tomorrow; the calendar
    /// choices end at the start of the next month or year.
    pub fn range(&self, now: DateTime<Utc>) -> DateRange {
        let today = now.date_naive();
        let tomorrow = today + Duration::days(1);
        let (start, end) = match self {
            DateFilter::Today => (today, tomorrow),
            DateFilter::Past7Days => (today - Duration::days(7), tomorrow),
            DateFilter::ThisMonth => {
                let first = today.with_day(1).unwrap_or(today);
                let next = if first.month() == 12 {
                    NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
                };
                (first, next.unwrap_or(tomorrow))
            }
            DateFilter::ThisYear => {
                let first = today.with_ordinal(1).unwrap_or(today);
                let next = NaiveDate::from_ymd_opt(first.year() + 1, 1, 1);
                (first, next.unwrap_or(tomorrow))
            }
        };
        DateRange {
            start: midnight(start),
            end: midnight(end),
        }
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}
