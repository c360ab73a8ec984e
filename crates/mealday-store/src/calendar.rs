//! Calendar-week arithmetic.
//!
//! Weekday numbers follow the data layout: Monday = 0 through Sunday = 6.
//! Week directories are named after ISO-8601 week numbers and live under
//! the ISO week-numbering year.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::{Result, StoreError};

/// Weekday number of `date`, Monday = 0.
pub fn weekday_num(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// ISO year and week of `date`, formatted the way week directories are named.
pub fn iso_year_week(date: NaiveDate) -> (String, String) {
    let week = date.iso_week();
    (week.year().to_string(), week.week().to_string())
}

/// Monday and Sunday of an ISO week given as directory names.
pub fn week_span(year: &str, week: &str) -> Result<(NaiveDate, NaiveDate)> {
    let invalid = || StoreError::InvalidWeek {
        year: year.to_string(),
        week: week.to_string(),
    };

    let y: i32 = year.trim().parse().map_err(|_| invalid())?;
    let w: u32 = week.trim().parse().map_err(|_| invalid())?;
    let first = NaiveDate::from_isoywd_opt(y, w, Weekday::Mon).ok_or_else(invalid)?;

    Ok((first, first + Duration::days(6)))
}

/// The Monday strictly after `date` (a Monday yields the following Monday).
pub fn next_monday(date: NaiveDate) -> NaiveDate {
    let ahead = 7 - i64::from(weekday_num(date));
    date + Duration::days(ahead)
}

/// Date of weekday `num` in the week starting at `monday`.
pub fn date_in_week(monday: NaiveDate, num: u8) -> NaiveDate {
    let mut day = monday;
    while weekday_num(day) != num % 7 {
        day = day + Duration::days(1);
    }
    day
}

/// Whether any active weekday is still ahead of (or equal to) `day_num`.
pub fn has_active_days_left(active_days: &BTreeSet<u8>, day_num: u8) -> bool {
    active_days.iter().any(|&d| d >= day_num)
}

/// Order directory names numerically when both parse as numbers, falling
/// back to plain string order otherwise.  Numbers sort before non-numbers.
pub fn numeric_cmp(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Numeric `(year, week)` key used to compare weeks chronologically.
pub fn week_key(year: &str, week: &str) -> Option<(i32, u32)> {
    Some((year.trim().parse().ok()?, week.trim().parse().ok()?))
}
