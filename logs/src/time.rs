//! Eastern-Time date helpers.
//!
//! DESIGN
//! ======
//! Every record carries its own Eastern-Time decomposition so date filters
//! compare plain `(year, month, day)` triples instead of converting zones at
//! query time. The zone is `America/New_York`, DST included.

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::America::New_York;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TimeError {
    #[error("timestamp out of range: {0}")]
    OutOfRange(i64),
    #[error("invalid month: {0}")]
    InvalidMonth(u32),
}

/// Eastern-Time breakdown of an epoch-millisecond timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInfo {
    pub timestamp: i64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// Decompose `timestamp_ms` into Eastern-Time calendar fields.
///
/// # Errors
///
/// Returns [`TimeError::OutOfRange`] when chrono cannot represent the instant.
pub fn time_info_in_et(timestamp_ms: i64) -> Result<TimeInfo, TimeError> {
    let utc = DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .ok_or(TimeError::OutOfRange(timestamp_ms))?;
    let et = utc.with_timezone(&New_York);
    Ok(TimeInfo {
        timestamp: timestamp_ms,
        year: et.year(),
        month: et.month(),
        day: et.day(),
        hour: et.hour(),
        minute: et.minute(),
    })
}

/// A calendar date. Field order gives lexicographic `Ord`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateParts {
    #[must_use]
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Today's date in Eastern Time.
    #[must_use]
    pub fn today_in_et() -> Self {
        let et = Utc::now().with_timezone(&New_York);
        Self::new(et.year(), et.month(), et.day())
    }

    #[must_use]
    pub const fn first_of_month(self) -> Self {
        Self::new(self.year, self.month, 1)
    }

    /// Whether the triple names a real calendar day.
    #[must_use]
    pub fn is_valid(self) -> bool {
        days_in_month(self.year, self.month).is_ok_and(|days| (1..=days).contains(&self.day))
    }
}

/// English ordinal suffix for `n` (`1` → `"st"`, `12` → `"th"`, `23` → `"rd"`).
#[must_use]
pub fn ordinal(n: u64) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// `n` followed by its ordinal suffix, e.g. `"21st"`.
#[must_use]
pub fn with_ordinal(n: u64) -> String {
    format!("{n}{}", ordinal(n))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MonthName {
    pub short: &'static str,
    pub full: &'static str,
}

const MONTH_NAMES: [MonthName; 12] = [
    MonthName { short: "Jan", full: "January" },
    MonthName { short: "Feb", full: "February" },
    MonthName { short: "Mar", full: "March" },
    MonthName { short: "Apr", full: "April" },
    MonthName { short: "May", full: "May" },
    MonthName { short: "Jun", full: "June" },
    MonthName { short: "Jul", full: "July" },
    MonthName { short: "Aug", full: "August" },
    MonthName { short: "Sep", full: "September" },
    MonthName { short: "Oct", full: "October" },
    MonthName { short: "Nov", full: "November" },
    MonthName { short: "Dec", full: "December" },
];

/// Names for a 1-indexed month.
#[must_use]
pub fn month_name(month: u32) -> Option<MonthName> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(index).copied()
}

#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a 1-indexed month.
///
/// # Errors
///
/// Returns [`TimeError::InvalidMonth`] when `month` is outside `1..=12`.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, TimeError> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Ok(31),
        4 | 6 | 9 | 11 => Ok(30),
        2 if is_leap_year(year) => Ok(29),
        2 => Ok(28),
        other => Err(TimeError::InvalidMonth(other)),
    }
}

/// A `(year, month)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    #[must_use]
    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }
}

/// `count` consecutive months starting at `start_year`/`start_month`.
///
/// # Errors
///
/// Returns [`TimeError::InvalidMonth`] when `start_month` is outside `1..=12`.
pub fn enumerate_months(start_year: i32, start_month: u32, count: usize) -> Result<Vec<YearMonth>, TimeError> {
    if !(1..=12).contains(&start_month) {
        return Err(TimeError::InvalidMonth(start_month));
    }
    let mut current = YearMonth { year: start_year, month: start_month };
    let mut months = Vec::with_capacity(count);
    for _ in 0..count {
        months.push(current);
        current = current.next();
    }
    Ok(months)
}

/// One month of a date chooser with the days the user may pick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChoosableMonth {
    pub year: i32,
    pub month: u32,
    pub name: MonthName,
    pub days: Vec<u32>,
}

/// Months (starting with the month of `today`) and their selectable days.
///
/// Days before `today` are dropped unless `allow_past`; `today` itself is
/// dropped unless `allow_today`. Months left with no selectable day are
/// omitted.
///
/// # Errors
///
/// Returns [`TimeError::InvalidMonth`] when `today` carries an invalid month.
pub fn choosable_months(
    today: DateParts,
    num_months: usize,
    allow_past: bool,
    allow_today: bool,
) -> Result<Vec<ChoosableMonth>, TimeError> {
    let mut out = Vec::with_capacity(num_months);
    for ym in enumerate_months(today.year, today.month, num_months)? {
        let name = month_name(ym.month).ok_or(TimeError::InvalidMonth(ym.month))?;
        let days = (1..=days_in_month(ym.year, ym.month)?)
            .filter(|&day| {
                let date = DateParts::new(ym.year, ym.month, day);
                if date == today {
                    allow_today
                } else {
                    allow_past || date > today
                }
            })
            .collect::<Vec<_>>();
        if !days.is_empty() {
            out.push(ChoosableMonth { year: ym.year, month: ym.month, name, days });
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "time_test.rs"]
mod tests;
