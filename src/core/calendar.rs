//! Business-day calendar and statutory deadline computation
//!
//! Weekends are never business days. Holidays are NOT consulted unless a
//! holiday set is supplied explicitly; the default calendar has none, so a
//! T10 deadline that spans a public holiday lands one business day early.
//! Callers that need jurisdiction-correct deadlines must load their holiday
//! list into [`BusinessCalendar::with_holidays`].
//!
//! All dates are taken from timestamps normalized to UTC.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc, Weekday};
use std::collections::BTreeSet;
use thiserror::Error;

/// Number of business days in the statutory response window
pub const T10_BUSINESS_DAYS: i64 = 10;

/// Errors from deadline arithmetic
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid argument: business day count must be non-negative (got {0})")]
    InvalidArgument(i64),

    #[error("Date out of range while adding business days to {0}")]
    OutOfRange(DateTime<Utc>),
}

/// Weekend-only business day check
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Add `n` business days to `start` using the default (holiday-free) calendar
pub fn add_business_days(start: DateTime<Utc>, n: i64) -> Result<DateTime<Utc>, CalendarError> {
    BusinessCalendar::default().add_business_days(start, n)
}

/// Statutory T10 deadline using the default (holiday-free) calendar
pub fn compute_t10(receipt: DateTime<Utc>) -> Result<DateTime<Utc>, CalendarError> {
    BusinessCalendar::default().compute_t10(receipt)
}

/// A business-day calendar with an optional set of holidays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl BusinessCalendar {
    /// Calendar that only excludes weekends
    pub fn new() -> Self {
        Self::default()
    }

    /// Calendar that also excludes the given dates
    pub fn with_holidays(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Holidays configured on this calendar
    pub fn holidays(&self) -> impl Iterator<Item = &NaiveDate> {
        self.holidays.iter()
    }

    /// Check if a calendar date counts as a business day
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        is_business_day(date) && !self.holidays.contains(&date)
    }

    /// Advance `start` by `n` business days, keeping the time of day
    ///
    /// `start` itself is never counted; the first candidate is the next
    /// calendar day. `n == 0` returns `start` unchanged.
    pub fn add_business_days(
        &self,
        start: DateTime<Utc>,
        n: i64,
    ) -> Result<DateTime<Utc>, CalendarError> {
        if n < 0 {
            return Err(CalendarError::InvalidArgument(n));
        }

        let mut current = start;
        let mut remaining = n;
        while remaining > 0 {
            current = current
                .checked_add_signed(TimeDelta::days(1))
                .ok_or(CalendarError::OutOfRange(start))?;
            if self.is_business_day(current.date_naive()) {
                remaining -= 1;
            }
        }

        Ok(current)
    }

    /// Statutory response deadline: ten business days after receipt
    pub fn compute_t10(&self, receipt: DateTime<Utc>) -> Result<DateTime<Utc>, CalendarError> {
        self.add_business_days(receipt, T10_BUSINESS_DAYS)
    }

    /// Business days after `now`'s date up to and including the deadline's date
    ///
    /// Returns 0 once the deadline date is today or in the past.
    pub fn business_days_remaining(&self, now: DateTime<Utc>, deadline: DateTime<Utc>) -> i64 {
        let end = deadline.date_naive();
        let mut day = now.date_naive();
        let mut count = 0;
        while day < end {
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
            if self.is_business_day(day) {
                count += 1;
            }
        }
        count
    }

    /// Whether the deadline instant has passed
    pub fn is_overdue(&self, now: DateTime<Utc>, deadline: DateTime<Utc>) -> bool {
        now > deadline
    }
}
