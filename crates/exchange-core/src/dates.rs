//! Date Range
//!
//! Turns a day count into the list of calendar dates to fetch, newest first.

use chrono::{Days, Local, NaiveDate};

use crate::error::{ExchangeError, Result};

/// Smallest accepted day count
pub const MIN_DAYS: i64 = 1;

/// Largest accepted day count
pub const MAX_DAYS: i64 = 10;

/// Validate a user-supplied day count before any fetch is issued
pub fn validate_days(days: i64) -> Result<usize> {
    if (MIN_DAYS..=MAX_DAYS).contains(&days) {
        usize::try_from(days).map_err(|_| ExchangeError::InvalidDayCount(days))
    } else {
        Err(ExchangeError::InvalidDayCount(days))
    }
}

/// `days` consecutive dates ending today, today first
pub fn generate(days: usize) -> Vec<NaiveDate> {
    ending_at(Local::now().date_naive(), days)
}

/// `days` consecutive dates ending at `today`, in descending order
pub fn ending_at(today: NaiveDate, days: usize) -> Vec<NaiveDate> {
    std::iter::successors(Some(today), |date| previous(*date))
        .take(days)
        .collect()
}

/// Step one calendar day back, if representable
pub fn previous(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(1))
}
