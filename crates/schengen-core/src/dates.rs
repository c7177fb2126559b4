//! # Calendar Helpers
//!
//! Day-granularity arithmetic shared by every module.
//!
//! All computation happens on [`NaiveDate`]: a calendar day with no time of
//! day and no zone. Timestamps coming from a UI are floored to their date
//! with [`normalize`] before they enter the engine, so "Jun 1 23:59" and
//! "Jun 1 00:00" are the same day.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeZone, Utc};

use crate::error::{CoreError, CoreResult};

/// Floors a timestamp to its calendar day in the timestamp's own zone.
pub fn normalize<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> NaiveDate {
    timestamp.date_naive()
}

/// Today's date in UTC.
///
/// Only the convenience entry points call this; everything else takes the
/// reference date explicitly so results stay deterministic.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Shifts `date` by a signed number of days.
pub fn add_days(date: NaiveDate, days: i64) -> CoreResult<NaiveDate> {
    let step = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(step)
    } else {
        date.checked_sub_days(step)
    };
    shifted.ok_or(CoreError::DateOutOfRange {
        date,
        offset_days: days,
    })
}

/// Shifts `date` by a signed number of whole years, clamping Feb 29.
pub fn add_years(date: NaiveDate, years: i32) -> CoreResult<NaiveDate> {
    let months = Months::new(years.unsigned_abs() * 12);
    let shifted = if years >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.ok_or(CoreError::DateOutOfRange {
        date,
        offset_days: i64::from(years) * 365,
    })
}

/// Number of days in `[start, end]`, both ends included.
///
/// Returns zero or a negative count for reversed ranges; callers treat
/// anything below one as malformed.
#[inline]
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Signed number of days from `origin` to `date`.
#[inline]
pub fn day_offset(origin: NaiveDate, date: NaiveDate) -> i64 {
    (date - origin).num_days()
}

/// Whether `date` falls in a leap year. Used by diagnostics only.
#[inline]
pub fn is_leap_year(date: NaiveDate) -> bool {
    NaiveDate::from_ymd_opt(date.year(), 2, 29).is_some()
}
