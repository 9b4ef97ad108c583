//! Weekly activity buckets.

use chrono::{Datelike, NaiveDate, Utc};

/// The `YYYY_WW` bucket (ISO week numbering) a date falls in.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use kbbq_core::week_bucket;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
/// assert_eq!(week_bucket(date), "2024_01");
/// ```
pub fn week_bucket(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}_{:02}", week.year(), week.week())
}

/// The bucket for today (UTC).
pub fn current_week() -> String {
    week_bucket(Utc::now().date_naive())
}
