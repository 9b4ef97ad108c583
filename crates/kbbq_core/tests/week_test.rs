use chrono::NaiveDate;
use kbbq_core::week_bucket;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn test_week_bucket_is_zero_padded() {
    assert_eq!(week_bucket(date(2024, 1, 3)), "2024_01");
    assert_eq!(week_bucket(date(2024, 12, 11)), "2024_50");
}

#[test]
fn test_week_bucket_uses_iso_year() {
    // 2021-01-01 belongs to ISO week 53 of 2020.
    assert_eq!(week_bucket(date(2021, 1, 1)), "2020_53");
    // 2024-12-30 belongs to ISO week 1 of 2025.
    assert_eq!(week_bucket(date(2024, 12, 30)), "2025_01");
}

#[test]
fn test_same_week_same_bucket() {
    assert_eq!(week_bucket(date(2024, 3, 4)), week_bucket(date(2024, 3, 10)));
    assert_ne!(week_bucket(date(2024, 3, 10)), week_bucket(date(2024, 3, 11)));
}
