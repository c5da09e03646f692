use super::*;

#[test]
fn time_info_uses_eastern_standard_time_in_winter() {
    // 2024-01-15T17:30:00Z is 12:30 EST.
    let info = time_info_in_et(1_705_339_800_000).expect("valid timestamp");
    assert_eq!((info.year, info.month, info.day), (2024, 1, 15));
    assert_eq!((info.hour, info.minute), (12, 30));
}

#[test]
fn time_info_uses_daylight_time_in_summer() {
    // 2024-07-04T16:05:00Z is 12:05 EDT.
    let info = time_info_in_et(1_720_109_100_000).expect("valid timestamp");
    assert_eq!((info.year, info.month, info.day), (2024, 7, 4));
    assert_eq!((info.hour, info.minute), (12, 5));
}

#[test]
fn time_info_rolls_back_across_midnight() {
    // 2024-03-01T02:00:00Z is still Feb 29 in New York.
    let info = time_info_in_et(1_709_258_400_000).expect("valid timestamp");
    assert_eq!((info.year, info.month, info.day), (2024, 2, 29));
    assert_eq!(info.hour, 21);
}

#[test]
fn time_info_rejects_unrepresentable_timestamp() {
    assert_eq!(time_info_in_et(i64::MAX), Err(TimeError::OutOfRange(i64::MAX)));
}

#[test]
fn ordinal_handles_teens_and_units() {
    assert_eq!(ordinal(1), "st");
    assert_eq!(ordinal(2), "nd");
    assert_eq!(ordinal(3), "rd");
    assert_eq!(ordinal(4), "th");
    assert_eq!(ordinal(11), "th");
    assert_eq!(ordinal(12), "th");
    assert_eq!(ordinal(13), "th");
    assert_eq!(ordinal(21), "st");
    assert_eq!(ordinal(112), "th");
    assert_eq!(ordinal(122), "nd");
    assert_eq!(with_ordinal(23), "23rd");
}

#[test]
fn month_name_is_one_indexed() {
    assert_eq!(month_name(1).map(|m| m.full), Some("January"));
    assert_eq!(month_name(9).map(|m| m.short), Some("Sep"));
    assert!(month_name(0).is_none());
    assert!(month_name(13).is_none());
}

#[test]
fn days_in_month_accounts_for_leap_years() {
    assert_eq!(days_in_month(2024, 2), Ok(29));
    assert_eq!(days_in_month(2023, 2), Ok(28));
    assert_eq!(days_in_month(1900, 2), Ok(28));
    assert_eq!(days_in_month(2000, 2), Ok(29));
    assert_eq!(days_in_month(2023, 4), Ok(30));
    assert_eq!(days_in_month(2023, 12), Ok(31));
    assert_eq!(days_in_month(2023, 13), Err(TimeError::InvalidMonth(13)));
}

#[test]
fn enumerate_months_crosses_year_boundary() {
    let months = enumerate_months(2023, 11, 4).expect("valid month");
    let pairs = months.iter().map(|m| (m.year, m.month)).collect::<Vec<_>>();
    assert_eq!(pairs, vec![(2023, 11), (2023, 12), (2024, 1), (2024, 2)]);
}

#[test]
fn enumerate_months_rejects_bad_start() {
    assert!(enumerate_months(2023, 0, 2).is_err());
}

#[test]
fn date_parts_order_is_lexicographic() {
    assert!(DateParts::new(2024, 1, 31) < DateParts::new(2024, 2, 1));
    assert!(DateParts::new(2023, 12, 31) < DateParts::new(2024, 1, 1));
    assert!(DateParts::new(2024, 3, 2) > DateParts::new(2024, 3, 1));
}

#[test]
fn date_parts_validity() {
    assert!(DateParts::new(2024, 2, 29).is_valid());
    assert!(!DateParts::new(2023, 2, 29).is_valid());
    assert!(!DateParts::new(2023, 0, 1).is_valid());
    assert!(!DateParts::new(2023, 5, 0).is_valid());
}

#[test]
fn choosable_months_hides_past_days_by_default() {
    let today = DateParts::new(2024, 1, 30);
    let months = choosable_months(today, 2, false, true).expect("valid");
    assert_eq!(months.len(), 2);
    assert_eq!(months[0].days, vec![30, 31]);
    assert_eq!(months[1].month, 2);
    assert_eq!(months[1].days.len(), 29);
}

#[test]
fn choosable_months_can_exclude_today_and_drop_empty_months() {
    let today = DateParts::new(2024, 1, 31);
    let months = choosable_months(today, 2, false, false).expect("valid");
    assert_eq!(months.len(), 1);
    assert_eq!(months[0].month, 2);
}

#[test]
fn choosable_months_allows_past_when_requested() {
    let today = DateParts::new(2024, 4, 10);
    let months = choosable_months(today, 1, true, true).expect("valid");
    assert_eq!(months[0].days.len(), 30);
    assert_eq!(months[0].name.full, "April");
}
