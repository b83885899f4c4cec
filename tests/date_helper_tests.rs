use calheat_rs::HeatmapError;
use calheat_rs::core::{CalendarConfig, DateHelper, Unit, WeekStart};
use chrono::TimeZone;
use chrono_tz::Tz;

const HOUR_MS: i64 = 3_600_000;

fn helper(timezone: &str, week_start: WeekStart) -> DateHelper {
    let config = CalendarConfig::new(timezone, week_start).expect("valid calendar config");
    DateHelper::new(config)
}

fn ts(timezone: &str, y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
    let tz: Tz = timezone.parse().expect("valid timezone");
    tz.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .unwrap()
        .timestamp_millis()
}

#[test]
fn start_of_is_idempotent_for_every_unit() {
    let helper = helper("UTC", WeekStart::Monday);
    let sample = ts("UTC", 2024, 2, 29, 13, 37);

    for unit in [
        Unit::Minute,
        Unit::Hour,
        Unit::Day,
        Unit::Week,
        Unit::Month,
        Unit::Year,
    ] {
        let once = helper.start_of(unit, sample).expect("start of unit");
        let twice = helper.start_of(unit, once).expect("start of start");
        assert_eq!(once, twice, "start_of must be idempotent for {unit}");
    }
}

#[test]
fn start_of_week_honors_configured_first_day() {
    let thursday = ts("UTC", 2024, 2, 29, 10, 0);

    let monday_start = helper("UTC", WeekStart::Monday)
        .start_of(Unit::Week, thursday)
        .expect("week start");
    assert_eq!(monday_start, ts("UTC", 2024, 2, 26, 0, 0));

    let sunday_start = helper("UTC", WeekStart::Sunday)
        .start_of(Unit::Week, thursday)
        .expect("week start");
    assert_eq!(sunday_start, ts("UTC", 2024, 2, 25, 0, 0));
}

#[test]
fn day_intervals_cross_spring_forward_without_gaps() {
    let helper = helper("America/New_York", WeekStart::Sunday);
    let start = ts("America/New_York", 2024, 3, 9, 0, 0);
    let end = ts("America/New_York", 2024, 3, 11, 12, 0);

    let days = helper.intervals(Unit::Day, start, end).expect("intervals");
    assert_eq!(days.len(), 3);
    assert_eq!(days[1] - days[0], 24 * HOUR_MS);
    // 2024-03-10 loses an hour to DST.
    assert_eq!(days[2] - days[1], 23 * HOUR_MS);
}

#[test]
fn day_intervals_cross_fall_back_without_duplicates() {
    let helper = helper("America/New_York", WeekStart::Sunday);
    let start = ts("America/New_York", 2024, 11, 2, 0, 0);
    let end = ts("America/New_York", 2024, 11, 4, 12, 0);

    let days = helper.intervals(Unit::Day, start, end).expect("intervals");
    assert_eq!(days.len(), 3);
    // 2024-11-03 gains an hour when DST ends.
    assert_eq!(days[2] - days[1], 25 * HOUR_MS);
    assert!(days.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn nonexistent_local_midnight_rolls_to_first_existing_instant() {
    // Chilean DST starts 2024-09-08: local midnight jumps straight to 01:00.
    let helper = helper("America/Santiago", WeekStart::Monday);
    let noon = ts("America/Santiago", 2024, 9, 8, 12, 0);

    let day_start = helper.start_of(Unit::Day, noon).expect("day start");
    let expected = chrono::Utc
        .with_ymd_and_hms(2024, 9, 8, 4, 0, 0)
        .unwrap()
        .timestamp_millis();
    assert_eq!(day_start, expected);
    assert_eq!(
        helper.start_of(Unit::Day, day_start).expect("restart"),
        day_start
    );
}

#[test]
fn ambiguous_local_hour_resolves_to_earlier_instant() {
    let helper = helper("America/New_York", WeekStart::Sunday);
    // 01:30 EDT on 2024-11-03, the first of the two 01:30s that day.
    let first_0130 = chrono::Utc
        .with_ymd_and_hms(2024, 11, 3, 5, 30, 0)
        .unwrap()
        .timestamp_millis();

    let hour_start = helper.start_of(Unit::Hour, first_0130).expect("hour start");
    let expected = chrono::Utc
        .with_ymd_and_hms(2024, 11, 3, 5, 0, 0)
        .unwrap()
        .timestamp_millis();
    assert_eq!(hour_start, expected);
}

#[test]
fn month_intervals_cross_year_boundary() {
    let helper = helper("UTC", WeekStart::Monday);
    let start = ts("UTC", 2023, 11, 15, 8, 0);
    let end = ts("UTC", 2024, 2, 1, 0, 0);

    let months = helper
        .intervals(Unit::Month, start, end)
        .expect("intervals");
    assert_eq!(
        months,
        vec![
            ts("UTC", 2023, 11, 1, 0, 0),
            ts("UTC", 2023, 12, 1, 0, 0),
            ts("UTC", 2024, 1, 1, 0, 0),
            ts("UTC", 2024, 2, 1, 0, 0),
        ]
    );
}

#[test]
fn inverted_range_yields_empty_intervals() {
    let helper = helper("UTC", WeekStart::Monday);
    let start = ts("UTC", 2024, 2, 1, 0, 0);
    let end = ts("UTC", 2024, 1, 1, 0, 0);

    let days = helper.intervals(Unit::Day, start, end).expect("intervals");
    assert!(days.is_empty());
}

#[test]
fn february_2024_week_arithmetic_with_monday_start() {
    let helper = helper("UTC", WeekStart::Monday);
    let leap_day = ts("UTC", 2024, 2, 29, 0, 0);

    assert_eq!(helper.days_in_month(leap_day).expect("days"), 29);
    assert_eq!(helper.weeks_in_month(leap_day).expect("weeks"), 5);
    assert_eq!(helper.week_of_month(leap_day).expect("week row"), 4);
    assert_eq!(helper.day_of_week_index(leap_day).expect("weekday"), 3);
}

#[test]
fn week_of_year_keeps_trailing_december_days_in_their_own_year() {
    let helper = helper("UTC", WeekStart::Monday);

    assert_eq!(
        helper
            .week_of_year(ts("UTC", 2024, 1, 1, 0, 0))
            .expect("week of year"),
        0
    );
    assert_eq!(
        helper
            .week_of_year(ts("UTC", 2024, 12, 31, 0, 0))
            .expect("week of year"),
        52
    );
    assert_eq!(
        helper
            .weeks_in_year(ts("UTC", 2024, 6, 1, 0, 0))
            .expect("weeks in year"),
        53
    );
}

#[test]
fn unknown_timezone_is_a_configuration_error() {
    let err = CalendarConfig::new("Mars/Olympus", WeekStart::Monday)
        .expect_err("unknown timezone must fail");
    assert!(matches!(err, HeatmapError::InvalidConfig(_)));
}

#[test]
fn out_of_range_timestamp_fails_fast() {
    let helper = helper("UTC", WeekStart::Monday);
    let err = helper.date(i64::MAX).expect_err("overflow must fail");
    assert!(matches!(err, HeatmapError::TimestampOutOfRange(_)));
}

#[test]
fn format_renders_in_configured_timezone() {
    let helper = helper("Asia/Tokyo", WeekStart::Monday);
    // 23:30 UTC on Feb 28 is already March 1 in Tokyo.
    let late = chrono::Utc
        .with_ymd_and_hms(2024, 2, 29, 23, 30, 0)
        .unwrap()
        .timestamp_millis();

    assert_eq!(helper.format(late, "%B %Y").expect("format"), "March 2024");
}
