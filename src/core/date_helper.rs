use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, TimeZone,
    Timelike, Weekday,
};
use chrono_tz::Tz;

use crate::core::calendar::CalendarConfig;
use crate::core::template::Unit;
use crate::core::types::Timestamp;
use crate::error::{HeatmapError, HeatmapResult};

/// Timezone- and first-day-of-week-aware date arithmetic over epoch-millisecond
/// timestamps.
///
/// Unit boundaries are computed in local civil time and re-localized, never by
/// fixed millisecond increments, so they stay correct across DST shifts and
/// variable month/year lengths. A nonexistent local time (spring-forward gap)
/// resolves to the first instant after the jump; an ambiguous local time
/// (fall-back overlap) resolves to the earlier instant.
#[derive(Debug, Clone, Copy)]
pub struct DateHelper {
    config: CalendarConfig,
}

impl DateHelper {
    #[must_use]
    pub fn new(config: CalendarConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.config.timezone()
    }

    #[must_use]
    pub fn week_start(&self) -> Weekday {
        self.config.week_start()
    }

    /// Converts a timestamp to a calendar-aware date value in the configured
    /// timezone. Out-of-range timestamps fail fast, never clamp.
    pub fn date(&self, ts: Timestamp) -> HeatmapResult<DateTime<Tz>> {
        DateTime::from_timestamp_millis(ts)
            .map(|dt| dt.with_timezone(&self.config.timezone()))
            .ok_or(HeatmapError::TimestampOutOfRange(ts))
    }

    /// Canonical start of the unit containing `ts`. Idempotent.
    pub fn start_of(&self, unit: Unit, ts: Timestamp) -> HeatmapResult<Timestamp> {
        let local = self.date(ts)?.naive_local();
        let floored = self
            .floor_local(unit, local)
            .ok_or(HeatmapError::TimestampOutOfRange(ts))?;
        self.localize(floored)
    }

    /// Start of the unit following the one containing `ts`.
    pub fn next_start(&self, unit: Unit, ts: Timestamp) -> HeatmapResult<Timestamp> {
        let local = self.date(ts)?.naive_local();
        let floored = self
            .floor_local(unit, local)
            .ok_or(HeatmapError::TimestampOutOfRange(ts))?;
        let advanced = advance_local(unit, floored).ok_or(HeatmapError::TimestampOutOfRange(ts))?;
        self.localize(advanced)
    }

    /// Every unit-start from the unit containing `start` through the unit
    /// containing `end`, inclusive on both ends, strictly increasing.
    ///
    /// An inverted range yields an empty vector.
    pub fn intervals(
        &self,
        unit: Unit,
        start: Timestamp,
        end: Timestamp,
    ) -> HeatmapResult<Vec<Timestamp>> {
        if end < start {
            return Ok(Vec::new());
        }

        let mut current = self.start_of(unit, start)?;
        let last = self.start_of(unit, end)?;
        let mut starts = Vec::new();

        while current <= last {
            starts.push(current);
            let next = self.next_start(unit, current)?;
            debug_assert!(next > current);
            current = next;
        }

        Ok(starts)
    }

    /// Zero-based day-of-week index relative to the configured week start.
    pub fn day_of_week_index(&self, ts: Timestamp) -> HeatmapResult<u32> {
        Ok(days_from_week_start(
            self.date(ts)?.weekday(),
            self.config.week_start(),
        ))
    }

    /// Zero-based index of the week row containing `ts` within its month.
    pub fn week_of_month(&self, ts: Timestamp) -> HeatmapResult<u32> {
        let date = self.date(ts)?.date_naive();
        let first = date
            .with_day(1)
            .ok_or(HeatmapError::TimestampOutOfRange(ts))?;
        self.weeks_between(first, date, ts)
    }

    /// Zero-based index of the week row containing `ts` within its year.
    ///
    /// Counts week-start boundaries since the week containing January 1 of the
    /// timestamp's own year, so a trailing partial week in late December keeps
    /// indexing past 51 rather than wrapping to the next year's week 0.
    pub fn week_of_year(&self, ts: Timestamp) -> HeatmapResult<u32> {
        let date = self.date(ts)?.date_naive();
        let jan_first = NaiveDate::from_ymd_opt(date.year(), 1, 1)
            .ok_or(HeatmapError::TimestampOutOfRange(ts))?;
        self.weeks_between(jan_first, date, ts)
    }

    /// Number of week rows spanned by the month containing `ts`.
    pub fn weeks_in_month(&self, ts: Timestamp) -> HeatmapResult<u32> {
        let date = self.date(ts)?.date_naive();
        let first = date
            .with_day(1)
            .ok_or(HeatmapError::TimestampOutOfRange(ts))?;
        let last = date
            .with_day(days_in_month_of(date.year(), date.month()))
            .ok_or(HeatmapError::TimestampOutOfRange(ts))?;
        Ok(self.weeks_between(first, last, ts)? + 1)
    }

    /// Number of week rows spanned by the year containing `ts`.
    pub fn weeks_in_year(&self, ts: Timestamp) -> HeatmapResult<u32> {
        let year = self.date(ts)?.year();
        let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or(HeatmapError::TimestampOutOfRange(ts))?;
        let dec_last = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or(HeatmapError::TimestampOutOfRange(ts))?;
        Ok(self.weeks_between(jan_first, dec_last, ts)? + 1)
    }

    /// Week rows between the week containing `from` and the week containing
    /// `to`. Used to position week buckets relative to a parent domain start
    /// rather than the bucket's own (possibly earlier) month or year.
    pub fn week_rows_between(&self, from: Timestamp, to: Timestamp) -> HeatmapResult<u32> {
        let from_date = self.date(from)?.date_naive();
        let to_date = self.date(to)?.date_naive();
        self.weeks_between(from_date, to_date, to)
    }

    /// Number of days in the month containing `ts`.
    pub fn days_in_month(&self, ts: Timestamp) -> HeatmapResult<u32> {
        let date = self.date(ts)?.date_naive();
        Ok(days_in_month_of(date.year(), date.month()))
    }

    /// Formats `ts` with a chrono strftime pattern in the configured timezone.
    pub fn format(&self, ts: Timestamp, pattern: &str) -> HeatmapResult<String> {
        Ok(self.date(ts)?.format(pattern).to_string())
    }

    fn floor_local(&self, unit: Unit, local: NaiveDateTime) -> Option<NaiveDateTime> {
        match unit {
            Unit::Minute => local.with_second(0)?.with_nanosecond(0),
            Unit::Hour => local.with_minute(0)?.with_second(0)?.with_nanosecond(0),
            Unit::Day => local.date().and_hms_opt(0, 0, 0),
            Unit::Week => self
                .week_anchor(local.date())?
                .and_hms_opt(0, 0, 0),
            Unit::Month => local.date().with_day(1)?.and_hms_opt(0, 0, 0),
            Unit::Year => NaiveDate::from_ymd_opt(local.year(), 1, 1)?.and_hms_opt(0, 0, 0),
        }
    }

    /// First day of the week row containing `date`.
    fn week_anchor(&self, date: NaiveDate) -> Option<NaiveDate> {
        let offset = days_from_week_start(date.weekday(), self.config.week_start());
        date.checked_sub_days(Days::new(u64::from(offset)))
    }

    fn weeks_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        ts: Timestamp,
    ) -> HeatmapResult<u32> {
        let from_anchor = self
            .week_anchor(from)
            .ok_or(HeatmapError::TimestampOutOfRange(ts))?;
        let to_anchor = self
            .week_anchor(to)
            .ok_or(HeatmapError::TimestampOutOfRange(ts))?;
        let days = (to_anchor - from_anchor).num_days();
        Ok((days / 7).max(0) as u32)
    }

    /// Maps a local civil time to an instant, handling DST edges: ambiguous
    /// times take the earlier instant, nonexistent times roll forward to the
    /// first instant after the gap (probed in half-hour steps, large enough
    /// for every historical transition).
    fn localize(&self, naive: NaiveDateTime) -> HeatmapResult<Timestamp> {
        let fallback = HeatmapError::TimestampOutOfRange(naive.and_utc().timestamp_millis());

        match self.config.timezone().from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(dt.timestamp_millis()),
            LocalResult::Ambiguous(earlier, _) => Ok(earlier.timestamp_millis()),
            LocalResult::None => {
                for half_hours in 1..=4_i64 {
                    let shifted = naive
                        .checked_add_signed(Duration::minutes(30 * half_hours))
                        .ok_or_else(|| HeatmapError::TimestampOutOfRange(i64::MAX))?;
                    match self.config.timezone().from_local_datetime(&shifted) {
                        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                            return Ok(dt.timestamp_millis());
                        }
                        LocalResult::None => {}
                    }
                }
                Err(fallback)
            }
        }
    }
}

fn days_from_week_start(weekday: Weekday, week_start: Weekday) -> u32 {
    (7 + weekday.num_days_from_monday() - week_start.num_days_from_monday()) % 7
}

fn advance_local(unit: Unit, floored: NaiveDateTime) -> Option<NaiveDateTime> {
    match unit {
        Unit::Minute => floored.checked_add_signed(Duration::minutes(1)),
        Unit::Hour => floored.checked_add_signed(Duration::hours(1)),
        Unit::Day => floored
            .date()
            .checked_add_days(Days::new(1))?
            .and_hms_opt(0, 0, 0),
        Unit::Week => floored
            .date()
            .checked_add_days(Days::new(7))?
            .and_hms_opt(0, 0, 0),
        Unit::Month => floored
            .date()
            .checked_add_months(Months::new(1))?
            .and_hms_opt(0, 0, 0),
        Unit::Year => {
            NaiveDate::from_ymd_opt(floored.year().checked_add(1)?, 1, 1)?.and_hms_opt(0, 0, 0)
        }
    }
}

fn days_in_month_of(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.checked_sub_days(Days::new(1)))
        .map_or(30, |last| last.day())
}
