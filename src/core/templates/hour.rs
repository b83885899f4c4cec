use chrono::{Datelike, Timelike};

use crate::core::date_helper::DateHelper;
use crate::core::template::{Template, TemplateContext, Unit, unsupported_pairing};
use crate::core::types::{Bucket, Timestamp};
use crate::error::HeatmapResult;

/// Hour buckets in a six-row grid, four columns per day.
///
/// Positional rule: `y` = hour % 6. In a day domain, `x` = hour / 6; in a
/// week domain, `x` = day-of-week * 4 + hour / 6; in a month domain,
/// `x` = (day-of-month - 1) * 4 + hour / 6.
#[derive(Debug, Clone, Copy)]
pub struct HourTemplate {
    helper: DateHelper,
    parent: Unit,
}

impl HourTemplate {
    #[must_use]
    pub fn new(helper: &DateHelper, context: TemplateContext) -> Self {
        Self {
            helper: *helper,
            parent: context.domain_unit().unwrap_or(Unit::Hour),
        }
    }
}

impl Template for HourTemplate {
    fn unit(&self) -> Unit {
        Unit::Hour
    }

    fn rows_count(&self, _ts: Timestamp) -> HeatmapResult<u32> {
        Ok(6)
    }

    fn columns_count(&self, ts: Timestamp) -> HeatmapResult<u32> {
        match self.parent {
            Unit::Day | Unit::Hour => Ok(4),
            Unit::Week => Ok(28),
            Unit::Month => Ok(self.helper.days_in_month(ts)? * 4),
            other => Err(unsupported_pairing("hour", other)),
        }
    }

    fn mapping(&self, start: Timestamp, end: Timestamp) -> HeatmapResult<Vec<Bucket>> {
        let mut buckets = Vec::new();

        for ts in self.helper.intervals(Unit::Hour, start, end)? {
            let date = self.helper.date(ts)?;
            let column_of_day = date.hour() / 6;
            let x = match self.parent {
                Unit::Day | Unit::Hour => column_of_day,
                Unit::Week => self.helper.day_of_week_index(ts)? * 4 + column_of_day,
                Unit::Month => (date.day() - 1) * 4 + column_of_day,
                other => return Err(unsupported_pairing("hour", other)),
            };
            buckets.push(Bucket::new(ts, x, date.hour() % 6));
        }

        Ok(buckets)
    }

    fn extract_unit(&self, ts: Timestamp) -> HeatmapResult<Timestamp> {
        self.helper.start_of(Unit::Hour, ts)
    }

    fn domain_label(&self) -> &'static str {
        "%H:00"
    }
}
