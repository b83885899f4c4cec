use crate::core::date_helper::DateHelper;
use crate::core::template::{Template, TemplateContext, Unit, unsupported_pairing};
use crate::core::types::{Bucket, Timestamp};
use crate::error::HeatmapResult;

/// Day buckets in a seven-row week grid honoring the configured week start.
///
/// Positional rule: `y` = day-of-week index. In a week domain, a single
/// column with `x` = 0; in a month domain, `x` = week-of-month; in a year
/// domain, `x` = week-of-year.
#[derive(Debug, Clone, Copy)]
pub struct DayTemplate {
    helper: DateHelper,
    parent: Unit,
}

impl DayTemplate {
    #[must_use]
    pub fn new(helper: &DateHelper, context: TemplateContext) -> Self {
        Self {
            helper: *helper,
            parent: context.domain_unit().unwrap_or(Unit::Day),
        }
    }
}

impl Template for DayTemplate {
    fn unit(&self) -> Unit {
        Unit::Day
    }

    fn rows_count(&self, _ts: Timestamp) -> HeatmapResult<u32> {
        Ok(7)
    }

    fn columns_count(&self, ts: Timestamp) -> HeatmapResult<u32> {
        match self.parent {
            Unit::Week => Ok(1),
            Unit::Month | Unit::Day => self.helper.weeks_in_month(ts),
            Unit::Year => self.helper.weeks_in_year(ts),
            other => Err(unsupported_pairing("day", other)),
        }
    }

    fn mapping(&self, start: Timestamp, end: Timestamp) -> HeatmapResult<Vec<Bucket>> {
        let mut buckets = Vec::new();

        for ts in self.helper.intervals(Unit::Day, start, end)? {
            let x = match self.parent {
                Unit::Week => 0,
                Unit::Month | Unit::Day => self.helper.week_of_month(ts)?,
                Unit::Year => self.helper.week_of_year(ts)?,
                other => return Err(unsupported_pairing("day", other)),
            };
            buckets.push(Bucket::new(ts, x, self.helper.day_of_week_index(ts)?));
        }

        Ok(buckets)
    }

    fn extract_unit(&self, ts: Timestamp) -> HeatmapResult<Timestamp> {
        self.helper.start_of(Unit::Day, ts)
    }

    fn domain_label(&self) -> &'static str {
        "%A %B %-d, %Y"
    }
}
