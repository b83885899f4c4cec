use chrono::Timelike;

use crate::core::date_helper::DateHelper;
use crate::core::template::{Template, TemplateContext, Unit, unsupported_pairing};
use crate::core::types::{Bucket, Timestamp};
use crate::error::HeatmapResult;

/// Minute buckets in a ten-row grid.
///
/// Positional rule: `y` = minute % 10. In an hour domain, 6 columns with
/// `x` = minute / 10; in a day domain, 144 columns with
/// `x` = hour * 6 + minute / 10.
#[derive(Debug, Clone, Copy)]
pub struct MinuteTemplate {
    helper: DateHelper,
    parent: Unit,
}

impl MinuteTemplate {
    #[must_use]
    pub fn new(helper: &DateHelper, context: TemplateContext) -> Self {
        Self {
            helper: *helper,
            parent: context.domain_unit().unwrap_or(Unit::Minute),
        }
    }
}

impl Template for MinuteTemplate {
    fn unit(&self) -> Unit {
        Unit::Minute
    }

    fn rows_count(&self, _ts: Timestamp) -> HeatmapResult<u32> {
        Ok(10)
    }

    fn columns_count(&self, _ts: Timestamp) -> HeatmapResult<u32> {
        match self.parent {
            Unit::Hour => Ok(6),
            Unit::Day => Ok(144),
            other => Err(unsupported_pairing("minute", other)),
        }
    }

    fn mapping(&self, start: Timestamp, end: Timestamp) -> HeatmapResult<Vec<Bucket>> {
        let mut buckets = Vec::new();

        for ts in self.helper.intervals(Unit::Minute, start, end)? {
            let date = self.helper.date(ts)?;
            let x = match self.parent {
                Unit::Hour => date.minute() / 10,
                Unit::Day => date.hour() * 6 + date.minute() / 10,
                other => return Err(unsupported_pairing("minute", other)),
            };
            buckets.push(Bucket::new(ts, x, date.minute() % 10));
        }

        Ok(buckets)
    }

    fn extract_unit(&self, ts: Timestamp) -> HeatmapResult<Timestamp> {
        self.helper.start_of(Unit::Minute, ts)
    }

    fn domain_label(&self) -> &'static str {
        "%H:%M"
    }
}
