use chrono::Datelike;

use crate::core::date_helper::DateHelper;
use crate::core::template::{Template, TemplateContext, Unit};
use crate::core::types::{Bucket, Timestamp};
use crate::error::HeatmapResult;

/// Month buckets in a single twelve-column strip.
///
/// Positional rule: `x` = calendar month index 0..11, `y` = 0, regardless of
/// the parent domain.
#[derive(Debug, Clone, Copy)]
pub struct MonthTemplate {
    helper: DateHelper,
}

impl MonthTemplate {
    #[must_use]
    pub fn new(helper: &DateHelper, _context: TemplateContext) -> Self {
        Self { helper: *helper }
    }
}

impl Template for MonthTemplate {
    fn unit(&self) -> Unit {
        Unit::Month
    }

    fn rows_count(&self, _ts: Timestamp) -> HeatmapResult<u32> {
        Ok(1)
    }

    fn columns_count(&self, _ts: Timestamp) -> HeatmapResult<u32> {
        Ok(12)
    }

    fn mapping(&self, start: Timestamp, end: Timestamp) -> HeatmapResult<Vec<Bucket>> {
        let mut buckets = Vec::new();

        for ts in self.helper.intervals(Unit::Month, start, end)? {
            buckets.push(Bucket::new(ts, self.helper.date(ts)?.month0(), 0));
        }

        Ok(buckets)
    }

    fn extract_unit(&self, ts: Timestamp) -> HeatmapResult<Timestamp> {
        self.helper.start_of(Unit::Month, ts)
    }

    fn domain_label(&self) -> &'static str {
        "%B %Y"
    }
}
