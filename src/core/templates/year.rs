use crate::core::date_helper::DateHelper;
use crate::core::template::{Template, TemplateContext, Unit};
use crate::core::types::{Bucket, Timestamp};
use crate::error::HeatmapResult;

/// Year buckets as single cells; consumers lay successive years out by index.
///
/// Positional rule: `x` = 0, `y` = 0.
#[derive(Debug, Clone, Copy)]
pub struct YearTemplate {
    helper: DateHelper,
}

impl YearTemplate {
    #[must_use]
    pub fn new(helper: &DateHelper, _context: TemplateContext) -> Self {
        Self { helper: *helper }
    }
}

impl Template for YearTemplate {
    fn unit(&self) -> Unit {
        Unit::Year
    }

    fn rows_count(&self, _ts: Timestamp) -> HeatmapResult<u32> {
        Ok(1)
    }

    fn columns_count(&self, _ts: Timestamp) -> HeatmapResult<u32> {
        Ok(1)
    }

    fn mapping(&self, start: Timestamp, end: Timestamp) -> HeatmapResult<Vec<Bucket>> {
        Ok(self
            .helper
            .intervals(Unit::Year, start, end)?
            .into_iter()
            .map(|ts| Bucket::new(ts, 0, 0))
            .collect())
    }

    fn extract_unit(&self, ts: Timestamp) -> HeatmapResult<Timestamp> {
        self.helper.start_of(Unit::Year, ts)
    }

    fn domain_label(&self) -> &'static str {
        "%Y"
    }
}
