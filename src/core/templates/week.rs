use crate::core::date_helper::DateHelper;
use crate::core::template::{Template, TemplateContext, Unit, unsupported_pairing};
use crate::core::types::{Bucket, Timestamp};
use crate::error::HeatmapResult;

/// Week buckets in a single-row strip.
///
/// Positional rule: `y` = 0; `x` = week row counted from the start of the
/// mapped range's month (month domain) or year (year domain, or the week
/// template acting as the domain). A partial boundary week belongs to two
/// adjacent parents at once; counting rows from the range keeps it on row 0
/// of the later parent instead of colliding with the earlier parent's last
/// row.
#[derive(Debug, Clone, Copy)]
pub struct WeekTemplate {
    helper: DateHelper,
    parent: Unit,
}

impl WeekTemplate {
    #[must_use]
    pub fn new(helper: &DateHelper, context: TemplateContext) -> Self {
        Self {
            helper: *helper,
            parent: context.domain_unit().unwrap_or(Unit::Week),
        }
    }
}

impl Template for WeekTemplate {
    fn unit(&self) -> Unit {
        Unit::Week
    }

    fn rows_count(&self, _ts: Timestamp) -> HeatmapResult<u32> {
        Ok(1)
    }

    fn columns_count(&self, ts: Timestamp) -> HeatmapResult<u32> {
        match self.parent {
            Unit::Month => self.helper.weeks_in_month(ts),
            Unit::Year | Unit::Week => self.helper.weeks_in_year(ts),
            other => Err(unsupported_pairing("week", other)),
        }
    }

    fn mapping(&self, start: Timestamp, end: Timestamp) -> HeatmapResult<Vec<Bucket>> {
        let starts = self.helper.intervals(Unit::Week, start, end)?;
        if starts.is_empty() {
            return Ok(Vec::new());
        }

        let base = match self.parent {
            Unit::Month => self.helper.start_of(Unit::Month, start)?,
            Unit::Year | Unit::Week => self.helper.start_of(Unit::Year, start)?,
            other => return Err(unsupported_pairing("week", other)),
        };

        let mut buckets = Vec::with_capacity(starts.len());
        for ts in starts {
            buckets.push(Bucket::new(ts, self.helper.week_rows_between(base, ts)?, 0));
        }

        Ok(buckets)
    }

    fn extract_unit(&self, ts: Timestamp) -> HeatmapResult<Timestamp> {
        self.helper.start_of(Unit::Week, ts)
    }

    fn domain_label(&self) -> &'static str {
        "week %W, %Y"
    }
}
