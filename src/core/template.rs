use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::types::{Bucket, Timestamp};
use crate::error::{HeatmapError, HeatmapResult};

/// Calendar granularity a template buckets by, ordered finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = HeatmapError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "minute" => Ok(Self::Minute),
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(HeatmapError::UnknownUnit(other.to_owned())),
        }
    }
}

/// Construction context for a template: the unit of the parent domain it will
/// be enumerated inside, or nothing when the template is itself the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateContext {
    domain_unit: Option<Unit>,
}

impl TemplateContext {
    /// Context for a template acting as the domain level.
    #[must_use]
    pub fn as_domain() -> Self {
        Self { domain_unit: None }
    }

    /// Context for a subdomain template enumerated inside `unit` domains.
    #[must_use]
    pub fn within(unit: Unit) -> Self {
        Self {
            domain_unit: Some(unit),
        }
    }

    #[must_use]
    pub fn domain_unit(self) -> Option<Unit> {
        self.domain_unit
    }
}

/// A pure, stateless descriptor of one calendar granularity's bucketing and
/// positional rules.
///
/// `rows_count`/`columns_count` are functions of the queried timestamp, not
/// constants, so variable-length buckets (a five-week month next to a
/// four-week month) report their own grid shape. `mapping` enumerates every
/// unit instance whose span intersects the range, in ascending `t` order, with
/// `(x, y)` unique within one parent bucket. `extract_unit` normalizes any
/// timestamp to its bucket's canonical start.
pub trait Template: Send + Sync {
    fn unit(&self) -> Unit;

    fn rows_count(&self, ts: Timestamp) -> HeatmapResult<u32>;

    fn columns_count(&self, ts: Timestamp) -> HeatmapResult<u32>;

    fn mapping(&self, start: Timestamp, end: Timestamp) -> HeatmapResult<Vec<Bucket>>;

    fn extract_unit(&self, ts: Timestamp) -> HeatmapResult<Timestamp>;

    /// chrono strftime pattern used for this template's axis labels.
    fn domain_label(&self) -> &'static str;
}

/// Checks that `subdomain` units nest inside `domain` units in a way the
/// built-in positional rules support.
pub fn validate_pairing(domain: Unit, subdomain: Unit) -> HeatmapResult<()> {
    let allowed: &[Unit] = match domain {
        Unit::Year => &[Unit::Month, Unit::Week, Unit::Day],
        Unit::Month => &[Unit::Week, Unit::Day, Unit::Hour],
        Unit::Week => &[Unit::Day, Unit::Hour],
        Unit::Day => &[Unit::Hour, Unit::Minute],
        Unit::Hour => &[Unit::Minute],
        Unit::Minute => &[],
    };

    if allowed.contains(&subdomain) {
        Ok(())
    } else {
        Err(HeatmapError::InvalidConfig(format!(
            "subdomain unit {subdomain} cannot nest inside domain unit {domain}"
        )))
    }
}

pub(crate) fn unsupported_pairing(template: &'static str, domain: Unit) -> HeatmapError {
    HeatmapError::InvalidConfig(format!(
        "{template} template has no positional rule for {domain} domains"
    ))
}
