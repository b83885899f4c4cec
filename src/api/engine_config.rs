use serde::{Deserialize, Serialize};

use crate::core::{AggregationPolicy, Timestamp, WeekStart};
use crate::error::{HeatmapError, HeatmapResult};

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load calendar
/// setup without inventing their own ad-hoc format. Template names and the
/// timezone are kept as strings here; they are resolved and validated once at
/// engine construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapEngineConfig {
    /// Name of the domain template, e.g. `"month"`.
    pub domain: String,
    /// Name of the subdomain template, e.g. `"day"`.
    pub subdomain: String,
    /// Any timestamp inside the first visible domain.
    pub start: Timestamp,
    /// Number of consecutive domains in the window.
    #[serde(default = "default_range")]
    pub range: usize,
    /// IANA timezone name.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub week_start: WeekStart,
    /// Value attached to buckets with no usable sample.
    #[serde(default)]
    pub default_value: Option<f64>,
    #[serde(default)]
    pub aggregation: AggregationPolicy,
}

impl HeatmapEngineConfig {
    /// Creates a minimal config with default window length, UTC timezone, and
    /// sum aggregation.
    #[must_use]
    pub fn new(domain: impl Into<String>, subdomain: impl Into<String>, start: Timestamp) -> Self {
        Self {
            domain: domain.into(),
            subdomain: subdomain.into(),
            start,
            range: default_range(),
            timezone: default_timezone(),
            week_start: WeekStart::default(),
            default_value: None,
            aggregation: AggregationPolicy::default(),
        }
    }

    /// Sets the number of domains in the window.
    #[must_use]
    pub fn with_range(mut self, range: usize) -> Self {
        self.range = range;
        self
    }

    /// Sets the IANA timezone name.
    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Sets the first day of the week.
    #[must_use]
    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    /// Sets the value attached to buckets with no usable sample.
    #[must_use]
    pub fn with_default_value(mut self, default_value: Option<f64>) -> Self {
        self.default_value = default_value;
        self
    }

    /// Sets the sample aggregation policy.
    #[must_use]
    pub fn with_aggregation(mut self, aggregation: AggregationPolicy) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> HeatmapResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| HeatmapError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> HeatmapResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| HeatmapError::InvalidConfig(format!("failed to parse config: {e}")))
    }
}

fn default_range() -> usize {
    12
}

fn default_timezone() -> String {
    "UTC".to_owned()
}
