use thiserror::Error;

pub type HeatmapResult<T> = Result<T, HeatmapError>;

#[derive(Debug, Error)]
pub enum HeatmapError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown calendar unit: {0}")]
    UnknownUnit(String),

    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(i64),

    #[error("conflicting samples for domain {domain}, subdomain {subdomain}")]
    SampleCollision { domain: i64, subdomain: i64 },
}
