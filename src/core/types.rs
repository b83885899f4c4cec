use serde::{Deserialize, Serialize};

/// Epoch milliseconds, always interpreted in the engine's configured timezone.
pub type Timestamp = i64;

/// One domain or subdomain instance: canonical start timestamp plus its
/// zero-based grid coordinate within the parent bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub t: Timestamp,
    pub x: u32,
    pub y: u32,
}

impl Bucket {
    #[must_use]
    pub fn new(t: Timestamp, x: u32, y: u32) -> Self {
        Self { t, x, y }
    }
}
