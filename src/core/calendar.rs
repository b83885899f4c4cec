use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{HeatmapError, HeatmapResult};

/// First day of the week, as carried by serializable configuration.
///
/// Defaults to Sunday, the common `en` locale convention; ISO-style
/// consumers opt into Monday explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    #[default]
    Sunday,
}

impl WeekStart {
    #[must_use]
    pub fn weekday(self) -> Weekday {
        match self {
            Self::Monday => Weekday::Mon,
            Self::Tuesday => Weekday::Tue,
            Self::Wednesday => Weekday::Wed,
            Self::Thursday => Weekday::Thu,
            Self::Friday => Weekday::Fri,
            Self::Saturday => Weekday::Sat,
            Self::Sunday => Weekday::Sun,
        }
    }
}

/// Calendar settings shared by every date computation of one engine instance.
///
/// Held by value and threaded through all template calls; there is no
/// ambient/global calendar state anywhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarConfig {
    timezone: Tz,
    week_start: Weekday,
}

impl CalendarConfig {
    /// Builds a config from an IANA timezone name, failing fast on unknown names.
    pub fn new(timezone: &str, week_start: WeekStart) -> HeatmapResult<Self> {
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|_| HeatmapError::InvalidConfig(format!("unknown IANA timezone: {timezone}")))?;

        Ok(Self {
            timezone,
            week_start: week_start.weekday(),
        })
    }

    #[must_use]
    pub fn utc(week_start: WeekStart) -> Self {
        Self {
            timezone: chrono_tz::UTC,
            week_start: week_start.weekday(),
        }
    }

    #[must_use]
    pub fn timezone(self) -> Tz {
        self.timezone
    }

    #[must_use]
    pub fn week_start(self) -> Weekday {
        self.week_start
    }
}
