//! Built-in templates, one per calendar granularity.
//!
//! Each template documents its own positional rule; the rule is the
//! template's defining characteristic.

pub mod day;
pub mod hour;
pub mod minute;
pub mod month;
pub mod week;
pub mod year;

pub use day::DayTemplate;
pub use hour::HourTemplate;
pub use minute::MinuteTemplate;
pub use month::MonthTemplate;
pub use week::WeekTemplate;
pub use year::YearTemplate;
