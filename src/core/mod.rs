pub mod calendar;
pub mod collection;
pub mod date_helper;
pub mod registry;
pub mod template;
pub mod templates;
pub mod types;

pub use calendar::{CalendarConfig, WeekStart};
pub use collection::{AggregationPolicy, DataSet, DomainCollection, SubDomainCell};
pub use date_helper::DateHelper;
pub use registry::{TemplateConstructor, TemplateRegistry};
pub use template::{Template, TemplateContext, Unit, validate_pairing};
pub use types::{Bucket, Timestamp};
