use std::sync::Arc;

use indexmap::IndexMap;

use crate::core::date_helper::DateHelper;
use crate::core::template::{Template, TemplateContext};
use crate::core::templates::{
    DayTemplate, HourTemplate, MinuteTemplate, MonthTemplate, WeekTemplate, YearTemplate,
};
use crate::error::{HeatmapError, HeatmapResult};

/// Constructor resolved by the registry: templates are built per engine from
/// the shared `DateHelper` and the parent-domain context.
pub type TemplateConstructor =
    Arc<dyn Fn(&DateHelper, TemplateContext) -> Box<dyn Template> + Send + Sync>;

/// Runtime mapping from template names to constructors.
///
/// Custom templates can be registered without modifying the engine; unknown
/// names fail at setup time, not at mapping time.
#[derive(Clone)]
pub struct TemplateRegistry {
    constructors: IndexMap<String, TemplateConstructor>,
}

impl TemplateRegistry {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            constructors: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_builtins() -> Self {
        fn boxed<T: Template + 'static>(template: T) -> Box<dyn Template> {
            Box::new(template)
        }

        let mut registry = Self::empty();
        registry.insert("minute", Arc::new(|h, c| boxed(MinuteTemplate::new(h, c))));
        registry.insert("hour", Arc::new(|h, c| boxed(HourTemplate::new(h, c))));
        registry.insert("day", Arc::new(|h, c| boxed(DayTemplate::new(h, c))));
        registry.insert("week", Arc::new(|h, c| boxed(WeekTemplate::new(h, c))));
        registry.insert("month", Arc::new(|h, c| boxed(MonthTemplate::new(h, c))));
        registry.insert("year", Arc::new(|h, c| boxed(YearTemplate::new(h, c))));
        registry
    }

    /// Registers a custom template constructor. Re-registering an existing
    /// name is rejected as a configuration error.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: TemplateConstructor,
    ) -> HeatmapResult<()> {
        let name = name.into();
        if self.constructors.contains_key(&name) {
            return Err(HeatmapError::InvalidConfig(format!(
                "template {name} is already registered"
            )));
        }
        self.constructors.insert(name, constructor);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> HeatmapResult<&TemplateConstructor> {
        self.constructors
            .get(name)
            .ok_or_else(|| HeatmapError::UnknownTemplate(name.to_owned()))
    }

    /// Resolves and invokes a constructor in one step.
    pub fn instantiate(
        &self,
        name: &str,
        helper: &DateHelper,
        context: TemplateContext,
    ) -> HeatmapResult<Box<dyn Template>> {
        Ok(self.resolve(name)?(helper, context))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    fn insert(&mut self, name: &str, constructor: TemplateConstructor) {
        self.constructors.insert(name.to_owned(), constructor);
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
