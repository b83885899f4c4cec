use tracing::{debug, trace, warn};

use crate::core::{
    AggregationPolicy, CalendarConfig, DataSet, DateHelper, DomainCollection, Template,
    TemplateContext, TemplateRegistry, Timestamp, Unit, validate_pairing,
};
use crate::error::{HeatmapError, HeatmapResult};
use crate::extensions::PluginManager;

use super::HeatmapEngineConfig;

/// Main orchestration facade consumed by host applications.
///
/// `HeatmapEngine` resolves templates once at construction, tracks the
/// visible window as a whole number of domains, and turns a window plus a
/// sparse dataset into a `DomainCollection`. Building is a pure
/// transformation; navigation only moves the window anchor.
pub struct HeatmapEngine {
    helper: DateHelper,
    domain_template: Box<dyn Template>,
    subdomain_template: Box<dyn Template>,
    domain_unit: Unit,
    window_start: Timestamp,
    range: usize,
    default_value: Option<f64>,
    aggregation: AggregationPolicy,
    plugins: PluginManager,
}

impl HeatmapEngine {
    /// Builds an engine with the built-in template set.
    pub fn new(config: HeatmapEngineConfig) -> HeatmapResult<Self> {
        Self::with_registry(config, &TemplateRegistry::with_builtins())
    }

    /// Builds an engine resolving templates from a caller-supplied registry.
    ///
    /// All configuration errors (unknown template or timezone, invalid
    /// domain/subdomain pairing, zero-length window) surface here, never at
    /// mapping time.
    pub fn with_registry(
        config: HeatmapEngineConfig,
        registry: &TemplateRegistry,
    ) -> HeatmapResult<Self> {
        if config.range == 0 {
            return Err(HeatmapError::InvalidConfig(
                "window must span at least one domain".to_owned(),
            ));
        }

        let calendar = CalendarConfig::new(&config.timezone, config.week_start)?;
        let helper = DateHelper::new(calendar);

        let domain_template =
            registry.instantiate(&config.domain, &helper, TemplateContext::as_domain())?;
        let domain_unit = domain_template.unit();
        let subdomain_template = registry.instantiate(
            &config.subdomain,
            &helper,
            TemplateContext::within(domain_unit),
        )?;
        validate_pairing(domain_unit, subdomain_template.unit())?;

        let window_start = helper.start_of(domain_unit, config.start)?;

        Ok(Self {
            helper,
            domain_template,
            subdomain_template,
            domain_unit,
            window_start,
            range: config.range,
            default_value: config.default_value,
            aggregation: config.aggregation,
            plugins: PluginManager::new(),
        })
    }

    #[must_use]
    pub fn domain_unit(&self) -> Unit {
        self.domain_unit
    }

    #[must_use]
    pub fn subdomain_unit(&self) -> Unit {
        self.subdomain_template.unit()
    }

    #[must_use]
    pub fn window_start(&self) -> Timestamp {
        self.window_start
    }

    /// Current inclusive window covering `range` whole domains.
    pub fn window(&self) -> HeatmapResult<(Timestamp, Timestamp)> {
        let mut end = self.window_start;
        for _ in 0..self.range {
            end = self.helper.next_start(self.domain_unit, end)?;
        }
        Ok((self.window_start, end - 1))
    }

    /// Builds the domain collection for the current window and dataset.
    ///
    /// Pure transformation: nothing is retained, concurrent callers can build
    /// from a shared engine reference without coordination.
    pub fn build(&self, data: &DataSet) -> HeatmapResult<DomainCollection> {
        let (start, end) = self.window()?;
        let mut collection = DomainCollection::build(
            &self.helper,
            self.domain_template.as_ref(),
            self.subdomain_template.as_ref(),
            start,
            end,
        )?;

        let skipped = collection.fill(
            data,
            self.subdomain_template.as_ref(),
            self.aggregation,
            self.default_value,
        )?;
        if skipped > 0 {
            warn!(skipped, "skipped non-finite samples while filling collection");
        }

        debug!(
            domains = collection.len(),
            window_start = start,
            window_end = end,
            "built domain collection"
        );
        Ok(collection)
    }

    /// Builds the collection and runs the plugin setup/paint cycle.
    pub fn paint(&mut self, data: &DataSet) -> HeatmapResult<DomainCollection> {
        let collection = self.build(data)?;
        self.plugins.setup_all()?;
        self.plugins.paint_all()?;
        Ok(collection)
    }

    /// Shifts the window forward by `count` whole domains.
    pub fn next(&mut self, count: usize) -> HeatmapResult<()> {
        for _ in 0..count {
            self.window_start = self.helper.next_start(self.domain_unit, self.window_start)?;
        }
        trace!(window_start = self.window_start, "navigated forward");
        Ok(())
    }

    /// Shifts the window backward by `count` whole domains.
    pub fn previous(&mut self, count: usize) -> HeatmapResult<()> {
        for _ in 0..count {
            self.window_start = self.helper.start_of(self.domain_unit, self.window_start - 1)?;
        }
        trace!(window_start = self.window_start, "navigated backward");
        Ok(())
    }

    /// Moves the window so its first domain contains `ts`.
    pub fn jump_to(&mut self, ts: Timestamp) -> HeatmapResult<()> {
        self.window_start = self.helper.start_of(self.domain_unit, ts)?;
        trace!(window_start = self.window_start, "jumped");
        Ok(())
    }

    /// Subdomain grid shape `(rows, columns)` for the domain containing `ts`,
    /// used by the rendering layer to size the drawing surface.
    pub fn dimensions(&self, ts: Timestamp) -> HeatmapResult<(u32, u32)> {
        Ok((
            self.subdomain_template.rows_count(ts)?,
            self.subdomain_template.columns_count(ts)?,
        ))
    }

    /// Axis label for the domain containing `ts`.
    pub fn domain_label(&self, ts: Timestamp) -> HeatmapResult<String> {
        self.helper.format(ts, self.domain_template.domain_label())
    }

    /// Normalizes an arbitrary timestamp to its domain bucket's start; used
    /// by legend collaborators to bucket their own statistics consistently.
    pub fn normalize_to_domain(&self, ts: Timestamp) -> HeatmapResult<Timestamp> {
        self.domain_template.extract_unit(ts)
    }

    /// Normalizes an arbitrary timestamp to its subdomain bucket's start.
    pub fn normalize_to_subdomain(&self, ts: Timestamp) -> HeatmapResult<Timestamp> {
        self.subdomain_template.extract_unit(ts)
    }

    #[must_use]
    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    pub fn plugins_mut(&mut self) -> &mut PluginManager {
        &mut self.plugins
    }

    /// Tears down every registered plugin.
    pub fn destroy(&mut self) -> HeatmapResult<()> {
        self.plugins.destroy_all()
    }
}
