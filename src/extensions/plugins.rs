use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HeatmapResult;

/// Edge of the calendar surface a plugin attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginPosition {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PluginDimensions {
    pub width: f64,
    pub height: f64,
}

/// Options attached to one plugin instance.
///
/// `key` disambiguates multiple instances of the same plugin; `extras` carries
/// plugin-specific settings opaque to the manager. Equality over the whole
/// struct drives re-setup deduplication.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PluginOptions {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub position: Option<PluginPosition>,
    #[serde(default)]
    pub dimensions: Option<PluginDimensions>,
    #[serde(default)]
    pub extras: Value,
}

/// Lifecycle hooks for auxiliary visual add-ons (legends, tooltips).
///
/// Plugins consume the engine's outputs; the manager only tracks their
/// setup/paint/destroy state.
pub trait HeatmapPlugin {
    fn name(&self) -> &'static str;

    fn setup(&mut self, options: &PluginOptions) -> HeatmapResult<()>;

    fn paint(&mut self) -> HeatmapResult<()>;

    fn destroy(&mut self) -> HeatmapResult<()>;
}

struct PluginSetting {
    options: PluginOptions,
    dirty: bool,
}

/// Bookkeeping for registered plugins: options-equality deduplication, dirty
/// setup tracking, and a pending-paint queue, in insertion order.
#[derive(Default)]
pub struct PluginManager {
    settings: IndexMap<String, PluginSetting>,
    plugins: IndexMap<String, Box<dyn HeatmapPlugin>>,
    pending_paint: Vec<String>,
}

impl PluginManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or re-configures) a plugin.
    ///
    /// An already-registered plugin with equal options is a no-op; changed
    /// options mark the entry dirty and queue a repaint. The first instance
    /// registered under a storage key is kept.
    pub fn add(&mut self, plugin: Box<dyn HeatmapPlugin>, options: PluginOptions) {
        let key = storage_key(plugin.name(), &options);

        if let Some(setting) = self.settings.get(&key) {
            if self.plugins.contains_key(&key) && setting.options == options {
                return;
            }
        }

        self.settings.insert(
            key.clone(),
            PluginSetting {
                options,
                dirty: true,
            },
        );
        self.plugins.entry(key.clone()).or_insert(plugin);

        if !self.pending_paint.contains(&key) {
            self.pending_paint.push(key);
        }
    }

    /// Runs `setup` on every plugin whose options changed since its last setup.
    pub fn setup_all(&mut self) -> HeatmapResult<()> {
        for (key, setting) in &mut self.settings {
            if !setting.dirty {
                continue;
            }
            if let Some(plugin) = self.plugins.get_mut(key) {
                plugin.setup(&setting.options)?;
            }
            setting.dirty = false;
        }
        Ok(())
    }

    /// Paints every plugin queued since the last paint pass, draining the queue.
    pub fn paint_all(&mut self) -> HeatmapResult<()> {
        for key in std::mem::take(&mut self.pending_paint) {
            if let Some(plugin) = self.plugins.get_mut(&key) {
                plugin.paint()?;
            }
        }
        Ok(())
    }

    /// Destroys every plugin and clears all bookkeeping.
    pub fn destroy_all(&mut self) -> HeatmapResult<()> {
        for plugin in self.plugins.values_mut() {
            plugin.destroy()?;
        }
        self.plugins.clear();
        self.settings.clear();
        self.pending_paint.clear();
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Plugins attached to `position`, in registration order.
    pub fn plugins_at(&self, position: PluginPosition) -> impl Iterator<Item = &dyn HeatmapPlugin> {
        self.settings
            .iter()
            .filter(move |(_, setting)| setting.options.position == Some(position))
            .filter_map(|(key, _)| self.plugins.get(key).map(|plugin| plugin.as_ref()))
    }

    #[must_use]
    pub fn height_at(&self, position: PluginPosition) -> f64 {
        self.dimension_sum(position, |dimensions| dimensions.height)
    }

    #[must_use]
    pub fn width_at(&self, position: PluginPosition) -> f64 {
        self.dimension_sum(position, |dimensions| dimensions.width)
    }

    fn dimension_sum(&self, position: PluginPosition, axis: fn(PluginDimensions) -> f64) -> f64 {
        self.settings
            .values()
            .filter(|setting| setting.options.position == Some(position))
            .filter_map(|setting| setting.options.dimensions)
            .map(axis)
            .sum()
    }
}

fn storage_key(name: &str, options: &PluginOptions) -> String {
    format!("{name}{}", options.key.as_deref().unwrap_or(""))
}
