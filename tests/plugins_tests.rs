use std::cell::RefCell;
use std::rc::Rc;

use calheat_rs::core::DataSet;
use calheat_rs::extensions::{
    HeatmapPlugin, PluginDimensions, PluginManager, PluginOptions, PluginPosition,
};
use calheat_rs::{HeatmapEngine, HeatmapEngineConfig, HeatmapResult};
use chrono::TimeZone;

struct RecordingPlugin {
    name: &'static str,
    calls: Rc<RefCell<Vec<String>>>,
}

impl RecordingPlugin {
    fn new(name: &'static str, calls: Rc<RefCell<Vec<String>>>) -> Box<Self> {
        Box::new(Self { name, calls })
    }

    fn record(&self, call: &str) {
        self.calls.borrow_mut().push(format!("{}:{call}", self.name));
    }
}

impl HeatmapPlugin for RecordingPlugin {
    fn name(&self) -> &'static str {
        self.name
    }

    fn setup(&mut self, _options: &PluginOptions) -> HeatmapResult<()> {
        self.record("setup");
        Ok(())
    }

    fn paint(&mut self) -> HeatmapResult<()> {
        self.record("paint");
        Ok(())
    }

    fn destroy(&mut self) -> HeatmapResult<()> {
        self.record("destroy");
        Ok(())
    }
}

fn options_with_extras(extras: serde_json::Value) -> PluginOptions {
    PluginOptions {
        extras,
        ..PluginOptions::default()
    }
}

#[test]
fn setup_runs_once_until_options_change() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut manager = PluginManager::new();

    manager.add(
        RecordingPlugin::new("legend", calls.clone()),
        options_with_extras(serde_json::json!({"steps": 4})),
    );
    manager.setup_all().expect("first setup");
    manager.setup_all().expect("repeat setup");
    assert_eq!(calls.borrow().as_slice(), ["legend:setup"]);

    // Re-adding with equal options is a no-op.
    manager.add(
        RecordingPlugin::new("legend", calls.clone()),
        options_with_extras(serde_json::json!({"steps": 4})),
    );
    manager.setup_all().expect("setup after no-op add");
    assert_eq!(calls.borrow().len(), 1);

    // Changed options mark the plugin dirty again.
    manager.add(
        RecordingPlugin::new("legend", calls.clone()),
        options_with_extras(serde_json::json!({"steps": 8})),
    );
    manager.setup_all().expect("setup after option change");
    assert_eq!(calls.borrow().as_slice(), ["legend:setup", "legend:setup"]);
    assert_eq!(manager.len(), 1);
}

#[test]
fn paint_all_drains_the_pending_queue() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut manager = PluginManager::new();

    manager.add(
        RecordingPlugin::new("legend", calls.clone()),
        PluginOptions::default(),
    );
    manager.add(
        RecordingPlugin::new("tooltip", calls.clone()),
        PluginOptions::default(),
    );

    manager.paint_all().expect("paint");
    manager.paint_all().expect("empty repaint");
    assert_eq!(calls.borrow().as_slice(), ["legend:paint", "tooltip:paint"]);
}

#[test]
fn key_disambiguates_instances_of_the_same_plugin() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut manager = PluginManager::new();

    let keyed = |key: &str| PluginOptions {
        key: Some(key.to_owned()),
        ..PluginOptions::default()
    };

    manager.add(RecordingPlugin::new("legend", calls.clone()), keyed("left"));
    manager.add(RecordingPlugin::new("legend", calls.clone()), keyed("right"));

    assert_eq!(manager.len(), 2);
    assert!(manager.has("legendleft"));
    assert!(manager.has("legendright"));
}

#[test]
fn destroy_all_tears_down_and_clears() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut manager = PluginManager::new();

    manager.add(
        RecordingPlugin::new("legend", calls.clone()),
        PluginOptions::default(),
    );
    manager.destroy_all().expect("destroy");

    assert!(manager.is_empty());
    assert_eq!(calls.borrow().as_slice(), ["legend:destroy"]);

    // A destroyed manager accepts fresh registrations.
    manager.add(
        RecordingPlugin::new("legend", calls.clone()),
        PluginOptions::default(),
    );
    assert_eq!(manager.len(), 1);
}

#[test]
fn positions_sum_their_dimensions() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut manager = PluginManager::new();

    let positioned = |key: &str, position, width, height| PluginOptions {
        key: Some(key.to_owned()),
        position: Some(position),
        dimensions: Some(PluginDimensions { width, height }),
        ..PluginOptions::default()
    };

    manager.add(
        RecordingPlugin::new("legend", calls.clone()),
        positioned("a", PluginPosition::Top, 120.0, 30.0),
    );
    manager.add(
        RecordingPlugin::new("legend", calls.clone()),
        positioned("b", PluginPosition::Top, 80.0, 20.0),
    );
    manager.add(
        RecordingPlugin::new("legend", calls.clone()),
        positioned("c", PluginPosition::Left, 40.0, 200.0),
    );

    assert_eq!(manager.height_at(PluginPosition::Top), 50.0);
    assert_eq!(manager.width_at(PluginPosition::Top), 200.0);
    assert_eq!(manager.width_at(PluginPosition::Left), 40.0);
    assert_eq!(manager.height_at(PluginPosition::Bottom), 0.0);
    assert_eq!(manager.plugins_at(PluginPosition::Top).count(), 2);
}

#[test]
fn engine_paint_runs_the_plugin_cycle() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let start = chrono::Utc
        .with_ymd_and_hms(2024, 2, 1, 0, 0, 0)
        .unwrap()
        .timestamp_millis();

    let config = HeatmapEngineConfig::new("month", "day", start).with_range(1);
    let mut engine = HeatmapEngine::new(config).expect("engine init");

    engine.plugins_mut().add(
        RecordingPlugin::new("legend", calls.clone()),
        PluginOptions::default(),
    );

    let collection = engine.paint(&DataSet::new()).expect("paint");
    assert_eq!(collection.len(), 1);
    assert_eq!(calls.borrow().as_slice(), ["legend:setup", "legend:paint"]);

    engine.destroy().expect("destroy");
    assert_eq!(
        calls.borrow().as_slice(),
        ["legend:setup", "legend:paint", "legend:destroy"]
    );
}
