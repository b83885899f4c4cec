//! Optional collaborator surfaces live here.
//!
//! Keep extensions decoupled from core mapping paths; they consume engine
//! outputs and never feed back into bucket computation.

pub mod plugins;

pub use plugins::{
    HeatmapPlugin, PluginDimensions, PluginManager, PluginOptions, PluginPosition,
};
