// File: crates/chart-core/src/engine.rs
// Summary: Engine handle: default options, plugin registry and the live chart-instance registry.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{Map, Value};

use crate::colour::Colour;
use crate::plugin::{Plugin, PluginRegistry};
use crate::types::Padding;

/// Engine-wide defaults a chart falls back to when its configuration is silent.
#[derive(Clone, Debug)]
pub struct Defaults {
    /// CSS-style family list used for every piece of text.
    pub font_family: String,
    pub font_size: f32,
    pub font_color: Colour,
    /// Slant and weight keywords, e.g. `"bold"` or `"italic 600"`.
    pub font_style: String,
    /// Fill and stroke for elements whose dataset sets no colour.
    pub default_color: Colour,
    pub grid_color: Colour,
    pub zero_line_color: Colour,
    pub layout_padding: Padding,
    pub bar_percentage: f32,
    pub category_percentage: f32,
    pub line_width: f32,
    pub point_radius: f32,
    /// Per-plugin option blocks, merged under each chart's `options.plugins.<id>`.
    pub plugins: Map<String, Value>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            font_family: "'Helvetica Neue', 'Helvetica', 'Arial', sans-serif".to_string(),
            font_size: 12.0,
            font_color: Colour::rgba(0x66, 0x66, 0x66, 255),
            font_style: "normal".to_string(),
            default_color: Colour::rgba(0, 0, 0, 26),
            grid_color: Colour::rgba(0, 0, 0, 26),
            zero_line_color: Colour::rgba(0, 0, 0, 64),
            layout_padding: Padding::default(),
            bar_percentage: 0.9,
            category_percentage: 0.8,
            line_width: 3.0,
            point_radius: 3.0,
            plugins: Map::new(),
        }
    }
}

/// Identifies one chart instance within its engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChartId(u64);

impl ChartId {
    pub const fn get(self) -> u64 { self.0 }
}

impl std::fmt::Display for ChartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chart#{}", self.0)
    }
}

/// An isolated charting engine. Nothing here is process-global: two handles never observe each
/// other's defaults, plugins or chart instances.
pub struct Engine {
    pub defaults: Defaults,
    plugins: PluginRegistry,
    instances: Mutex<BTreeSet<ChartId>>,
    next_id: AtomicU64,
}

impl Default for Engine {
    fn default() -> Self { Self::new() }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            defaults: Defaults::default(),
            plugins: PluginRegistry::new(),
            instances: Mutex::new(BTreeSet::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn plugins(&self) -> &PluginRegistry { &self.plugins }
    pub fn plugins_mut(&mut self) -> &mut PluginRegistry { &mut self.plugins }

    pub fn register_plugin<P: Plugin + 'static>(&mut self, plugin: P) {
        self.plugins.register(plugin);
    }

    pub fn register_plugin_arc(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.register_arc(plugin);
    }

    /// Set the engine-level default options for plugin `id`.
    pub fn set_plugin_defaults(&mut self, id: impl Into<String>, options: Value) {
        self.defaults.plugins.insert(id.into(), options);
    }

    /// Charts created on this engine and not yet destroyed.
    pub fn instance_count(&self) -> usize {
        self.instances.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub(crate) fn attach(&self) -> ChartId {
        let id = ChartId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.instances.lock().unwrap_or_else(PoisonError::into_inner).insert(id);
        id
    }

    pub(crate) fn detach(&self, id: ChartId) -> bool {
        self.instances.lock().unwrap_or_else(PoisonError::into_inner).remove(&id)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("defaults", &self.defaults)
            .field("plugins", &self.plugins)
            .field("instances", &self.instance_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Noop;
    impl Plugin for Noop {
        fn id(&self) -> &str { "noop" }
    }

    #[test]
    fn handles_are_independent() {
        let mut a = Engine::new();
        let b = Engine::new();
        a.defaults.font_size = 20.0;
        a.register_plugin(Noop);
        a.set_plugin_defaults("noop", json!({"enabled": true}));
        assert_eq!(b.defaults.font_size, 12.0);
        assert!(b.plugins().is_empty());
        assert!(b.defaults.plugins.is_empty());
    }

    #[test]
    fn instance_ids_are_tracked() {
        let e = Engine::new();
        let first = e.attach();
        let second = e.attach();
        assert_ne!(first, second);
        assert_eq!(e.instance_count(), 2);
        assert!(e.detach(first));
        assert!(!e.detach(first));
        assert_eq!(e.instance_count(), 1);
    }
}
