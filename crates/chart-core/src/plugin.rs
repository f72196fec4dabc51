// File: crates/chart-core/src/plugin.rs
// Summary: Plugin contract (lifecycle hooks), the per-engine plugin registry and option resolution.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::chart::Chart;
use crate::error::PluginError;

pub type HookResult = Result<(), PluginError>;

/// Lifecycle points at which the engine calls into plugins, in the order a render visits them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    BeforeInit,
    AfterInit,
    BeforeUpdate,
    AfterLayout,
    AfterUpdate,
    BeforeDraw,
    BeforeDatasetsDraw,
    AfterDatasetsDraw,
    AfterDraw,
    Destroy,
}

impl Hook {
    pub const fn name(self) -> &'static str {
        match self {
            Hook::BeforeInit => "beforeInit",
            Hook::AfterInit => "afterInit",
            Hook::BeforeUpdate => "beforeUpdate",
            Hook::AfterLayout => "afterLayout",
            Hook::AfterUpdate => "afterUpdate",
            Hook::BeforeDraw => "beforeDraw",
            Hook::BeforeDatasetsDraw => "beforeDatasetsDraw",
            Hook::AfterDatasetsDraw => "afterDatasetsDraw",
            Hook::AfterDraw => "afterDraw",
            Hook::Destroy => "destroy",
        }
    }
}

impl std::fmt::Display for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A draw/lifecycle extension registered on an [`Engine`](crate::Engine).
///
/// Every hook receives the chart being rendered and this plugin's options for that chart: the
/// engine's defaults for [`Plugin::id`] deep-merged with the chart's own `options.plugins.<id>`
/// block. Hooks are skipped entirely for charts that set that block to `false`.
///
/// A hook error aborts the current render; it reaches the caller as
/// [`ChartError::Plugin`](crate::ChartError::Plugin) with the error kept as its source.
pub trait Plugin: Send + Sync {
    fn id(&self) -> &str;

    fn before_init(&self, _chart: &Chart<'_>, _options: &Value) -> HookResult { Ok(()) }
    fn after_init(&self, _chart: &Chart<'_>, _options: &Value) -> HookResult { Ok(()) }
    fn before_update(&self, _chart: &Chart<'_>, _options: &Value) -> HookResult { Ok(()) }
    fn after_layout(&self, _chart: &Chart<'_>, _options: &Value) -> HookResult { Ok(()) }
    fn after_update(&self, _chart: &Chart<'_>, _options: &Value) -> HookResult { Ok(()) }
    /// Called after layout, before anything but the clear has been painted.
    fn before_draw(&self, _chart: &Chart<'_>, _easing: f64, _options: &Value) -> HookResult { Ok(()) }
    fn before_datasets_draw(&self, _chart: &Chart<'_>, _easing: f64, _options: &Value) -> HookResult { Ok(()) }
    fn after_datasets_draw(&self, _chart: &Chart<'_>, _easing: f64, _options: &Value) -> HookResult { Ok(()) }
    fn after_draw(&self, _chart: &Chart<'_>, _easing: f64, _options: &Value) -> HookResult { Ok(()) }
    fn destroy(&self, _chart: &Chart<'_>, _options: &Value) -> HookResult { Ok(()) }
}

/// Ordered plugin list, unique by id.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn register<P: Plugin + 'static>(&mut self, plugin: P) {
        self.register_arc(Arc::new(plugin));
    }

    /// Add `plugin`; a plugin already registered under the same id is replaced in place.
    pub fn register_arc(&mut self, plugin: Arc<dyn Plugin>) {
        if let Some(slot) = self.plugins.iter_mut().find(|p| p.id() == plugin.id()) {
            tracing::warn!(id = plugin.id(), "plugin registered twice; replacing the earlier one");
            *slot = plugin;
        } else {
            tracing::debug!(id = plugin.id(), "plugin registered");
            self.plugins.push(plugin);
        }
    }

    pub fn unregister(&mut self, id: &str) -> Option<Arc<dyn Plugin>> {
        let pos = self.plugins.iter().position(|p| p.id() == id)?;
        Some(self.plugins.remove(pos))
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Plugin>> {
        self.plugins.iter().find(|p| p.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool { self.get(id).is_some() }

    pub fn ids(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.id()).collect()
    }

    pub fn count(&self) -> usize { self.plugins.len() }
    pub fn is_empty(&self) -> bool { self.plugins.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Plugin>> {
        self.plugins.iter()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.plugins.iter().map(|p| p.id())).finish()
    }
}

/// Effective options for one plugin on one chart, or `None` when the chart disabled it.
pub fn resolve_options(defaults: Option<&Value>, chart: Option<&Value>) -> Option<Value> {
    let mut merged = match defaults {
        Some(Value::Object(map)) => Value::Object(map.clone()),
        _ => Value::Object(Map::new()),
    };
    match chart {
        Some(Value::Bool(false)) => return None,
        Some(overlay @ Value::Object(_)) => merge_values(&mut merged, overlay),
        _ => {}
    }
    Some(merged)
}

/// Deep-merge `overlay` into `base`. Objects merge key by key; anything else replaces.
pub fn merge_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(dst), Value::Object(src)) => {
            for (k, v) in src {
                match dst.get_mut(k) {
                    Some(existing) => merge_values(existing, v),
                    None => {
                        dst.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (dst, src) => *dst = src.clone(),
    }
}
