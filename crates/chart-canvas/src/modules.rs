// File: crates/chart-canvas/src/modules.rs
// Summary: Module registry with a shared cache and fresh (uncached) loads for per-engine isolation.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use chart_core::Plugin;
use chart_plugins::{Annotations, CanvasBackground, DataLabels};
use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::debug;

pub type Module = Arc<dyn Any + Send + Sync>;
type Initializer = Arc<dyn Fn() -> anyhow::Result<Module> + Send + Sync>;

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("cannot find module '{0}'")]
    NotFound(String),
    #[error("module '{id}' failed to initialise: {cause:#}")]
    Init { id: String, cause: anyhow::Error },
    #[error("module '{id}' is not a {expected}")]
    WrongType { id: String, expected: &'static str },
}

/// A plugin exported by a module, ready to hand to [`chart_core::Engine::register_plugin_arc`].
#[derive(Clone)]
pub struct PluginModule(pub Arc<dyn Plugin>);

impl fmt::Debug for PluginModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PluginModule").field(&self.0.id()).finish()
    }
}

/// Modules are defined by id with an initializer. `require` initialises once and caches;
/// `load_fresh` always initialises and leaves the cache as it found it.
#[derive(Default)]
pub struct ModuleLoader {
    definitions: HashMap<String, Initializer>,
    aliases: HashMap<String, String>,
    cache: HashMap<String, Module>,
}

impl ModuleLoader {
    pub fn new() -> Self { Self::default() }

    /// Loader pre-populated with the bundled chart plugins.
    pub fn with_bundled_plugins() -> Self {
        let mut loader = Self::new();
        loader.define("chart-plugins/annotation", || Ok(PluginModule(Arc::new(Annotations::new()))));
        loader.define("chart-plugins/datalabels", || Ok(PluginModule(Arc::new(DataLabels::new()))));
        loader.define("chart-plugins/canvas-background", || Ok(PluginModule(Arc::new(CanvasBackground::new()))));
        loader.alias("annotation", "chart-plugins/annotation");
        loader.alias("datalabels", "chart-plugins/datalabels");
        loader.alias("canvas-background", "chart-plugins/canvas-background");
        loader
    }

    /// Define (or redefine) module `id`. A cached instance stays until the next fresh load.
    pub fn define<T, F>(&mut self, id: impl Into<String>, init: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let init: Initializer = Arc::new(move || Ok(Arc::new(init()?) as Module));
        self.definitions.insert(id.into(), init);
    }

    pub fn alias(&mut self, name: impl Into<String>, id: impl Into<String>) {
        self.aliases.insert(name.into(), id.into());
    }

    /// Canonical id for `name`.
    pub fn resolve(&self, name: &str) -> Result<String, ModuleError> {
        let id = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        if self.definitions.contains_key(id) {
            Ok(id.to_string())
        } else {
            Err(ModuleError::NotFound(name.to_string()))
        }
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.resolve(name).is_ok_and(|id| self.cache.contains_key(&id))
    }

    pub fn require(&mut self, name: &str) -> Result<Module, ModuleError> {
        let id = self.resolve(name)?;
        if let Some(module) = self.cache.get(&id) {
            return Ok(Arc::clone(module));
        }
        let module = self.initialise(&id)?;
        self.cache.insert(id, Arc::clone(&module));
        Ok(module)
    }

    /// Initialise `name` anew, bypassing the cache. Whatever was cached before (or nothing)
    /// is restored afterwards, including when initialisation fails.
    pub fn load_fresh(&mut self, name: &str) -> Result<Module, ModuleError> {
        let id = self.resolve(name)?;
        let previous = self.cache.remove(&id);
        let loaded = self.require(&id);
        match previous {
            Some(module) => {
                self.cache.insert(id, module);
            }
            None => {
                self.cache.remove(&id);
            }
        }
        loaded
    }

    pub fn require_as<T: Any + Send + Sync>(&mut self, name: &str) -> Result<Arc<T>, ModuleError> {
        let module = self.require(name)?;
        downcast(name, module)
    }

    pub fn load_fresh_as<T: Any + Send + Sync>(&mut self, name: &str) -> Result<Arc<T>, ModuleError> {
        let module = self.load_fresh(name)?;
        downcast(name, module)
    }

    /// A fresh plugin instance from a module exporting [`PluginModule`].
    pub fn load_fresh_plugin(&mut self, name: &str) -> Result<Arc<dyn Plugin>, ModuleError> {
        Ok(Arc::clone(&self.load_fresh_as::<PluginModule>(name)?.0))
    }

    fn initialise(&self, id: &str) -> Result<Module, ModuleError> {
        let init = self.definitions.get(id).ok_or_else(|| ModuleError::NotFound(id.to_string()))?;
        debug!(module = id, "initialising module");
        init().map_err(|cause| ModuleError::Init { id: id.to_string(), cause })
    }
}

fn downcast<T: Any + Send + Sync>(name: &str, module: Module) -> Result<Arc<T>, ModuleError> {
    module
        .downcast::<T>()
        .map_err(|_| ModuleError::WrongType { id: name.to_string(), expected: std::any::type_name::<T>() })
}

impl fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut defined: Vec<&String> = self.definitions.keys().collect();
        defined.sort();
        let mut cached: Vec<&String> = self.cache.keys().collect();
        cached.sort();
        f.debug_struct("ModuleLoader").field("defined", &defined).field("cached", &cached).finish()
    }
}

static GLOBAL: Lazy<Mutex<ModuleLoader>> = Lazy::new(|| Mutex::new(ModuleLoader::with_bundled_plugins()));

/// Process-wide loader shared by every service in the process.
pub fn global() -> &'static Mutex<ModuleLoader> {
    &GLOBAL
}
