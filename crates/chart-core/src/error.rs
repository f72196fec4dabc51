// File: crates/chart-core/src/error.rs
// Summary: Engine error type; plugin failures keep their original error as the source.

use thiserror::Error;

use crate::colour::ColourError;

/// Error type plugins return from hooks. Kept boxed so callers can downcast to the plugin's own type.
pub type PluginError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid chart configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Colour(#[from] ColourError),
    #[error("invalid chart configuration: {0}")]
    Invalid(String),
    #[error("plugin '{id}' failed in {hook}: {source}")]
    Plugin {
        id: String,
        hook: &'static str,
        #[source]
        source: PluginError,
    },
    #[error("chart is not bound to a canvas")]
    NoCanvas,
    #[error("chart has no drawing context")]
    NoContext,
    #[error("chart has not been laid out; call update() first")]
    NotLaidOut,
}

impl ChartError {
    /// The plugin's own error, when this failure came out of a hook.
    pub fn plugin_source(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            ChartError::Plugin { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
