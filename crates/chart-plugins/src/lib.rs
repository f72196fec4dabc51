// File: crates/chart-plugins/src/lib.rs
// Summary: Plugin crate entry point; background, annotation and data-label draw hooks.

pub mod annotation;
pub mod background;
pub mod datalabels;

pub use annotation::{Annotations, AnnotationError};
pub use background::{BackgroundError, BackgroundOptions, CanvasBackground};
pub use datalabels::{DataLabels, LabelContext};
