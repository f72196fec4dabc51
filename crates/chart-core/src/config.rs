// File: crates/chart-core/src/config.rs
// Summary: Declarative chart configuration (type, data, options) deserialised from JSON.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::colour::Colour;
use crate::error::ChartError;
use crate::types::Padding;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
}

/// A full chart description. Owned by the caller and never mutated by a render.
#[derive(Clone, Debug, Deserialize)]
pub struct ChartConfiguration {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    #[serde(default)]
    pub data: ChartData,
    #[serde(default)]
    pub options: ChartOptions,
}

impl ChartConfiguration {
    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_value(value: Value) -> Result<Self, ChartError> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Structural checks serde cannot express.
    pub fn validate(&self) -> Result<(), ChartError> {
        for (i, ds) in self.data.datasets.iter().enumerate() {
            if ds.data.iter().flatten().any(|v| !v.is_finite()) {
                return Err(ChartError::Invalid(format!("dataset {i} contains a non-finite value")));
            }
            if ds.border_width.is_some_and(|w| w < 0.0) {
                return Err(ChartError::Invalid(format!("dataset {i} has a negative borderWidth")));
            }
        }
        if let (Some(min), Some(max)) = (self.options.scales.y.min, self.options.scales.y.max) {
            if min > max {
                return Err(ChartError::Invalid(format!("y scale min {min} exceeds max {max}")));
            }
        }
        Ok(())
    }

    /// Effective type of dataset `index` (its own override or the chart type).
    pub fn dataset_type(&self, index: usize) -> ChartType {
        self.data
            .datasets
            .get(index)
            .and_then(|d| d.dataset_type)
            .unwrap_or(self.chart_type)
    }

    /// Number of category slots on the x axis.
    pub fn category_count(&self) -> usize {
        let longest = self.data.datasets.iter().map(|d| d.data.len()).max().unwrap_or(0);
        self.data.labels.len().max(longest)
    }

    /// The chart's own option block for plugin `id`, if any.
    pub fn plugin_options(&self, id: &str) -> Option<&Value> {
        self.options.plugins.get(id)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChartData {
    #[serde(default, deserialize_with = "labels_as_strings")]
    pub labels: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub dataset_type: Option<ChartType>,
    #[serde(default)]
    pub data: Vec<Option<f64>>,
    #[serde(default)]
    pub background_color: Option<ColourSet>,
    #[serde(default)]
    pub border_color: Option<ColourSet>,
    #[serde(default)]
    pub border_width: Option<f32>,
    #[serde(default)]
    pub fill: Option<bool>,
    #[serde(default)]
    pub point_radius: Option<f32>,
    #[serde(default)]
    pub hidden: bool,
    /// Keys the engine does not interpret, kept for plugins (e.g. `datalabels`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single style for every element, or one per data point.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColourSet {
    One(Colour),
    Many(Vec<Colour>),
}

impl ColourSet {
    pub fn at(&self, index: usize) -> Option<&Colour> {
        match self {
            ColourSet::One(c) => Some(c),
            ColourSet::Many(cs) => cs.get(index),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChartOptions {
    #[serde(default)]
    pub title: TitleOptions,
    #[serde(default)]
    pub legend: LegendOptions,
    #[serde(default)]
    pub layout: LayoutOptions,
    #[serde(default)]
    pub scales: ScalesOptions,
    /// Per-plugin option blocks keyed by plugin id; `false` disables a plugin.
    #[serde(default)]
    pub plugins: Map<String, Value>,
    /// Browser-only settings (responsive, tooltips, animation…) are accepted and ignored.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleOptions {
    #[serde(default)]
    pub display: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub font_size: Option<f32>,
    #[serde(default)]
    pub font_color: Option<Colour>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LegendOptions {
    #[serde(default = "yes")]
    pub display: bool,
}

impl Default for LegendOptions {
    fn default() -> Self { Self { display: true } }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LayoutOptions {
    #[serde(default)]
    pub padding: Option<Padding>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ScalesOptions {
    #[serde(default)]
    pub x: AxisOptions,
    #[serde(default)]
    pub y: AxisOptions,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisOptions {
    #[serde(default = "yes")]
    pub display: bool,
    #[serde(default)]
    pub stacked: bool,
    #[serde(default)]
    pub begin_at_zero: bool,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub grid_lines: GridLineOptions,
    #[serde(default)]
    pub ticks: TickOptions,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            display: true,
            stacked: false,
            begin_at_zero: false,
            min: None,
            max: None,
            grid_lines: GridLineOptions::default(),
            ticks: TickOptions::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct GridLineOptions {
    #[serde(default = "yes")]
    pub display: bool,
    #[serde(default)]
    pub color: Option<Colour>,
}

impl Default for GridLineOptions {
    fn default() -> Self { Self { display: true, color: None } }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickOptions {
    #[serde(default = "yes")]
    pub display: bool,
    #[serde(default)]
    pub font_color: Option<Colour>,
    #[serde(default)]
    pub font_size: Option<f32>,
    /// Text placed before each numeric tick label (e.g. `$`).
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

impl Default for TickOptions {
    fn default() -> Self {
        Self { display: true, font_color: None, font_size: None, prefix: String::new(), suffix: String::new() }
    }
}

fn yes() -> bool { true }

// Category labels may be given as numbers; they are displayed verbatim.
fn labels_as_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|v| match v {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_labels_become_strings() {
        let c = ChartConfiguration::from_json(r#"{"type": "bar", "data": {"labels": [1, "two", 3.5]}}"#).unwrap();
        assert_eq!(c.data.labels, vec!["1", "two", "3.5"]);
    }

    #[test]
    fn dataset_type_falls_back_to_chart_type() {
        let c = ChartConfiguration::from_json(
            r#"{"type": "bar", "data": {"datasets": [{"data": [1]}, {"type": "line", "data": [2, 3, null]}]}}"#,
        )
        .unwrap();
        assert_eq!(c.dataset_type(0), ChartType::Bar);
        assert_eq!(c.dataset_type(1), ChartType::Line);
        assert_eq!(c.dataset_type(7), ChartType::Bar);
        assert_eq!(c.category_count(), 3);
        assert_eq!(c.data.datasets[1].data[2], None);
    }

    #[test]
    fn colour_sets_index_per_point() {
        let c = ChartConfiguration::from_json(
            r#"{"type": "bar", "data": {"datasets": [{"data": [1, 2], "backgroundColor": ["red", "blue"]}]}}"#,
        )
        .unwrap();
        let set = c.data.datasets[0].background_color.as_ref().unwrap();
        assert_eq!(set.at(1), Some(&Colour::parse("blue").unwrap()));
        assert_eq!(set.at(2), None);
    }

    #[test]
    fn unknown_keys_are_kept_for_plugins() {
        let c = ChartConfiguration::from_json(
            r#"{"type": "bar",
                "data": {"datasets": [{"data": [1], "datalabels": {"align": "end"}}]},
                "options": {"responsive": true, "plugins": {"canvasBackground": {"enabled": true}}}}"#,
        )
        .unwrap();
        assert!(c.data.datasets[0].extra.contains_key("datalabels"));
        assert!(c.options.extra.contains_key("responsive"));
        assert!(c.plugin_options("canvasBackground").is_some());
        assert!(c.options.legend.display);
    }

    #[test]
    fn rejects_unknown_chart_type_and_bad_values() {
        assert!(matches!(
            ChartConfiguration::from_json(r#"{"type": "radar"}"#),
            Err(ChartError::Config(_))
        ));
        assert!(matches!(
            ChartConfiguration::from_json(r#"{"type": "bar", "options": {"scales": {"y": {"min": 5, "max": 1}}}}"#),
            Err(ChartError::Invalid(_))
        ));
    }
}
