use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_N_BINS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotType {
    Histogram,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    #[default]
    Linear,
    Log,
}

/// Per-plot configuration.
///
/// Value type: every change produces a new instance through
/// [`SettingsUpdate::apply`] or a transform passed to
/// [`crate::model::FilterSettingsModel::apply_update`]. Zoom, bin count, y-axis
/// scale and cutoffs only mean something for histograms; on a bar plot they
/// are kept but inert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSettings {
    #[serde(rename = "type")]
    pub plot_type: PlotType,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
    #[serde(default)]
    pub x_axis_type: AxisType,
    #[serde(default)]
    pub y_axis_type: AxisType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_max: Option<f64>,
    #[serde(default = "default_n_bins", deserialize_with = "positive_n_bins")]
    pub n_bins: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff_max: Option<f64>,
}

fn default_n_bins() -> u32 {
    DEFAULT_N_BINS
}

/// Bin count of 0 or `null` reads as the default
fn positive_n_bins<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = Option::<u32>::deserialize(deserializer)?;
    Ok(bins_or_default(n))
}

fn bins_or_default(n: Option<u32>) -> u32 {
    n.filter(|&n| n > 0).unwrap_or(DEFAULT_N_BINS)
}

impl FilterSettings {
    pub fn new(plot_type: PlotType, field: impl Into<String>) -> Self {
        Self {
            plot_type,
            field: field.into(),
            group_by: None,
            x_axis_type: AxisType::Linear,
            y_axis_type: AxisType::Linear,
            zoom_min: None,
            zoom_max: None,
            n_bins: DEFAULT_N_BINS,
            cutoff_min: None,
            cutoff_max: None,
        }
    }

    pub fn histogram(field: impl Into<String>) -> Self {
        Self::new(PlotType::Histogram, field)
    }

    pub fn bar(field: impl Into<String>) -> Self {
        Self::new(PlotType::Bar, field)
    }

    pub fn is_histogram(&self) -> bool {
        self.plot_type == PlotType::Histogram
    }

    /// True when at least one cutoff bound is set
    pub fn has_cutoffs(&self) -> bool {
        self.cutoff_min.is_some() || self.cutoff_max.is_some()
    }
}

/// A single control change. Each variant touches exactly one field.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsUpdate {
    PlotType(PlotType),
    Field(String),
    GroupBy(Option<String>),
    XAxis(AxisType),
    YAxis(AxisType),
    ZoomMin(Option<f64>),
    ZoomMax(Option<f64>),
    Bins(Option<u32>),
    CutoffMin(Option<f64>),
    CutoffMax(Option<f64>),
}

impl SettingsUpdate {
    /// Build the next settings value; `current` is left untouched
    pub fn apply(&self, current: &FilterSettings) -> FilterSettings {
        let next = current.clone();
        match self {
            SettingsUpdate::PlotType(t) => FilterSettings { plot_type: *t, ..next },
            SettingsUpdate::Field(f) => FilterSettings { field: f.clone(), ..next },
            SettingsUpdate::GroupBy(g) => FilterSettings { group_by: g.clone(), ..next },
            SettingsUpdate::XAxis(a) => FilterSettings { x_axis_type: *a, ..next },
            SettingsUpdate::YAxis(a) => FilterSettings { y_axis_type: *a, ..next },
            SettingsUpdate::ZoomMin(v) => FilterSettings { zoom_min: finite(*v), ..next },
            SettingsUpdate::ZoomMax(v) => FilterSettings { zoom_max: finite(*v), ..next },
            SettingsUpdate::Bins(n) => FilterSettings { n_bins: bins_or_default(*n), ..next },
            SettingsUpdate::CutoffMin(v) => FilterSettings { cutoff_min: finite(*v), ..next },
            SettingsUpdate::CutoffMax(v) => FilterSettings { cutoff_max: finite(*v), ..next },
        }
    }
}

/// NaN and infinities are stored as "unset"
fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}
