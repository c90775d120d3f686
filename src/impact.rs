//! Filter impact: how many records a candidate cutoff range would remove.

use crate::data::{Dataset, Value};
use crate::settings::FilterSettings;
use crate::visibility::{is_applicable, Control};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Impact above this percentage is flagged as high
pub const HIGH_IMPACT_PERCENT: u32 = 30;

/// Data category a plot belongs to. Impact is only reported for cell statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCategory {
    CellRnaStats,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CutoffRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl CutoffRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn from_settings(settings: &FilterSettings) -> Self {
        Self::new(settings.cutoff_min, settings.cutoff_max)
    }

    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Each bound is checked on its own, so an inverted range excludes
    /// every value that falls outside either side.
    pub fn excludes(&self, v: f64) -> bool {
        self.min.is_some_and(|min| v < min) || self.max.is_some_and(|max| v > max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactResult {
    pub affected_count: usize,
    pub total_count: usize,
    pub percent: u32,
    pub is_high_impact: bool,
}

impl ImpactResult {
    pub fn summary(&self) -> String {
        format!(
            "Removing {} of {} cells ({}%)",
            self.affected_count, self.total_count, self.percent
        )
    }
}

/// Scan `values` once and count what `range` would exclude.
///
/// Returns `None` when no bound is set or the column is empty. Every cell is
/// compared through [`Value::to_number`], so a missing cell reads as 0 and is
/// excluded by any positive minimum. Text without a numeric reading is part of
/// the total but never excluded.
pub fn compute_impact(values: &[Value], range: CutoffRange) -> Option<ImpactResult> {
    if !range.is_set() || values.is_empty() {
        return None;
    }

    let total_count = values.len();
    let affected_count = values
        .iter()
        .filter_map(Value::to_number)
        .filter(|&v| range.excludes(v))
        .count();

    let percent = ((affected_count as f64 / total_count as f64) * 100.0).round() as u32;

    Some(ImpactResult {
        affected_count,
        total_count,
        percent,
        is_high_impact: percent > HIGH_IMPACT_PERCENT,
    })
}

/// Impact of the plot's current cutoffs on its field, when that is meaningful
pub fn filter_impact(
    settings: &FilterSettings,
    dataset: &Dataset,
    category: DataCategory,
) -> Option<ImpactResult> {
    if category != DataCategory::CellRnaStats
        || !is_applicable(settings.plot_type, Control::CutoffThresholds)
        || !settings.has_cutoffs()
    {
        return None;
    }

    let Some(column) = dataset.column(&settings.field) else {
        debug!(field = %settings.field, "impact skipped: column not in dataset");
        return None;
    };

    compute_impact(&column.data, CutoffRange::from_settings(settings))
}
