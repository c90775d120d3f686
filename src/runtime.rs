use anyhow::{anyhow, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::data::Dataset;
use crate::impact::ImpactResult;
use crate::model::PlotView;
use crate::parser::parse_pipeline;
use crate::resolve::LockReason;
use crate::settings::{FilterSettings, SettingsUpdate};
use crate::visibility::{panel_title, Control};
use crate::DashboardOptions;

/// Everything the presentation layer needs to draw one plot's settings panel
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotReport {
    pub settings: FilterSettings,
    pub title: &'static str,
    pub controls: Vec<Control>,
    pub group_by_options: Vec<String>,
    pub group_by: GroupByReport,
    pub impact: Option<ImpactReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupByReport {
    pub field: String,
    pub lock: LockReason,
    pub disabled: bool,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    #[serde(flatten)]
    pub result: ImpactResult,
    pub summary: String,
}

/// Parse an update pipeline into control changes
pub fn parse_updates(dsl: &str) -> Result<Vec<SettingsUpdate>> {
    let (_, pipeline) = parse_pipeline(dsl).map_err(|e| anyhow!("Parse error: {:?}", e))?;
    Ok(pipeline.updates())
}

/// Apply `dsl` to `settings` through a plot view and report the outcome
pub fn evaluate(
    dataset: Arc<Dataset>,
    options: &DashboardOptions,
    settings: FilterSettings,
    dsl: &str,
) -> Result<PlotReport> {
    let updates = parse_updates(dsl)?;

    let mut view = PlotView::new(settings, dataset, options.grouping.clone(), options.category)
        .with_default_group_by(options.default_group_by.clone());

    for update in &updates {
        let changed = view.apply(update);
        debug!(?update, changed, "applied update");
    }

    Ok(report(&view))
}

/// Snapshot a view's current state
pub fn report(view: &PlotView) -> PlotReport {
    let settings = view.settings().clone();
    let group_by = view.group_by();

    PlotReport {
        title: panel_title(settings.plot_type),
        controls: view.controls().to_vec(),
        group_by_options: view.dataset().group_by_options(),
        group_by: GroupByReport {
            field: group_by.field.clone(),
            lock: group_by.lock,
            disabled: group_by.is_locked(),
            label: group_by.label(),
            hint: group_by.hint(),
        },
        impact: view.impact().map(|result| ImpactReport {
            result: *result,
            summary: result.summary(),
        }),
        settings,
    }
}
