//! Settings ownership and the update channel.
//!
//! [`FilterSettingsModel`] is the single mutation entry point for one plot's
//! settings. [`PlotView`] wraps a model together with the shared inputs it is
//! rendered against and keeps the derived outputs (group-by resolution and
//! filter impact) current by recomputing them whenever a watched input changes.

use crate::data::Dataset;
use crate::impact::{filter_impact, DataCategory, ImpactResult};
use crate::resolve::{resolve_group_by, GroupingContext, ResolvedGroupBy, DEFAULT_GROUP_BY};
use crate::settings::{FilterSettings, PlotType, SettingsUpdate};
use crate::visibility::{applicable_controls, Control};
use std::sync::Arc;
use tracing::{debug, trace};

/// Receives every accepted settings change
pub trait SettingsListener {
    fn settings_changed(&mut self, settings: &FilterSettings, revision: u64);
}

impl<F> SettingsListener for F
where
    F: FnMut(&FilterSettings, u64),
{
    fn settings_changed(&mut self, settings: &FilterSettings, revision: u64) {
        self(settings, revision)
    }
}

pub struct FilterSettingsModel {
    current: FilterSettings,
    revision: u64,
    listeners: Vec<Box<dyn SettingsListener>>,
}

impl std::fmt::Debug for FilterSettingsModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterSettingsModel")
            .field("current", &self.current)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl FilterSettingsModel {
    pub fn new(settings: FilterSettings) -> Self {
        Self {
            current: settings,
            revision: 0,
            listeners: Vec::new(),
        }
    }

    pub fn settings(&self) -> &FilterSettings {
        &self.current
    }

    /// Number of accepted changes so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&mut self, listener: impl SettingsListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply `transform` to the current settings and store its result.
    ///
    /// Returns `true` when the stored value changed. An update yielding an
    /// equal value does not bump the revision or notify listeners.
    pub fn apply_update<F>(&mut self, transform: F) -> bool
    where
        F: FnOnce(&FilterSettings) -> FilterSettings,
    {
        let next = transform(&self.current);
        if next == self.current {
            trace!("settings update produced no change");
            return false;
        }

        self.current = next;
        self.revision += 1;
        debug!(revision = self.revision, settings = ?self.current, "settings updated");

        for listener in &mut self.listeners {
            listener.settings_changed(&self.current, self.revision);
        }
        true
    }
}

/// Inputs the impact scan depends on
#[derive(Debug, Clone, PartialEq)]
struct ImpactInputs {
    plot_type: PlotType,
    field: String,
    cutoff_min: Option<f64>,
    cutoff_max: Option<f64>,
    category: DataCategory,
    dataset: usize,
}

/// Inputs group-by resolution depends on
#[derive(Debug, Clone, PartialEq)]
struct GroupingInputs {
    context: GroupingContext,
    local: Option<String>,
    default_field: String,
}

/// One plot: its settings model, the shared data it reads, and cached derived state
pub struct PlotView {
    model: FilterSettingsModel,
    dataset: Arc<Dataset>,
    context: GroupingContext,
    category: DataCategory,
    default_group_by: String,

    grouping_inputs: GroupingInputs,
    group_by: ResolvedGroupBy,
    impact_inputs: ImpactInputs,
    impact: Option<ImpactResult>,
    impact_evaluations: u64,
}

impl PlotView {
    pub fn new(
        settings: FilterSettings,
        dataset: Arc<Dataset>,
        context: GroupingContext,
        category: DataCategory,
    ) -> Self {
        let model = FilterSettingsModel::new(settings);
        let default_group_by = DEFAULT_GROUP_BY.to_string();

        let grouping_inputs = grouping_inputs(model.settings(), &context, &default_group_by);
        let group_by = resolve_grouping(&grouping_inputs);
        let impact_inputs = impact_inputs(model.settings(), &dataset, category);
        let impact = filter_impact(model.settings(), &dataset, category);

        Self {
            model,
            dataset,
            context,
            category,
            default_group_by,
            grouping_inputs,
            group_by,
            impact_inputs,
            impact,
            impact_evaluations: 1,
        }
    }

    /// Use a different fallback grouping column
    pub fn with_default_group_by(mut self, field: impl Into<String>) -> Self {
        self.default_group_by = field.into();
        self.refresh();
        self
    }

    pub fn settings(&self) -> &FilterSettings {
        self.model.settings()
    }

    pub fn revision(&self) -> u64 {
        self.model.revision()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn context(&self) -> &GroupingContext {
        &self.context
    }

    pub fn category(&self) -> DataCategory {
        self.category
    }

    pub fn subscribe(&mut self, listener: impl SettingsListener + 'static) {
        self.model.subscribe(listener);
    }

    /// Push a transform through the update channel, then refresh derived state
    pub fn apply_update<F>(&mut self, transform: F) -> bool
    where
        F: FnOnce(&FilterSettings) -> FilterSettings,
    {
        let changed = self.model.apply_update(transform);
        if changed {
            self.refresh();
        }
        changed
    }

    /// Apply one control change
    pub fn apply(&mut self, update: &SettingsUpdate) -> bool {
        self.apply_update(|current| update.apply(current))
    }

    pub fn set_context(&mut self, context: GroupingContext) {
        self.context = context;
        self.refresh();
    }

    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.dataset = dataset;
        self.refresh();
    }

    pub fn set_category(&mut self, category: DataCategory) {
        self.category = category;
        self.refresh();
    }

    pub fn group_by(&self) -> &ResolvedGroupBy {
        &self.group_by
    }

    pub fn impact(&self) -> Option<&ImpactResult> {
        self.impact.as_ref()
    }

    pub fn controls(&self) -> &'static [Control] {
        applicable_controls(self.settings().plot_type)
    }

    /// How many times the impact scan has run
    pub fn impact_evaluations(&self) -> u64 {
        self.impact_evaluations
    }

    fn refresh(&mut self) {
        let settings = self.model.settings();

        let grouping = grouping_inputs(settings, &self.context, &self.default_group_by);
        if grouping != self.grouping_inputs {
            self.group_by = resolve_grouping(&grouping);
            self.grouping_inputs = grouping;
            debug!(field = %self.group_by.field, lock = ?self.group_by.lock, "group-by resolved");
        }

        let inputs = impact_inputs(settings, &self.dataset, self.category);
        if inputs != self.impact_inputs {
            self.impact = filter_impact(settings, &self.dataset, self.category);
            self.impact_inputs = inputs;
            self.impact_evaluations += 1;
            debug!(impact = ?self.impact, "filter impact recomputed");
        }
    }
}

fn grouping_inputs(
    settings: &FilterSettings,
    context: &GroupingContext,
    default_field: &str,
) -> GroupingInputs {
    GroupingInputs {
        context: context.clone(),
        local: settings.group_by.clone(),
        default_field: default_field.to_string(),
    }
}

fn resolve_grouping(inputs: &GroupingInputs) -> ResolvedGroupBy {
    resolve_group_by(&inputs.context, inputs.local.as_deref(), &inputs.default_field)
}

fn impact_inputs(settings: &FilterSettings, dataset: &Arc<Dataset>, category: DataCategory) -> ImpactInputs {
    ImpactInputs {
        plot_type: settings.plot_type,
        field: settings.field.clone(),
        cutoff_min: settings.cutoff_min,
        cutoff_max: settings.cutoff_max,
        category,
        // datasets are immutable, so identity stands in for content
        dataset: Arc::as_ptr(dataset) as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use crate::resolve::LockReason;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn make_dataset() -> Arc<Dataset> {
        Arc::new(
            Dataset::new(vec![
                Column::numeric("n_counts", &[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]),
                Column::numeric("n_genes", &[10.0, 20.0, 30.0, 40.0, 50.0, 60.0]),
                Column::categorical("plate", &["p1", "p1", "p2", "p2", "p3", "p3"]),
            ])
            .unwrap(),
        )
    }

    fn make_view() -> PlotView {
        PlotView::new(
            FilterSettings::histogram("n_counts"),
            make_dataset(),
            GroupingContext::default(),
            DataCategory::CellRnaStats,
        )
    }

    #[test]
    fn test_model_applies_transform() {
        let mut model = FilterSettingsModel::new(FilterSettings::histogram("n_counts"));
        let changed = model.apply_update(|s| FilterSettings {
            cutoff_max: Some(10.0),
            ..s.clone()
        });
        assert!(changed);
        assert_eq!(model.settings().cutoff_max, Some(10.0));
        assert_eq!(model.revision(), 1);
    }

    #[test]
    fn test_identity_transform_is_noop() {
        let mut view = make_view();
        view.apply(&SettingsUpdate::CutoffMax(Some(10.0)));
        let before = view.settings().clone();
        let impact_before = view.impact().copied();
        let revision = view.revision();

        let changed = view.apply_update(|s| s.clone());

        assert!(!changed);
        assert_eq!(view.settings(), &before);
        assert_eq!(view.impact().copied(), impact_before);
        assert_eq!(view.revision(), revision);
    }

    #[test]
    fn test_listeners_see_each_change() {
        let seen: Rc<RefCell<Vec<(Option<f64>, u64)>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut view = make_view();
        view.subscribe(move |s: &FilterSettings, rev: u64| sink.borrow_mut().push((s.cutoff_min, rev)));

        view.apply(&SettingsUpdate::CutoffMin(Some(2.0)));
        view.apply(&SettingsUpdate::CutoffMin(Some(2.0)));
        view.apply(&SettingsUpdate::CutoffMin(None));

        assert_eq!(*seen.borrow(), vec![(Some(2.0), 1), (None, 2)]);
    }

    #[test]
    fn test_impact_follows_cutoffs() {
        let mut view = make_view();
        assert_eq!(view.impact(), None);

        view.apply(&SettingsUpdate::CutoffMax(Some(10.0)));
        let impact = view.impact().unwrap();
        assert_eq!(impact.affected_count, 1);
        assert_eq!(impact.percent, 17);

        view.apply(&SettingsUpdate::CutoffMin(Some(3.0)));
        assert_eq!(view.impact().unwrap().affected_count, 3);

        view.apply(&SettingsUpdate::Field("n_genes".to_string()));
        // every n_genes value except 10 is above the max
        assert_eq!(view.impact().unwrap().affected_count, 5);
    }

    #[test]
    fn test_unwatched_fields_do_not_rescan() {
        let mut view = make_view();
        view.apply(&SettingsUpdate::CutoffMax(Some(10.0)));
        let evaluations = view.impact_evaluations();

        view.apply(&SettingsUpdate::Bins(Some(25)));
        view.apply(&SettingsUpdate::ZoomMin(Some(0.0)));
        view.apply(&SettingsUpdate::YAxis(crate::settings::AxisType::Log));

        assert_eq!(view.impact_evaluations(), evaluations);
        assert_eq!(view.settings().n_bins, 25);
    }

    #[test]
    fn test_switching_to_bar_hides_impact() {
        let mut view = make_view();
        view.apply(&SettingsUpdate::CutoffMax(Some(10.0)));
        assert!(view.impact().is_some());

        view.apply(&SettingsUpdate::PlotType(PlotType::Bar));
        assert_eq!(view.impact(), None);
        assert!(!view.controls().contains(&Control::CutoffThresholds));
        // cutoffs are kept, just inert
        assert_eq!(view.settings().cutoff_max, Some(10.0));
    }

    #[test]
    fn test_context_change_reresolves_group_by() {
        let mut view = make_view();
        view.apply(&SettingsUpdate::GroupBy(Some("plate".to_string())));
        assert_eq!(view.group_by().field, "plate");

        view.set_context(GroupingContext {
            force_group_by: None,
            global_group_by: Some("sample_id".to_string()),
            is_global_grouping_enabled: true,
        });
        assert_eq!(view.group_by().field, "sample_id");
        assert_eq!(view.group_by().lock, LockReason::Global);

        view.set_context(GroupingContext {
            is_global_grouping_enabled: false,
            ..view.context().clone()
        });
        assert_eq!(view.group_by().field, "plate");
    }

    #[test]
    fn test_default_group_by_override() {
        let view = make_view().with_default_group_by("cell_id");
        assert_eq!(view.group_by().field, "cell_id");
    }

    #[test]
    fn test_new_dataset_triggers_rescan() {
        let mut view = make_view();
        view.apply(&SettingsUpdate::CutoffMax(Some(10.0)));
        assert_eq!(view.impact().unwrap().affected_count, 1);

        let replacement = Arc::new(
            Dataset::new(vec![Column::numeric("n_counts", &[50.0, 60.0])]).unwrap(),
        );
        view.set_dataset(replacement);
        let impact = view.impact().unwrap();
        assert_eq!(impact.affected_count, 2);
        assert_eq!(impact.percent, 100);

        view.set_category(DataCategory::Other);
        assert_eq!(view.impact(), None);
    }
}
