use crate::settings::PlotType;
use serde::Serialize;

/// Settings controls the presentation layer can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Control {
    ZoomRange,
    GroupBy,
    BinCount,
    XAxisScale,
    YAxisScale,
    CutoffThresholds,
}

const HISTOGRAM_CONTROLS: &[Control] = &[
    Control::ZoomRange,
    Control::GroupBy,
    Control::BinCount,
    Control::XAxisScale,
    Control::YAxisScale,
    Control::CutoffThresholds,
];

const BAR_CONTROLS: &[Control] = &[Control::GroupBy, Control::XAxisScale];

/// Controls that mean something for `plot_type`, in display order
pub fn applicable_controls(plot_type: PlotType) -> &'static [Control] {
    match plot_type {
        PlotType::Histogram => HISTOGRAM_CONTROLS,
        PlotType::Bar => BAR_CONTROLS,
    }
}

pub fn is_applicable(plot_type: PlotType, control: Control) -> bool {
    applicable_controls(plot_type).contains(&control)
}

pub fn panel_title(plot_type: PlotType) -> &'static str {
    if is_applicable(plot_type, Control::CutoffThresholds) {
        "Visualisation Settings & Filter Thresholds"
    } else {
        "Visualisation Settings"
    }
}
