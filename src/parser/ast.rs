// Abstract Syntax Tree for the settings-update DSL

use crate::settings::{AxisType, PlotType, SettingsUpdate};

/// Axis addressed by a scale command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// One pipeline step, as written by the user
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Type(PlotType),
    Field(String),
    /// `None` clears the plot's own choice
    GroupBy(Option<String>),
    Scale { axis: Axis, scale: AxisType },
    Zoom { min: Option<f64>, max: Option<f64> },
    ZoomMin(Option<f64>),
    ZoomMax(Option<f64>),
    Bins(Option<u32>),
    Cutoff { min: Option<f64>, max: Option<f64> },
    CutoffMin(Option<f64>),
    CutoffMax(Option<f64>),
}

impl Command {
    /// Lower to narrow per-field updates. Range commands become two updates.
    pub fn updates(&self) -> Vec<SettingsUpdate> {
        match self {
            Command::Type(t) => vec![SettingsUpdate::PlotType(*t)],
            Command::Field(f) => vec![SettingsUpdate::Field(f.clone())],
            Command::GroupBy(g) => vec![SettingsUpdate::GroupBy(g.clone())],
            Command::Scale { axis: Axis::X, scale } => vec![SettingsUpdate::XAxis(*scale)],
            Command::Scale { axis: Axis::Y, scale } => vec![SettingsUpdate::YAxis(*scale)],
            Command::Zoom { min, max } => {
                vec![SettingsUpdate::ZoomMin(*min), SettingsUpdate::ZoomMax(*max)]
            }
            Command::ZoomMin(v) => vec![SettingsUpdate::ZoomMin(*v)],
            Command::ZoomMax(v) => vec![SettingsUpdate::ZoomMax(*v)],
            Command::Bins(n) => vec![SettingsUpdate::Bins(*n)],
            Command::Cutoff { min, max } => {
                vec![SettingsUpdate::CutoffMin(*min), SettingsUpdate::CutoffMax(*max)]
            }
            Command::CutoffMin(v) => vec![SettingsUpdate::CutoffMin(*v)],
            Command::CutoffMax(v) => vec![SettingsUpdate::CutoffMax(*v)],
        }
    }
}

/// Complete update pipeline: `command | command | ...`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pipeline {
    pub commands: Vec<Command>,
}

impl Pipeline {
    pub fn updates(&self) -> Vec<SettingsUpdate> {
        self.commands.iter().flat_map(Command::updates).collect()
    }
}
