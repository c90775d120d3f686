// Library exports for filterscope

pub mod data;
pub mod impact;
pub mod model;
pub mod parser;
pub mod resolve;
pub mod runtime;
pub mod settings;
pub mod visibility;

use crate::impact::DataCategory;
use crate::resolve::{GroupingContext, DEFAULT_GROUP_BY};
use serde::Deserialize;

/// Dashboard-wide options a plot is evaluated against
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOptions {
    #[serde(flatten)]
    pub grouping: GroupingContext,
    #[serde(default)]
    pub category: DataCategory,
    #[serde(default = "default_group_by")]
    pub default_group_by: String,
}

fn default_group_by() -> String {
    DEFAULT_GROUP_BY.to_string()
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            grouping: GroupingContext::default(),
            category: DataCategory::Other,
            default_group_by: default_group_by(),
        }
    }
}
