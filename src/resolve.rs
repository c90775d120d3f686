use serde::{Deserialize, Serialize};

/// Fallback grouping column when nothing else applies
pub const DEFAULT_GROUP_BY: &str = "sample_id";

/// Dashboard-level grouping inputs shared read-only by every plot
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingContext {
    /// Plot-level hard override
    #[serde(default)]
    pub force_group_by: Option<String>,
    /// Shared dashboard choice, only honoured when grouping is global
    #[serde(default)]
    pub global_group_by: Option<String>,
    #[serde(default)]
    pub is_global_grouping_enabled: bool,
}

/// Why the group-by selector is (or is not) locked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LockReason {
    Forced,
    Global,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGroupBy {
    pub field: String,
    pub lock: LockReason,
}

impl ResolvedGroupBy {
    /// A locked selector is shown disabled
    pub fn is_locked(&self) -> bool {
        self.lock != LockReason::None
    }

    pub fn label(&self) -> &'static str {
        match self.lock {
            LockReason::Forced => "Group By (Fixed)",
            LockReason::Global => "Group By (Global)",
            LockReason::None => "Group By",
        }
    }

    pub fn hint(&self) -> Option<String> {
        match self.lock {
            LockReason::Forced => Some(format!("This plot always uses \"{}\" grouping", self.field)),
            LockReason::Global => Some("Global group by setting is active".to_string()),
            LockReason::None => None,
        }
    }
}

/// Pick the effective grouping column.
///
/// Precedence: forced, then global (when enabled), then the plot's own choice,
/// then `default_field`. Empty strings count as absent.
pub fn resolve_group_by(
    context: &GroupingContext,
    local_group_by: Option<&str>,
    default_field: &str,
) -> ResolvedGroupBy {
    if let Some(forced) = present(context.force_group_by.as_deref()) {
        return ResolvedGroupBy {
            field: forced.to_string(),
            lock: LockReason::Forced,
        };
    }

    if context.is_global_grouping_enabled {
        if let Some(global) = present(context.global_group_by.as_deref()) {
            return ResolvedGroupBy {
                field: global.to_string(),
                lock: LockReason::Global,
            };
        }
    }

    let field = present(local_group_by).unwrap_or(default_field);
    ResolvedGroupBy {
        field: field.to_string(),
        lock: LockReason::None,
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(force: Option<&str>, global: Option<&str>, enabled: bool) -> GroupingContext {
        GroupingContext {
            force_group_by: force.map(str::to_string),
            global_group_by: global.map(str::to_string),
            is_global_grouping_enabled: enabled,
        }
    }

    #[test]
    fn test_forced_wins() {
        let ctx = context(Some("batch"), Some("sample_id"), true);
        let resolved = resolve_group_by(&ctx, Some("plate"), DEFAULT_GROUP_BY);
        assert_eq!(resolved.field, "batch");
        assert_eq!(resolved.lock, LockReason::Forced);
        assert!(resolved.is_locked());
        assert_eq!(resolved.label(), "Group By (Fixed)");
        assert_eq!(
            resolved.hint().as_deref(),
            Some("This plot always uses \"batch\" grouping")
        );
    }

    #[test]
    fn test_global_when_enabled() {
        let ctx = context(None, Some("sample_id"), true);
        let resolved = resolve_group_by(&ctx, Some("plate"), DEFAULT_GROUP_BY);
        assert_eq!(resolved.field, "sample_id");
        assert_eq!(resolved.lock, LockReason::Global);
        assert_eq!(resolved.label(), "Group By (Global)");
    }

    #[test]
    fn test_local_when_global_disabled() {
        let ctx = context(None, Some("sample_id"), false);
        let resolved = resolve_group_by(&ctx, Some("plate"), DEFAULT_GROUP_BY);
        assert_eq!(resolved.field, "plate");
        assert_eq!(resolved.lock, LockReason::None);
        assert!(!resolved.is_locked());
        assert_eq!(resolved.hint(), None);
    }

    #[test]
    fn test_enabled_without_global_value_falls_through() {
        let ctx = context(None, None, true);
        let resolved = resolve_group_by(&ctx, Some("plate"), DEFAULT_GROUP_BY);
        assert_eq!(resolved.field, "plate");
        assert_eq!(resolved.lock, LockReason::None);
    }

    #[test]
    fn test_default_fallback() {
        let resolved = resolve_group_by(&GroupingContext::default(), None, DEFAULT_GROUP_BY);
        assert_eq!(resolved.field, "sample_id");
        assert_eq!(resolved.lock, LockReason::None);
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let ctx = context(Some(""), Some(""), true);
        let resolved = resolve_group_by(&ctx, Some(""), "cell_id");
        assert_eq!(resolved.field, "cell_id");
        assert_eq!(resolved.lock, LockReason::None);
    }

    #[test]
    fn test_precedence_table() {
        let forces = [None, Some("batch")];
        let globals = [None, Some("sample_id")];
        let locals = [None, Some("plate")];

        for force in forces {
            for global in globals {
                for enabled in [false, true] {
                    for local in locals {
                        let ctx = context(force, global, enabled);
                        let resolved = resolve_group_by(&ctx, local, DEFAULT_GROUP_BY);
                        let expected = force
                            .or(if enabled { global } else { None })
                            .or(local)
                            .unwrap_or(DEFAULT_GROUP_BY);
                        assert_eq!(
                            resolved.field, expected,
                            "force={force:?} global={global:?} enabled={enabled} local={local:?}"
                        );
                    }
                }
            }
        }
    }
}
