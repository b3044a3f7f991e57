//! Registry of runnable cases
//!
//! Maps each case name to its entry point so the CLI can list and select them by keyword.

use super::fixtures::Fixtures;
use super::interfaces::CommandExecutor;
use super::layer_softplus::{self, CaseOutcome};

/// Entry point signature shared by every case.
pub type CaseFn = fn(&Fixtures, &dyn CommandExecutor) -> CaseOutcome;

/// A named, runnable case.
#[derive(Clone, Copy)]
pub struct CaseInfo {
    pub name: &'static str,
    /// Source module, shown as the case's file in reports.
    pub module: &'static str,
    pub run: CaseFn,
}

impl std::fmt::Debug for CaseInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseInfo")
            .field("name", &self.name)
            .field("module", &self.module)
            .finish_non_exhaustive()
    }
}

const SOFTPLUS_MODULE: &str = "test_unit_layer_softplus";

/// All cases, in run order.
pub const CASES: &[CaseInfo] = &[
    CaseInfo {
        name: "test_unit_layer_softplus_clang6",
        module: SOFTPLUS_MODULE,
        run: layer_softplus::test_unit_layer_softplus_clang6,
    },
    CaseInfo {
        name: "test_unit_layer_softplus_gcc7",
        module: SOFTPLUS_MODULE,
        run: layer_softplus::test_unit_layer_softplus_gcc7,
    },
    CaseInfo {
        name: "test_unit_layer_softplus_intel19",
        module: SOFTPLUS_MODULE,
        run: layer_softplus::test_unit_layer_softplus_intel19,
    },
    CaseInfo {
        name: "test_unit_layer_softplus_exe",
        module: SOFTPLUS_MODULE,
        run: layer_softplus::test_unit_layer_softplus_exe,
    },
];

/// Cases whose name contains `keyword` (all cases when `None`).
pub fn select(keyword: Option<&str>) -> Vec<&'static CaseInfo> {
    CASES
        .iter()
        .filter(|case| keyword.is_none_or(|k| case.name.contains(k)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_select_by_keyword() {
        assert_eq!(select(None).len(), 4);
        let names: Vec<_> = select(Some("gcc7")).iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["test_unit_layer_softplus_gcc7"]);
        assert!(select(Some("relu")).is_empty());
    }

    #[test]
    fn test_case_names_are_unique() {
        let names: HashSet<_> = CASES.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), CASES.len());
    }
}
