//! Check selection and sequencing

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::checks::{builtin_checks, Check, CheckContext, CheckReport};

/// Checks available to a run, keyed (and therefore ordered) by name
pub struct CheckRegistry {
    checks: BTreeMap<&'static str, Box<dyn Check>>,
}

impl CheckRegistry {
    pub fn new(checks: Vec<Box<dyn Check>>) -> Self {
        Self {
            checks: checks.into_iter().map(|c| (c.name(), c)).collect(),
        }
    }

    /// Registry holding the built-in checks
    pub fn builtin() -> Self {
        Self::new(builtin_checks())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.keys().copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Check> {
        self.checks.get(name).map(Box::as_ref)
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The checks chosen for a run plus any names that matched nothing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Selected check names, alphabetical
    pub selected: Vec<String>,
    pub unknown_include: Vec<String>,
    pub unknown_exclude: Vec<String>,
}

impl Selection {
    /// Start from every registered check, narrow to `include` when it is
    /// non-empty, then drop `exclude`. Unknown names are recorded, not fatal.
    pub fn resolve(registry: &CheckRegistry, include: &[String], exclude: &[String]) -> Self {
        let (known_include, unknown_include) = partition_known(registry, include);
        let (known_exclude, unknown_exclude) = partition_known(registry, exclude);

        let mut selected: Vec<String> = if include.is_empty() {
            registry.names().map(str::to_string).collect()
        } else {
            known_include
        };
        let excluded: HashSet<String> = known_exclude.into_iter().collect();
        selected.retain(|name| !excluded.contains(name));
        selected.sort();
        selected.dedup();

        Self {
            selected,
            unknown_include,
            unknown_exclude,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

fn partition_known(registry: &CheckRegistry, names: &[String]) -> (Vec<String>, Vec<String>) {
    names.iter().cloned().partition(|n| registry.contains(n))
}

/// Outcome of running a selection of checks
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub reports: Vec<CheckReport>,
    /// Set when a check failed with fail-fast enabled, ending the run
    pub fail_fast_triggered: bool,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        !self.reports.iter().any(CheckReport::is_failure)
    }

    /// Process-style status: 0 = pass, 1 = fail
    pub fn status(&self) -> i32 {
        i32::from(!self.passed())
    }
}

/// Run the selected checks in alphabetical order against the same files.
///
/// With `fail_fast`, stops after the first failing check.
pub fn run_checks(
    registry: &CheckRegistry,
    selection: &Selection,
    ctx: &CheckContext,
    files: &[String],
    fail_fast: bool,
) -> RunReport {
    let mut reports = Vec::new();
    let mut fail_fast_triggered = false;

    for name in &selection.selected {
        let Some(check) = registry.get(name) else {
            continue;
        };
        tracing::info!(check = %name, files = files.len(), "running check");
        let report = check.run(ctx, files);
        let failed = report.is_failure();
        reports.push(report);

        if failed && fail_fast {
            fail_fast_triggered = true;
            break;
        }
    }

    RunReport {
        reports,
        fail_fast_triggered,
    }
}

/// Split comma-joined entries, trim whitespace, and drop empties and
/// duplicates while keeping first-seen order.
pub fn normalize_changed_files<I, S>(files: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for raw in files {
        for part in raw.as_ref().split(',') {
            let file = part.trim();
            if !file.is_empty() && seen.insert(file.to_string()) {
                out.push(file.to_string());
            }
        }
    }
    out
}

/// Split a comma-separated list of names, trimming whitespace
pub fn split_csv(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_changed_files() {
        let files = normalize_changed_files([
            "definitions/a.sqlx, definitions/b.sqlx",
            " definitions/a.sqlx ",
            "",
            "definitions/c.sqlx,,",
        ]);
        assert_eq!(
            files,
            vec!["definitions/a.sqlx", "definitions/b.sqlx", "definitions/c.sqlx"]
        );
    }

    #[test]
    fn test_split_csv() {
        assert_eq!(split_csv(Some("schema, columns")), vec!["schema", "columns"]);
        assert!(split_csv(Some("")).is_empty());
        assert!(split_csv(None).is_empty());
    }

    #[test]
    fn test_builtin_registry_order() {
        let registry = CheckRegistry::builtin();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec!["columns", "description", "hardcoded_fqns", "schema"]
        );
    }
}
