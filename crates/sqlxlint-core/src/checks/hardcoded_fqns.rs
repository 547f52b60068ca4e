//! Detects fully-qualified table references that bypass declared dependencies

use std::collections::HashSet;

use serde::Serialize;

use super::{display_name, Check, CheckContext, CheckReport};
use crate::analyzer::ReferenceExtractor;
use crate::dialect::SqlDialect;
use crate::error::{Diagnostic, DiagnosticKind};
use crate::graph::GraphIndex;
use crate::table_id::TableId;

const NAME: &str = "hardcoded_fqns";

/// An action reading tables it neither depends on nor declares as sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub action: String,
    pub file: String,
    /// Unexplained read references, sorted
    pub suspects: Vec<TableId>,
}

/// Result of auditing the actions defined in a set of files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audit {
    /// No action is defined in any of the given files
    NothingToCheck,
    /// Findings for the scoped actions, ordered by action name
    Completed(Vec<Finding>),
}

/// Audit every action defined in `files` for unexplained read references.
///
/// A reference is explained when it equals the identifier of one of the
/// action's declared dependencies, or of any declared source. This is a
/// set-membership test: it does not check which dependency a particular
/// reference corresponds to.
pub fn audit(index: &GraphIndex<'_>, files: &[String], dialect: SqlDialect) -> Audit {
    let scoped = index.actions_for_files(files);
    if scoped.is_empty() {
        return Audit::NothingToCheck;
    }

    let extractor = ReferenceExtractor::with_dialect(dialect);
    let mut findings = Vec::new();

    for name in scoped {
        let Some(action) = index.action(name) else {
            continue;
        };

        let reads = extractor.read_references(action.query());
        let dependencies: HashSet<&TableId> = action
            .dependencies
            .iter()
            .filter_map(|dep| index.table_id(dep))
            .collect();

        let suspects: Vec<TableId> = reads
            .into_iter()
            .filter(|id| !dependencies.contains(id) && !index.is_source(id))
            .collect();

        tracing::debug!(action = name, suspects = suspects.len(), "audited action");
        if !suspects.is_empty() {
            findings.push(Finding {
                action: name.to_string(),
                file: action.file_name().unwrap_or(name).to_string(),
                suspects,
            });
        }
    }

    Audit::Completed(findings)
}

/// Flags actions that reference tables by hard-coded name instead of `ref()`
#[derive(Debug, Clone, Copy, Default)]
pub struct HardcodedFqnsCheck;

impl Check for HardcodedFqnsCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    fn run(&self, ctx: &CheckContext, files: &[String]) -> CheckReport {
        let graph = match ctx.load_graph() {
            Ok(graph) => graph,
            Err(e) => return CheckReport::graph_unavailable(NAME, &e),
        };
        let index = GraphIndex::build(&graph);

        let findings = match audit(&index, files, ctx.dialect()) {
            Audit::NothingToCheck => {
                return CheckReport::nothing_to_check(
                    NAME,
                    "No actions found for provided files; nothing to check.",
                )
            }
            Audit::Completed(findings) => findings,
        };

        let diagnostics = findings
            .iter()
            .map(|finding| {
                let suspects = finding
                    .suspects
                    .iter()
                    .map(TableId::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                Diagnostic::error(
                    DiagnosticKind::HardcodedReference,
                    format!(
                        "{}: suspected hard-coded table references (use ref()): {}",
                        display_name(&finding.file),
                        suspects
                    ),
                )
                .with_file(&finding.file)
                .with_help("Reference the table with ref(), or declare it as a source")
            })
            .collect();

        CheckReport::from_diagnostics(
            NAME,
            diagnostics,
            "No likely hard-coded FQNs found.",
            "Some SQLX files use fully-qualified tables instead of ref().",
        )
    }
}
