//! Lint checks and the shared report types they produce

mod columns;
mod description;
mod hardcoded_fqns;
mod schema;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::dialect::SqlDialect;
use crate::error::{Diagnostic, DiagnosticKind, GraphError};
use crate::graph::{load_graph, CompiledGraph, DEFAULT_GRAPH_PATH};

pub use columns::ColumnsCheck;
pub use description::DescriptionCheck;
pub use hardcoded_fqns::{audit, Audit, Finding, HardcodedFqnsCheck};
pub use schema::SchemaCheck;

/// A named lint check over a list of changed definition files
pub trait Check {
    /// Name used for selection (`--include` / `--exclude`)
    fn name(&self) -> &'static str;

    fn run(&self, ctx: &CheckContext, files: &[String]) -> CheckReport;
}

/// The built-in checks, in no particular order
pub fn builtin_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(ColumnsCheck),
        Box::new(DescriptionCheck),
        Box::new(HardcodedFqnsCheck),
        Box::new(SchemaCheck),
    ]
}

/// Inputs shared by every check in a run
#[derive(Debug, Clone)]
pub struct CheckContext {
    graph_path: PathBuf,
    dialect: SqlDialect,
}

impl Default for CheckContext {
    fn default() -> Self {
        Self::new(DEFAULT_GRAPH_PATH)
    }
}

impl CheckContext {
    pub fn new(graph_path: impl Into<PathBuf>) -> Self {
        Self {
            graph_path: graph_path.into(),
            dialect: SqlDialect::default(),
        }
    }

    pub fn with_dialect(mut self, dialect: SqlDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn graph_path(&self) -> &Path {
        &self.graph_path
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Load a fresh copy of the compiled graph
    pub fn load_graph(&self) -> Result<CompiledGraph, GraphError> {
        load_graph(&self.graph_path)
    }
}

/// How a check run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    /// Nothing in the input was in scope for the check
    NothingToCheck,
    Failed,
}

/// Findings of one check plus its single summary line
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub check: String,
    pub outcome: Outcome,
    pub summary: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    /// Report that fails iff any diagnostic is an error
    pub fn from_diagnostics(
        check: &str,
        diagnostics: Vec<Diagnostic>,
        pass_summary: &str,
        fail_summary: &str,
    ) -> Self {
        let (outcome, summary) = if diagnostics.iter().any(Diagnostic::is_error) {
            (Outcome::Failed, fail_summary)
        } else {
            (Outcome::Passed, pass_summary)
        };
        Self {
            check: check.to_string(),
            outcome,
            summary: summary.to_string(),
            diagnostics,
        }
    }

    pub fn nothing_to_check(check: &str, summary: impl Into<String>) -> Self {
        Self {
            check: check.to_string(),
            outcome: Outcome::NothingToCheck,
            summary: summary.into(),
            diagnostics: Vec::new(),
        }
    }

    /// The check could not load the compiled graph.
    ///
    /// Fails with a single error naming the graph file; the summary repeats
    /// the error text.
    pub fn graph_unavailable(check: &str, err: &GraphError) -> Self {
        tracing::debug!(check, error = %err, "compiled graph unavailable");
        let diagnostic = Diagnostic::error(DiagnosticKind::GraphUnavailable, err.to_string())
            .with_file(err.path().display().to_string());
        Self {
            check: check.to_string(),
            outcome: Outcome::Failed,
            summary: err.to_string(),
            diagnostics: vec![diagnostic],
        }
    }

    /// True if the check stopped because the compiled graph could not be loaded
    pub fn is_graph_unavailable(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::GraphUnavailable)
    }

    pub fn is_failure(&self) -> bool {
        self.outcome == Outcome::Failed
    }

    /// Process-style status: 0 = pass, 1 = fail
    pub fn status(&self) -> i32 {
        i32::from(self.is_failure())
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

/// Name of a file as shown in findings.
///
/// Relative paths are shown as given; absolute paths inside the working
/// directory are made relative to it, anything else is reduced to its file
/// name.
pub(crate) fn display_name(file: &str) -> String {
    let path = Path::new(file);
    if path.is_relative() {
        return file.to_string();
    }
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));
    match relative {
        Some(rel) => rel.display().to_string(),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.to_string()),
    }
}

/// Info diagnostic for an item a check deliberately passes over
pub(crate) fn skipped(file: &str, reason: impl std::fmt::Display) -> Diagnostic {
    Diagnostic::info(
        DiagnosticKind::Skipped,
        format!("Skipped {} ({})", file, reason),
    )
    .with_file(file)
}
