//! Error and diagnostic types

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to load the compiled dependency graph
#[derive(Debug, Error, miette::Diagnostic)]
pub enum GraphError {
    #[error("Could not find {}", .path.display())]
    #[diagnostic(
        code(sqlxlint::graph::not_found),
        help("Compile the project first, e.g. `dataform compile --json > compiled_graph.json`")
    )]
    NotFound { path: PathBuf },

    #[error("Failed reading {}: {source}", .path.display())]
    #[diagnostic(code(sqlxlint::graph::read))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    #[diagnostic(code(sqlxlint::graph::parse))]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unexpected structure in {}: expected JSON object at top level", .path.display())]
    #[diagnostic(code(sqlxlint::graph::structure))]
    NotAnObject { path: PathBuf },
}

impl GraphError {
    /// The graph file the error refers to
    pub fn path(&self) -> &Path {
        match self {
            GraphError::NotFound { path }
            | GraphError::Read { path, .. }
            | GraphError::Parse { path, .. }
            | GraphError::NotAnObject { path } => path,
        }
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single finding produced by a check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    /// File the finding belongs to, as recorded in the graph or given on input
    pub file: Option<String>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::with_severity(kind, Severity::Error, message)
    }

    pub fn info(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::with_severity(kind, Severity::Info, message)
    }

    fn with_severity(kind: DiagnosticKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            file: None,
            help: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Get the rule code string (e.g., "E0001")
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Types of diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// E0001: Table description missing or blank
    MissingDescription,
    /// E0002: Table defines no columns
    MissingColumns,
    /// E0003: Column description missing or blank
    MissingColumnDescription,
    /// E0004: No explicit schema in the config block
    MissingSchema,
    /// E0005: Config block missing or unbalanced
    MalformedConfig,
    /// E0006: Read reference not covered by a dependency or source
    HardcodedReference,
    /// E1000: Input file could not be read
    UnreadableFile,
    /// E1001: Compiled graph could not be loaded
    GraphUnavailable,
    /// I0001: Item intentionally not checked
    Skipped,
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingDescription => "E0001",
            DiagnosticKind::MissingColumns => "E0002",
            DiagnosticKind::MissingColumnDescription => "E0003",
            DiagnosticKind::MissingSchema => "E0004",
            DiagnosticKind::MalformedConfig => "E0005",
            DiagnosticKind::HardcodedReference => "E0006",
            DiagnosticKind::UnreadableFile => "E1000",
            DiagnosticKind::GraphUnavailable => "E1001",
            DiagnosticKind::Skipped => "I0001",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingDescription => "missing-description",
            DiagnosticKind::MissingColumns => "missing-columns",
            DiagnosticKind::MissingColumnDescription => "missing-column-description",
            DiagnosticKind::MissingSchema => "missing-schema",
            DiagnosticKind::MalformedConfig => "malformed-config",
            DiagnosticKind::HardcodedReference => "hardcoded-reference",
            DiagnosticKind::UnreadableFile => "unreadable-file",
            DiagnosticKind::GraphUnavailable => "graph-unavailable",
            DiagnosticKind::Skipped => "skipped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_error_messages() {
        let err = GraphError::NotFound {
            path: PathBuf::from("compiled_graph.json"),
        };
        assert_eq!(err.to_string(), "Could not find compiled_graph.json");

        let err = GraphError::NotAnObject {
            path: PathBuf::from("g.json"),
        };
        assert!(err.to_string().contains("expected JSON object at top level"));
        assert_eq!(err.path(), Path::new("g.json"));
    }

    #[test]
    fn test_diagnostic_builders() {
        let diag = Diagnostic::error(DiagnosticKind::MissingSchema, "no schema")
            .with_file("definitions/a.sqlx")
            .with_help("add schema");
        assert!(diag.is_error());
        assert_eq!(diag.code(), "E0004");
        assert_eq!(diag.file.as_deref(), Some("definitions/a.sqlx"));

        let skip = Diagnostic::info(DiagnosticKind::Skipped, "skipped");
        assert!(!skip.is_error());
        assert_eq!(skip.kind.name(), "skipped");
    }
}
