//! sqlxlint-core: lint checks for compiled SQLX dependency graphs
//!
//! The central check audits each compiled query for fully-qualified table
//! references that are neither declared dependencies nor declared sources.
//! Alongside it sit simpler presence checks for descriptions, column
//! descriptions and explicit schemas, plus the runner that sequences them.

pub mod analyzer;
pub mod checks;
pub mod dialect;
pub mod error;
pub mod graph;
pub mod runner;
pub mod table_id;

pub use analyzer::{extract_read_references, ReferenceExtractor};
pub use checks::{Check, CheckContext, CheckReport, Outcome};
pub use dialect::SqlDialect;
pub use error::{Diagnostic, DiagnosticKind, GraphError, Severity};
pub use graph::{load_graph, CompiledGraph, GraphIndex, DEFAULT_GRAPH_PATH};
pub use runner::{CheckRegistry, RunReport, Selection};
pub use table_id::TableId;
