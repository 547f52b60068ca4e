//! Compiled dependency graph model and loading

mod index;
mod lenient;

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::GraphError;
use crate::table_id::TableId;

pub use index::GraphIndex;

/// Default location of the compiled graph, relative to the working directory
pub const DEFAULT_GRAPH_PATH: &str = "compiled_graph.json";

/// Load and decode the compiled graph document at `path`.
pub fn load_graph(path: &Path) -> Result<CompiledGraph, GraphError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            GraphError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            GraphError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let value: Value = serde_json::from_str(&text).map_err(|source| GraphError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if !value.is_object() {
        return Err(GraphError::NotAnObject {
            path: path.to_path_buf(),
        });
    }

    let graph: CompiledGraph =
        serde_json::from_value(value).map_err(|source| GraphError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(
        path = %path.display(),
        tables = graph.tables.len(),
        actions = graph.actions.len(),
        sources = graph.sources.len(),
        "loaded compiled graph"
    );
    Ok(graph)
}

/// The compiled graph document (read-only once loaded)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompiledGraph {
    #[serde(default, deserialize_with = "lenient::records")]
    pub tables: Vec<Action>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub actions: Vec<Action>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub sources: Vec<Source>,
}

impl CompiledGraph {
    /// Decode a graph from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Actions eligible for reference auditing.
    ///
    /// Newer graphs list them under `actions`, older ones under `tables`.
    pub fn audited_actions(&self) -> &[Action] {
        if self.actions.is_empty() {
            &self.tables
        } else {
            &self.actions
        }
    }

    /// Tables whose `fileName` is one of `files`, in graph order
    pub fn tables_for_files<'a>(&'a self, files: &'a [String]) -> impl Iterator<Item = &'a Action> {
        let wanted: HashSet<&str> = files.iter().map(String::as_str).collect();
        self.tables
            .iter()
            .filter(move |t| t.file_name().is_some_and(|f| wanted.contains(f)))
    }
}

/// One compiled SQL definition
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub target: Option<Target>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub canonical_target: Option<Target>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub query: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub compiled_query: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub sqlx_compiled: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub dependencies: Vec<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub action_descriptor: Option<ActionDescriptor>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub bigquery: Option<BigQueryOptions>,
}

impl Action {
    /// Unique action name, falling back to `id` when `name` is missing,
    /// empty or not a string
    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name).or_else(|| non_empty(&self.id))
    }

    pub fn file_name(&self) -> Option<&str> {
        non_empty(&self.file_name)
    }

    /// Compiled SQL; the field name varies across build tool versions
    pub fn query(&self) -> &str {
        non_empty(&self.query)
            .or_else(|| non_empty(&self.compiled_query))
            .or_else(|| non_empty(&self.sqlx_compiled))
            .unwrap_or("")
    }

    /// Canonical identifier of the table this action writes, if resolvable
    pub fn table_id(&self) -> Option<TableId> {
        self.target
            .as_ref()
            .filter(|t| !t.is_empty())
            .or(self.canonical_target.as_ref())
            .and_then(Target::table_id)
    }

    pub fn description(&self) -> Option<&str> {
        self.action_descriptor
            .as_ref()
            .and_then(|d| d.description.as_deref())
    }

    /// Declared columns; `None` when the descriptor has no column list
    pub fn columns(&self) -> Option<&[ColumnDescriptor]> {
        self.action_descriptor
            .as_ref()
            .and_then(|d| d.columns.as_deref())
    }

    /// The `lifecycle_stage` BigQuery label, if set
    pub fn lifecycle_stage(&self) -> Option<&str> {
        self.bigquery
            .as_ref()
            .and_then(|bq| bq.labels.as_ref())
            .and_then(|labels| labels.get("lifecycle_stage"))
            .and_then(Value::as_str)
    }

    pub fn is_draft(&self) -> bool {
        self.lifecycle_stage() == Some("draft")
    }
}

/// A declared external table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Source {
    #[serde(default, deserialize_with = "lenient::object")]
    pub target: Option<Target>,
}

impl Source {
    pub fn table_id(&self) -> Option<TableId> {
        self.target.as_ref().and_then(Target::table_id)
    }
}

/// Structured table location: `database` (project), `schema` (dataset), `name`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Target {
    #[serde(default, deserialize_with = "lenient::string")]
    pub database: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub schema: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
}

impl Target {
    pub fn table_id(&self) -> Option<TableId> {
        TableId::from_parts(
            self.database.as_deref(),
            self.schema.as_deref().unwrap_or_default(),
            self.name.as_deref().unwrap_or_default(),
        )
    }

    fn is_empty(&self) -> bool {
        self.database.is_none() && self.schema.is_none() && self.name.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionDescriptor {
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_records")]
    pub columns: Option<Vec<ColumnDescriptor>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnDescriptor {
    #[serde(default, deserialize_with = "lenient::optional_strings")]
    pub path: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
}

impl ColumnDescriptor {
    /// Dotted column path, or `[unknown]` when the path is not a list of strings
    pub fn display_path(&self) -> String {
        match &self.path {
            Some(parts) => parts.join("."),
            None => "[unknown]".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BigQueryOptions {
    #[serde(default, deserialize_with = "lenient::object")]
    pub labels: Option<Map<String, Value>>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// True if `text` is absent or only whitespace
pub(crate) fn is_blank(text: Option<&str>) -> bool {
    text.map_or(true, |t| t.trim().is_empty())
}
