//! Configuration file handling

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use serde_json::Value;
use sqlxlint_core::runner::split_csv;
use sqlxlint_core::{SqlDialect, DEFAULT_GRAPH_PATH};

use crate::args::Args;

/// Settings read from a `--config` file.
///
/// Keys with the wrong type are ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub fail_fast: bool,
    pub graph: Option<String>,
    pub dialect: Option<String>,
}

/// Effective settings for one run after merging flags, env and config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub fail_fast: bool,
    pub graph: PathBuf,
    pub dialect: SqlDialect,
}

impl Config {
    /// Load configuration, picking the format from the file extension:
    /// `.yml`/`.yaml` as YAML, `.toml` as TOML, anything else as JSON
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        let value: Value = match extension.as_deref() {
            Some("yml" | "yaml") => serde_yaml::from_str::<Option<Value>>(&contents)
                .into_diagnostic()?
                .unwrap_or(Value::Null),
            Some("toml") => toml::from_str(&contents).into_diagnostic()?,
            _ => serde_json::from_str(&contents).into_diagnostic()?,
        };
        Ok(Self::from_value(&value))
    }

    fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            tracing::debug!("config is not a mapping; using defaults");
            return Self::default();
        };
        let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            include: string_list(map.get("include")),
            exclude: string_list(map.get("exclude")),
            fail_fast: map
                .get("fail_fast")
                .and_then(Value::as_bool)
                .unwrap_or_default(),
            graph: text("graph"),
            dialect: text("dialect"),
        }
    }

    /// Merge CLI arguments into configuration.
    ///
    /// For each setting a command-line flag wins over its environment
    /// variable, which wins over the config file. `fail_fast_env` is the
    /// value of `CHECKS_FAIL_FAST`; only `"1"` enables it.
    pub fn merge_with_args(self, args: &Args, fail_fast_env: Option<&str>) -> Result<Settings> {
        let include = split_csv(args.include.as_deref());
        let exclude = split_csv(args.exclude.as_deref());

        let dialect = match args.dialect.as_deref().or(self.dialect.as_deref()) {
            Some(name) => name.parse().map_err(|e: String| miette::miette!(e))?,
            None => SqlDialect::default(),
        };

        Ok(Settings {
            include: if include.is_empty() { self.include } else { include },
            exclude: if exclude.is_empty() { self.exclude } else { exclude },
            fail_fast: args.fail_fast || fail_fast_env == Some("1") || self.fail_fast,
            graph: args
                .graph
                .clone()
                .or(self.graph.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_GRAPH_PATH)),
            dialect,
        })
    }
}

/// A list of strings, or nothing if any entry is not a string
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .unwrap_or_default()
}
