//! Requires an explicit, quoted `schema` in each SQLX config block

use std::sync::LazyLock;

use regex::Regex;

use super::{display_name, skipped, Check, CheckContext, CheckReport};
use crate::error::{Diagnostic, DiagnosticKind};

const NAME: &str = "schema";

/// Config types that produce a table in a dataset and therefore need a schema
const SCHEMA_TYPES: [&str; 3] = ["view", "table", "incremental"];

// Compile-time constant patterns; initialization cannot fail in practice
static SCHEMA_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"\bschema\s*:\s*(?:"(?P<dq>[^"']+)"|'(?P<sq>[^"']+)')"#).ok()
});
static TYPE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"\btype\s*:\s*(?:"(?P<dq>[a-zA-Z_]+)"|'(?P<sq>[a-zA-Z_]+)'|(?P<bare>[a-zA-Z_]+))"#)
        .ok()
});
static BLOCK_COMMENT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").ok());
static LINE_COMMENT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"//[^\n]*").ok());

#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaCheck;

impl Check for SchemaCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    fn run(&self, _ctx: &CheckContext, files: &[String]) -> CheckReport {
        let mut diagnostics = Vec::new();

        for file in files {
            if let Some(diag) = check_file(file) {
                diagnostics.push(diag);
            }
        }

        CheckReport::from_diagnostics(
            NAME,
            diagnostics,
            "All relevant SQLX files have an explicit schema set.",
            "Some SQLX files are missing explicit schema.",
        )
    }
}

fn check_file(file: &str) -> Option<Diagnostic> {
    let display = display_name(file);

    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            return Some(
                Diagnostic::error(
                    DiagnosticKind::UnreadableFile,
                    format!("{}: Failed to read file. {}", display, e),
                )
                .with_file(file),
            )
        }
    };

    let Some(block) = config_block(&content).filter(|b| !b.is_empty()) else {
        return Some(
            Diagnostic::error(
                DiagnosticKind::MalformedConfig,
                format!("{}: Missing or malformed config block.", display),
            )
            .with_file(file),
        );
    };
    let block = strip_comments(block);

    if let Some(kind) = config_value(&TYPE_PATTERN, &block) {
        let kind = kind.to_lowercase();
        if !SCHEMA_TYPES.contains(&kind.as_str()) {
            return Some(skipped(&display, format!("type is '{}'", kind)).with_file(file));
        }
    }

    if config_value(&SCHEMA_PATTERN, &block).map_or(true, |s| s.trim().is_empty()) {
        return Some(
            Diagnostic::error(
                DiagnosticKind::MissingSchema,
                format!("{}: Schema must be explicitly set.", display),
            )
            .with_file(file)
            .with_help("Add `schema: \"<dataset>\"` to the config block"),
        );
    }
    None
}

/// Body of the first `config { ... }` block, without the outer braces.
///
/// Returns `None` when there is no block or its braces never balance.
fn config_block(content: &str) -> Option<&str> {
    let start = content.find("config {")?;
    let mut depth = 0usize;
    let mut open = None;

    for (offset, byte) in content.as_bytes()[start..].iter().enumerate() {
        let idx = start + offset;
        match byte {
            b'{' => {
                depth += 1;
                open.get_or_insert(idx);
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let open = open?;
                    return Some(content[open + 1..idx].trim());
                }
            }
            _ => {}
        }
    }
    None
}

fn strip_comments(text: &str) -> String {
    let mut out = text.to_string();
    for pattern in [&BLOCK_COMMENT, &LINE_COMMENT] {
        if let Some(ref re) = **pattern {
            out = re.replace_all(&out, "").into_owned();
        }
    }
    out
}

/// First value captured by one of the quoted/bare alternatives of `pattern`
fn config_value<'t>(pattern: &LazyLock<Option<Regex>>, text: &'t str) -> Option<&'t str> {
    let caps = (**pattern).as_ref()?.captures(text)?;
    ["dq", "sq", "bare"]
        .into_iter()
        .find_map(|group| caps.name(group))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_block_extraction() {
        let content = "config {\n  type: \"table\",\n  bigquery: { partitionBy: \"d\" }\n}\nselect 1";
        let block = config_block(content).unwrap();
        assert!(block.starts_with("type"));
        assert!(block.ends_with('}'));
    }

    #[test]
    fn test_unbalanced_config_block() {
        assert!(config_block("config {\n  type: \"table\"\nselect 1").is_none());
        assert!(config_block("select 1").is_none());
    }

    #[test]
    fn test_comments_are_stripped() {
        let text = "type: \"table\",\n/* schema: \"a\" */\n// schema: \"b\"\nname: \"x\"";
        let stripped = strip_comments(text);
        assert!(!stripped.contains("schema"));
        assert!(stripped.contains("name"));
    }

    #[test]
    fn test_config_values() {
        assert_eq!(config_value(&TYPE_PATTERN, "type: incremental,"), Some("incremental"));
        assert_eq!(config_value(&TYPE_PATTERN, "type: 'view'"), Some("view"));
        assert_eq!(config_value(&SCHEMA_PATTERN, "schema: 'core'"), Some("core"));
        assert_eq!(config_value(&SCHEMA_PATTERN, "schema: core"), None);
        assert_eq!(config_value(&SCHEMA_PATTERN, "schema: \"core'\""), None);
    }
}
