// Tests for the description, columns and schema checks
mod common;

use common::{files, Workspace};
use serde_json::{json, Value};
use sqlxlint_core::checks::{Check, ColumnsCheck, DescriptionCheck, SchemaCheck};
use sqlxlint_core::{DiagnosticKind, Outcome, Severity};

fn table(file: &str, descriptor: Value) -> Value {
    json!({
        "name": file.trim_end_matches(".sqlx"),
        "fileName": file,
        "actionDescriptor": descriptor
    })
}

fn draft(file: &str, descriptor: Value) -> Value {
    let mut t = table(file, descriptor);
    t["bigquery"] = json!({"labels": {"lifecycle_stage": "draft"}});
    t
}

fn messages(report: &sqlxlint_core::CheckReport) -> Vec<&str> {
    report.diagnostics.iter().map(|d| d.message.as_str()).collect()
}

// Description

#[test]
fn test_description_present_passes() {
    let ws = Workspace::with_graph(json!({
        "tables": [table("a.sqlx", json!({"description": "Orders by day"}))]
    }));

    let report = DescriptionCheck.run(&ws.context(), &files(&["a.sqlx"]));
    assert_eq!(report.status(), 0);
    assert_eq!(report.summary, "All SQLX files have valid descriptions.");
}

#[test]
fn test_description_missing_fails() {
    let ws = Workspace::with_graph(json!({
        "tables": [
            table("a.sqlx", json!({})),
            table("b.sqlx", json!({"description": "   "}))
        ]
    }));

    let report = DescriptionCheck.run(&ws.context(), &files(&["a.sqlx", "b.sqlx"]));
    assert_eq!(report.status(), 1);
    assert_eq!(
        messages(&report),
        vec!["Missing description in a.sqlx", "Missing description in b.sqlx"]
    );
    assert!(report
        .diagnostics
        .iter()
        .all(|d| d.kind == DiagnosticKind::MissingDescription));
    assert_eq!(
        report.summary,
        "Some SQLX files are missing required descriptions."
    );
}

#[test]
fn test_description_draft_is_skipped() {
    let ws = Workspace::with_graph(json!({
        "tables": [draft("a.sqlx", json!({}))]
    }));

    let report = DescriptionCheck.run(&ws.context(), &files(&["a.sqlx"]));
    assert_eq!(report.status(), 0);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].severity, Severity::Info);
    assert!(report.diagnostics[0].message.contains("a.sqlx"));
}

#[test]
fn test_description_ignores_unlisted_files() {
    let ws = Workspace::with_graph(json!({
        "tables": [table("a.sqlx", json!({}))]
    }));

    let report = DescriptionCheck.run(&ws.context(), &files(&["other.sqlx"]));
    assert_eq!(report.status(), 0);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn test_description_missing_graph_fails() {
    let ws = Workspace::new();

    let report = DescriptionCheck.run(&ws.context(), &files(&["a.sqlx"]));
    assert_eq!(report.outcome, Outcome::Failed);
    assert!(report.summary.starts_with("Could not find"));
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::GraphUnavailable);
}

// Columns

#[test]
fn test_columns_documented_passes() {
    let ws = Workspace::with_graph(json!({
        "tables": [table("a.sqlx", json!({
            "columns": [
                {"path": ["id"], "description": "Primary key"},
                {"path": ["address", "city"], "description": "City"}
            ]
        }))]
    }));

    let report = ColumnsCheck.run(&ws.context(), &files(&["a.sqlx"]));
    assert_eq!(report.status(), 0);
    assert_eq!(report.summary, "All SQLX files have valid column descriptions.");
}

#[test]
fn test_columns_missing_list_fails() {
    let ws = Workspace::with_graph(json!({
        "tables": [
            table("a.sqlx", json!({"description": "x"})),
            table("b.sqlx", json!({"columns": []}))
        ]
    }));

    let report = ColumnsCheck.run(&ws.context(), &files(&["a.sqlx", "b.sqlx"]));
    assert_eq!(report.status(), 1);
    assert_eq!(
        messages(&report),
        vec![
            "a.sqlx is missing defined columns.",
            "b.sqlx is missing defined columns."
        ]
    );
}

#[test]
fn test_columns_missing_description_fails() {
    let ws = Workspace::with_graph(json!({
        "tables": [table("a.sqlx", json!({
            "columns": [
                {"path": ["id"], "description": "Primary key"},
                {"path": ["address", "city"]},
                {"path": "not-a-list", "description": ""}
            ]
        }))]
    }));

    let report = ColumnsCheck.run(&ws.context(), &files(&["a.sqlx"]));
    assert_eq!(report.status(), 1);
    assert_eq!(
        messages(&report),
        vec![
            "Column \"address.city\" in a.sqlx is missing a description.",
            "Column \"[unknown]\" in a.sqlx is missing a description."
        ]
    );
    assert_eq!(report.summary, "Some SQLX files are missing column descriptions.");
}

#[test]
fn test_columns_draft_is_skipped() {
    let ws = Workspace::with_graph(json!({
        "tables": [draft("a.sqlx", json!({}))]
    }));

    let report = ColumnsCheck.run(&ws.context(), &files(&["a.sqlx"]));
    assert_eq!(report.status(), 0);
    assert!(report.diagnostics.iter().all(|d| !d.is_error()));
}

// Schema

#[test]
fn test_schema_explicit_passes() {
    let ws = Workspace::new();
    let file = ws.write_sqlx(
        "a.sqlx",
        "config {\n  type: \"table\",\n  schema: \"analytics\"\n}\nselect 1\n",
    );

    let report = SchemaCheck.run(&ws.context(), &[file]);
    assert_eq!(report.status(), 0);
    assert_eq!(
        report.summary,
        "All relevant SQLX files have an explicit schema set."
    );
}

#[test]
fn test_schema_single_quotes_pass() {
    let ws = Workspace::new();
    let file = ws.write_sqlx("a.sqlx", "config { type: 'view', schema: 'reporting' }\nselect 1");

    assert_eq!(SchemaCheck.run(&ws.context(), &[file]).status(), 0);
}

#[test]
fn test_schema_missing_fails() {
    let ws = Workspace::new();
    let file = ws.write_sqlx("a.sqlx", "config {\n  type: \"incremental\"\n}\nselect 1\n");

    let report = SchemaCheck.run(&ws.context(), &[file]);
    assert_eq!(report.status(), 1);
    assert_eq!(messages(&report), vec!["a.sqlx: Schema must be explicitly set."]);
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::MissingSchema);
    assert_eq!(report.summary, "Some SQLX files are missing explicit schema.");
}

#[test]
fn test_schema_in_comment_does_not_count() {
    let ws = Workspace::new();
    let file = ws.write_sqlx(
        "a.sqlx",
        "config {\n  type: \"table\",\n  // schema: \"analytics\"\n  /* schema: \"other\" */\n}\n",
    );

    assert_eq!(SchemaCheck.run(&ws.context(), &[file]).status(), 1);
}

#[test]
fn test_schema_not_required_for_operations() {
    let ws = Workspace::new();
    let file = ws.write_sqlx("ops.sqlx", "config {\n  type: \"operations\"\n}\ndelete from x\n");

    let report = SchemaCheck.run(&ws.context(), &[file]);
    assert_eq!(report.status(), 0);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::Skipped);
}

#[test]
fn test_schema_missing_config_block_fails() {
    let ws = Workspace::new();
    let file = ws.write_sqlx("a.sqlx", "select 1\n");

    let report = SchemaCheck.run(&ws.context(), &[file]);
    assert_eq!(report.status(), 1);
    assert_eq!(messages(&report), vec!["a.sqlx: Missing or malformed config block."]);
}

#[test]
fn test_schema_unreadable_file_fails() {
    let ws = Workspace::new();
    let missing = ws.path().join("missing.sqlx").display().to_string();

    let report = SchemaCheck.run(&ws.context(), &[missing]);
    assert_eq!(report.status(), 1);
    assert!(report.diagnostics[0]
        .message
        .starts_with("missing.sqlx: Failed to read file."));
}

#[test]
fn test_schema_does_not_need_graph() {
    let ws = Workspace::new();
    let file = ws.write_sqlx("a.sqlx", "config { type: \"table\", schema: \"s\" }");

    assert!(!ws.graph_path().exists());
    assert_eq!(SchemaCheck.run(&ws.context(), &[file]).status(), 0);
}
