//! Requires a table-level description on every non-draft table

use super::{skipped, Check, CheckContext, CheckReport};
use crate::error::{Diagnostic, DiagnosticKind};
use crate::graph::is_blank;

const NAME: &str = "description";

#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionCheck;

impl Check for DescriptionCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    fn run(&self, ctx: &CheckContext, files: &[String]) -> CheckReport {
        let graph = match ctx.load_graph() {
            Ok(graph) => graph,
            Err(e) => return CheckReport::graph_unavailable(NAME, &e),
        };

        let mut diagnostics = Vec::new();
        for table in graph.tables_for_files(files) {
            let file = table.file_name().unwrap_or_default();
            if !is_blank(table.description()) {
                continue;
            }
            if table.is_draft() {
                diagnostics.push(skipped(file, "lifecycle_stage is draft"));
            } else {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticKind::MissingDescription,
                        format!("Missing description in {}", file),
                    )
                    .with_file(file)
                    .with_help("Add a `description` to the config block"),
                );
            }
        }

        CheckReport::from_diagnostics(
            NAME,
            diagnostics,
            "All SQLX files have valid descriptions.",
            "Some SQLX files are missing required descriptions.",
        )
    }
}
