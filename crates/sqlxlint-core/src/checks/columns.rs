//! Requires every non-draft table to document each of its columns

use super::{skipped, Check, CheckContext, CheckReport};
use crate::error::{Diagnostic, DiagnosticKind};
use crate::graph::is_blank;

const NAME: &str = "columns";

#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnsCheck;

impl Check for ColumnsCheck {
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
            if table.is_draft() {
                diagnostics.push(skipped(file, "lifecycle_stage is draft"));
                continue;
            }

            let columns = match table.columns() {
                Some(columns) if !columns.is_empty() => columns,
                _ => {
                    diagnostics.push(
                        Diagnostic::error(
                            DiagnosticKind::MissingColumns,
                            format!("{} is missing defined columns.", file),
                        )
                        .with_file(file),
                    );
                    continue;
                }
            };

            for column in columns {
                if is_blank(column.description.as_deref()) {
                    diagnostics.push(
                        Diagnostic::error(
                            DiagnosticKind::MissingColumnDescription,
                            format!(
                                "Column \"{}\" in {} is missing a description.",
                                column.display_path(),
                                file
                            ),
                        )
                        .with_file(file),
                    );
                }
            }
        }

        CheckReport::from_diagnostics(
            NAME,
            diagnostics,
            "All SQLX files have valid column descriptions.",
            "Some SQLX files are missing column descriptions.",
        )
    }
}
