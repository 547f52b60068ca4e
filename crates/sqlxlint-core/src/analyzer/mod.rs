//! SQL reference extraction
//!
//! Parses a compiled query and reports the tables it reads from. CTE names
//! and the object a statement writes into are not reads; everything else
//! that names a qualified table is.

mod references;

use std::collections::BTreeSet;

use sqlparser::ast::Visit;
use sqlparser::parser::Parser;

use crate::dialect::SqlDialect;
use crate::table_id::TableId;

use references::{CteNames, ReadReferences};

/// Extracts the canonical identifiers of tables read by a SQL text
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceExtractor {
    dialect: SqlDialect,
}

impl ReferenceExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(dialect: SqlDialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Tables referenced in read position.
    ///
    /// Empty input and SQL that fails to parse both yield an empty set, so
    /// unparsable queries never produce findings.
    pub fn read_references(&self, sql: &str) -> BTreeSet<TableId> {
        if sql.trim().is_empty() {
            return BTreeSet::new();
        }

        let dialect = self.dialect.parser_dialect();
        let statements = match Parser::parse_sql(dialect.as_ref(), sql) {
            Ok(stmts) => stmts,
            Err(e) => {
                tracing::debug!(dialect = %self.dialect, error = %e, "query did not parse; no references extracted");
                return BTreeSet::new();
            }
        };

        let mut ctes = CteNames::default();
        for stmt in &statements {
            let _ = stmt.visit(&mut ctes);
        }

        let mut reads = ReadReferences::new(&ctes.names);
        for stmt in &statements {
            let _ = stmt.visit(&mut reads);
        }
        reads.found
    }
}

/// Convenience wrapper around [`ReferenceExtractor::read_references`]
pub fn extract_read_references(sql: &str, dialect: SqlDialect) -> BTreeSet<TableId> {
    ReferenceExtractor::with_dialect(dialect).read_references(sql)
}
