//! Table-reference classification over a parsed statement tree

use std::collections::{BTreeSet, HashSet};
use std::ops::ControlFlow;

use sqlparser::ast::{ObjectName, Query, Statement, TableFactor, Visitor};

use crate::table_id::TableId;

/// Collects every alias bound by a `WITH` clause, at any nesting depth.
#[derive(Debug, Default)]
pub(super) struct CteNames {
    pub(super) names: HashSet<String>,
}

impl Visitor for CteNames {
    type Break = ();

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.names.insert(cte.alias.name.value.clone());
            }
        }
        ControlFlow::Continue(())
    }
}

/// Statement kinds that write into a table slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteKind {
    Create,
    Insert,
}

/// One enclosing statement on the visitor stack.
///
/// `target` is the address of the statement's target `ObjectName`; it is
/// only ever compared, never dereferenced.
#[derive(Debug)]
struct Frame {
    kind: Option<WriteKind>,
    target: Option<*const ObjectName>,
}

impl Frame {
    fn of(stmt: &Statement) -> Self {
        let (kind, target) = match stmt {
            Statement::CreateTable(create) => (Some(WriteKind::Create), Some(&create.name)),
            Statement::CreateView { name, .. } => (Some(WriteKind::Create), Some(name)),
            Statement::Insert(insert) => (Some(WriteKind::Insert), Some(&insert.table_name)),
            // The table of a COPY is not a relation node, so it never reaches
            // `pre_visit_relation` and needs no frame.
            _ => (None, None),
        };
        Self {
            kind,
            target: target.map(|name| name as *const ObjectName),
        }
    }
}

/// Walks a statement and keeps the canonical identifiers of relations in
/// read position.
#[derive(Debug)]
pub(super) struct ReadReferences<'c> {
    cte_names: &'c HashSet<String>,
    statements: Vec<Frame>,
    /// Names of table-valued function calls (`FROM fn(...)`)
    function_names: HashSet<*const ObjectName>,
    pub(super) found: BTreeSet<TableId>,
}

impl<'c> ReadReferences<'c> {
    pub(super) fn new(cte_names: &'c HashSet<String>) -> Self {
        Self {
            cte_names,
            statements: Vec::new(),
            function_names: HashSet::new(),
            found: BTreeSet::new(),
        }
    }

    /// True if `relation` occupies the target slot of the nearest enclosing
    /// CREATE or INSERT statement.
    fn is_write_target(&self, relation: &ObjectName) -> bool {
        [WriteKind::Create, WriteKind::Insert]
            .into_iter()
            .filter_map(|kind| {
                self.statements
                    .iter()
                    .rev()
                    .find(|frame| frame.kind == Some(kind))
            })
            .any(|frame| frame.target.is_some_and(|t| std::ptr::eq(t, relation)))
    }

    /// Keep `name` as a read unless it names a CTE
    fn record(&mut self, name: &ObjectName) {
        let parts = name_parts(name);
        let Some(bare_name) = parts.last() else {
            return;
        };
        if self.cte_names.contains(bare_name) {
            return;
        }
        if let Some(id) = TableId::from_name_parts(&parts) {
            self.found.insert(id);
        }
    }
}

impl Visitor for ReadReferences<'_> {
    type Break = ();

    fn pre_visit_statement(&mut self, stmt: &Statement) -> ControlFlow<Self::Break> {
        // CREATE TABLE ... LIKE / CLONE sources are plain names, not relations
        if let Statement::CreateTable(create) = stmt {
            for source in create.like.iter().chain(create.clone.iter()) {
                self.record(source);
            }
        }
        self.statements.push(Frame::of(stmt));
        ControlFlow::Continue(())
    }

    fn post_visit_statement(&mut self, _stmt: &Statement) -> ControlFlow<Self::Break> {
        self.statements.pop();
        ControlFlow::Continue(())
    }

    fn pre_visit_table_factor(&mut self, factor: &TableFactor) -> ControlFlow<Self::Break> {
        if let TableFactor::Table {
            name, args: Some(_), ..
        } = factor
        {
            self.function_names.insert(name as *const ObjectName);
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_relation(&mut self, relation: &ObjectName) -> ControlFlow<Self::Break> {
        if self.function_names.contains(&(relation as *const ObjectName)) {
            return ControlFlow::Continue(());
        }

        if self.is_write_target(relation) {
            tracing::trace!(relation = %relation, "skipping write target");
            return ControlFlow::Continue(());
        }
        self.record(relation);
        ControlFlow::Continue(())
    }
}

/// Split an object name into its dotted parts.
///
/// BigQuery allows a whole path inside one quoted identifier
/// (`` `proj.ds.tbl` ``), so each identifier is split on `.` as well.
fn name_parts(name: &ObjectName) -> Vec<String> {
    name.0
        .iter()
        .flat_map(|ident| ident.value.split('.'))
        .map(|part| part.trim_matches('`').to_string())
        .collect()
}
