//! Lookup structures built once per check run over a [`CompiledGraph`]

use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;

use super::{Action, CompiledGraph};
use crate::table_id::TableId;

/// Read-only indices over the actions and sources of a compiled graph
#[derive(Debug, Default)]
pub struct GraphIndex<'g> {
    /// Action name -> action (last write wins on duplicate names)
    by_name: HashMap<&'g str, &'g Action>,
    /// Action name -> canonical identifier of the table it writes
    name_to_fqn: HashMap<&'g str, TableId>,
    /// Canonical identifiers of every declared source
    source_fqns: HashSet<TableId>,
    /// Definition file -> action names, in graph order
    by_file: IndexMap<&'g str, Vec<&'g str>>,
}

impl<'g> GraphIndex<'g> {
    pub fn build(graph: &'g CompiledGraph) -> Self {
        let mut index = Self::default();

        for action in graph.audited_actions() {
            let Some(name) = action.name() else {
                tracing::trace!(file = ?action.file_name, "skipping action without a name");
                continue;
            };
            index.by_name.insert(name, action);

            if let Some(id) = action.table_id() {
                index.name_to_fqn.insert(name, id);
            }

            if let Some(file) = action.file_name() {
                index.by_file.entry(file).or_default().push(name);
            }
        }

        index.source_fqns = graph.sources.iter().filter_map(|s| s.table_id()).collect();

        tracing::debug!(
            actions = index.by_name.len(),
            resolvable = index.name_to_fqn.len(),
            sources = index.source_fqns.len(),
            files = index.by_file.len(),
            "built graph index"
        );
        index
    }

    pub fn action(&self, name: &str) -> Option<&'g Action> {
        self.by_name.get(name).copied()
    }

    /// Canonical identifier the named action resolves to
    pub fn table_id(&self, name: &str) -> Option<&TableId> {
        self.name_to_fqn.get(name)
    }

    pub fn source_ids(&self) -> &HashSet<TableId> {
        &self.source_fqns
    }

    pub fn is_source(&self, id: &TableId) -> bool {
        self.source_fqns.contains(id)
    }

    /// Names of the actions defined in `file`
    pub fn actions_in_file(&self, file: &str) -> &[&'g str] {
        self.by_file.get(file).map(Vec::as_slice).unwrap_or_default()
    }

    /// Names of the actions defined in any of `files`, deduplicated and sorted
    pub fn actions_for_files(&self, files: &[String]) -> BTreeSet<&'g str> {
        files
            .iter()
            .flat_map(|f| self.actions_in_file(f).iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
