//! Canonical table identifiers

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical `[project.]dataset.table` key used to compare table references.
///
/// Each part has surrounding backticks removed; no other normalization is
/// applied, so two identifiers name the same table only if their rendered
/// strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(String);

impl TableId {
    /// Build an identifier from its parts.
    ///
    /// Returns `None` unless both dataset and table are non-empty after
    /// stripping backticks. An empty project is dropped.
    pub fn from_parts(project: Option<&str>, dataset: &str, table: &str) -> Option<Self> {
        let dataset = strip_backticks(dataset);
        let table = strip_backticks(table);
        if dataset.is_empty() || table.is_empty() {
            return None;
        }
        let id = match project.map(strip_backticks).filter(|p| !p.is_empty()) {
            Some(project) => format!("{}.{}.{}", project, dataset, table),
            None => format!("{}.{}", dataset, table),
        };
        Some(Self(id))
    }

    /// Build an identifier from the dotted parts of a SQL object name.
    ///
    /// The last part is the table, the one before it the dataset, and any
    /// leading parts form the project. Single-part names are not qualified
    /// and yield `None`.
    pub fn from_name_parts<S: AsRef<str>>(parts: &[S]) -> Option<Self> {
        match parts {
            [] | [_] => None,
            [dataset, table] => Self::from_parts(None, dataset.as_ref(), table.as_ref()),
            [project @ .., dataset, table] => {
                let project = project
                    .iter()
                    .map(|p| strip_backticks(p.as_ref()))
                    .collect::<Vec<_>>()
                    .join(".");
                Self::from_parts(Some(&project), dataset.as_ref(), table.as_ref())
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn strip_backticks(part: &str) -> &str {
    part.trim_matches('`')
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TableId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TableId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        let id = TableId::from_parts(None, "ds", "tbl").unwrap();
        assert_eq!(id.as_str(), "ds.tbl");

        let id = TableId::from_parts(Some("proj"), "ds", "tbl").unwrap();
        assert_eq!(id.as_str(), "proj.ds.tbl");

        let id = TableId::from_parts(Some(""), "`ds`", "`tbl`").unwrap();
        assert_eq!(id.as_str(), "ds.tbl");
    }

    #[test]
    fn test_from_parts_requires_dataset_and_table() {
        assert!(TableId::from_parts(Some("proj"), "", "tbl").is_none());
        assert!(TableId::from_parts(Some("proj"), "ds", "``").is_none());
    }

    #[test]
    fn test_case_is_preserved() {
        let upper = TableId::from_parts(None, "DS", "Tbl").unwrap();
        let lower = TableId::from_parts(None, "ds", "tbl").unwrap();
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_from_name_parts() {
        assert!(TableId::from_name_parts(&["tbl"]).is_none());
        assert_eq!(
            TableId::from_name_parts(&["ds", "tbl"]).unwrap().as_str(),
            "ds.tbl"
        );
        assert_eq!(
            TableId::from_name_parts(&["ds", "INFORMATION_SCHEMA", "COLUMNS"])
                .unwrap()
                .as_str(),
            "ds.INFORMATION_SCHEMA.COLUMNS"
        );
        assert_eq!(
            TableId::from_name_parts(&["region-us", "proj", "ds", "t"])
                .unwrap()
                .as_str(),
            "region-us.proj.ds.t"
        );
    }
}
