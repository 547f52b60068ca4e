// Shared fixtures for integration tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::Value;
use sqlxlint_core::checks::CheckContext;
use tempfile::TempDir;

/// A temporary project directory holding a compiled graph and SQLX files
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn with_graph(graph: Value) -> Self {
        let ws = Self::new();
        ws.write_graph(graph);
        ws
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn graph_path(&self) -> PathBuf {
        self.dir.path().join("compiled_graph.json")
    }

    pub fn write_graph(&self, graph: Value) {
        std::fs::write(self.graph_path(), serde_json::to_string(&graph).unwrap()).unwrap();
    }

    /// Write a SQLX file and return its absolute path as a string
    pub fn write_sqlx(&self, name: &str, body: &str) -> String {
        let path = self.dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path.display().to_string()
    }

    pub fn context(&self) -> CheckContext {
        CheckContext::new(self.graph_path())
    }
}

pub fn files(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
