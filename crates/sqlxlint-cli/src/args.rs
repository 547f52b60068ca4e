//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "sqlxlint")]
#[command(author, version, about = "Run Dataform SQLX checks")]
pub struct Args {
    /// Changed .sqlx files to check (comma-joined lists are split)
    #[arg(required = true)]
    pub files: Vec<String>,

    /// YAML, TOML or JSON file with include/exclude/fail_fast
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Comma-separated checks to run
    #[arg(long, env = "CHECKS_INCLUDE", value_name = "CSV")]
    pub include: Option<String>,

    /// Comma-separated checks to skip
    #[arg(long, env = "CHECKS_EXCLUDE", value_name = "CSV")]
    pub exclude: Option<String>,

    /// Stop on the first failing check (also CHECKS_FAIL_FAST=1)
    #[arg(long)]
    pub fail_fast: bool,

    /// Compiled graph to load
    #[arg(long, value_name = "FILE")]
    pub graph: Option<PathBuf>,

    /// SQL dialect used to parse compiled queries
    #[arg(short, long)]
    pub dialect: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "human", value_enum)]
    pub format: OutputFormat,

    /// Enable verbose logging (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress informational output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON run report
    Json,
    /// SARIF output (for GitHub Code Scanning)
    Sarif,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let args = Args::try_parse_from(["sqlxlint", "a.sqlx"]).unwrap();
        assert_eq!(args.files, vec!["a.sqlx"]);
        assert!(!args.fail_fast);
        assert_eq!(args.format, OutputFormat::Human);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_files_required() {
        assert!(Args::try_parse_from(["sqlxlint"]).is_err());
    }

    #[test]
    fn test_parse_all_flags() {
        let args = Args::try_parse_from([
            "sqlxlint",
            "--include",
            "schema,columns",
            "--exclude",
            "description",
            "--fail-fast",
            "--graph",
            "out/graph.json",
            "--dialect",
            "snowflake",
            "--format",
            "json",
            "-vv",
            "a.sqlx",
            "b.sqlx",
        ])
        .unwrap();
        assert_eq!(args.include.as_deref(), Some("schema,columns"));
        assert_eq!(args.exclude.as_deref(), Some("description"));
        assert!(args.fail_fast);
        assert_eq!(args.graph, Some(PathBuf::from("out/graph.json")));
        assert_eq!(args.dialect.as_deref(), Some("snowflake"));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.files, vec!["a.sqlx", "b.sqlx"]);
    }
}
