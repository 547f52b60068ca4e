//! Output formatting

use std::io::IsTerminal;

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use sqlxlint_core::{CheckReport, Diagnostic, Outcome, RunReport, Selection, Severity};

use crate::args::OutputFormat;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Whether to emit ANSI colors: `NO_COLOR` disables, `FORCE_COLOR` enables,
/// otherwise only when attached to a terminal
pub fn supports_color() -> bool {
    let set = |name: &str| std::env::var_os(name).is_some_and(|v| !v.is_empty());
    if set("NO_COLOR") {
        return false;
    }
    if set("FORCE_COLOR") {
        return true;
    }
    std::io::stdout().is_terminal() || std::io::stderr().is_terminal()
}

/// Console printer for a check run.
///
/// Problems go to stderr, everything else to stdout.
pub struct Printer {
    format: OutputFormat,
    color: bool,
    quiet: bool,
}

impl Printer {
    pub fn new(format: OutputFormat, color: bool, quiet: bool) -> Self {
        Self {
            format,
            color,
            quiet,
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn warn(&self, message: &str) {
        eprintln!("{}", self.paint(YELLOW, &format!("⚠️  {message}")));
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.paint(RED, &format!("❌ {message}")));
    }

    fn success(&self, message: &str) {
        if !self.quiet {
            println!("{}", self.paint(GREEN, &format!("✅ {message}")));
        }
    }

    fn info(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }

    /// Warn about include/exclude names that matched no check
    pub fn print_selection(&self, selection: &Selection) {
        for name in &selection.unknown_include {
            self.warn(&format!("Unknown check in include: {name}"));
        }
        for name in &selection.unknown_exclude {
            self.warn(&format!("Unknown check in exclude: {name}"));
        }
        if selection.is_empty() {
            eprintln!("ℹ️  No checks selected.");
        } else if self.is_human() {
            self.info(&format!("🔎 Running checks: {}", selection.selected.join(", ")));
        }
    }

    /// Print a finished run in the configured format
    pub fn print_run(&self, run: &RunReport) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                self.print_human(run);
                Ok(())
            }
            OutputFormat::Json => print_json(run),
            OutputFormat::Sarif => print_sarif(run),
        }
    }

    fn print_human(&self, run: &RunReport) {
        for report in &run.reports {
            self.info(&self.paint(
                &format!("{CYAN}{BOLD}"),
                &format!("\n——— {} ———", report.check.to_uppercase()),
            ));
            self.print_report(report);
        }

        if run.fail_fast_triggered {
            eprintln!("⛔ fail-fast: stopping.");
        }
        if run.passed() {
            self.info("");
            self.success("All selected checks passed.");
        }
    }

    fn print_report(&self, report: &CheckReport) {
        for diag in &report.diagnostics {
            self.print_diagnostic(diag);
        }
        match summary_line(report) {
            Some(SummaryLine::Error) => self.error(&report.summary),
            Some(SummaryLine::Success) => self.success(&report.summary),
            None => {}
        }
    }

    fn print_diagnostic(&self, diag: &Diagnostic) {
        match diag.severity {
            Severity::Error => self.error(&diag.message),
            Severity::Warning => self.warn(&diag.message),
            Severity::Info => self.info(&self.paint(CYAN, &format!("✅ {}", diag.message))),
        }
        if let Some(help) = diag.help.as_deref().filter(|_| diag.is_error()) {
            eprintln!("   = help: {help}");
        }
    }
}

/// How a check's summary is shown in human output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SummaryLine {
    Error,
    Success,
}

/// `None` when the summary would repeat the check's only error line
fn summary_line(report: &CheckReport) -> Option<SummaryLine> {
    match report.outcome {
        Outcome::Failed if report.is_graph_unavailable() => None,
        Outcome::Failed => Some(SummaryLine::Error),
        Outcome::Passed | Outcome::NothingToCheck => Some(SummaryLine::Success),
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    passed: bool,
    #[serde(flatten)]
    run: &'a RunReport,
}

fn print_json(run: &RunReport) -> Result<()> {
    let output = JsonOutput {
        passed: run.passed(),
        run,
    };
    println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    Ok(())
}

fn print_sarif(run: &RunReport) -> Result<()> {
    let sarif = sarif_log(run);
    println!("{}", serde_json::to_string_pretty(&sarif).into_diagnostic()?);
    Ok(())
}

/// SARIF 2.1.0 log holding every error and warning of the run
fn sarif_log(run: &RunReport) -> serde_json::Value {
    let results: Vec<serde_json::Value> = run
        .reports
        .iter()
        .flat_map(|report| &report.diagnostics)
        .filter(|d| d.severity != Severity::Info)
        .map(|d| {
            let mut result = serde_json::json!({
                "ruleId": d.code(),
                "level": match d.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                    Severity::Info => "note",
                },
                "message": {
                    "text": d.message
                }
            });
            if let Some(file) = &d.file {
                result["locations"] = serde_json::json!([{
                    "physicalLocation": {
                        "artifactLocation": {
                            "uri": file
                        }
                    }
                }]);
            }
            result
        })
        .collect();

    serde_json::json!({
        "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "sqlxlint",
                    "version": env!("CARGO_PKG_VERSION")
                }
            },
            "results": results
        }]
    })
}
