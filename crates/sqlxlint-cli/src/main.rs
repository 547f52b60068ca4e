//! sqlxlint CLI - lint checks for compiled Dataform SQLX projects

mod args;
mod config;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use sqlxlint_core::runner::{normalize_changed_files, run_checks};
use sqlxlint_core::{CheckContext, CheckRegistry, Selection};
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::config::Config;
use crate::output::{supports_color, Printer};

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// Run the selected checks; `Ok(true)` when every executed check passed
fn run(args: Args) -> Result<bool> {
    let printer = Printer::new(args.format, supports_color(), args.quiet);

    let file_config = match &args.config {
        None => Config::default(),
        Some(path) if !path.exists() => {
            printer.warn(&format!("Config not found: {}", path.display()));
            Config::default()
        }
        Some(path) => Config::from_file(path).unwrap_or_else(|e| {
            printer.warn(&format!("Failed to load config {}: {}", path.display(), e));
            Config::default()
        }),
    };
    let fail_fast_env = std::env::var("CHECKS_FAIL_FAST").ok();
    let settings = file_config.merge_with_args(&args, fail_fast_env.as_deref())?;
    tracing::debug!(?settings, "resolved settings");

    let registry = CheckRegistry::builtin();
    let selection = Selection::resolve(&registry, &settings.include, &settings.exclude);
    printer.print_selection(&selection);
    if selection.is_empty() {
        return Ok(true);
    }

    let files = normalize_changed_files(&args.files);
    let ctx = CheckContext::new(settings.graph).with_dialect(settings.dialect);
    let report = run_checks(&registry, &selection, &ctx, &files, settings.fail_fast);
    printer.print_run(&report)?;

    Ok(report.passed())
}
