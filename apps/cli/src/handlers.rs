//! Command handlers. Each one renders its result; printing is left to `main`.

use crate::args::{Cli, Command};
use anyhow::{Context as _, Result};
use hardentools::domain::config::HardenConfig;
use hardentools::engine::{Context, Mode, Orchestrator, Report, Selection, Status};
use hardentools::kernel::config::load_config;
use std::fmt::Write as _;
use tracing::debug;

/// Rendered command result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    /// `false` when any entry failed.
    pub success: bool,
}

/// Loads the configuration file and environment overrides, then applies the CLI flags.
///
/// # Errors
/// Returns an error if the configuration cannot be loaded.
pub fn resolve_config(cli: &Cli) -> Result<HardenConfig> {
    let mut config: HardenConfig =
        load_config(cli.config.as_deref()).context("Configuration is malformed")?;

    if let Some(backend) = cli.backend {
        config.hive.backend = backend;
    }
    if let Some(dir) = &cli.data_dir {
        config.hive.data_dir.clone_from(dir);
    }
    debug!(backend = %config.hive.backend, bound = config.list.bound, "Configuration resolved");
    Ok(config)
}

/// Runs `command` against the catalog.
///
/// # Errors
/// Returns an error only if the result cannot be rendered; entry failures are reported
/// through [`Output::success`].
pub fn dispatch(
    command: &Command,
    orchestrator: &Orchestrator,
    ctx: &Context<'_>,
    json: bool,
) -> Result<Output> {
    match command.mode() {
        None => status(orchestrator, ctx, json),
        Some(mode) => run(orchestrator, ctx, mode, &command.selection(), json),
    }
}

fn status(orchestrator: &Orchestrator, ctx: &Context<'_>, json: bool) -> Result<Output> {
    let statuses = orchestrator.status(ctx);
    let text = if json {
        serde_json::to_string_pretty(&statuses).context("Rendering status")?
    } else {
        status_table(&statuses)
    };
    Ok(Output { text, success: true })
}

fn run(
    orchestrator: &Orchestrator,
    ctx: &Context<'_>,
    mode: Mode,
    selection: &Selection,
    json: bool,
) -> Result<Output> {
    let report = orchestrator.run(ctx, mode, selection);
    let text = if json {
        serde_json::to_string_pretty(&report.summary()).context("Rendering report")?
    } else {
        report_lines(&report)
    };
    Ok(Output { text, success: report.is_success() })
}

fn status_table(statuses: &[Status]) -> String {
    let width = statuses.iter().map(|s| s.name.len()).max().unwrap_or(0).max("NAME".len());
    let mut out = format!("{:<width$}  {:<8}  {:<7}  DESCRIPTION", "NAME", "STATE", "DEFAULT");
    for s in statuses {
        let state = if s.hardened { "hardened" } else { "off" };
        let default = if s.harden_by_default { "yes" } else { "no" };
        let _ = write!(out, "\n{:<width$}  {state:<8}  {default:<7}  {}", s.name, s.description);
    }
    out
}

fn report_lines(report: &Report) -> String {
    let mode = report.mode();
    let mut out = String::new();
    for outcome in report.outcomes() {
        match &outcome.result {
            Ok(()) => {
                let _ = writeln!(out, "{mode} {}: ok", outcome.name);
            },
            Err(err) => {
                let _ = writeln!(out, "{mode} {}: FAILED: {err}", outcome.name);
            },
        }
    }
    let summary = report.summary();
    let _ = write!(out, "{} succeeded, {} failed", summary.succeeded, summary.failed);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(name: &str, hardened: bool) -> Status {
        Status {
            name: name.to_owned(),
            long_name: format!("Disable {name}"),
            description: format!("Disables {name}"),
            harden_by_default: !hardened,
            hardened,
        }
    }

    #[test]
    fn table_aligns_columns() {
        let table = status_table(&[status("cmd.exe", false), status("PowerShell", true)]);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("NAME        STATE"));
        assert!(lines[1].starts_with("cmd.exe     off       yes"));
        assert!(lines[2].starts_with("PowerShell  hardened  no"));
    }

    #[test]
    fn empty_catalog_renders_header_only() {
        assert_eq!(status_table(&[]).lines().count(), 1);
    }
}
