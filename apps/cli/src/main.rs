#![allow(clippy::print_stdout)]

use anyhow::Context as _;
use clap::Parser;
use harden_cli::{Cli, dispatch, resolve_config};
use harden_logger::Logger;
use hardentools::domain::config::HardenConfig;
use hardentools::engine::{Context, TracingSink};
use hardentools::{catalog, open_hive};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let _log = init_logger(&config, cli.verbose)?;

    let hive = open_hive(&config).context("Critical: store is unavailable")?;
    let orchestrator = catalog(&config)?;
    let ctx = Context::new(&*hive, &TracingSink);

    let output = dispatch(&cli.command, &orchestrator, &ctx, cli.json)?;
    println!("{}", output.text);

    Ok(if output.success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn init_logger(config: &HardenConfig, verbose: u8) -> anyhow::Result<Logger> {
    let log = &config.log;
    let builder = Logger::builder()
        .name(log.file_name.as_str())
        .filter(&log.level)?
        .verbosity(verbose);

    let logger = match &log.path {
        Some(path) => builder.path(path).max_files(log.max_files).json(log.json).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}
