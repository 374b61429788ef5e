#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
//! `windcal` command-line entry point.

mod cli;
mod commands;
mod error_fmt;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::{Cli, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    // Config first: it may carry the log level.
    let loaded = commands::load_config(cli.config.as_deref());
    let (cfg_level, cfg_json) = match &loaded {
        Ok((cfg, _)) => (cfg.logging.level.clone(), cfg.logging.json),
        Err(_) => (None, false),
    };
    let level = cli
        .log_level
        .clone()
        .or(cfg_level)
        .unwrap_or_else(|| logging::DEFAULT_LEVEL.to_string());
    let _guard = logging::init(&level, cli.json || cfg_json);

    let result = loaded.and_then(|(cfg, base)| commands::run(&cli, cfg, &base));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            if JSON_MODE.get().copied().unwrap_or(false) {
                eprintln!("{}", format_error_json(&err));
            } else {
                eprintln!("{}", humanize(&err));
            }
            ExitCode::from(exit_code_for_error(&err) as u8)
        }
    }
}
