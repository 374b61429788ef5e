//! Command execution: config resolution, corrector assembly and output.

use std::path::{Path, PathBuf};

use eyre::WrapErr;
use serde_json::json;
use windcal_config::Config;
use windcal_core::{Correction, SpeedCorrector, corrector_from_config};

use crate::cli::{Cli, Commands, DEFAULT_CONFIG};

/// Upper bound on rows a single sweep may print.
pub const MAX_SWEEP_ROWS: usize = 100_000;

/// Load the config named on the command line, or `./windcal.toml` when present,
/// or defaults. Returns the directory relative table paths resolve against.
pub fn load_config(path: Option<&Path>) -> eyre::Result<(Config, PathBuf)> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if !default.exists() {
                tracing::debug!("no config file; using built-in defaults");
                return Ok((Config::default(), PathBuf::from(".")));
            }
            default
        }
    };
    let cfg = windcal_config::load_config_file(&path)?;
    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    tracing::debug!(config = %path.display(), "config loaded");
    Ok((cfg, base))
}

/// Apply `--table` / `--offset-scale` on top of the config and build the corrector.
pub fn build_corrector(cli: &Cli, mut cfg: Config, base: &Path) -> eyre::Result<SpeedCorrector> {
    let mut base = base.to_path_buf();
    if let Some(table) = &cli.table {
        cfg.table.csv = Some(table.clone());
        cfg.table.breakpoints.clear();
        if let Some(scale) = cli.offset_scale {
            cfg.table.offset_scale = scale;
        }
        // command-line paths are relative to the working directory
        base = PathBuf::from(".");
    }
    corrector_from_config(&cfg, &base)
}

pub fn run(cli: &Cli, cfg: Config, base: &Path) -> eyre::Result<()> {
    let corrector = build_corrector(cli, cfg, base)?;
    tracing::info!(
        rows = corrector.table().len(),
        policy = ?corrector.policy(),
        "corrector ready"
    );
    match &cli.cmd {
        Commands::Correct { speed, angle } => run_correct(&corrector, *speed, *angle, cli.json),
        Commands::Sweep {
            angle,
            from,
            to,
            step,
        } => run_sweep(&corrector, *angle, *from, *to, *step, cli.json),
        Commands::Table => {
            run_table(&corrector, cli.json);
            Ok(())
        }
    }
}

pub fn correction_json(c: &Correction) -> serde_json::Value {
    json!({
        "raw_speed": c.raw_speed,
        "angle": c.angle,
        "folded_angle": c.folded_angle,
        "bracket": [c.bracket.low, c.bracket.high],
        "offset": c.offset,
        "corrected": c.corrected,
    })
}

fn run_correct(corrector: &SpeedCorrector, speed: f32, angle: f32, json: bool) -> eyre::Result<()> {
    let c = corrector
        .correct_detailed(speed, angle)
        .wrap_err_with(|| format!("cannot correct speed {speed} at {angle} degrees"))?;
    if json {
        println!("{}", correction_json(&c));
    } else {
        println!("{:.2}", c.corrected);
    }
    Ok(())
}

/// Speeds `from, from + step, ...` up to and including `to`.
pub fn sweep_speeds(from: f32, to: f32, step: f32) -> eyre::Result<Vec<f32>> {
    if !(step.is_finite() && step > 0.0) {
        eyre::bail!("sweep step must be finite and > 0, got {step}");
    }
    if !(from.is_finite() && to.is_finite()) || from > to {
        eyre::bail!("sweep range must be finite with from <= to, got {from}..{to}");
    }
    let span = (to - from) / step;
    // bounds the cast below; a non-finite span would saturate to usize::MAX
    if !(span.is_finite() && span < MAX_SWEEP_ROWS as f32) {
        eyre::bail!(
            "sweep would produce more than {MAX_SWEEP_ROWS} rows ({from}..{to} step {step})"
        );
    }
    // small slack so that e.g. 20..25 step 1 includes 25 despite rounding
    let n = (span + 1e-4).floor() as usize + 1;
    if n > MAX_SWEEP_ROWS {
        eyre::bail!("sweep would produce more than {MAX_SWEEP_ROWS} rows ({n})");
    }
    Ok((0..n).map(|i| from + step * i as f32).collect())
}

fn run_sweep(
    corrector: &SpeedCorrector,
    angle: f32,
    from: f32,
    to: f32,
    step: f32,
    json: bool,
) -> eyre::Result<()> {
    let speeds = sweep_speeds(from, to, step)?;
    tracing::debug!(rows = speeds.len(), angle, "sweep");
    for speed in speeds {
        let c = corrector
            .correct_detailed(speed, angle)
            .wrap_err_with(|| format!("cannot correct speed {speed} at {angle} degrees"))?;
        if json {
            println!("{}", correction_json(&c));
        } else {
            println!("{:>8.2} {:>8.2}", c.raw_speed, c.corrected);
        }
    }
    Ok(())
}

fn run_table(corrector: &SpeedCorrector, json: bool) {
    let table = corrector.table();
    if json {
        let rows: Vec<_> = table
            .breakpoints()
            .iter()
            .map(|b| {
                json!({
                    "raw_speed": b.raw_speed,
                    "offset_0": b.offset_0,
                    "offset_90": b.offset_90,
                    "offset_180": b.offset_180,
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(rows));
        return;
    }
    println!(
        "{:>9} {:>8} {:>8} {:>8}",
        "raw_speed", "0deg", "90deg", "180deg"
    );
    for b in table.breakpoints() {
        println!(
            "{:>9.1} {:>8.1} {:>8.1} {:>8.1}",
            b.raw_speed, b.offset_0, b.offset_90, b.offset_180
        );
    }
}
