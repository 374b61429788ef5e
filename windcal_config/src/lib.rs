#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and calibration-table parsing for the wind-speed corrector.
//!
//! - `Config` is deserialized from TOML and validated.
//! - The calibration table can come from the built-in dataset, an inline
//!   `[[table.breakpoints]]` list or a CSV file with strict headers.
//! - Tables stored as scaled integers (e.g. tenths) are divided by
//!   `table.offset_scale` once, here, so downstream code only ever sees
//!   unscaled offsets.
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Calibration CSV schema.
///
/// Expected headers:
/// raw_speed,offset_0,offset_90,offset_180
///
/// Example:
/// raw_speed,offset_0,offset_90,offset_180
/// 0,0.0,0.0,0.0
/// 20,3.3,-2.3,-3.6
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct BreakpointRow {
    pub raw_speed: f32,
    pub offset_0: f32,
    pub offset_90: f32,
    pub offset_180: f32,
}

impl BreakpointRow {
    /// Divide the offsets (not the speed) by `scale`.
    pub fn unscaled(self, scale: f32) -> Self {
        Self {
            raw_speed: self.raw_speed,
            offset_0: self.offset_0 / scale,
            offset_90: self.offset_90 / scale,
            offset_180: self.offset_180 / scale,
        }
    }
}

pub const CSV_HEADERS: [&str; 4] = ["raw_speed", "offset_0", "offset_90", "offset_180"];

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnglePolicy {
    /// Reject angles outside [0, 360]
    #[default]
    Strict,
    /// Normalize angles modulo 360
    Wrap,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CorrectionCfg {
    pub angle_policy: AnglePolicy,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TableCfg {
    /// Optional CSV path; relative paths resolve against the config file's directory.
    pub csv: Option<PathBuf>,
    /// Divisor applied to stored offsets (10.0 for tables kept in tenths).
    pub offset_scale: f32,
    /// Optional inline table; mutually exclusive with `csv`.
    pub breakpoints: Vec<BreakpointRow>,
}

impl Default for TableCfg {
    fn default() -> Self {
        Self {
            csv: None,
            offset_scale: 1.0,
            breakpoints: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub level: Option<String>, // "info","debug"
    pub json: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub correction: CorrectionCfg,
    #[serde(default)]
    pub table: TableCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a TOML config file.
pub fn load_config_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))?;
    cfg.validate()?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        let scale = self.table.offset_scale;
        if !scale.is_finite() || scale <= 0.0 {
            eyre::bail!("table.offset_scale must be finite and > 0");
        }
        if self.table.csv.is_some() && !self.table.breakpoints.is_empty() {
            eyre::bail!("table.csv and table.breakpoints are mutually exclusive");
        }
        if let Some(level) = &self.logging.level {
            let known = ["error", "warn", "info", "debug", "trace"];
            if !known.contains(&level.to_ascii_lowercase().as_str()) {
                eyre::bail!("logging.level must be one of {}", known.join("|"));
            }
        }
        Ok(())
    }

    /// Resolve the configured table to unscaled rows.
    ///
    /// Returns `None` when the built-in dataset should be used.
    pub fn table_rows(&self, base_dir: &Path) -> eyre::Result<Option<Vec<BreakpointRow>>> {
        let scale = self.table.offset_scale;
        if let Some(csv) = &self.table.csv {
            let path = if csv.is_absolute() {
                csv.clone()
            } else {
                base_dir.join(csv)
            };
            return load_table_csv(&path, scale).map(Some);
        }
        if self.table.breakpoints.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            self.table
                .breakpoints
                .iter()
                .map(|r| r.unscaled(scale))
                .collect(),
        ))
    }
}

/// Load a calibration table from CSV, dividing offsets by `offset_scale`.
///
/// Only the schema is checked here; ordering and the zero row are enforced
/// when the rows become a calibration table.
pub fn load_table_csv(path: &Path, offset_scale: f32) -> eyre::Result<Vec<BreakpointRow>> {
    if !offset_scale.is_finite() || offset_scale <= 0.0 {
        eyre::bail!("offset scale must be finite and > 0, got {offset_scale}");
    }
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open calibration CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != CSV_HEADERS {
        eyre::bail!(
            "calibration CSV must have headers '{}', got: {}",
            CSV_HEADERS.join(","),
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<BreakpointRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row.unscaled(offset_scale)),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    if rows.is_empty() {
        eyre::bail!("calibration CSV {:?} has no rows", path);
    }
    Ok(rows)
}
