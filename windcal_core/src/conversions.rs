//! `From` implementations bridging `windcal_config` types to `windcal_core` types.

use std::path::Path;

use eyre::WrapErr;

use crate::corrector::{AnglePolicy, SpeedCorrector};
use crate::table::{Breakpoint, CalibrationTable};

// ── AnglePolicy ──────────────────────────────────────────────────────────────

impl From<windcal_config::AnglePolicy> for AnglePolicy {
    fn from(p: windcal_config::AnglePolicy) -> Self {
        match p {
            windcal_config::AnglePolicy::Strict => AnglePolicy::Strict,
            windcal_config::AnglePolicy::Wrap => AnglePolicy::Wrap,
        }
    }
}

// ── Breakpoint ───────────────────────────────────────────────────────────────

impl From<&windcal_config::BreakpointRow> for Breakpoint {
    fn from(r: &windcal_config::BreakpointRow) -> Self {
        Breakpoint::new(r.raw_speed, r.offset_0, r.offset_90, r.offset_180)
    }
}

// ── CalibrationTable ─────────────────────────────────────────────────────────

impl TryFrom<&[windcal_config::BreakpointRow]> for CalibrationTable {
    type Error = crate::error::TableError;
    fn try_from(rows: &[windcal_config::BreakpointRow]) -> Result<Self, Self::Error> {
        CalibrationTable::from_breakpoints(rows.iter().map(Breakpoint::from).collect())
    }
}

// ── SpeedCorrector ───────────────────────────────────────────────────────────

/// Build a corrector from a validated config. Relative table paths resolve
/// against `base_dir`.
pub fn corrector_from_config(
    cfg: &windcal_config::Config,
    base_dir: &Path,
) -> eyre::Result<SpeedCorrector> {
    cfg.validate()?;
    let table = match cfg.table_rows(base_dir)? {
        Some(rows) => {
            let table = CalibrationTable::try_from(rows.as_slice())
                .wrap_err("invalid calibration table")?;
            if !table.has_clamp_sentinel() {
                tracing::warn!(
                    max_speed = table.max_calibrated_speed(),
                    "calibration table has no clamp sentinel; corrections above the last breakpoint reuse its offsets"
                );
            }
            tracing::debug!(rows = table.len(), "loaded calibration table");
            table
        }
        None => CalibrationTable::builtin(),
    };
    Ok(SpeedCorrector::new(table).with_policy(cfg.correction.angle_policy.into()))
}
