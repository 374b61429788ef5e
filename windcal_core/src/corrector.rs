//! Two-axis interpolation of the calibration table.
//!
//! The approach angle is folded onto [0, 180], the raw speed is bracketed
//! between two breakpoints, each breakpoint is interpolated along the angle
//! axis and the two results are blended along the speed axis.

use crate::error::{CorrectionError, Result};
use crate::table::{Bracket, CalibrationTable};

/// Handling of angles outside [0, 360].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnglePolicy {
    /// Accept [0, 360]; reject anything else.
    #[default]
    Strict,
    /// Normalize any finite angle into [0, 360) before folding.
    Wrap,
}

/// Full breakdown of one correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    pub raw_speed: f32,
    pub angle: f32,
    pub folded_angle: f32,
    pub bracket: Bracket,
    pub speed_factor: f32,
    pub offset: f32,
    pub corrected: f32,
}

/// Mirror angles above 180° onto [0, 180]: 270 -> 90, 360 -> 0.
#[inline]
pub fn fold_angle(angle: f32) -> f32 {
    if angle > 180.0 { 360.0 - angle } else { angle }
}

/// Stateless corrector over an immutable table.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedCorrector {
    table: CalibrationTable,
    policy: AnglePolicy,
}

static BUILTIN: SpeedCorrector = SpeedCorrector::builtin();

/// Correct `raw_speed` at `angle` with the built-in table and strict angles.
pub fn correct(raw_speed: f32, angle: f32) -> Result<f32> {
    BUILTIN.correct(raw_speed, angle)
}

impl SpeedCorrector {
    pub const fn builtin() -> Self {
        Self {
            table: CalibrationTable::builtin(),
            policy: AnglePolicy::Strict,
        }
    }

    pub fn new(table: CalibrationTable) -> Self {
        Self {
            table,
            policy: AnglePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AnglePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn table(&self) -> &CalibrationTable {
        &self.table
    }

    pub fn policy(&self) -> AnglePolicy {
        self.policy
    }

    /// Corrected speed, `raw_speed + offset`.
    pub fn correct(&self, raw_speed: f32, angle: f32) -> Result<f32> {
        self.correct_detailed(raw_speed, angle).map(|c| c.corrected)
    }

    /// Additive offset only.
    pub fn correction(&self, raw_speed: f32, angle: f32) -> Result<f32> {
        self.correct_detailed(raw_speed, angle).map(|c| c.offset)
    }

    pub fn correct_detailed(&self, raw_speed: f32, angle: f32) -> Result<Correction> {
        check_speed(raw_speed)?;
        let angle = self.normalize_angle(angle)?;
        let folded_angle = fold_angle(angle);

        let bracket = self.table.bracket(raw_speed);
        let rows = self.table.breakpoints();
        let (low, high) = (&rows[bracket.low], &rows[bracket.high]);

        let speed_factor = if bracket.is_degenerate() {
            0.0
        } else {
            ((raw_speed - low.raw_speed) / (high.raw_speed - low.raw_speed)).clamp(0.0, 1.0)
        };

        let offset_low = low.offset_at(folded_angle);
        let offset_high = high.offset_at(folded_angle);
        let offset = offset_low + speed_factor * (offset_high - offset_low);
        let corrected = raw_speed + offset;

        tracing::trace!(
            raw_speed,
            angle,
            folded_angle,
            low = bracket.low,
            high = bracket.high,
            speed_factor,
            offset,
            "speed corrected"
        );

        Ok(Correction {
            raw_speed,
            angle,
            folded_angle,
            bracket,
            speed_factor,
            offset,
            corrected,
        })
    }

    fn normalize_angle(&self, angle: f32) -> Result<f32> {
        if !angle.is_finite() {
            return Err(CorrectionError::NonFiniteAngle(angle));
        }
        match self.policy {
            AnglePolicy::Strict if (0.0..=360.0).contains(&angle) => Ok(angle),
            AnglePolicy::Strict => Err(CorrectionError::AngleOutOfRange(angle)),
            AnglePolicy::Wrap => {
                let a = angle.rem_euclid(360.0);
                // rem_euclid can round up to exactly 360 for tiny negative inputs
                Ok(if a >= 360.0 { 0.0 } else { a })
            }
        }
    }
}

impl Default for SpeedCorrector {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_speed(raw_speed: f32) -> Result<()> {
    if !raw_speed.is_finite() {
        return Err(CorrectionError::NonFiniteSpeed(raw_speed));
    }
    if raw_speed < 0.0 {
        return Err(CorrectionError::NegativeSpeed(raw_speed));
    }
    Ok(())
}
