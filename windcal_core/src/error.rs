use thiserror::Error;

/// Rejected inputs to [`crate::SpeedCorrector::correct`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum CorrectionError {
    #[error("raw speed is not finite: {0}")]
    NonFiniteSpeed(f32),
    #[error("raw speed must be >= 0, got {0}")]
    NegativeSpeed(f32),
    #[error("angle is not finite: {0}")]
    NonFiniteAngle(f32),
    #[error("angle must be within [0, 360] degrees, got {0}")]
    AngleOutOfRange(f32),
}

/// Reasons a breakpoint list cannot become a [`crate::CalibrationTable`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    #[error("calibration table requires at least two breakpoints, got {0}")]
    TooShort(usize),
    #[error("breakpoint {index} has a non-finite value")]
    NonFinite { index: usize },
    #[error("first breakpoint must be the zero row (raw_speed 0, all offsets 0)")]
    MissingZeroRow,
    #[error("raw_speed must be strictly increasing: index {index} ({value}) <= previous ({previous})")]
    NotIncreasing {
        index: usize,
        value: f32,
        previous: f32,
    },
}

pub type Result<T> = std::result::Result<T, CorrectionError>;
