#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Cup-anemometer wind-speed correction.
//!
//! Corrects a raw speed reading for the bias introduced by the anemometer's
//! own housing, as a function of approach angle and raw speed.
//!
//! ## Architecture
//!
//! - **Table**: ordered calibration breakpoints and bracket search (`table` module)
//! - **Corrector**: angle folding and two-axis linear interpolation (`corrector` module)
//! - **Conversions**: mapping from `windcal_config` types (`conversions` module)
//!
//! The correction path is pure: no I/O, no allocation, no shared mutable
//! state. Both `SpeedCorrector` and `CalibrationTable` are `Send + Sync`.
//!
//! ```
//! let corrected = windcal_core::correct(20.0, 0.0).unwrap();
//! assert!((corrected - 23.3).abs() < 0.05);
//! ```

pub mod conversions;
pub mod corrector;
pub mod error;
pub mod table;

pub use conversions::corrector_from_config;
pub use corrector::{AnglePolicy, Correction, SpeedCorrector, correct, fold_angle};
pub use error::{CorrectionError, TableError};
pub use table::{Bracket, Breakpoint, CalibrationTable, DAVIS_VANTAGE_PRO2, SENTINEL_SPEED};
