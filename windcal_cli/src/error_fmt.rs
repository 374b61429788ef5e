//! Human-readable error descriptions and structured JSON error formatting.

use windcal_core::{CorrectionError, TableError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(ce) = err.downcast_ref::<CorrectionError>() {
        return match ce {
            CorrectionError::NonFiniteSpeed(v) => format!(
                "What happened: Raw speed {v} is not a finite number.\nLikely causes: Missing or corrupt sensor reading.\nHow to fix: Pass a numeric --speed >= 0."
            ),
            CorrectionError::NegativeSpeed(v) => format!(
                "What happened: Raw speed {v} is negative.\nLikely causes: Sign error or uninitialized reading upstream.\nHow to fix: Pass a --speed >= 0."
            ),
            CorrectionError::NonFiniteAngle(v) => format!(
                "What happened: Angle {v} is not a finite number.\nLikely causes: Missing or corrupt vane reading.\nHow to fix: Pass a numeric --angle in degrees."
            ),
            CorrectionError::AngleOutOfRange(v) => format!(
                "What happened: Angle {v} is outside [0, 360] degrees.\nLikely causes: Unnormalized heading from the wind vane.\nHow to fix: Normalize the angle, or set correction.angle_policy = \"wrap\" in the config."
            ),
        };
    }

    if let Some(te) = err.downcast_ref::<TableError>() {
        return format!(
            "What happened: Calibration table rejected ({te}).\nLikely causes: Rows out of order, missing zero row, or non-numeric values.\nHow to fix: Start the table with a 0,0,0,0 row and list raw_speed in strictly increasing order."
        );
    }

    // String-based heuristics for errors coming from config or CSV loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("calibration csv must have headers") {
        return "Invalid headers in calibration CSV. Expected 'raw_speed,offset_0,offset_90,offset_180'.".to_string();
    }

    if lower.contains("open calibration csv") || lower.contains("read config") {
        return format!(
            "What happened: A file could not be opened ({msg}).\nLikely causes: Wrong path or missing permissions.\nHow to fix: Check the --config / --table paths."
        );
    }

    if lower.contains("sweep") {
        return format!("What happened: {msg}.\nHow to fix: Use a positive --step with --from <= --to, and keep the range within the row limit.");
    }

    if lower.contains("parse config") || lower.contains("must be") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: Typo or out-of-range value in the TOML.\nHow to fix: Edit the config file and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable name for the error kind, used in JSON output.
pub fn error_kind(err: &eyre::Report) -> &'static str {
    if let Some(ce) = err.downcast_ref::<CorrectionError>() {
        return match ce {
            CorrectionError::NonFiniteSpeed(_) => "NonFiniteSpeed",
            CorrectionError::NegativeSpeed(_) => "NegativeSpeed",
            CorrectionError::NonFiniteAngle(_) => "NonFiniteAngle",
            CorrectionError::AngleOutOfRange(_) => "AngleOutOfRange",
        };
    }
    if err.downcast_ref::<TableError>().is_some() {
        return "InvalidTable";
    }
    "Error"
}

/// Rejected inputs exit with 3, rejected tables with 4, anything else with 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<CorrectionError>().is_some() {
        return 3;
    }
    if err.downcast_ref::<TableError>().is_some() {
        return 4;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({ "reason": error_kind(err), "message": humanize(err) }).to_string()
}
