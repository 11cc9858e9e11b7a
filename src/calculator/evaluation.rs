//! Expression evaluation.
//!
//! Sanitizes raw keypad input, runs it through the arithmetic evaluator,
//! and rejects or rounds the outcome so callers only ever see finite,
//! noise-free numbers.

use super::error::CalcError;
use super::format::format_number;
use super::parser::eval_canonical;
use super::sanitize::sanitize;
use tracing::debug;

/// Scale used to quantize results to 12 decimal digits.
const ROUNDING_SCALE: f64 = 1e12;

/// Sanitize and evaluate without rounding.
///
/// `Ok(None)` means the expression was empty.
fn evaluate_raw(raw: &str) -> Result<Option<f64>, CalcError> {
    let sanitized = sanitize(raw)?;
    if sanitized.trim().is_empty() {
        return Ok(None);
    }

    let value = eval_canonical(&sanitized)?;
    if !value.is_finite() {
        return Err(CalcError::NonFinite);
    }

    Ok(Some(value))
}

/// Round half up, toward positive infinity on ties.
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Quantize to 12 decimal digits to suppress binary representation noise.
///
/// Magnitudes too large to scale overflow to infinity.
fn round_result(value: f64) -> f64 {
    round_half_up((value + f64::EPSILON) * ROUNDING_SCALE) / ROUNDING_SCALE
}

/// Evaluate a calculator expression.
///
/// An empty expression evaluates to `0`. Results are rounded to 12 decimal
/// digits; infinite and NaN results are reported as [`CalcError::NonFinite`].
pub fn evaluate(raw: &str) -> Result<f64, CalcError> {
    match evaluate_raw(raw) {
        Ok(Some(value)) => {
            let rounded = round_result(value);
            if rounded.is_finite() {
                Ok(rounded)
            } else {
                debug!(expression = raw, "Result overflowed while rounding");
                Err(CalcError::NonFinite)
            }
        }
        Ok(None) => Ok(0.0),
        Err(e) => {
            debug!(expression = raw, error = %e, "Evaluation failed");
            Err(e)
        }
    }
}

/// Evaluate for the live preview line.
///
/// Returns `None` for empty input and for any failure, otherwise the
/// formatted result.
pub fn preview_evaluate(raw: &str) -> Option<String> {
    match evaluate_raw(raw) {
        Ok(Some(value)) => Some(format_number(value)),
        _ => None,
    }
}
