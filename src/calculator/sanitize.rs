//! Input sanitizing for the calculator.
//!
//! Turns keypad/display text into a canonical ASCII arithmetic string:
//! display glyphs become operators, digit-group separators are dropped,
//! anything outside the arithmetic alphabet is rejected, and `N%` literals
//! are rewritten to `(N/100)`.

use super::error::CalcError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A numeric literal immediately followed by a percent sign.
    static ref PERCENT_LITERAL: Regex = Regex::new(r"(\d+(?:\.\d+)?)%").unwrap();
}

/// Characters permitted in a canonical expression.
fn is_allowed(c: char) -> bool {
    c.is_ascii_digit()
        || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.' | '%')
        || c.is_whitespace()
}

/// Map display glyphs to canonical operators and drop group separators.
pub(crate) fn canonicalize(raw: &str) -> String {
    raw.chars()
        .filter(|&c| c != ',')
        .map(|c| match c {
            '×' => '*',
            '÷' => '/',
            '−' => '-',
            other => other,
        })
        .collect()
}

/// Validate and rewrite raw input into a canonical arithmetic string.
///
/// An empty input sanitizes to an empty string. The first character outside
/// `[0-9+\-*/().%\s]` is reported as [`CalcError::InvalidCharacter`].
///
/// Percent rewriting is a single textual pass over literals directly before
/// `%`; a `%` after a closing parenthesis is left as-is.
pub fn sanitize(raw: &str) -> Result<String, CalcError> {
    let canonical = canonicalize(raw);

    if let Some(bad) = canonical.chars().find(|&c| !is_allowed(c)) {
        return Err(CalcError::InvalidCharacter(bad));
    }

    Ok(PERCENT_LITERAL
        .replace_all(&canonical, "($1/100)")
        .into_owned())
}
