//! Error types for expression sanitizing and evaluation.

use thiserror::Error;

/// Reasons an expression could not be turned into a number.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Input contains a character outside the arithmetic alphabet.
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),

    /// The canonical expression is not well-formed arithmetic.
    #[error("syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// Evaluation produced infinity or NaN (e.g. division by zero).
    #[error("result is not a finite number")]
    NonFinite,
}

impl CalcError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// True for failures that happen after the input passed the character check.
    pub fn is_evaluation_error(&self) -> bool {
        !matches!(self, Self::InvalidCharacter(_))
    }
}
