//! What the calculator screen shows.

use crate::calculator::preview_evaluate;

/// Result line while the expression does not evaluate yet.
pub const PENDING: &str = "…";

/// Result line after a failed commit.
pub const ERROR: &str = "Error";

/// A snapshot of the two-line calculator screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Display {
    /// The expression typed so far.
    pub expression: String,
    /// The live preview, the committed result, or an error marker.
    pub result: String,
    /// Whether the last commit failed.
    pub is_error: bool,
}

impl Display {
    /// Build the screen for an expression that is still being edited.
    pub fn preview(expression: &str) -> Self {
        let result = if expression.is_empty() {
            "0".to_string()
        } else {
            preview_evaluate(expression).unwrap_or_else(|| PENDING.to_string())
        };

        Self {
            expression: expression.to_string(),
            result,
            is_error: false,
        }
    }

    /// Build the screen after a commit failed.
    pub fn error(expression: &str) -> Self {
        Self {
            expression: expression.to_string(),
            result: ERROR.to_string(),
            is_error: true,
        }
    }
}
