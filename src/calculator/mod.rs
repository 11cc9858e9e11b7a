//! Calculator module for evaluating arithmetic expressions.
//!
//! This module provides functionality to:
//! - Sanitize keypad input into a canonical arithmetic string
//! - Evaluate expressions with a small recursive-descent evaluator
//! - Format results for display
//! - Copy results to the clipboard

mod clipboard;
mod error;
mod evaluation;
mod format;
mod parser;
mod sanitize;

pub use clipboard::copy_result;
pub use error::CalcError;
pub use evaluation::{evaluate, preview_evaluate};
pub use format::{format_number, number_to_string};
pub use sanitize::sanitize;

pub(crate) use sanitize::canonicalize;
