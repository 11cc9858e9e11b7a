//! Calculator controller.
//!
//! A [`Session`] owns the expression being typed and the last committed
//! result. It applies keypad editing rules, keeps the preview up to date,
//! and records committed results in the history store.

mod display;

pub use display::{Display, ERROR, PENDING};

use crate::calculator::{self, CalcError, number_to_string};
use crate::history::{HistoryEntry, HistoryStore};
use crate::storage::Storage;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};

lazy_static! {
    /// The number at the end of the expression, with an optional sign.
    static ref TRAILING_NUMBER: Regex = Regex::new(r"-?\d+(?:\.\d+)?$").unwrap();
}

/// A keypad key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A digit, operator, decimal point, or parenthesis.
    Char(char),
    /// Delete the last character.
    Backspace,
    /// Reset the expression.
    Clear,
    /// Turn the trailing number into a percentage.
    Percent,
    /// Commit the expression.
    Equals,
}

fn is_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%')
}

/// Interactive calculator state backed by a history store.
pub struct Session<S: Storage> {
    expression: String,
    last_result: Option<f64>,
    failed: bool,
    history: HistoryStore<S>,
    record_history: bool,
}

impl<S: Storage> Session<S> {
    pub fn new(history: HistoryStore<S>) -> Self {
        Self {
            expression: String::new(),
            last_result: None,
            failed: false,
            history,
            record_history: true,
        }
    }

    /// Stop (or resume) writing committed results to history.
    pub fn with_history_recording(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn last_result(&self) -> Option<f64> {
        self.last_result
    }

    /// The current two-line screen.
    pub fn display(&self) -> Display {
        if self.failed {
            Display::error(&self.expression)
        } else {
            Display::preview(&self.expression)
        }
    }

    /// Apply one key. Only [`Key::Equals`] can produce a value or an error.
    pub fn press(&mut self, key: Key) -> Result<Option<f64>, CalcError> {
        match key {
            Key::Char(c) => self.input(c),
            Key::Backspace => self.backspace(),
            Key::Clear => self.clear(),
            Key::Percent => self.apply_percent(),
            Key::Equals => return self.commit(),
        }
        Ok(None)
    }

    /// Type a character, applying the keypad editing rules.
    ///
    /// Display glyphs (`×`, `÷`, `−`) are accepted. Characters that are not
    /// part of an expression are ignored.
    pub fn input(&mut self, c: char) {
        let c = calculator::canonicalize(&c.to_string())
            .chars()
            .next()
            .unwrap_or(c);

        match c {
            '0'..='9' => {
                if self.expression == "0" {
                    self.expression.clear();
                }
                self.expression.push(c);
            }
            '.' => {
                let fragment = self
                    .expression
                    .rsplit(is_operator)
                    .next()
                    .unwrap_or_default();
                if !fragment.contains('.') {
                    self.expression.push('.');
                }
            }
            c if is_operator(c) => self.input_operator(c),
            '(' | ')' => self.expression.push(c),
            _ => {
                debug!(key = %c, "Ignoring key");
                return;
            }
        }

        self.failed = false;
    }

    fn input_operator(&mut self, op: char) {
        // Only a minus sign may start an expression.
        if self.expression.is_empty() || self.expression == "-" {
            if op == '-' {
                self.expression = "-".to_string();
            }
            return;
        }

        if self.expression.ends_with(is_operator) {
            self.expression.pop();
        }
        self.expression.push(op);
    }

    /// Delete the last character.
    pub fn backspace(&mut self) {
        self.expression.pop();
        self.failed = false;
    }

    /// Reset the expression and forget the last result.
    pub fn clear(&mut self) {
        self.expression.clear();
        self.last_result = None;
        self.failed = false;
    }

    /// Divide the trailing number by 100 in place.
    ///
    /// An empty expression becomes `0`; an expression that does not end in a
    /// number is left alone.
    pub fn apply_percent(&mut self) {
        if self.expression.is_empty() {
            self.expression = "0".to_string();
            self.failed = false;
            return;
        }

        let Some(found) = TRAILING_NUMBER.find(&self.expression) else {
            return;
        };
        let Ok(number) = found.as_str().parse::<f64>() else {
            return;
        };

        let start = found.start();
        self.expression.truncate(start);
        self.expression.push_str(&number_to_string(number / 100.0));
        self.failed = false;
    }

    /// Evaluate the expression and record it.
    ///
    /// An empty expression does nothing. On failure the expression stays
    /// editable and the screen shows [`ERROR`]. On success the result
    /// replaces the expression.
    pub fn commit(&mut self) -> Result<Option<f64>, CalcError> {
        if self.expression.is_empty() {
            return Ok(None);
        }

        let value = match calculator::evaluate(&self.expression) {
            Ok(value) => value,
            Err(e) => {
                self.failed = true;
                info!(expression = %self.expression, error = %e, "Invalid expression");
                return Err(e);
            }
        };

        self.last_result = Some(value);
        if self.record_history {
            self.history.append(&self.expression, value);
        }
        info!("Result: {}", calculator::format_number(value));

        self.expression = number_to_string(value);
        self.failed = false;
        Ok(Some(value))
    }

    /// Replace the expression with `expression` and commit it.
    ///
    /// Used for one-shot evaluation; the text is taken as-is rather than
    /// typed key by key. Blank input is a no-op like [`Session::commit`].
    pub fn commit_expression(&mut self, expression: &str) -> Result<Option<f64>, CalcError> {
        self.expression = expression.trim().to_string();
        self.failed = false;
        self.commit()
    }

    /// Continue from a past result.
    pub fn recall(&mut self, entry: &HistoryEntry) {
        self.expression = number_to_string(entry.result);
        self.failed = false;
    }

    /// Persisted history, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.load()
    }

    pub fn clear_history(&self) {
        self.history.clear();
        info!("History cleared");
    }

    pub fn history_store(&self) -> &HistoryStore<S> {
        &self.history
    }
}
