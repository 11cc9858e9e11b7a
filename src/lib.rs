//! A keypad calculator core: a sandboxed arithmetic evaluator and a bounded,
//! persisted history of committed results.

pub mod calculator;
pub mod config;
pub mod history;
pub mod logging;
pub mod repl;
pub mod session;
pub mod storage;

pub use calculator::{CalcError, evaluate, format_number, preview_evaluate, sanitize};
pub use history::{HistoryEntry, HistoryStore};
pub use session::{Key, Session};
pub use storage::{FileStorage, MemoryStorage, Storage};
