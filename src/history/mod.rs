//! Calculation history persisted through a [`Storage`](crate::storage::Storage) backend.

mod entry;
mod store;

pub use entry::HistoryEntry;
pub use store::{DEFAULT_HISTORY_KEY, HistoryError, HistoryStore, MAX_HISTORY};
