//! Per-project journal of completed mutating operations.
//!
//! - `entry`: the persisted record
//! - `store`: the JSON document store the journal is kept in
//! - `log`: append/load/clear with the bounded, newest-first policy

pub mod entry;
pub mod log;
pub mod store;

pub use entry::HistoryEntry;
pub use log::OperationHistoryLog;
pub use store::{HistoryStore, JsonFileStore};
