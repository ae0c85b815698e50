pub mod engine;
pub mod error;
pub mod file;
pub mod history;
pub mod settings;

// Public library API: the facade and the value types it returns.
pub use engine::{FileOpsEngine, ReplaceRequest, SearchRequest};
pub use error::{EngineError, EngineResult};
pub use file::batch::BatchReport;
pub use file::diff::{unified_patch, CompareReport, DiffRecord};
pub use file::modify::{BulkOperation, BulkOptions, ReplaceSummary};
pub use file::search::{FileSelection, MatchOptions, SearchMatch, SearchOutcome};
pub use file::tree::FileNode;
pub use history::{HistoryEntry, HistoryStore, JsonFileStore, OperationHistoryLog};
pub use settings::{Settings, SettingsManager};
