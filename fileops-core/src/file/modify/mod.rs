//! File mutation: search-and-replace with backups, and bulk file actions.

pub mod bulk;
pub mod replace;

pub use bulk::{BulkLayout, BulkOperation, BulkOptions, BulkPlan};
pub use replace::{
    replace_across_files, replace_in_file, try_replace_in_file, ReplaceOutcome, ReplaceSummary,
    ReplaceTarget, Replacement,
};
