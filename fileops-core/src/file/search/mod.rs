//! Multi-file content search.
//!
//! - `pattern`: compiles the query (literal or regex, case, whole word)
//! - `candidates`: walks the project and selects files by extension, category and name
//! - `content`: scans candidates line by line and ranks the matching files

pub mod candidates;
pub mod content;
pub mod pattern;

pub use candidates::{collect_candidates, Candidate, FileSelection};
pub use content::{
    search_content, search_with_matcher, PreviewLine, SearchLimits, SearchMatch, SearchOutcome,
};
pub use pattern::{build_matcher, MatchOptions};
