use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn fileops_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".fileops")
}

fn default_data_root() -> PathBuf {
    fileops_home().join("projects")
}

fn default_history_dir() -> PathBuf {
    fileops_home().join("history")
}

fn default_max_depth() -> usize {
    5
}

fn default_max_results() -> usize {
    100
}

fn default_preview_lines() -> usize {
    5
}

fn default_max_reported_errors() -> usize {
    10
}

fn default_copies_dir() -> String {
    "copies".to_string()
}

fn default_moved_dir() -> String {
    "moved".to_string()
}

fn default_max_entries() -> usize {
    100
}

/// Engine settings. Every field has a default so a partial (or empty)
/// settings file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Directory holding one sub-directory per project.
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,

    /// Directory holding the per-project operation history documents.
    #[serde(default = "default_history_dir")]
    pub history_dir: PathBuf,

    #[serde(default)]
    pub tree: TreeSettings,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub bulk: BulkSettings,

    #[serde(default)]
    pub history: HistorySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            history_dir: default_history_dir(),
            tree: TreeSettings::default(),
            search: SearchSettings::default(),
            bulk: BulkSettings::default(),
            history: HistorySettings::default(),
        }
    }
}

impl Settings {
    /// Settings rooted at an explicit directory instead of the home directory.
    pub fn rooted_at(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            data_root: base.join("projects"),
            history_dir: base.join("history"),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeSettings {
    /// Default depth bound used when a tree request does not give one.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchSettings {
    /// Cap on emitted search results. `totalFiles` is never capped.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Matching lines kept per file as a preview.
    #[serde(default = "default_preview_lines")]
    pub preview_lines: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            preview_lines: default_preview_lines(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkSettings {
    #[serde(default = "default_max_reported_errors")]
    pub max_reported_errors: usize,

    /// Sub-tree (relative to the project root) that `copy` writes into.
    #[serde(default = "default_copies_dir")]
    pub copies_dir: String,

    /// Sub-tree (relative to the project root) that `move` relocates into.
    #[serde(default = "default_moved_dir")]
    pub moved_dir: String,
}

impl Default for BulkSettings {
    fn default() -> Self {
        Self {
            max_reported_errors: default_max_reported_errors(),
            copies_dir: default_copies_dir(),
            moved_dir: default_moved_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistorySettings {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}
