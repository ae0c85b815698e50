use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::file::access::FileAccessManager;
use crate::file::batch::BatchReport;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BulkOperation {
    Copy,
    Move,
    Delete,
    Duplicate,
    Rename,
    /// Placeholder: recorded as a successful no-op.
    Compress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkOptions {
    /// Regex applied to the file name when renaming.
    pub pattern: Option<String>,
    pub replacement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkLayout {
    pub copies_dir: String,
    pub moved_dir: String,
    pub max_reported_errors: usize,
}

impl Default for BulkLayout {
    fn default() -> Self {
        Self {
            copies_dir: "copies".to_string(),
            moved_dir: "moved".to_string(),
            max_reported_errors: 10,
        }
    }
}

#[derive(Debug, Clone)]
struct RenameRule {
    pattern: Regex,
    replacement: Option<String>,
}

/// A validated bulk request. Building the plan is where bad input is
/// rejected; executing it only produces per-file outcomes.
#[derive(Debug, Clone)]
pub struct BulkPlan {
    operation: BulkOperation,
    rename: Option<RenameRule>,
}

impl BulkPlan {
    pub fn new(operation: BulkOperation, options: &BulkOptions) -> Result<Self> {
        let rename = match operation {
            BulkOperation::Rename => {
                let Some(pattern) = options.pattern.as_deref().filter(|p| !p.is_empty()) else {
                    bail!("Rename requires a pattern");
                };
                let pattern = Regex::new(pattern)
                    .with_context(|| format!("Invalid rename pattern: {pattern}"))?;
                Some(RenameRule {
                    pattern,
                    replacement: options.replacement.clone(),
                })
            }
            _ => None,
        };
        Ok(Self { operation, rename })
    }

    /// Applies the operation to each file in order. One file's failure is
    /// recorded and the next file is still attempted.
    pub async fn execute(
        &self,
        access: &FileAccessManager,
        files: &[String],
        layout: &BulkLayout,
    ) -> BatchReport {
        let mut report = BatchReport::new(layout.max_reported_errors);
        for file in files {
            let outcome = self.apply(access, file, layout).await;
            report.record(file, outcome);
        }
        tracing::info!(
            "Bulk {} finished: {} succeeded, {} failed",
            self.operation,
            report.success_count,
            report.error_count
        );
        report
    }

    async fn apply(&self, access: &FileAccessManager, file: &str, layout: &BulkLayout) -> Result<()> {
        match self.operation {
            BulkOperation::Copy => {
                let target = format!("{}/{}", layout.copies_dir, normalized(file));
                access.copy_file(file, &target).await.map(|_| ())
            }
            BulkOperation::Move => {
                let target = format!("{}/{}", layout.moved_dir, normalized(file));
                access.move_file(file, &target).await
            }
            BulkOperation::Delete => access.delete_file(file).await,
            BulkOperation::Duplicate => {
                let target = duplicate_name(file)?;
                access.copy_file(file, &target).await.map(|_| ())
            }
            BulkOperation::Rename => {
                let Some(rule) = &self.rename else {
                    bail!("Rename requires a pattern");
                };
                let Some(replacement) = &rule.replacement else {
                    tracing::debug!("No rename replacement given, leaving {file} as is");
                    return Ok(());
                };
                match renamed(file, &rule.pattern, replacement)? {
                    Some(target) => access.move_file(file, &target).await,
                    None => Ok(()),
                }
            }
            BulkOperation::Compress => {
                tracing::info!("Compression is not implemented, skipping {file}");
                Ok(())
            }
        }
    }
}

fn normalized(file: &str) -> &str {
    file.trim_start_matches("./")
}

fn split_parent(file: &str) -> (Option<&str>, &str) {
    let file = normalized(file);
    match file.rfind('/') {
        Some(idx) => (Some(&file[..idx]), &file[idx + 1..]),
        None => (None, file),
    }
}

fn join_parent(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}/{name}"),
        None => name.to_string(),
    }
}

/// `dir/name.ext` -> `dir/name_copy.ext`; `dir/name` -> `dir/name_copy`.
fn duplicate_name(file: &str) -> Result<String> {
    let (parent, name) = split_parent(file);
    let path = Path::new(name);
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        bail!("Cannot duplicate {file}: no file name");
    };
    let new_name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_copy.{ext}"),
        None => format!("{stem}_copy"),
    };
    Ok(join_parent(parent, &new_name))
}

/// New relative path after substituting in the file name only, or `None`
/// when the name does not change.
fn renamed(file: &str, pattern: &Regex, replacement: &str) -> Result<Option<String>> {
    let (parent, name) = split_parent(file);
    let new_name = pattern.replace_all(name, replacement);
    if new_name == name {
        return Ok(None);
    }
    if new_name.is_empty() || new_name.contains('/') || new_name == "." || new_name == ".." {
        bail!("Rename of {file} produced an invalid name: {new_name:?}");
    }
    Ok(Some(join_parent(parent, &new_name)))
}
