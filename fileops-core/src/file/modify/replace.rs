use anyhow::{Context, Result};
use chrono::Utc;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use crate::file::access::FileAccessManager;
use crate::file::batch::{BatchReport, FileError};
use crate::file::ignore::Ignored;
use crate::file::search::candidates::{collect_candidates, FileSelection};
use crate::file::search::pattern::{build_matcher, MatchOptions};

/// A compiled search/replace pair.
#[derive(Debug, Clone)]
pub struct Replacement {
    matcher: Regex,
    search: String,
    replace: String,
    /// Regex mode lets the replacement refer to capture groups (`$1`).
    expand: bool,
}

impl Replacement {
    pub fn new(search: &str, replace: &str, options: &MatchOptions) -> Result<Self> {
        Ok(Self {
            matcher: build_matcher(search, options)?,
            search: search.to_string(),
            replace: replace.to_string(),
            expand: options.regex,
        })
    }

    /// Human readable `"<search> -> <replace>"`.
    pub fn description(&self) -> String {
        format!("{} -> {}", self.search, self.replace)
    }

    /// Replaces every match in `content`, returning the new content and the
    /// number of matches found in the original.
    pub fn apply(&self, content: &str) -> (String, usize) {
        let count = self.matcher.find_iter(content).count();
        if count == 0 {
            return (content.to_string(), 0);
        }
        let replaced = if self.expand {
            self.matcher.replace_all(content, self.replace.as_str())
        } else {
            self.matcher.replace_all(content, NoExpand(self.replace.as_str()))
        };
        (replaced.into_owned(), count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceOutcome {
    pub occurrences_replaced: usize,
    /// Relative path of the backup written before the file was changed.
    pub backup: Option<String>,
}

impl ReplaceOutcome {
    fn unchanged() -> Self {
        Self {
            occurrences_replaced: 0,
            backup: None,
        }
    }
}

/// Replaces every match in one file.
///
/// When the content would change, the original is first copied to
/// `<file>.backup.<epoch-ms>`; the file is only overwritten once that copy
/// has completed. Unchanged content means no write and no backup.
pub async fn try_replace_in_file(
    access: &FileAccessManager,
    file: &str,
    replacement: &Replacement,
) -> Result<ReplaceOutcome> {
    let original = access.read_file(file).await?;
    let (updated, count) = replacement.apply(&original);
    if updated == original {
        return Ok(ReplaceOutcome::unchanged());
    }

    let backup = backup_path(access, file).await?;
    access
        .copy_file(file, &backup)
        .await
        .with_context(|| format!("Failed to back up {file}; original left untouched"))?;
    access.write_file(file, &updated).await?;

    tracing::info!("Replaced {count} occurrences in {file} (backup: {backup})");
    Ok(ReplaceOutcome {
        occurrences_replaced: count,
        backup: Some(backup),
    })
}

/// Like [`try_replace_in_file`] but never fails: any error is logged and
/// reported as zero replacements. The file is then either untouched or
/// already backed up.
pub async fn replace_in_file(
    access: &FileAccessManager,
    file: &str,
    replacement: &Replacement,
) -> usize {
    match try_replace_in_file(access, file, replacement).await {
        Ok(outcome) => outcome.occurrences_replaced,
        Err(e) => {
            tracing::warn!("Replace in {file} failed: {e:#}");
            0
        }
    }
}

async fn backup_path(access: &FileAccessManager, file: &str) -> Result<String> {
    let mut stamp = Utc::now().timestamp_millis();
    loop {
        let candidate = format!("{file}.backup.{stamp}");
        if !access.file_exists(&candidate).await? {
            return Ok(candidate);
        }
        stamp += 1;
    }
}

/// Files a replace-across-files call touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceTarget {
    Files(Vec<String>),
    /// Every text file under the root, skipping build, dependency and
    /// version-control directories.
    AllText { include_hidden: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceSummary {
    pub total_replacements: usize,
    pub files_modified: usize,
    pub errors: Vec<FileError>,
}

/// Applies `replacement` to each target file independently. A file that
/// fails is reported in `errors` and does not stop the batch.
pub async fn replace_across_files(
    access: &FileAccessManager,
    replacement: &Replacement,
    target: &ReplaceTarget,
    max_reported_errors: usize,
) -> Result<ReplaceSummary> {
    let files = match target {
        ReplaceTarget::Files(files) => files.clone(),
        ReplaceTarget::AllText { include_hidden } => {
            let ignored = Ignored::new(true, *include_hidden);
            collect_candidates(access.root(), &FileSelection::text_only(), &ignored)?
                .into_iter()
                .map(|c| c.relative)
                .collect()
        }
    };

    let mut report = BatchReport::new(max_reported_errors);
    let mut total_replacements = 0;
    let mut files_modified = 0;

    for file in &files {
        let outcome = try_replace_in_file(access, file, replacement).await;
        if let Some(outcome) = report.record(file, outcome) {
            if outcome.occurrences_replaced > 0 {
                total_replacements += outcome.occurrences_replaced;
                files_modified += 1;
            }
        }
    }

    Ok(ReplaceSummary {
        total_replacements,
        files_modified,
        errors: report.errors,
    })
}
