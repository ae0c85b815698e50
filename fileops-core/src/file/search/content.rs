use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use crate::file::category::FileCategory;
use crate::file::ignore::Ignored;
use crate::file::search::candidates::{collect_candidates, FileSelection};
use crate::file::search::pattern::{build_matcher, MatchOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_results: usize,
    pub preview_lines: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_results: 100,
            preview_lines: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewLine {
    /// 1-based line number.
    pub line: usize,
    pub text: String,
    pub occurrences_on_line: usize,
}

/// One file's search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub file: String,
    pub match_count: usize,
    pub preview: Vec<PreviewLine>,
    pub category: FileCategory,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub results: Vec<SearchMatch>,
    /// Number of matching files before `results` was capped.
    pub total_files: usize,
}

/// Searches every selected file under `root` for `query`.
///
/// Files are scanned one at a time in walk order. A file that cannot be read
/// as text is skipped. Results are ordered by descending match count (ties
/// keep walk order) and capped at `limits.max_results`.
pub async fn search_content(
    root: &Path,
    query: &str,
    options: &MatchOptions,
    selection: &FileSelection,
    limits: SearchLimits,
) -> Result<SearchOutcome> {
    let matcher = build_matcher(query, options)?;
    search_with_matcher(root, &matcher, options, selection, limits).await
}

/// Same as [`search_content`] with an already compiled pattern.
pub async fn search_with_matcher(
    root: &Path,
    matcher: &Regex,
    options: &MatchOptions,
    selection: &FileSelection,
    limits: SearchLimits,
) -> Result<SearchOutcome> {
    let ignored = Ignored::new(options.exclude_gitignore, options.include_hidden);
    let candidates = collect_candidates(root, selection, &ignored)?;

    let mut matches = Vec::new();
    for candidate in candidates {
        if !candidate.is_scannable() {
            tracing::trace!("Skipping non-text file {}", candidate.relative);
            continue;
        }

        let content = match fs::read_to_string(&candidate.path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("Skipping unreadable file {}: {e}", candidate.relative);
                continue;
            }
        };

        if let Some((match_count, preview)) = scan_lines(matcher, &content, limits.preview_lines) {
            matches.push(SearchMatch {
                file: candidate.relative,
                match_count,
                preview,
                category: candidate.category,
                size: candidate.size,
            });
        }
    }

    // sort_by is stable, so equal counts stay in discovery order
    matches.sort_by(|a, b| b.match_count.cmp(&a.match_count));
    let total_files = matches.len();
    matches.truncate(limits.max_results);

    tracing::debug!(
        "Search for {:?} matched {total_files} files under {}",
        matcher.as_str(),
        root.display()
    );

    Ok(SearchOutcome {
        results: matches,
        total_files,
    })
}

/// Counts every occurrence per line. Returns `None` when nothing matched.
fn scan_lines(
    matcher: &Regex,
    content: &str,
    preview_lines: usize,
) -> Option<(usize, Vec<PreviewLine>)> {
    let mut total = 0;
    let mut preview = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let occurrences = matcher.find_iter(line).count();
        if occurrences == 0 {
            continue;
        }
        total += occurrences;
        if preview.len() < preview_lines {
            preview.push(PreviewLine {
                line: i + 1,
                text: line.trim().to_string(),
                occurrences_on_line: occurrences,
            });
        }
    }

    (total > 0).then_some((total, preview))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_counts_and_ordering() {
        let temp = tempdir().unwrap();
        std_fs::write(temp.path().join("a.txt"), "foo").unwrap();
        std_fs::write(temp.path().join("b.txt"), "foo foo foo").unwrap();
        std_fs::write(temp.path().join("c.txt"), "bar").unwrap();
        std_fs::write(temp.path().join("d.txt"), "foo").unwrap();

        let outcome = search_content(
            temp.path(),
            "foo",
            &MatchOptions::default(),
            &FileSelection::all(),
            SearchLimits::default(),
        )
        .await
        .unwrap();

        let files: Vec<_> = outcome.results.iter().map(|m| m.file.as_str()).collect();
        assert_eq!(files, vec!["b.txt", "a.txt", "d.txt"]);
        assert_eq!(outcome.total_files, 3);
        assert_eq!(outcome.results[0].match_count, 3);
        assert_eq!(outcome.results[0].category, FileCategory::Text);
    }

    #[tokio::test]
    async fn test_preview_is_capped_but_count_is_not() {
        let temp = tempdir().unwrap();
        let content: String = (0..8).map(|i| format!("  hit {i} hit\n")).collect();
        std_fs::write(temp.path().join("many.md"), content).unwrap();

        let outcome = search_content(
            temp.path(),
            "hit",
            &MatchOptions::default(),
            &FileSelection::all(),
            SearchLimits::default(),
        )
        .await
        .unwrap();

        let result = &outcome.results[0];
        assert_eq!(result.match_count, 16);
        assert_eq!(result.preview.len(), 5);
        assert_eq!(
            result.preview[0],
            PreviewLine {
                line: 1,
                text: "hit 0 hit".to_string(),
                occurrences_on_line: 2,
            }
        );
        assert_eq!(result.preview[4].line, 5);
    }

    #[tokio::test]
    async fn test_results_capped_total_not() {
        let temp = tempdir().unwrap();
        for i in 0..7 {
            std_fs::write(temp.path().join(format!("f{i}.txt")), "needle").unwrap();
        }

        let limits = SearchLimits {
            max_results: 3,
            preview_lines: 5,
        };
        let outcome = search_content(
            temp.path(),
            "needle",
            &MatchOptions::default(),
            &FileSelection::all(),
            limits,
        )
        .await
        .unwrap();

        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.total_files, 7);
    }

    #[tokio::test]
    async fn test_binary_files_not_scanned() {
        let temp = tempdir().unwrap();
        std_fs::write(temp.path().join("blob.bin"), "needle").unwrap();
        std_fs::write(temp.path().join("notes.log"), "needle").unwrap();

        let outcome = search_content(
            temp.path(),
            "needle",
            &MatchOptions::default(),
            &FileSelection::all(),
            SearchLimits::default(),
        )
        .await
        .unwrap();

        let files: Vec<_> = outcome.results.iter().map(|m| m.file.as_str()).collect();
        assert_eq!(files, vec!["notes.log"]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_skipped() {
        let temp = tempdir().unwrap();
        std_fs::write(temp.path().join("bad.txt"), [0xff, 0xfe, b'n']).unwrap();
        std_fs::write(temp.path().join("good.txt"), "n").unwrap();

        let outcome = search_content(
            temp.path(),
            "n",
            &MatchOptions::default(),
            &FileSelection::all(),
            SearchLimits::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.total_files, 1);
        assert_eq!(outcome.results[0].file, "good.txt");
    }

    #[tokio::test]
    async fn test_blank_query_touches_nothing() {
        let err = search_content(
            Path::new("/definitely/not/a/real/root"),
            "  ",
            &MatchOptions::default(),
            &FileSelection::all(),
            SearchLimits::default(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }
}
