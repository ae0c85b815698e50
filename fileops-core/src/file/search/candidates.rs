use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::file::category::{extension_of, is_text_extension, FileCategory};
use crate::file::ignore::Ignored;
use crate::file::resolver::relative_to;
use crate::file::search::pattern::wildcard_to_regex;

/// Which files a search (or replace-all) considers.
///
/// Explicit extensions win over categories; with neither, every file is a
/// candidate. `FileCategory::Other` selects files whose extension is in no
/// other category, extensionless files included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileSelection {
    pub extensions: Vec<String>,
    #[serde(rename = "fileTypes", alias = "categories")]
    pub categories: Vec<FileCategory>,
    /// Wildcard matched against the file name, e.g. `*.test.ts`.
    pub file_pattern: Option<String>,
}

impl FileSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn text_only() -> Self {
        Self {
            categories: vec![
                FileCategory::Code,
                FileCategory::Text,
                FileCategory::Config,
                FileCategory::Style,
            ],
            ..Self::default()
        }
    }

    fn accepts_extension(&self, extension: &str) -> bool {
        if !self.extensions.is_empty() {
            return self
                .extensions
                .iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(extension));
        }
        if !self.categories.is_empty() {
            return self
                .categories
                .iter()
                .any(|c| match c {
                    FileCategory::Other => {
                        FileCategory::from_extension(extension) == FileCategory::Other
                    }
                    _ => c.extensions().contains(&extension),
                });
        }
        true
    }
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub path: PathBuf,
    /// `/` separated path relative to the project root.
    pub relative: String,
    pub extension: String,
    pub category: FileCategory,
    pub size: u64,
}

impl Candidate {
    /// Binary-looking files are never read: unclassified and not a known
    /// text extension.
    pub fn is_scannable(&self) -> bool {
        self.category != FileCategory::Other || is_text_extension(&self.extension)
    }
}

/// Walks `root` in file-name order and returns the selected files.
/// Unreadable directories and entries are skipped.
pub fn collect_candidates(
    root: &Path,
    selection: &FileSelection,
    ignored: &Ignored,
) -> Result<Vec<Candidate>> {
    let name_filter: Option<Regex> = selection
        .file_pattern
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(wildcard_to_regex)
        .transpose()?;

    let walker = walkdir::WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !ignored.is_ignored(&e.file_name().to_string_lossy(), e.file_type().is_dir())
        });

    let mut candidates = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        let extension = extension_of(&name);
        if !selection.accepts_extension(&extension) {
            continue;
        }
        if let Some(ref filter) = name_filter {
            if !filter.is_match(&name) {
                continue;
            }
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        candidates.push(Candidate {
            relative: relative_to(root, entry.path()),
            path: entry.into_path(),
            category: FileCategory::from_extension(&extension),
            extension,
            size,
        });
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn setup() -> tempfile::TempDir {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join(".hidden")).unwrap();
        fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("src/notes.md"), "notes").unwrap();
        fs::write(root.join("logo.png"), [0u8, 1, 2]).unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "x").unwrap();
        fs::write(root.join(".hidden/secret.txt"), "s").unwrap();
        fs::write(root.join(".env"), "A=1").unwrap();
        temp
    }

    fn relatives(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.relative.as_str()).collect()
    }

    #[test]
    fn test_all_files_sorted() {
        let temp = setup();
        let found =
            collect_candidates(temp.path(), &FileSelection::all(), &Ignored::new(false, true))
                .unwrap();
        assert_eq!(
            relatives(&found),
            vec![
                ".env",
                ".hidden/secret.txt",
                "logo.png",
                "node_modules/pkg/index.js",
                "src/main.rs",
                "src/notes.md",
            ]
        );
    }

    #[test]
    fn test_ignored_and_hidden_pruned() {
        let temp = setup();
        let found =
            collect_candidates(temp.path(), &FileSelection::all(), &Ignored::new(true, false))
                .unwrap();
        assert_eq!(relatives(&found), vec!["logo.png", "src/main.rs", "src/notes.md"]);
    }

    #[test]
    fn test_extensions_override_categories() {
        let temp = setup();
        let selection = FileSelection {
            extensions: vec![".md".to_string()],
            categories: vec![FileCategory::Code],
            file_pattern: None,
        };
        let found = collect_candidates(temp.path(), &selection, &Ignored::new(true, false)).unwrap();
        assert_eq!(relatives(&found), vec!["src/notes.md"]);
    }

    #[test]
    fn test_categories() {
        let temp = setup();
        let selection = FileSelection {
            categories: vec![FileCategory::Code, FileCategory::Image],
            ..FileSelection::default()
        };
        let found = collect_candidates(temp.path(), &selection, &Ignored::new(true, false)).unwrap();
        assert_eq!(relatives(&found), vec!["logo.png", "src/main.rs"]);
        assert_eq!(found[0].category, FileCategory::Image);
    }

    #[test]
    fn test_other_category_selects_unclassified_files() {
        let temp = setup();
        fs::write(temp.path().join("Makefile"), "all:").unwrap();
        fs::write(temp.path().join("data.bin"), [0u8]).unwrap();
        let selection = FileSelection {
            categories: vec![FileCategory::Other],
            ..FileSelection::default()
        };
        let found = collect_candidates(temp.path(), &selection, &Ignored::new(true, false)).unwrap();
        assert_eq!(relatives(&found), vec!["Makefile", "data.bin"]);
        assert!(found.iter().all(|c| c.category == FileCategory::Other));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_candidates() {
        let temp = setup();
        let outside = tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "s").unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("link")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("src/notes.md"), temp.path().join("alias.md"))
            .unwrap();

        let found =
            collect_candidates(temp.path(), &FileSelection::all(), &Ignored::new(true, false))
                .unwrap();
        assert_eq!(relatives(&found), vec!["logo.png", "src/main.rs", "src/notes.md"]);
    }

    #[test]
    fn test_file_pattern() {
        let temp = setup();
        let selection = FileSelection {
            file_pattern: Some("main.*".to_string()),
            ..FileSelection::default()
        };
        let found = collect_candidates(temp.path(), &selection, &Ignored::new(true, false)).unwrap();
        assert_eq!(relatives(&found), vec!["src/main.rs"]);
    }

    #[test]
    fn test_scannable() {
        let candidate = |extension: &str| Candidate {
            path: PathBuf::new(),
            relative: String::new(),
            extension: extension.to_string(),
            category: FileCategory::from_extension(extension),
            size: 0,
        };
        assert!(candidate("rs").is_scannable());
        assert!(candidate("gitignore").is_scannable());
        assert!(!candidate("bin").is_scannable());
        assert!(!candidate("").is_scannable());
    }
}
