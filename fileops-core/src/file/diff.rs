use serde::{Deserialize, Serialize};
use similar::TextDiff;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

/// One line index at which the two sides differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    /// 1-based line number.
    pub line: usize,
    #[serde(rename = "type")]
    pub kind: ChangeType,
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffStats {
    pub total_lines: usize,
    pub changed_lines: usize,
    pub left_size: usize,
    pub right_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareReport {
    pub changes: Vec<DiffRecord>,
    pub stats: DiffStats,
}

/// Compares the two contents line by line at equal indices. No alignment is
/// attempted: an inserted line shows up as every following line modified.
///
/// Lines are split on `\n`, so a trailing newline yields a final empty line.
pub fn diff_lines(left: &str, right: &str) -> CompareReport {
    let left_lines: Vec<&str> = left.split('\n').collect();
    let right_lines: Vec<&str> = right.split('\n').collect();
    let total_lines = left_lines.len().max(right_lines.len());

    let changes: Vec<DiffRecord> = (0..total_lines)
        .filter_map(|i| {
            let l = left_lines.get(i);
            let r = right_lines.get(i);
            let (l_text, r_text) = (l.copied().unwrap_or(""), r.copied().unwrap_or(""));
            if l_text == r_text {
                return None;
            }
            let kind = match (l, r) {
                (None, _) => ChangeType::Added,
                (_, None) => ChangeType::Removed,
                _ => ChangeType::Modified,
            };
            Some(DiffRecord {
                line: i + 1,
                kind,
                left: l_text.to_string(),
                right: r_text.to_string(),
            })
        })
        .collect();

    CompareReport {
        stats: DiffStats {
            total_lines,
            changed_lines: changes.len(),
            left_size: left.len(),
            right_size: right.len(),
        },
        changes,
    }
}

/// Renders a unified diff of the two contents for display.
pub fn unified_patch(
    left: &str,
    right: &str,
    left_name: &str,
    right_name: &str,
    context_lines: usize,
) -> String {
    TextDiff::from_lines(left, right)
        .unified_diff()
        .context_radius(context_lines)
        .header(left_name, right_name)
        .to_string()
}
