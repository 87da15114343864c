//! Line-level diff between two revision bodies.

use serde::Serialize;

use crate::error::CoreError;

/// The type of a line in a diff result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffLineType {
    Added,
    Removed,
    Unchanged,
}

/// A single line in a diff result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub line_type: DiffLineType,
    pub content: String,
}

/// Largest LCS table (old lines times new lines, after trimming the common
/// prefix and suffix) a diff may build.
pub const MAX_DIFF_CELLS: usize = 4_000_000;

/// Compute a line-level diff between two bodies using LCS.
///
/// A deleted revision (`None`) diffs as empty text.
pub fn diff_bodies(old: Option<&str>, new: Option<&str>) -> Result<Vec<DiffLine>, CoreError> {
    compute_line_diff(old.unwrap_or_default(), new.unwrap_or_default())
}

/// Compute a line-level diff between two texts.
///
/// Lines shared at the start and end are matched directly; only the
/// differing middle goes through the LCS table. If that table would exceed
/// [`MAX_DIFF_CELLS`] the diff is refused with [`CoreError::Validation`].
fn compute_line_diff(old: &str, new: &str) -> Result<Vec<DiffLine>, CoreError> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let prefix = old_lines
        .iter()
        .zip(&new_lines)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old_lines[prefix..]
        .iter()
        .rev()
        .zip(new_lines[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old_lines[prefix..old_lines.len() - suffix];
    let new_mid = &new_lines[prefix..new_lines.len() - suffix];
    let cells = old_mid.len().saturating_mul(new_mid.len());
    if cells > MAX_DIFF_CELLS {
        return Err(CoreError::Validation(format!(
            "Revisions differ in too many lines to diff ({} against {})",
            old_mid.len(),
            new_mid.len()
        )));
    }

    let unchanged = |line: &&str| DiffLine {
        line_type: DiffLineType::Unchanged,
        content: line.to_string(),
    };
    let mut result = Vec::with_capacity(old_lines.len().max(new_lines.len()));
    result.extend(old_lines[..prefix].iter().map(unchanged));
    result.extend(lcs_diff(old_mid, new_mid));
    result.extend(old_lines[old_lines.len() - suffix..].iter().map(unchanged));
    Ok(result)
}

fn lcs_diff(old_lines: &[&str], new_lines: &[&str]) -> Vec<DiffLine> {
    let m = old_lines.len();
    let n = new_lines.len();

    let mut lcs = vec![vec![0u32; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            lcs[i][j] = if old_lines[i - 1] == new_lines[j - 1] {
                lcs[i - 1][j - 1] + 1
            } else {
                lcs[i - 1][j].max(lcs[i][j - 1])
            };
        }
    }

    // Walk back from the bottom-right corner, then reverse.
    let mut result = Vec::with_capacity(m.max(n));
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        let (line_type, content) = if i > 0 && j > 0 && old_lines[i - 1] == new_lines[j - 1] {
            i -= 1;
            j -= 1;
            (DiffLineType::Unchanged, old_lines[i])
        } else if j > 0 && (i == 0 || lcs[i][j - 1] >= lcs[i - 1][j]) {
            j -= 1;
            (DiffLineType::Added, new_lines[j])
        } else {
            i -= 1;
            (DiffLineType::Removed, old_lines[i])
        };
        result.push(DiffLine {
            line_type,
            content: content.to_string(),
        });
    }

    result.reverse();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::{validate_body, MAX_BODY_LEN};

    #[test]
    fn identical_texts_are_unchanged() {
        let diff = compute_line_diff("line1\nline2", "line1\nline2").unwrap();
        assert_eq!(diff.len(), 2);
        assert!(diff.iter().all(|d| d.line_type == DiffLineType::Unchanged));
    }

    #[test]
    fn appended_line_is_added() {
        let diff = compute_line_diff("line1", "line1\nline2").unwrap();
        assert_eq!(diff[0].line_type, DiffLineType::Unchanged);
        assert_eq!(diff[1].line_type, DiffLineType::Added);
        assert_eq!(diff[1].content, "line2");
    }

    #[test]
    fn dropped_line_is_removed() {
        let diff = compute_line_diff("line1\nline2", "line1").unwrap();
        assert_eq!(diff[1].line_type, DiffLineType::Removed);
        assert_eq!(diff[1].content, "line2");
    }

    #[test]
    fn deleted_revision_diffs_as_empty() {
        let diff = diff_bodies(Some("a\nb"), None).unwrap();
        assert_eq!(diff.len(), 2);
        assert!(diff.iter().all(|d| d.line_type == DiffLineType::Removed));
        assert!(diff_bodies(None, None).unwrap().is_empty());
    }

    #[test]
    fn change_in_the_middle_keeps_order() {
        let diff = compute_line_diff("a\nb\nc\nd", "a\nx\nc\nd").unwrap();
        let kinds: Vec<_> = diff.iter().map(|d| (d.line_type, d.content.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (DiffLineType::Unchanged, "a"),
                (DiffLineType::Removed, "b"),
                (DiffLineType::Added, "x"),
                (DiffLineType::Unchanged, "c"),
                (DiffLineType::Unchanged, "d"),
            ]
        );
    }

    #[test]
    fn long_bodies_with_small_edit_stay_cheap() {
        let old = "\n".repeat(MAX_BODY_LEN - 1);
        let new = format!(
            "{}edited{}",
            "\n".repeat(MAX_BODY_LEN / 2),
            "\n".repeat(MAX_BODY_LEN / 2 - 8)
        );
        assert!(validate_body(&old).is_ok());
        assert!(validate_body(&new).is_ok());

        let diff = compute_line_diff(&old, &new).unwrap();
        assert_eq!(
            diff.iter().filter(|d| d.line_type == DiffLineType::Added).count(),
            1
        );
        assert!(diff.iter().any(|d| d.content == "edited"));
    }

    #[test]
    fn oversized_diff_is_refused() {
        let old: String = (0..2_100).map(|i| format!("a{i}\n")).collect();
        let new: String = (0..2_100).map(|i| format!("b{i}\n")).collect();
        assert!(validate_body(&old).is_ok());
        assert!(old.lines().count() * new.lines().count() > MAX_DIFF_CELLS);

        let err = compute_line_diff(&old, &new).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn newline_only_bodies_at_the_size_limit_are_refused() {
        let old = "\n".repeat(MAX_BODY_LEN);
        let new = "x\n".repeat(MAX_BODY_LEN / 2);
        assert!(validate_body(&old).is_ok());
        assert!(validate_body(&new).is_ok());
        assert!(compute_line_diff(&old, &new).is_err());
    }
}
