//! Diff parsing and minimization

use crate::types::{ChangeType, DiffLimits, FileChange};
use once_cell::sync::Lazy;
use regex::Regex;

static DIFF_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^diff --git a/(.*?) b/(.*?)$").expect("diff header pattern is a valid regex")
});

/// Minimize a git diff: deleted files shrink to one line, large files to a
/// short summary, and the rest keep their diff with blank runs capped.
pub fn minimize_diff(diff_content: &str, limits: &DiffLimits) -> String {
    minimize_changes(&parse_git_diff(diff_content, limits), limits)
}

/// Render already parsed changes the way [`minimize_diff`] does.
pub fn minimize_changes(changes: &[FileChange], limits: &DiffLimits) -> String {
    let mut result = String::new();

    for change in changes {
        let section = match change.change_type {
            ChangeType::Deleted => format_deleted_file_summary(change),
            _ if change.is_large => format_large_file_summary(change),
            _ => format_regular_file_diff(change, limits.max_consecutive_empty_lines),
        };
        result.push_str(&section);
        result.push('\n');
    }

    result
}

/// Split git diff output into per-file changes.
///
/// Lines before the first `diff --git` header are ignored.
pub fn parse_git_diff(diff_content: &str, limits: &DiffLimits) -> Vec<FileChange> {
    let lines: Vec<&str> = diff_content.lines().collect();
    let mut changes = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        match parse_file_change(&lines, &mut index, limits) {
            Some(change) => changes.push(change),
            None => index += 1,
        }
    }

    tracing::debug!(files = changes.len(), "parsed git diff");
    changes
}

fn parse_file_change(lines: &[&str], index: &mut usize, limits: &DiffLimits) -> Option<FileChange> {
    let captures = DIFF_HEADER_RE.captures(lines.get(*index)?)?;
    let old_path = captures.get(1).map(|m| m.as_str().to_string());
    let new_path = captures.get(2).map(|m| m.as_str().to_string());
    *index += 1;

    let mut change_type = ChangeType::Modified;
    let mut content_lines = Vec::new();
    let mut additions = 0;
    let mut deletions = 0;

    while let Some(line) = lines.get(*index).filter(|l| !l.starts_with("diff --git")) {
        if line.starts_with("new file mode") {
            change_type = ChangeType::Added;
        } else if line.starts_with("deleted file mode") {
            change_type = ChangeType::Deleted;
        } else if line.starts_with("rename from") || line.starts_with("rename to") {
            change_type = ChangeType::Renamed;
        } else if line.starts_with('+') && !line.starts_with("+++") {
            additions += 1;
        } else if line.starts_with('-') && !line.starts_with("---") {
            deletions += 1;
        }

        content_lines.push(line.to_string());
        *index += 1;
    }

    let is_large = additions + deletions > limits.changes_threshold
        || content_lines.len() > limits.lines_threshold;

    Some(FileChange {
        old_path,
        new_path,
        change_type,
        content_lines,
        additions,
        deletions,
        is_large,
    })
}

/// Metadata stand-in for a diff too large to include
pub fn format_large_file_summary(change: &FileChange) -> String {
    format!(
        "Large file change: {}\nChange type: {}\nChanges: +{} -{}\nContent lines: {}\n",
        change.display_path(),
        change.change_type.as_str(),
        change.additions,
        change.deletions,
        change.content_lines.len()
    )
}

pub fn format_deleted_file_summary(change: &FileChange) -> String {
    format!("Deleted file: {}\n", change.display_path())
}

/// The file's diff with its header restored and blank runs capped
pub fn format_regular_file_diff(change: &FileChange, max_empty: usize) -> String {
    let path = change.display_path();
    let mut result = format!(
        "diff --git a/{} b/{}\n",
        change.old_path.as_deref().unwrap_or(path),
        change.new_path.as_deref().unwrap_or(path)
    );

    for line in remove_excessive_empty_lines(&change.content_lines, max_empty) {
        result.push_str(line);
        result.push('\n');
    }

    result
}

/// Drop blank lines beyond `max_empty` in a row.
pub fn remove_excessive_empty_lines(lines: &[String], max_empty: usize) -> Vec<&str> {
    let mut result = Vec::with_capacity(lines.len());
    let mut consecutive_empty = 0;

    for line in lines {
        if line.trim().is_empty() {
            consecutive_empty += 1;
            if consecutive_empty > max_empty {
                continue;
            }
        } else {
            consecutive_empty = 0;
        }
        result.push(line.as_str());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODIFIED: &str = "diff --git a/src/app.py b/src/app.py
index 83db48f..bf269f4 100644
--- a/src/app.py
+++ b/src/app.py
@@ -1,3 +1,4 @@
 import os
-x = 1
+x = 2
+y = 3
";

    const DELETED: &str = "diff --git a/old.py b/old.py
deleted file mode 100644
index 83db48f..0000000
--- a/old.py
+++ /dev/null
@@ -1,2 +0,0 @@
-a = 1
-b = 2
";

    const RENAMED: &str = "diff --git a/before.py b/after.py
similarity index 100%
rename from before.py
rename to after.py
";

    #[test]
    fn test_parse_modified_file() {
        let changes = parse_git_diff(MODIFIED, &DiffLimits::default());
        assert_eq!(changes.len(), 1);
        let change = &changes[0];
        assert_eq!(change.change_type, ChangeType::Modified);
        assert_eq!(change.display_path(), "src/app.py");
        assert_eq!(change.additions, 2);
        assert_eq!(change.deletions, 1);
        assert!(!change.is_large);
    }

    #[test]
    fn test_parse_multiple_files_and_types() {
        let diff = format!("{MODIFIED}{DELETED}{RENAMED}");
        let changes = parse_git_diff(&diff, &DiffLimits::default());
        let types: Vec<ChangeType> = changes.iter().map(|c| c.change_type).collect();
        assert_eq!(
            types,
            vec![ChangeType::Modified, ChangeType::Deleted, ChangeType::Renamed]
        );
        assert_eq!(changes[1].display_path(), "old.py");
        assert_eq!(changes[2].display_path(), "after.py");
    }

    #[test]
    fn test_parse_new_file() {
        let diff = "diff --git a/new.py b/new.py\nnew file mode 100644\n--- /dev/null\n+++ b/new.py\n@@ -0,0 +1 @@\n+print('hi')\n";
        let changes = parse_git_diff(diff, &DiffLimits::default());
        assert_eq!(changes[0].change_type, ChangeType::Added);
        assert_eq!(changes[0].additions, 1);
    }

    #[test]
    fn test_deleted_file_becomes_one_line() {
        let minimized = minimize_diff(DELETED, &DiffLimits::default());
        assert_eq!(minimized, "Deleted file: old.py\n\n");
    }

    #[test]
    fn test_large_file_is_summarized() {
        let limits = DiffLimits {
            changes_threshold: 2,
            ..DiffLimits::default()
        };
        let minimized = minimize_diff(MODIFIED, &limits);
        assert!(minimized.starts_with("Large file change: src/app.py\n"));
        assert!(minimized.contains("Change type: modified\n"));
        assert!(minimized.contains("Changes: +2 -1\n"));
        assert!(!minimized.contains("x = 2"));
    }

    #[test]
    fn test_line_threshold_marks_large() {
        let limits = DiffLimits {
            lines_threshold: 3,
            ..DiffLimits::default()
        };
        let changes = parse_git_diff(MODIFIED, &limits);
        assert!(changes[0].is_large);
    }

    #[test]
    fn test_regular_file_keeps_diff() {
        let minimized = minimize_diff(MODIFIED, &DiffLimits::default());
        assert_eq!(minimized, format!("{MODIFIED}\n"));
    }

    #[test]
    fn test_remove_excessive_empty_lines() {
        let lines: Vec<String> = ["a", "", "", "", "", "b", " ", "c"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            remove_excessive_empty_lines(&lines, 2),
            vec!["a", "", "", "b", " ", "c"]
        );
        assert_eq!(remove_excessive_empty_lines(&lines, 0), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_preamble_before_first_header_is_ignored() {
        let diff = format!("warning: something\n{MODIFIED}");
        assert_eq!(parse_git_diff(&diff, &DiffLimits::default()).len(), 1);
    }
}
