//! Type definitions for diff processing

/// One file's section of a unified git diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub change_type: ChangeType,
    /// Lines after the `diff --git` header
    pub content_lines: Vec<String>,
    pub additions: usize,
    pub deletions: usize,
    pub is_large: bool,
}

impl FileChange {
    /// Path shown to the reviewer: the new path, or the old one for deletions.
    pub fn display_path(&self) -> &str {
        let preferred = match self.change_type {
            ChangeType::Deleted => self.old_path.as_ref().or(self.new_path.as_ref()),
            _ => self.new_path.as_ref().or(self.old_path.as_ref()),
        };
        preferred.map_or("unknown", String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Added,
    Deleted,
    Modified,
    Renamed,
}

impl ChangeType {
    pub fn as_str(&self) -> &str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Deleted => "deleted",
            ChangeType::Modified => "modified",
            ChangeType::Renamed => "renamed",
        }
    }
}

/// When a file's diff is replaced by a summary, and how blank runs are capped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffLimits {
    /// More added plus deleted lines than this makes a file large
    pub changes_threshold: usize,
    /// More diff lines than this makes a file large
    pub lines_threshold: usize,
    pub max_consecutive_empty_lines: usize,
}

impl Default for DiffLimits {
    fn default() -> Self {
        Self {
            changes_threshold: 100,
            lines_threshold: 500,
            max_consecutive_empty_lines: 2,
        }
    }
}

impl From<&llemur_core::ReviewConfig> for DiffLimits {
    fn from(config: &llemur_core::ReviewConfig) -> Self {
        Self {
            changes_threshold: config.large_file_changes_threshold,
            lines_threshold: config.large_file_lines_threshold,
            max_consecutive_empty_lines: config.max_consecutive_empty_lines,
        }
    }
}
