//! Review prompt assembly

use crate::error::ReviewResult;
use crate::git::GitHelper;
use crate::processor::{minimize_changes, parse_git_diff};
use crate::types::DiffLimits;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;

pub const REVIEW_INSTRUCTION: &str = "This is a code review task. \
Please review the following code changes for potential issues, suggest improvements, \
and highlight any security vulnerabilities or performance optimizations:";

/// Where the diff under review comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSource {
    /// `git diff` in the current directory
    Git,
    Stdin,
}

impl DiffSource {
    pub fn read(self) -> ReviewResult<String> {
        match self {
            DiffSource::Git => GitHelper::working_tree_diff_in(Path::new(".")),
            DiffSource::Stdin => {
                let mut input = String::new();
                io::stdin().read_to_string(&mut input)?;
                Ok(input)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// The diff was empty; nothing was written
    NoChanges,
    Written { path: PathBuf, files: usize },
}

/// A rendered review prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPrompt {
    pub text: String,
    /// Files found in the diff
    pub files: usize,
}

/// Build the review prompt for `diff`, or `None` when there is nothing to review.
pub fn build_review_prompt(diff: &str, limits: &DiffLimits) -> Option<ReviewPrompt> {
    if diff.trim().is_empty() {
        return None;
    }

    let changes = parse_git_diff(diff, limits);
    let minimized = if changes.is_empty() {
        diff.trim_end().to_string()
    } else {
        minimize_changes(&changes, limits).trim_end().to_string()
    };
    let files = if changes.is_empty() {
        "(none)".to_string()
    } else {
        changes
            .iter()
            .map(|c| format!("- {} ({})", c.display_path(), c.change_type.as_str()))
            .collect::<Vec<_>>()
            .join("\n")
    };

    Some(ReviewPrompt {
        text: format!(
            "{REVIEW_INSTRUCTION}\n\nChanges:\n{minimized}\n\nFiles changed:\n{files}\n"
        ),
        files: changes.len(),
    })
}

/// Write the review prompt for `diff` to `output`.
pub fn write_review_prompt(
    diff: &str,
    output: &Path,
    limits: &DiffLimits,
) -> ReviewResult<ReviewOutcome> {
    let Some(prompt) = build_review_prompt(diff, limits) else {
        return Ok(ReviewOutcome::NoChanges);
    };

    std::fs::write(output, &prompt.text)?;
    info!(path = %output.display(), files = prompt.files, "wrote review prompt");

    Ok(ReviewOutcome::Written {
        path: output.to_path_buf(),
        files: prompt.files,
    })
}
