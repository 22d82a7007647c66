//! Code review prompts from git diffs
//!
//! The working-tree diff (or a diff piped on stdin) is split per file and
//! minimized for token usage: deleted files shrink to one line, large files
//! to a metadata summary. The result is wrapped in a review instruction.

mod error;
mod git;
mod processor;
mod prompt;
mod types;

pub use error::{ReviewError, ReviewResult};
pub use git::GitHelper;
pub use processor::{
    format_deleted_file_summary, format_large_file_summary, format_regular_file_diff,
    minimize_changes, minimize_diff, parse_git_diff, remove_excessive_empty_lines,
};
pub use prompt::{
    build_review_prompt, write_review_prompt, DiffSource, ReviewOutcome, ReviewPrompt,
    REVIEW_INSTRUCTION,
};
pub use types::{ChangeType, DiffLimits, FileChange};
