use crate::error::{ReviewError, ReviewResult};
use std::path::Path;
use std::process::Command;

pub struct GitHelper;

impl GitHelper {
    /// Unstaged changes of the working tree at `dir`, as `git diff` prints them.
    pub fn working_tree_diff_in(dir: &Path) -> ReviewResult<String> {
        let output = Command::new("git")
            .args(["diff", "--no-color"])
            .current_dir(dir)
            .output()
            .map_err(|e| ReviewError::Git(format!("Failed to execute git: {}", e)))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ReviewError::Git(format!(
                "git diff failed: {}",
                stderr.trim()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_outside_repository_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        // Without git installed the spawn itself fails; either way it is an error
        match GitHelper::working_tree_diff_in(temp.path()) {
            Err(ReviewError::Git(message)) => assert!(!message.is_empty()),
            Ok(diff) => panic!("expected an error outside a repository, got {diff:?}"),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
