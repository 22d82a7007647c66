//! Summarizing single files and whole source trees.

use crate::error::{SummarizeError, SummarizeResult};
use crate::parser::parse;
use crate::reducer::reduce;
use crate::summarizer::{summarize_module, SummaryReport};
use serde::Serialize;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Width of the `=` rule closing each file block.
const SEPARATOR_WIDTH: usize = 40;

/// Reduce, parse and summarize Python source text.
pub fn summarize_source(source: &str) -> SummarizeResult<SummaryReport> {
    let reduced = reduce(source)?;
    let module = parse(&reduced)?;
    Ok(summarize_module(&module))
}

/// Summary of one file; failures are kept as values.
#[derive(Debug)]
pub struct FileSummary {
    pub path: PathBuf,
    pub outcome: SummarizeResult<SummaryReport>,
}

impl FileSummary {
    /// The report, or the error line that stands in for it.
    pub fn text(&self) -> String {
        match &self.outcome {
            Ok(report) => report.to_string(),
            Err(SummarizeError::Parse(e)) => format!("Error in parsing code: {e}"),
            Err(e) => format!("Error summarizing {}: {e}", self.path.display()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Summarize the file at `path`. Never fails.
pub fn summarize_file(path: &Path) -> FileSummary {
    let outcome = std::fs::read_to_string(path)
        .map_err(SummarizeError::from)
        .and_then(|source| summarize_source(&source));

    if let Err(e) = &outcome {
        debug!("Summarizing {} failed: {}", path.display(), e);
    }

    FileSummary {
        path: path.to_path_buf(),
        outcome,
    }
}

/// Which files a tree walk picks up.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// File name suffixes, e.g. `.py`
    pub extensions: Vec<String>,
    /// Directory names pruned from the walk (never the root)
    pub excluded_dirs: Vec<String>,
}

impl WalkOptions {
    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.excluded_dirs.iter().any(|d| d == name))
    }

    fn is_eligible(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_file()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.extensions.iter().any(|ext| name.ends_with(ext.as_str())))
    }
}

/// Files first, then sub-directories, each group by name.
fn walk_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Eligible files under `root`, in walk order.
pub fn collect_files(root: &Path, options: &WalkOptions) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by(walk_order)
        .into_iter()
        .filter_entry(|entry| !options.is_excluded(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| options.is_eligible(entry))
        .map(DirEntry::into_path)
        .collect()
}

/// Summarize every eligible file under `root`, calling `on_file` before each.
pub fn summarize_tree(
    root: &Path,
    options: &WalkOptions,
    mut on_file: impl FnMut(&Path),
) -> Vec<FileSummary> {
    collect_files(root, options)
        .into_iter()
        .map(|path| {
            on_file(&path);
            summarize_file(&path)
        })
        .collect()
}

/// Plain-text project summary: one block per file.
pub fn render_text(summaries: &[FileSummary]) -> String {
    let rule = "=".repeat(SEPARATOR_WIDTH);
    summaries
        .iter()
        .map(|summary| format!("File: {}\n{}\n{rule}\n", summary.path.display(), summary.text()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct JsonEntry {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// JSON project summary: an array of `{path, summary}` or `{path, error}`.
pub fn render_json(summaries: &[FileSummary]) -> serde_json::Result<String> {
    let entries: Vec<JsonEntry> = summaries
        .iter()
        .map(|summary| {
            let text = summary.text();
            let (summary_text, error) = if summary.is_ok() {
                (Some(text), None)
            } else {
                (None, Some(text))
            };
            JsonEntry {
                path: summary.path.display().to_string(),
                summary: summary_text,
                error,
            }
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn options() -> WalkOptions {
        WalkOptions {
            extensions: vec![".py".to_string()],
            excluded_dirs: vec!["node_modules".to_string(), "build".to_string()],
        }
    }

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn relative(root: &Path, files: Vec<PathBuf>) -> Vec<String> {
        files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_walk_order_files_before_directories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "b.py", "");
        write(root, "a/z.py", "");
        write(root, "a.py", "");
        write(root, "c/d.py", "");

        let files = collect_files(root, &options());
        assert_eq!(relative(root, files), vec!["a.py", "b.py", "a/z.py", "c/d.py"]);
    }

    #[test]
    fn test_walk_prunes_excluded_directories_and_filters_extensions() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "keep.py", "");
        write(root, "notes.txt", "");
        write(root, "node_modules/dep.py", "");
        write(root, "src/build/gen.py", "");
        write(root, "src/mod.py", "");

        let files = collect_files(root, &options());
        assert_eq!(relative(root, files), vec!["keep.py", "src/mod.py"]);
    }

    #[test]
    fn test_excluded_root_is_still_walked() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("build");
        write(&root, "x.py", "");

        let files = collect_files(&root, &options());
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_missing_file_is_an_error_value() {
        let summary = summarize_file(Path::new("/definitely/not/here.py"));
        assert!(!summary.is_ok());
        assert!(summary
            .text()
            .starts_with("Error summarizing /definitely/not/here.py: "));
    }

    #[test]
    fn test_render_text_blocks() {
        let summaries = vec![
            FileSummary {
                path: PathBuf::from("a.py"),
                outcome: summarize_source("def f():\n    return 1\n"),
            },
            FileSummary {
                path: PathBuf::from("b.py"),
                outcome: summarize_source("x = 1\n"),
            },
        ];
        let rule = "=".repeat(40);
        assert_eq!(
            render_text(&summaries),
            format!("File: a.py\nFunction: f()\n  Body: return 1\n{rule}\n\nFile: b.py\n\n{rule}\n")
        );
    }

    #[test]
    fn test_render_json_marks_errors() {
        let summaries = vec![
            FileSummary {
                path: PathBuf::from("ok.py"),
                outcome: summarize_source("class A:\n    pass\n"),
            },
            FileSummary {
                path: PathBuf::from("bad.py"),
                outcome: summarize_source("x = = 1\n"),
            },
        ];
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&summaries).unwrap()).unwrap();
        assert_eq!(json[0]["path"], "ok.py");
        assert_eq!(json[0]["summary"], "Class: A");
        assert!(json[0].get("error").is_none());
        assert!(json[1]["error"]
            .as_str()
            .unwrap()
            .starts_with("Error in parsing code: "));
    }
}
