//! Performance-analysis prompts
//!
//! Detects the language of a source file, embeds the file in that language's
//! prompt template and writes the prompt out for the selected provider and
//! model. Sending the prompt is left to the caller.

mod error;
mod language;
mod provider;
mod template;

pub use error::{PerfError, PerfResult};
pub use language::Language;
pub use provider::{ModelSelection, Provider};
pub use template::PromptRenderer;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerfOutcome {
    pub language: Language,
    pub selection: ModelSelection,
    pub output: PathBuf,
}

/// Build the performance-analysis prompt for `file` and write it to `output`.
pub fn write_perf_prompt(
    file: &Path,
    output: &Path,
    selection: &ModelSelection,
    prompts_dir: Option<&Path>,
) -> PerfResult<PerfOutcome> {
    let language = Language::detect(file)
        .ok_or_else(|| PerfError::UnsupportedFileType(file.display().to_string()))?;
    debug!(%language, file = %file.display(), "detected language");

    let renderer = PromptRenderer::new(prompts_dir)?;
    let code = fs::read_to_string(file).map_err(|source| PerfError::Read {
        path: file.display().to_string(),
        source,
    })?;
    let prompt = renderer.render(language, &code)?;

    fs::write(output, prompt).map_err(|source| PerfError::Write {
        path: output.display().to_string(),
        source,
    })?;
    info!(output = %output.display(), target = %selection, "wrote performance prompt");

    Ok(PerfOutcome {
        language,
        selection: selection.clone(),
        output: output.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn selection() -> ModelSelection {
        ModelSelection::resolve("openai", "gpt-4o").unwrap()
    }

    #[test]
    fn test_writes_prompt_with_code() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("slow.py");
        let output = temp.path().join("prompt.txt");
        fs::write(&file, "for i in range(10):\n    total += i\n").unwrap();

        let outcome = write_perf_prompt(&file, &output, &selection(), None).unwrap();
        assert_eq!(outcome.language, Language::Python);

        let prompt = fs::read_to_string(&output).unwrap();
        assert!(prompt.contains("Python"));
        assert!(prompt.contains("for i in range(10):\n    total += i\n"));
    }

    #[test]
    fn test_unsupported_file_type_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("notes.md");
        let output = temp.path().join("prompt.txt");
        fs::write(&file, "# notes").unwrap();

        let err = write_perf_prompt(&file, &output, &selection(), None).unwrap_err();
        assert!(matches!(err, PerfError::UnsupportedFileType(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_source_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("absent.rs");
        let output = temp.path().join("prompt.txt");

        let err = write_perf_prompt(&file, &output, &selection(), None).unwrap_err();
        assert!(err.to_string().starts_with("Error reading file "));
    }
}
