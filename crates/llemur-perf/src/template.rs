use crate::error::{PerfError, PerfResult};
use crate::language::Language;
use minijinja::{context, Environment};
use std::path::{Path, PathBuf};

const PYTHON_PROMPT: &str = include_str!("../prompts/perf_analysis_python.prompt");
const RUST_PROMPT: &str = include_str!("../prompts/perf_analysis_rust.prompt");
const TYPESCRIPT_PROMPT: &str = include_str!("../prompts/perf_analysis_typescript.prompt");
const JAVASCRIPT_PROMPT: &str = include_str!("../prompts/perf_analysis_javascript.prompt");

fn builtin_prompt(language: Language) -> &'static str {
    match language {
        Language::Python => PYTHON_PROMPT,
        Language::Rust => RUST_PROMPT,
        Language::TypeScript => TYPESCRIPT_PROMPT,
        Language::JavaScript => JAVASCRIPT_PROMPT,
    }
}

/// Renders `perf_analysis_<language>.prompt` templates with the code under analysis.
pub struct PromptRenderer {
    env: Environment<'static>,
    prompts_dir: Option<PathBuf>,
}

impl PromptRenderer {
    /// Renderer over the built-in prompts.
    pub fn builtin() -> PerfResult<Self> {
        let mut env = Self::environment();
        for language in Language::ALL {
            env.add_template_owned(language.template_name(), builtin_prompt(language))
                .map_err(|e| PerfError::Template(format!("Failed to load template: {}", e)))?;
        }
        Ok(Self {
            env,
            prompts_dir: None,
        })
    }

    /// Renderer over the templates in `prompts_dir`; built-ins are not used.
    pub fn from_dir(prompts_dir: &Path) -> Self {
        let mut env = Self::environment();
        env.set_loader(minijinja::path_loader(prompts_dir));
        Self {
            env,
            prompts_dir: Some(prompts_dir.to_path_buf()),
        }
    }

    /// Built-in prompts, or the ones in `prompts_dir` when given.
    pub fn new(prompts_dir: Option<&Path>) -> PerfResult<Self> {
        match prompts_dir {
            Some(dir) => Ok(Self::from_dir(dir)),
            None => Self::builtin(),
        }
    }

    fn environment() -> Environment<'static> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env
    }

    /// Embed `code` in the language's template. The code is inserted as a
    /// value, so template syntax inside it is not interpreted.
    pub fn render(&self, language: Language, code: &str) -> PerfResult<String> {
        let name = language.template_name();

        if let Some(dir) = &self.prompts_dir {
            let path = dir.join(&name);
            if !path.exists() {
                return Err(PerfError::TemplateNotFound {
                    language: language.to_string(),
                    path: path.display().to_string(),
                });
            }
        }

        let template = self
            .env
            .get_template(&name)
            .map_err(|e| PerfError::Template(format!("Failed to get template: {}", e)))?;

        template
            .render(context! { CODE => code })
            .map_err(|e| PerfError::Template(format!("Failed to render template: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_templates_embed_code() {
        let renderer = PromptRenderer::builtin().unwrap();
        for language in Language::ALL {
            let prompt = renderer.render(language, "fn hot_loop() {}").unwrap();
            assert!(prompt.contains("fn hot_loop() {}"), "{language}");
            assert!(!prompt.contains("{{"), "{language}");
        }
    }

    #[test]
    fn test_code_is_not_template_syntax() {
        let renderer = PromptRenderer::builtin().unwrap();
        let code = "x = '{{ not_a_var }}' {% if %}";
        let prompt = renderer.render(Language::Python, code).unwrap();
        assert!(prompt.contains(code));
    }

    #[test]
    fn test_custom_prompts_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("perf_analysis_python.prompt"),
            "Speed this up:\n{{CODE}}\n",
        )
        .unwrap();

        let renderer = PromptRenderer::from_dir(temp.path());
        let prompt = renderer.render(Language::Python, "pass").unwrap();
        assert_eq!(prompt, "Speed this up:\npass\n");
    }

    #[test]
    fn test_missing_template_in_prompts_dir() {
        let temp = TempDir::new().unwrap();
        let renderer = PromptRenderer::from_dir(temp.path());

        let err = renderer.render(Language::Rust, "").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Prompt template for rust not found at "));
    }
}
