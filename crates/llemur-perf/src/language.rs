use std::fmt;
use std::path::Path;

/// Languages with a performance-analysis prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    Rust,
    TypeScript,
    JavaScript,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Python,
        Language::Rust,
        Language::TypeScript,
        Language::JavaScript,
    ];

    /// Detect the language from the file extension (case-sensitive, like `.py`).
    pub fn detect(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "py" => Some(Language::Python),
            "rs" => Some(Language::Rust),
            "ts" => Some(Language::TypeScript),
            "js" => Some(Language::JavaScript),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Rust => "rust",
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
        }
    }

    /// File name of the prompt template, e.g. `perf_analysis_python.prompt`
    pub fn template_name(&self) -> String {
        format!("perf_analysis_{}.prompt", self.as_str())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
