//! Configuration management for llemur
//!
//! Supports feature-specific configuration sections:
//! - [summarize] - source-tree summarization settings
//! - [review] - code review prompt settings
//! - [perf] - performance analysis prompt settings
//! - [log] - logging settings

use crate::error::{ConfigError, ConfigResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: &str = "1";

/// Supported configuration versions
pub const SUPPORTED_CONFIG_VERSIONS: &[&str] = &["1"];

/// Repo-local configuration file name
pub const REPO_CONFIG_FILE: &str = ".llemur.toml";

static ENV_VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$([A-Z_][A-Z0-9_]*)").expect("env var pattern is a valid regex")
});

/// Root configuration structure supporting multiple features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version for tracking schema changes
    #[serde(default = "default_config_version")]
    pub version: String,

    #[serde(default)]
    pub summarize: Option<SummarizeConfig>,

    #[serde(default)]
    pub review: Option<ReviewConfig>,

    #[serde(default)]
    pub perf: Option<PerfConfig>,

    #[serde(default)]
    pub log: Option<LogConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            summarize: None,
            review: None,
            perf: None,
            log: None,
        }
    }
}

/// Configuration for source-tree summarization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeConfig {
    /// Default file the project summary is written to
    #[serde(default = "default_summary_output")]
    pub output: String,

    /// File name suffixes eligible for summarization
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names pruned from the walk
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            output: default_summary_output(),
            extensions: default_extensions(),
            excluded_dirs: default_excluded_dirs(),
        }
    }
}

/// Configuration for the code review prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    #[serde(default = "default_review_output")]
    pub output: String,

    /// Threshold for considering a file "large" (number of changes)
    #[serde(default = "default_large_file_changes_threshold")]
    pub large_file_changes_threshold: usize,

    /// Threshold for considering a file "large" (total lines)
    #[serde(default = "default_large_file_lines_threshold")]
    pub large_file_lines_threshold: usize,

    /// Maximum consecutive empty lines to keep
    #[serde(default = "default_max_consecutive_empty_lines")]
    pub max_consecutive_empty_lines: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            output: default_review_output(),
            large_file_changes_threshold: default_large_file_changes_threshold(),
            large_file_lines_threshold: default_large_file_lines_threshold(),
            max_consecutive_empty_lines: default_max_consecutive_empty_lines(),
        }
    }
}

/// Configuration for the performance analysis prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerfConfig {
    #[serde(default = "default_perf_output")]
    pub output: String,

    /// Directory holding `perf_analysis_<language>.prompt` overrides
    #[serde(default)]
    pub prompts_dir: Option<String>,

    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for PerfConfig {
    fn default() -> Self {
        Self {
            output: default_perf_output(),
            prompts_dir: None,
            provider: default_provider(),
            model: default_model(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Optional file that receives a copy of the log output
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_config_version() -> String {
    CURRENT_CONFIG_VERSION.to_string()
}

fn default_summary_output() -> String {
    "project_summary.txt".to_string()
}

fn default_extensions() -> Vec<String> {
    [".py", ".rs", ".ts", ".js"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_excluded_dirs() -> Vec<String> {
    ["node_modules", "__pycache__", ".git", "dist", "build"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_review_output() -> String {
    "llemur_prompt.txt".to_string()
}

fn default_large_file_changes_threshold() -> usize {
    100
}

fn default_large_file_lines_threshold() -> usize {
    500
}

fn default_max_consecutive_empty_lines() -> usize {
    2
}

fn default_perf_output() -> String {
    "perf_analysis_prompt.txt".to_string()
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Base config directory, respecting `XDG_CONFIG_HOME`
pub fn get_config_home() -> Option<PathBuf> {
    match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::home_dir().map(|h| h.join(".config")),
    }
}

impl Config {
    /// Check if the configuration version is supported
    pub fn is_version_supported(&self) -> bool {
        SUPPORTED_CONFIG_VERSIONS.contains(&self.version.as_str())
    }

    /// Get a warning message for unsupported versions
    pub fn version_warning(&self) -> Option<String> {
        if !self.is_version_supported() {
            Some(format!(
                "Configuration version '{}' is not supported. Supported versions: {}. Using defaults where needed.",
                self.version,
                SUPPORTED_CONFIG_VERSIONS.join(", ")
            ))
        } else {
            None
        }
    }

    /// Load configuration from a single file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        if config.version.is_empty() {
            config.version = CURRENT_CONFIG_VERSION.to_string();
        }

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Get the default config directory path
    pub fn get_config_dir() -> Option<PathBuf> {
        get_config_home().map(|h| h.join("llemur"))
    }

    /// Load configuration with priority:
    /// 1. Defaults
    /// 2. Global config (`$XDG_CONFIG_HOME/llemur/config.toml`)
    /// 3. Repo config (`.llemur.toml`)
    /// 4. Explicit config file
    pub fn load(custom: Option<&Path>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(config_dir) = Self::get_config_dir() {
            let global_config = config_dir.join("config.toml");
            if global_config.exists() {
                config = config.merge(Self::load_from_file(&global_config)?);
            }
        }

        let repo_config = Path::new(REPO_CONFIG_FILE);
        if repo_config.exists() {
            config = config.merge(Self::load_from_file(repo_config)?);
        }

        if let Some(custom) = custom {
            let custom_path = PathBuf::from(expand_path(&custom.to_string_lossy()));
            config = config.merge(Self::load_from_file(&custom_path)?);
        }

        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(mut self, other: Config) -> Self {
        if !other.version.is_empty() {
            self.version = other.version;
        }
        if other.summarize.is_some() {
            self.summarize = other.summarize;
        }
        if other.review.is_some() {
            self.review = other.review;
        }
        if other.perf.is_some() {
            self.perf = other.perf;
        }
        if other.log.is_some() {
            self.log = other.log;
        }
        self
    }

    pub fn summarize(&self) -> SummarizeConfig {
        self.summarize.clone().unwrap_or_default()
    }

    pub fn review(&self) -> ReviewConfig {
        self.review.clone().unwrap_or_default()
    }

    pub fn perf(&self) -> PerfConfig {
        let mut perf = self.perf.clone().unwrap_or_default();
        perf.prompts_dir = perf.prompts_dir.map(|dir| expand_path(&dir));
        perf
    }

    pub fn log(&self) -> LogConfig {
        let mut log = self.log.clone().unwrap_or_default();
        log.file = log.file.map(|file| expand_path(&file));
        log
    }
}

/// Expand tilde and environment variables in paths
pub fn expand_path(path: &str) -> String {
    let mut expanded = path.to_string();

    if expanded.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            expanded = expanded.replacen("~/", &format!("{}/", home.display()), 1);
        }
    } else if expanded == "~" {
        if let Some(home) = dirs::home_dir() {
            expanded = home.to_string_lossy().to_string();
        }
    }

    if expanded.contains('$') {
        expanded = ENV_VAR_RE
            .replace_all(&expanded, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${}", var_name))
            })
            .to_string();
    }

    expanded
}
