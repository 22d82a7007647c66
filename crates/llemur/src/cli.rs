use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "llemur", version, about = "Prepare LLM prompts for code review, source summaries and performance analysis")]
pub struct Cli {
    /// Specify configuration file path
    #[arg(long, global = true, env = "LLEMUR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "LLEMUR_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Verbose output (same as --log-level debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prepare a code review prompt from the current git diff
    Cr(CrArgs),

    /// Summarize the source files under a directory
    Summarize(SummarizeArgs),

    /// Prepare a performance analysis prompt for one file
    #[command(alias = "perf_analysis")]
    PerfAnalysis(PerfAnalysisArgs),
}

#[derive(Debug, Args)]
pub struct CrArgs {
    /// File to dump the review prompt to
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Read the diff from stdin instead of running `git diff`
    #[arg(long)]
    pub stdin: bool,
}

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    /// Root directory to summarize
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// File to dump the project summary to
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub format: SummaryFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct PerfAnalysisArgs {
    /// File to run a performance analysis on
    #[arg(long)]
    pub file: PathBuf,

    /// File to dump the performance analysis prompt to
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// LLM provider (openai, anthropic, local)
    #[arg(long)]
    pub llm: Option<String>,

    /// Model to target (e.g. gpt-4o, claude-v2)
    #[arg(long)]
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_summarize_defaults() {
        let cli = parse(&["llemur", "summarize"]);
        let Command::Summarize(args) = cli.command else {
            panic!("expected summarize");
        };
        assert_eq!(args.dir, PathBuf::from("."));
        assert!(args.output.is_none());
        assert_eq!(args.format, SummaryFormat::Text);
    }

    #[test]
    fn test_summarize_options() {
        let cli = parse(&[
            "llemur", "summarize", "--dir", "src", "--output", "out.json", "--format", "json",
        ]);
        let Command::Summarize(args) = cli.command else {
            panic!("expected summarize");
        };
        assert_eq!(args.dir, PathBuf::from("src"));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert_eq!(args.format, SummaryFormat::Json);
    }

    #[test]
    fn test_perf_analysis_requires_file() {
        assert!(Cli::try_parse_from(["llemur", "perf-analysis"]).is_err());

        let cli = parse(&[
            "llemur", "perf-analysis", "--file", "a.py", "--llm", "anthropic", "--model", "claude-v2",
        ]);
        let Command::PerfAnalysis(args) = cli.command else {
            panic!("expected perf-analysis");
        };
        assert_eq!(args.file, PathBuf::from("a.py"));
        assert_eq!(args.llm.as_deref(), Some("anthropic"));
        assert_eq!(args.model.as_deref(), Some("claude-v2"));
    }

    #[test]
    fn test_perf_analysis_underscore_alias() {
        let cli = parse(&["llemur", "perf_analysis", "--file", "a.rs"]);
        assert!(matches!(cli.command, Command::PerfAnalysis(_)));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["llemur", "cr", "--stdin", "-v", "--config", "custom.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        let Command::Cr(args) = cli.command else {
            panic!("expected cr");
        };
        assert!(args.stdin);
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["llemur"]).is_err());
    }
}
