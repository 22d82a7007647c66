use crate::cli::{Command, CrArgs, PerfAnalysisArgs, SummarizeArgs, SummaryFormat};
use anyhow::{Context, Result};
use llemur_core::Config;
use llemur_perf::{write_perf_prompt, ModelSelection};
use llemur_review::{write_review_prompt, DiffLimits, DiffSource, ReviewOutcome};
use llemur_summarize::{render_json, render_text, summarize_tree, WalkOptions};
use std::fs;
use std::path::{Path, PathBuf};

pub fn execute(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Cr(args) => cmd_cr(config, args),
        Command::Summarize(args) => cmd_summarize(config, args),
        Command::PerfAnalysis(args) => cmd_perf_analysis(config, args),
    }
}

fn cmd_cr(config: &Config, args: CrArgs) -> Result<()> {
    let review = config.review();
    let output = args.output.unwrap_or_else(|| PathBuf::from(&review.output));
    let source = if args.stdin {
        DiffSource::Stdin
    } else {
        DiffSource::Git
    };

    let diff = source.read()?;
    match write_review_prompt(&diff, &output, &DiffLimits::from(&review))? {
        ReviewOutcome::NoChanges => println!("No changes to review!"),
        ReviewOutcome::Written { path, files } => {
            println!(
                "Prompt and diff dumped to {} for review ({} file(s) changed).",
                path.display(),
                files
            );
        }
    }

    Ok(())
}

fn cmd_summarize(config: &Config, args: SummarizeArgs) -> Result<()> {
    let settings = config.summarize();
    let output = args.output.unwrap_or_else(|| PathBuf::from(&settings.output));
    let options = WalkOptions {
        extensions: settings.extensions,
        excluded_dirs: settings.excluded_dirs,
    };

    let summaries = summarize_tree(&args.dir, &options, |path: &Path| {
        println!("Summarizing {}", path.display());
    });
    let failed = summaries.iter().filter(|s| !s.is_ok()).count();
    if failed > 0 {
        tracing::warn!(failed, total = summaries.len(), "some files could not be summarized");
    }

    let rendered = match args.format {
        SummaryFormat::Text => render_text(&summaries),
        SummaryFormat::Json => render_json(&summaries).context("Failed to render JSON summary")?,
    };
    fs::write(&output, rendered)
        .with_context(|| format!("Error writing to {}", output.display()))?;

    println!("Project summary written to {}", output.display());
    Ok(())
}

fn cmd_perf_analysis(config: &Config, args: PerfAnalysisArgs) -> Result<()> {
    let perf = config.perf();
    let output = args.output.unwrap_or_else(|| PathBuf::from(&perf.output));
    let provider = args.llm.unwrap_or(perf.provider);
    let model = args.model.unwrap_or(perf.model);

    let selection = ModelSelection::resolve(&provider, &model)?;
    let prompts_dir = perf.prompts_dir.map(PathBuf::from);
    let outcome = write_perf_prompt(&args.file, &output, &selection, prompts_dir.as_deref())?;

    println!("Detected language: {}", outcome.language);
    println!(
        "Performance analysis prompt written to {}",
        outcome.output.display()
    );
    println!("Target model: {}", outcome.selection);
    Ok(())
}
