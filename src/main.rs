//! CLI entry point for the question clustering tool.

use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use question_clusters::config::{load_default_file_config, load_file_config};
use question_clusters::{
    FileConfig, LexiconScorer, NlpModels, cluster_questions, load_questions, render,
};
use tracing::{debug, info};

mod cli;

use cli::Args;

fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    init_tracing(default_level);

    debug!(?args, "CLI arguments parsed");

    let file_config = load_config(&args)?;
    let config = args.pipeline_config(file_config.as_ref())?;
    let selection = args.selection(file_config.as_ref());
    let language = args.language(file_config.as_ref());

    let mut models = NlpModels::bundled(language);
    if let Some(path) = args.lexicon(file_config.as_ref()) {
        let scorer = LexiconScorer::from_file(&path)?;
        info!(path = %path.display(), words = scorer.len(), "Loaded lexicon");
        models = models.with_scorer(Box::new(scorer));
    }

    let records = load_questions(&args.input, args.input_format.into())
        .with_context(|| format!("Failed to load questions from '{}'", args.input.display()))?;
    let selected = selection.apply(&records);
    info!(
        loaded = records.len(),
        selected = selected.len(),
        language = %language,
        "Loaded questions"
    );

    let dumb_terminal = std::env::var("TERM").is_ok_and(|term| term == "dumb");
    let spinner = should_use_spinner(io::stderr().is_terminal(), args.quiet, dumb_terminal).then(|| {
        start_spinner(&format!("Clustering {} questions...", selected.len()))
    });
    let result = cluster_questions(&selected, &models, &config);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let result = result.context("Clustering failed")?;

    let output = render(&result, args.format.into()).context("Failed to render result")?;
    print!("{output}");
    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// An explicit `--config` must exist; the default path is optional.
fn load_config(args: &Args) -> Result<Option<FileConfig>> {
    if let Some(path) = &args.config {
        let config = load_file_config(path)?;
        debug!(path = %path.display(), "Loaded config file");
        return Ok(Some(config));
    }
    let loaded = load_default_file_config()?;
    if loaded.config.is_some()
        && let Some(path) = &loaded.path
    {
        debug!(path = %path.display(), "Loaded default config file");
    }
    Ok(loaded.config)
}

fn should_use_spinner(stderr_is_terminal: bool, quiet: bool, dumb_terminal: bool) -> bool {
    stderr_is_terminal && !quiet && !dumb_terminal
}

fn start_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_disabled_when_quiet_or_piped() {
        assert!(should_use_spinner(true, false, false));
        assert!(!should_use_spinner(false, false, false));
        assert!(!should_use_spinner(true, true, false));
        assert!(!should_use_spinner(true, false, true));
    }
}
