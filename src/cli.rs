//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use question_clusters::{
    FileConfig, InputFormat, Language, OutputFormat, PipelineConfig, QuestionLabel, QuestionSelection,
};

/// Group unanswered and poorly-rated chatbot questions into thematic clusters.
///
/// Reads an exported question file, drops junk input, clusters the rest by
/// vocabulary and prints each cluster with its keyphrases and date span.
#[derive(Parser, Debug)]
#[command(name = "qclusters")]
#[command(author, version, about)]
pub struct Args {
    /// Question file: `text --- YYYY-MM-DD --- code` lines, or a JSON array
    pub input: PathBuf,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,

    /// Input file layout (auto picks JSON for `.json` files)
    #[arg(long, value_enum, default_value_t = InputFormatArg::Auto)]
    pub input_format: InputFormatArg,

    /// Earliest question date to include (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub since: Option<NaiveDate>,

    /// Latest question date to include (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub until: Option<NaiveDate>,

    /// Include questions the chatbot could not answer
    #[arg(long)]
    pub no_answer: bool,

    /// Include answers rated poorly
    #[arg(long)]
    pub low_score: bool,

    /// Include answers rated well
    #[arg(long)]
    pub high_score: bool,

    /// Include answers that were never rated
    #[arg(long)]
    pub no_score: bool,

    /// Drop clusters with fewer questions than this
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub min_cluster_size: Option<u32>,

    /// Keyphrases shown per cluster (1-100)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub max_keyphrases: Option<u32>,

    /// Spacing of candidate cut heights in the threshold sweep
    #[arg(long, value_name = "STEP")]
    pub threshold_step: Option<f64>,

    /// Language of the bundled lemmatizer and keyphrase ranker
    #[arg(long, value_enum)]
    pub language: Option<LanguageArg>,

    /// Abbreviation that always counts as a real word (repeatable)
    #[arg(long = "abbreviation", value_name = "WORD")]
    pub abbreviations: Vec<String>,

    /// Word list (one per line) used to decide which tokens are real words
    #[arg(long, value_name = "PATH")]
    pub lexicon: Option<PathBuf>,

    /// Config file (default: $XDG_CONFIG_HOME/question-clusters/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Output format choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Input layout choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormatArg {
    Auto,
    Delimited,
    Json,
}

impl From<InputFormatArg> for InputFormat {
    fn from(value: InputFormatArg) -> Self {
        match value {
            InputFormatArg::Auto => Self::Auto,
            InputFormatArg::Delimited => Self::Delimited,
            InputFormatArg::Json => Self::Json,
        }
    }
}

/// Language choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    Russian,
    English,
}

impl From<LanguageArg> for Language {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::Russian => Self::Russian,
            LanguageArg::English => Self::English,
        }
    }
}

impl Args {
    /// Returns true if any label category flag was passed.
    #[must_use]
    pub fn has_label_flags(&self) -> bool {
        self.no_answer || self.low_score || self.high_score || self.no_score
    }

    /// Merges CLI overrides over the file config and defaults.
    ///
    /// Abbreviations from both sources are combined.
    pub fn pipeline_config(&self, file: Option<&FileConfig>) -> Result<PipelineConfig> {
        let mut config = match file {
            Some(file) => file.to_pipeline_config()?,
            None => PipelineConfig::default(),
        };
        config = config.with_abbreviations(&self.abbreviations);
        if let Some(min) = self.min_cluster_size {
            config.min_cluster_size =
                Some(usize::try_from(min).context("min-cluster-size out of range")?);
        }
        if let Some(max) = self.max_keyphrases {
            config.max_keyphrases = usize::try_from(max).context("max-keyphrases out of range")?;
        }
        if let Some(step) = self.threshold_step {
            config.sweep_step = step;
        }
        config.validate().context("Invalid command-line value")?;
        Ok(config)
    }

    /// Builds the question selection. Label flags on the command line replace
    /// the file's `labels`; with neither, only unanswered questions are kept.
    #[must_use]
    pub fn selection(&self, file: Option<&FileConfig>) -> QuestionSelection {
        let mut selection = QuestionSelection {
            since: self.since,
            until: self.until,
            ..QuestionSelection::default()
        };
        if self.has_label_flags() {
            selection.no_answer = self.no_answer;
            selection.low_score = self.low_score;
            selection.high_score = self.high_score;
            selection.no_score = self.no_score;
        } else if let Some(labels) = file.and_then(|f| f.labels.as_ref()) {
            selection.no_answer = labels.contains(&QuestionLabel::NoAnswer);
            selection.low_score = labels.contains(&QuestionLabel::LowScore);
            selection.high_score = labels.contains(&QuestionLabel::HighScore);
            selection.no_score = labels.contains(&QuestionLabel::NoScore);
        }
        selection
    }

    /// CLI language, then file language, then the default.
    #[must_use]
    pub fn language(&self, file: Option<&FileConfig>) -> Language {
        self.language
            .map(Language::from)
            .or_else(|| file.and_then(|f| f.language))
            .unwrap_or_default()
    }

    /// CLI lexicon path, then the file's.
    #[must_use]
    pub fn lexicon(&self, file: Option<&FileConfig>) -> Option<PathBuf> {
        self.lexicon
            .clone()
            .or_else(|| file.and_then(|f| f.lexicon.clone()))
    }
}
