//! TOML config file for CLI defaults.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use super::PipelineConfig;
use crate::language::Language;
use crate::question::QuestionLabel;

const APP_DIR: &str = "question-clusters";
const CONFIG_FILE: &str = "config.toml";

/// Optional overrides read from `config.toml`. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Token plausibility cutoff.
    pub plausibility_threshold: Option<f64>,
    /// Share of tokens the valid count must exceed.
    pub meaningful_token_ratio: Option<f64>,
    /// Abbreviations that always count as real words.
    pub abbreviations: Option<Vec<String>>,
    /// TF-IDF minimum document frequency.
    pub min_document_frequency: Option<usize>,
    /// Threshold sweep step.
    pub threshold_step: Option<f64>,
    /// Cut height when the sweep finds nothing better.
    pub fallback_threshold: Option<f64>,
    /// Drop clusters with fewer members.
    pub min_cluster_size: Option<usize>,
    /// Keyphrases per cluster.
    pub max_keyphrases: Option<usize>,
    /// Language of the bundled lemmatizer and keyphrase ranker.
    pub language: Option<Language>,
    /// Word list for the lexicon scorer.
    pub lexicon: Option<PathBuf>,
    /// Label categories selected when the CLI names none.
    pub labels: Option<Vec<QuestionLabel>>,
}

impl FileConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// Returns error on TOML syntax errors, unknown keys or out-of-range values.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates values against pipeline constraints.
    ///
    /// # Errors
    /// Returns error naming the offending key.
    pub fn validate(&self) -> Result<()> {
        if let Some(labels) = &self.labels
            && labels.is_empty()
        {
            bail!("Invalid config value for `labels`: expected at least one label");
        }
        self.to_pipeline_config()?;
        Ok(())
    }

    /// Merges file values over the built-in defaults.
    ///
    /// # Errors
    /// Returns error if the merged configuration is out of range.
    pub fn to_pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::default();
        if let Some(value) = self.plausibility_threshold {
            config.plausibility_threshold = value;
        }
        if let Some(value) = self.meaningful_token_ratio {
            config.meaningful_token_ratio = value;
        }
        if let Some(words) = &self.abbreviations {
            config = config.with_abbreviations(words);
        }
        if let Some(value) = self.min_document_frequency {
            config.min_document_frequency = value;
        }
        if let Some(value) = self.threshold_step {
            config.sweep_step = value;
        }
        if let Some(value) = self.fallback_threshold {
            config.fallback_threshold = value;
        }
        if self.min_cluster_size.is_some() {
            config.min_cluster_size = self.min_cluster_size;
        }
        if let Some(value) = self.max_keyphrases {
            config.max_keyphrases = value;
        }
        config.validate().context("Invalid config value")?;
        Ok(config)
    }
}

/// Config file lookup outcome.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed config when the file exists.
    pub config: Option<FileConfig>,
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/question-clusters/config.toml`
/// 2. `$HOME/.config/question-clusters/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    config_path_from(
        env_var_non_empty_os("XDG_CONFIG_HOME"),
        env_var_non_empty_os("HOME"),
    )
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(base) = xdg_config_home {
        return Some(PathBuf::from(base).join(APP_DIR).join(CONFIG_FILE));
    }
    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILE),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if present.
///
/// # Errors
/// Returns error if the file exists but cannot be read or parsed.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig { path, config: None });
    };
    if !path_ref.exists() {
        return Ok(LoadedConfig { path, config: None });
    }
    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
    })
}

/// Loads and validates a config file.
///
/// # Errors
/// Returns error if the file cannot be read or parsed.
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    FileConfig::from_toml(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = FileConfig::from_toml(
            r#"
min_cluster_size = 3
language = "english"
abbreviations = ["ТюмГУ", "шкн"]
labels = ["no_answer", "low_score"]
"#,
        )
        .unwrap();
        assert_eq!(cfg.min_cluster_size, Some(3));
        assert_eq!(cfg.language, Some(Language::English));
        assert_eq!(
            cfg.labels,
            Some(vec![QuestionLabel::NoAnswer, QuestionLabel::LowScore])
        );
        assert!(cfg.max_keyphrases.is_none());

        let pipeline = cfg.to_pipeline_config().unwrap();
        assert_eq!(pipeline.min_cluster_size, Some(3));
        assert!(pipeline.abbreviations.contains("тюмгу"));
        assert_eq!(pipeline.max_keyphrases, 10);
    }

    #[test]
    fn test_empty_config_yields_defaults() {
        let cfg = FileConfig::from_toml("").unwrap();
        assert_eq!(cfg, FileConfig::default());
        assert_eq!(cfg.to_pipeline_config().unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = FileConfig::from_toml("concurrency = 4\n").unwrap_err();
        assert!(err.to_string().contains("concurrency"), "got {err}");
    }

    #[test]
    fn test_out_of_range_value_rejected() {
        let err = FileConfig::from_toml("threshold_step = 0.0\n").unwrap_err();
        assert!(format!("{err:#}").contains("threshold step"), "got {err:#}");
    }

    #[test]
    fn test_empty_label_list_rejected() {
        assert!(FileConfig::from_toml("labels = []\n").is_err());
    }

    #[test]
    fn test_config_path_prefers_xdg() {
        let path = config_path_from(Some("/xdg".into()), Some("/home/u".into())).unwrap();
        assert_eq!(path, PathBuf::from("/xdg/question-clusters/config.toml"));
    }

    #[test]
    fn test_config_path_falls_back_to_home() {
        let path = config_path_from(None, Some("/home/u".into())).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/home/u/.config/question-clusters/config.toml")
        );
        assert!(config_path_from(None, None).is_none());
    }

    #[test]
    fn test_load_file_config_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_keyphrases = \"ten\"\n").unwrap();
        let err = load_file_config(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"), "got {err}");
    }

    #[test]
    fn test_load_file_config_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        assert!(load_file_config(&dir.path().join("absent.toml")).is_err());
    }
}
