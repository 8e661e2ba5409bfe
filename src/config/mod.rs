//! Pipeline tuning parameters and the TOML file layer that feeds them.

mod file;

pub use file::{FileConfig, LoadedConfig, load_default_file_config, load_file_config, resolve_default_config_path};

use std::collections::HashSet;

use crate::pipeline::PipelineError;

/// Minimum plausibility for a token to count as a real word.
pub const DEFAULT_PLAUSIBILITY_THRESHOLD: f64 = 0.6;
/// Fraction of tokens that must be exceeded by the valid-token count.
pub const DEFAULT_MEANINGFUL_TOKEN_RATIO: f64 = 0.5;
/// Terms must appear in at least this many questions.
pub const DEFAULT_MIN_DOCUMENT_FREQUENCY: usize = 2;
/// Spacing of candidate cut heights in the threshold sweep.
pub const DEFAULT_SWEEP_STEP: f64 = 0.01;
/// Finest allowed sweep step; each step costs one silhouette pass.
pub const MIN_SWEEP_STEP: f64 = 1e-4;
/// Cut height used when no candidate beats a zero silhouette.
pub const DEFAULT_FALLBACK_THRESHOLD: f64 = 0.59;
/// Keyphrases kept per cluster.
pub const DEFAULT_MAX_KEYPHRASES: usize = 10;

/// Largest cosine distance; sweep steps beyond it yield no candidates.
const MAX_COSINE_DISTANCE: f64 = 2.0;

/// Explicit knobs for one pipeline invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Token plausibility cutoff (inclusive)
    pub plausibility_threshold: f64,
    /// Lowercase abbreviations that always count as valid tokens
    pub abbreviations: HashSet<String>,
    /// Share of tokens the valid count must exceed
    pub meaningful_token_ratio: f64,
    /// TF-IDF minimum document frequency
    pub min_document_frequency: usize,
    /// Threshold sweep start and increment
    pub sweep_step: f64,
    /// Cut height when the sweep finds nothing better
    pub fallback_threshold: f64,
    /// Drop clusters smaller than this; `None` keeps every cluster
    pub min_cluster_size: Option<usize>,
    /// Keyphrases per cluster
    pub max_keyphrases: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            plausibility_threshold: DEFAULT_PLAUSIBILITY_THRESHOLD,
            abbreviations: HashSet::new(),
            meaningful_token_ratio: DEFAULT_MEANINGFUL_TOKEN_RATIO,
            min_document_frequency: DEFAULT_MIN_DOCUMENT_FREQUENCY,
            sweep_step: DEFAULT_SWEEP_STEP,
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
            min_cluster_size: None,
            max_keyphrases: DEFAULT_MAX_KEYPHRASES,
        }
    }
}

impl PipelineConfig {
    /// Adds abbreviations to the whitelist, lowercased.
    #[must_use]
    pub fn with_abbreviations<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.abbreviations.extend(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
        self
    }

    /// Checks every value against its allowed range.
    ///
    /// # Errors
    /// Returns [`PipelineError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(0.0..=1.0).contains(&self.plausibility_threshold) {
            return Err(PipelineError::invalid_config(format!(
                "plausibility_threshold must be within 0..=1, got {}",
                self.plausibility_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.meaningful_token_ratio) {
            return Err(PipelineError::invalid_config(format!(
                "meaningful_token_ratio must be within 0..=1, got {}",
                self.meaningful_token_ratio
            )));
        }
        if self.min_document_frequency == 0 {
            return Err(PipelineError::invalid_config(
                "min_document_frequency must be at least 1",
            ));
        }
        if !(self.sweep_step >= MIN_SWEEP_STEP && self.sweep_step < MAX_COSINE_DISTANCE) {
            return Err(PipelineError::invalid_config(format!(
                "threshold step must be within [{MIN_SWEEP_STEP}, 2), got {}",
                self.sweep_step
            )));
        }
        if !(0.0..=MAX_COSINE_DISTANCE).contains(&self.fallback_threshold) {
            return Err(PipelineError::invalid_config(format!(
                "fallback_threshold must be within 0..=2, got {}",
                self.fallback_threshold
            )));
        }
        if self.min_cluster_size == Some(0) {
            return Err(PipelineError::invalid_config(
                "min_cluster_size must be at least 1",
            ));
        }
        if self.max_keyphrases == 0 {
            return Err(PipelineError::invalid_config(
                "max_keyphrases must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.plausibility_threshold - 0.6).abs() < f64::EPSILON);
        assert!((config.fallback_threshold - 0.59).abs() < f64::EPSILON);
        assert_eq!(config.min_document_frequency, 2);
        assert_eq!(config.min_cluster_size, None);
        assert_eq!(config.max_keyphrases, 10);
    }

    #[test]
    fn test_with_abbreviations_lowercases_and_skips_blank() {
        let config = PipelineConfig::default().with_abbreviations(["ТюмГУ", " ", "ШКН "]);
        assert_eq!(config.abbreviations.len(), 2);
        assert!(config.abbreviations.contains("тюмгу"));
        assert!(config.abbreviations.contains("шкн"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let cases = [
            PipelineConfig {
                plausibility_threshold: 1.5,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                meaningful_token_ratio: -0.1,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                min_document_frequency: 0,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                sweep_step: 0.0,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                sweep_step: 1e-12,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                sweep_step: f64::NAN,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                fallback_threshold: 2.5,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                min_cluster_size: Some(0),
                ..PipelineConfig::default()
            },
            PipelineConfig {
                max_keyphrases: 0,
                ..PipelineConfig::default()
            },
        ];
        for config in cases {
            let err = config.validate().unwrap_err();
            assert!(
                matches!(err, PipelineError::InvalidConfig { .. }),
                "expected InvalidConfig for {config:?}"
            );
        }
    }

    #[test]
    fn test_smallest_sweep_step_is_accepted() {
        let config = PipelineConfig {
            sweep_step: MIN_SWEEP_STEP,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_error_names_field() {
        let config = PipelineConfig {
            max_keyphrases: 0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("max_keyphrases"));
    }
}
