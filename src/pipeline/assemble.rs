//! Turns a flat cluster assignment into the ranked, described result.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::{Capability, PipelineError};
use crate::cluster::ClusterAssignment;
use crate::config::PipelineConfig;
use crate::keyphrase::KeyphraseRanker;
use crate::question::{ProcessedQuestion, QuestionLabel};

/// A question as listed inside a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMember {
    /// Normalized question text
    pub text: String,
    /// Review category
    pub label: QuestionLabel,
}

/// Inclusive span of question dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest question date
    pub start: NaiveDate,
    /// Latest question date
    pub end: NaiveDate,
}

/// One thematic group of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    /// Questions in discovery order
    pub members: Vec<ClusterMember>,
    /// Keyphrases, most relevant first
    pub keywords: Vec<String>,
    /// First and last question date
    pub date_range: DateRange,
}

impl ClusterResult {
    /// Number of questions in the cluster.
    #[must_use]
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Why a result is intentionally empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateReason {
    /// Fewer than two questions to compare
    InsufficientInput,
    /// Every question was rejected as junk
    NoMeaningfulQuestions,
    /// No term occurs in enough questions to compare them
    EmptyVocabulary,
}

impl fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InsufficientInput => "fewer than two questions to cluster",
            Self::NoMeaningfulQuestions => "no meaningful questions after filtering",
            Self::EmptyVocabulary => "questions share no common terms",
        };
        f.write_str(text)
    }
}

/// Final pipeline output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Clusters, largest first
    pub clusters: Vec<ClusterResult>,
    /// Number of questions handed to the pipeline
    pub total_input_count: usize,
    /// Number of clusters reported
    pub cluster_count: usize,
    /// Set when the result is deliberately empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degenerate: Option<DegenerateReason>,
    /// Cut height chosen by the threshold sweep
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl PipelineResult {
    /// An empty result with zero counts.
    #[must_use]
    pub fn empty(reason: DegenerateReason) -> Self {
        Self {
            clusters: Vec::new(),
            total_input_count: 0,
            cluster_count: 0,
            degenerate: Some(reason),
            threshold: None,
        }
    }

    /// Returns true if no clusters were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// Groups questions by cluster id, describes each group and ranks them.
pub struct ResultAssembler<'a> {
    ranker: &'a dyn KeyphraseRanker,
    min_cluster_size: Option<usize>,
    max_keyphrases: usize,
}

impl fmt::Debug for ResultAssembler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultAssembler")
            .field("min_cluster_size", &self.min_cluster_size)
            .field("max_keyphrases", &self.max_keyphrases)
            .finish_non_exhaustive()
    }
}

impl<'a> ResultAssembler<'a> {
    /// Creates an assembler from the pipeline configuration.
    #[must_use]
    pub fn new(ranker: &'a dyn KeyphraseRanker, config: &PipelineConfig) -> Self {
        Self {
            ranker,
            min_cluster_size: config.min_cluster_size,
            max_keyphrases: config.max_keyphrases,
        }
    }

    /// Builds the result for `questions` (rows of `assignment`).
    ///
    /// # Errors
    /// Returns [`PipelineError::ExternalModel`] if the keyphrase ranker fails,
    /// or [`PipelineError::ClusteringFailure`] if the assignment does not
    /// cover the questions.
    #[instrument(skip_all, fields(questions = questions.len(), clusters = assignment.cluster_count()))]
    pub fn assemble(
        &self,
        questions: &[ProcessedQuestion],
        assignment: &ClusterAssignment,
        total_input_count: usize,
    ) -> Result<PipelineResult, PipelineError> {
        if assignment.labels.len() != questions.len() {
            return Err(PipelineError::clustering(format!(
                "assignment covers {} rows but {} questions survived",
                assignment.labels.len(),
                questions.len()
            )));
        }

        let mut clusters = Vec::new();
        let mut dropped = 0usize;
        for rows in assignment.groups() {
            if self.min_cluster_size.is_some_and(|min| rows.len() < min) {
                dropped += 1;
                continue;
            }
            let members: Vec<&ProcessedQuestion> = rows.iter().map(|&row| &questions[row]).collect();
            if let Some(cluster) = self.describe(&members)? {
                clusters.push(cluster);
            }
        }
        if dropped > 0 {
            debug!(dropped, "Dropped clusters below minimum size");
        }

        clusters.sort_by(|a, b| b.size().cmp(&a.size()));

        Ok(PipelineResult {
            cluster_count: clusters.len(),
            clusters,
            total_input_count,
            degenerate: None,
            threshold: Some(assignment.threshold),
        })
    }

    fn describe(&self, members: &[&ProcessedQuestion]) -> Result<Option<ClusterResult>, PipelineError> {
        let (Some(start), Some(end)) = (
            members.iter().map(|q| q.record.date).min(),
            members.iter().map(|q| q.record.date).max(),
        ) else {
            return Ok(None);
        };

        let sentences: Vec<String> = members.iter().map(|q| q.record.text.clone()).collect();
        let mut keywords = self
            .ranker
            .rank(&sentences)
            .map_err(|source| PipelineError::external(Capability::KeyphraseRanker, source))?;
        keywords.truncate(self.max_keyphrases);

        Ok(Some(ClusterResult {
            members: members
                .iter()
                .map(|q| ClusterMember {
                    text: q.record.text.clone(),
                    label: q.record.label,
                })
                .collect(),
            keywords,
            date_range: DateRange { start, end },
        }))
    }
}
