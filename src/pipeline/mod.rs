//! The end-to-end clustering pipeline.
//!
//! Stages run in order over one batch:
//!
//! 1. [`normalize`] cleans escape sequences and whitespace.
//! 2. [`JunkFilter`] drops questions that are mostly non-words.
//! 3. The [`Lemmatizer`] reduces the survivors to lemma texts.
//! 4. [`TfIdfVectorizer`] and [`standardize`] build the feature matrix.
//! 5. [`ClusterEngine`] picks a cut height and assigns clusters.
//! 6. [`ResultAssembler`] describes and ranks the clusters.
//!
//! Degenerate batches (fewer than two questions, everything filtered, no
//! shared vocabulary) produce an empty [`PipelineResult`] rather than an
//! error. A lone survivor of the junk filter is a clustering failure.

mod assemble;
mod error;

pub use assemble::{ClusterMember, ClusterResult, DateRange, DegenerateReason, PipelineResult, ResultAssembler};
pub use error::{Capability, PipelineError};

use tracing::{debug, info, instrument};

use crate::cluster::{ClusterEngine, TfIdfVectorizer, standardize};
use crate::config::PipelineConfig;
use crate::keyphrase::{KeyphraseRanker, RakeRanker};
use crate::language::Language;
use crate::question::{ProcessedQuestion, QuestionRecord};
use crate::text::{HeuristicScorer, JunkFilter, Lemmatizer, PlausibilityScorer, SnowballLemmatizer, normalize};

/// The NLP capabilities a pipeline run needs.
///
/// Build once at startup and share by reference across runs.
pub struct NlpModels {
    /// Real-word scoring for the junk filter
    pub scorer: Box<dyn PlausibilityScorer>,
    /// Base-form reduction for vectorization
    pub lemmatizer: Box<dyn Lemmatizer>,
    /// Per-cluster keyphrase ranking
    pub keyphrases: Box<dyn KeyphraseRanker>,
}

impl std::fmt::Debug for NlpModels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NlpModels").finish_non_exhaustive()
    }
}

impl NlpModels {
    /// Bundles custom capability implementations.
    #[must_use]
    pub fn new(
        scorer: Box<dyn PlausibilityScorer>,
        lemmatizer: Box<dyn Lemmatizer>,
        keyphrases: Box<dyn KeyphraseRanker>,
    ) -> Self {
        Self {
            scorer,
            lemmatizer,
            keyphrases,
        }
    }

    /// The built-in heuristic scorer, Snowball lemmatizer and RAKE ranker.
    #[must_use]
    #[instrument]
    pub fn bundled(language: Language) -> Self {
        Self::new(
            Box::new(HeuristicScorer),
            Box::new(SnowballLemmatizer::new(language)),
            Box::new(RakeRanker::new(language)),
        )
    }

    /// Replaces the plausibility scorer.
    #[must_use]
    pub fn with_scorer(mut self, scorer: Box<dyn PlausibilityScorer>) -> Self {
        self.scorer = scorer;
        self
    }
}

/// Clusters a batch of questions into ranked thematic groups.
///
/// # Errors
/// Returns [`PipelineError::InvalidConfig`] for out-of-range settings,
/// [`PipelineError::ExternalModel`] when a capability fails, and
/// [`PipelineError::ClusteringFailure`] when a single question survives the
/// junk filter or the feature matrix is unusable.
#[instrument(skip_all, fields(records = records.len()))]
pub fn cluster_questions(
    records: &[QuestionRecord],
    models: &NlpModels,
    config: &PipelineConfig,
) -> Result<PipelineResult, PipelineError> {
    config.validate()?;

    if records.len() < 2 {
        debug!("Too few questions to cluster");
        return Ok(PipelineResult::empty(DegenerateReason::InsufficientInput));
    }

    let filter = JunkFilter::new(models.scorer.as_ref(), config);
    let mut survivors = Vec::with_capacity(records.len());
    for record in records {
        let text = normalize(&record.text);
        if let Some(accepted) = filter.is_meaningful(&text)? {
            survivors.push(QuestionRecord {
                text: accepted,
                ..record.clone()
            });
        }
    }
    debug!(
        survivors = survivors.len(),
        rejected = records.len() - survivors.len(),
        "Filtered junk questions"
    );

    match survivors.len() {
        0 => return Ok(PipelineResult::empty(DegenerateReason::NoMeaningfulQuestions)),
        1 => {
            return Err(PipelineError::clustering(
                "only one question survived the junk filter",
            ));
        }
        _ => {}
    }

    let processed = lemmatize_all(survivors, models.lemmatizer.as_ref())?;
    let lemma_texts: Vec<&str> = processed.iter().map(|q| q.lemma_text.as_str()).collect();

    let mut features = match TfIdfVectorizer::new(config.min_document_frequency).fit_transform(&lemma_texts) {
        Ok(features) => features,
        Err(PipelineError::EmptyVocabulary { .. }) => {
            debug!("No term reached the document frequency cutoff");
            return Ok(PipelineResult::empty(DegenerateReason::EmptyVocabulary));
        }
        Err(err) => return Err(err),
    };
    standardize(&mut features.values);

    let assignment = ClusterEngine::from_config(config).cluster(&features.values)?;
    let result = ResultAssembler::new(models.keyphrases.as_ref(), config).assemble(
        &processed,
        &assignment,
        records.len(),
    )?;

    info!(
        questions = result.total_input_count,
        clusters = result.cluster_count,
        "Clustering complete"
    );
    Ok(result)
}

fn lemmatize_all(
    survivors: Vec<QuestionRecord>,
    lemmatizer: &dyn Lemmatizer,
) -> Result<Vec<ProcessedQuestion>, PipelineError> {
    survivors
        .into_iter()
        .map(|record| {
            let lemmas = lemmatizer
                .lemmatize(&record.text)
                .map_err(|source| PipelineError::external(Capability::Lemmatizer, source))?;
            Ok(ProcessedQuestion {
                lemma_text: lemmas.join(" "),
                record,
            })
        })
        .collect()
}
