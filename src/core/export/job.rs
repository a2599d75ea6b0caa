//! Per-term export step
//!
//! Each [`ExportTermOperation`] looks at one term and, when the term is
//! translated into the requested language, appends an [`ExportRow`] to the
//! shared [`ExportResults`]. Missing terms and missing translations are
//! recorded as skips; the step itself never fails.

use crate::adapters::taxonomy::TaxonomyStorage;
use crate::core::batch::{BatchContext, BatchOperation};
use crate::domain::ids::{LangCode, TermId, VocabularyId};
use crate::domain::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// One CSV line of an export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub original_name: String,
    pub translated_name: String,
}

/// Why a term produced no row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No term has this ID
    MissingTerm,
    /// The term is not translated into the requested language
    MissingTranslation,
    /// The store could not be queried
    LookupFailed(String),
}

/// Result of one export step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Translated(ExportRow),
    Skipped(SkipReason),
}

/// Counts of skipped terms by reason
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipBreakdown {
    pub missing_term: usize,
    pub missing_translation: usize,
    pub lookup_failed: usize,
}

impl SkipBreakdown {
    pub fn total(&self) -> usize {
        self.missing_term + self.missing_translation + self.lookup_failed
    }
}

/// Accumulator shared by all steps of one export run
#[derive(Debug, Clone)]
pub struct ExportResults {
    /// Bundle used in the export filename, fixed when the run is created
    pub taxonomy_type: VocabularyId,

    /// Rows in the order the terms were processed
    pub rows: Vec<ExportRow>,

    /// Outcome of every processed term
    pub outcomes: Vec<(TermId, StepOutcome)>,
}

impl ExportResults {
    pub fn new(taxonomy_type: VocabularyId) -> Self {
        Self {
            taxonomy_type,
            rows: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    /// Record the outcome of a step, keeping translated rows in order
    pub fn record(&mut self, term_id: TermId, outcome: StepOutcome) {
        if let StepOutcome::Translated(row) = &outcome {
            self.rows.push(row.clone());
        }
        self.outcomes.push((term_id, outcome));
    }

    /// Number of processed terms
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn skip_breakdown(&self) -> SkipBreakdown {
        let mut breakdown = SkipBreakdown::default();
        for (_, outcome) in &self.outcomes {
            match outcome {
                StepOutcome::Skipped(SkipReason::MissingTerm) => breakdown.missing_term += 1,
                StepOutcome::Skipped(SkipReason::MissingTranslation) => {
                    breakdown.missing_translation += 1
                }
                StepOutcome::Skipped(SkipReason::LookupFailed(_)) => breakdown.lookup_failed += 1,
                StepOutcome::Translated(_) => {}
            }
        }
        breakdown
    }
}

/// Batch step exporting a single term
pub struct ExportTermOperation {
    storage: Arc<dyn TaxonomyStorage>,
    term_id: TermId,
    language: LangCode,
    total_terms: usize,
}

impl ExportTermOperation {
    pub fn new(
        storage: Arc<dyn TaxonomyStorage>,
        term_id: TermId,
        language: LangCode,
        total_terms: usize,
    ) -> Self {
        Self {
            storage,
            term_id,
            language,
            total_terms,
        }
    }

    pub fn term_id(&self) -> TermId {
        self.term_id
    }

    /// Look up the term and decide its outcome
    ///
    /// Returns the outcome together with the term's base name, which is
    /// empty when the term could not be loaded.
    pub async fn process(&self, taxonomy_type: &VocabularyId) -> (StepOutcome, String) {
        let term = match self.storage.load_term(self.term_id).await {
            Ok(Some(term)) => term,
            Ok(None) => {
                tracing::debug!(term_id = %self.term_id, "Term not found, skipping");
                return (StepOutcome::Skipped(SkipReason::MissingTerm), String::new());
            }
            Err(e) => {
                tracing::warn!(term_id = %self.term_id, error = %e, "Term lookup failed, skipping");
                return (
                    StepOutcome::Skipped(SkipReason::LookupFailed(e.to_string())),
                    String::new(),
                );
            }
        };

        if term.bundle() != taxonomy_type {
            tracing::warn!(
                term_id = %term.id,
                bundle = %term.bundle(),
                taxonomy_type = %taxonomy_type,
                "Term belongs to a different vocabulary than the export"
            );
        }

        let outcome = match term.translated_name(&self.language) {
            Some(translated) => StepOutcome::Translated(ExportRow {
                original_name: term.name.clone(),
                translated_name: translated.to_string(),
            }),
            None => StepOutcome::Skipped(SkipReason::MissingTranslation),
        };

        (outcome, term.name)
    }
}

#[async_trait]
impl BatchOperation<ExportResults> for ExportTermOperation {
    async fn run(&self, ctx: &mut BatchContext<ExportResults>) -> Result<()> {
        let (outcome, name) = self.process(&ctx.results.taxonomy_type).await;

        tracing::trace!(
            term_id = %self.term_id,
            language = %self.language,
            step = ctx.results.processed() + 1,
            total = self.total_terms,
            outcome = ?outcome,
            "Exported term"
        );

        ctx.results.record(self.term_id, outcome);
        ctx.set_message(format!("Exporting term: {name}"));
        Ok(())
    }
}
