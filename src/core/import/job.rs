//! Per-row import step

use super::reader::ImportRow;
use crate::adapters::taxonomy::{TaxonomyStorage, TranslationWrite};
use crate::core::batch::{BatchContext, BatchOperation};
use crate::domain::ids::{LangCode, TermId, VocabularyId};
use crate::domain::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Why a row (or one of its matching terms) was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSkip {
    /// The translated name is blank
    EmptyTranslation,
    /// No term in the vocabulary has this name
    TermNotFound,
    /// The language is the term's source language
    SourceLanguage,
    /// A translation exists and overwriting is disabled
    AlreadyTranslated,
}

/// Outcome for one row and matching term
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// The translation was written, or would be in a dry run
    Applied {
        term_id: TermId,
        write: TranslationWrite,
    },
    Skipped {
        term_id: Option<TermId>,
        reason: ImportSkip,
    },
    /// The store rejected the lookup or the write
    Failed {
        term_id: Option<TermId>,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub line: u64,
    pub outcome: RowOutcome,
}

/// Totals by outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportCounts {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ImportCounts {
    /// Rows whose translation is now in place
    pub fn applied(&self) -> usize {
        self.created + self.updated + self.unchanged
    }
}

/// Accumulator shared by all steps of one import run
#[derive(Debug, Clone)]
pub struct ImportResults {
    pub vocabulary: VocabularyId,
    pub language: LangCode,
    pub dry_run: bool,
    pub rows_processed: usize,
    pub records: Vec<ImportRecord>,
}

impl ImportResults {
    pub fn new(vocabulary: VocabularyId, language: LangCode, dry_run: bool) -> Self {
        Self {
            vocabulary,
            language,
            dry_run,
            rows_processed: 0,
            records: Vec::new(),
        }
    }

    pub fn counts(&self) -> ImportCounts {
        let mut counts = ImportCounts::default();
        for record in &self.records {
            match &record.outcome {
                RowOutcome::Applied { write, .. } => match write {
                    TranslationWrite::Created => counts.created += 1,
                    TranslationWrite::Updated => counts.updated += 1,
                    TranslationWrite::Unchanged => counts.unchanged += 1,
                },
                RowOutcome::Skipped { .. } => counts.skipped += 1,
                RowOutcome::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }
}

/// Batch step importing one CSV row
pub struct ImportRowOperation {
    storage: Arc<dyn TaxonomyStorage>,
    row: ImportRow,
    overwrite_existing: bool,
    total_rows: usize,
}

impl ImportRowOperation {
    pub fn new(
        storage: Arc<dyn TaxonomyStorage>,
        row: ImportRow,
        overwrite_existing: bool,
        total_rows: usize,
    ) -> Self {
        Self {
            storage,
            row,
            overwrite_existing,
            total_rows,
        }
    }

    /// Apply the row to every matching term
    pub async fn process(&self, results: &ImportResults) -> Vec<RowOutcome> {
        let translated = self.row.translated_name.as_str();
        if translated.is_empty() {
            return vec![RowOutcome::Skipped {
                term_id: None,
                reason: ImportSkip::EmptyTranslation,
            }];
        }

        let matches = match self
            .storage
            .find_terms_by_name(&results.vocabulary, &self.row.original_name)
            .await
        {
            Ok(ids) if ids.is_empty() => {
                return vec![RowOutcome::Skipped {
                    term_id: None,
                    reason: ImportSkip::TermNotFound,
                }]
            }
            Ok(ids) => ids,
            Err(e) => {
                return vec![RowOutcome::Failed {
                    term_id: None,
                    error: e.to_string(),
                }]
            }
        };

        let mut outcomes = Vec::with_capacity(matches.len());
        for term_id in matches {
            outcomes.push(self.apply(term_id, results).await);
        }
        outcomes
    }

    async fn apply(&self, term_id: TermId, results: &ImportResults) -> RowOutcome {
        let language = &results.language;
        let translated = self.row.translated_name.as_str();

        let term = match self.storage.load_term(term_id).await {
            Ok(Some(term)) => term,
            Ok(None) => {
                return RowOutcome::Skipped {
                    term_id: Some(term_id),
                    reason: ImportSkip::TermNotFound,
                }
            }
            Err(e) => {
                return RowOutcome::Failed {
                    term_id: Some(term_id),
                    error: e.to_string(),
                }
            }
        };

        if &term.langcode == language {
            return RowOutcome::Skipped {
                term_id: Some(term_id),
                reason: ImportSkip::SourceLanguage,
            };
        }

        let planned = match term.translations.get(language) {
            Some(_) if !self.overwrite_existing => {
                return RowOutcome::Skipped {
                    term_id: Some(term_id),
                    reason: ImportSkip::AlreadyTranslated,
                }
            }
            Some(existing) if existing.name == translated => TranslationWrite::Unchanged,
            Some(_) => TranslationWrite::Updated,
            None => TranslationWrite::Created,
        };

        if results.dry_run || planned == TranslationWrite::Unchanged {
            return RowOutcome::Applied {
                term_id,
                write: planned,
            };
        }

        match self
            .storage
            .save_translation(term_id, language, translated)
            .await
        {
            Ok(write) => RowOutcome::Applied { term_id, write },
            Err(e) => {
                tracing::warn!(
                    term_id = %term_id,
                    language = %language,
                    line = self.row.line,
                    error = %e,
                    "Failed to save translation"
                );
                RowOutcome::Failed {
                    term_id: Some(term_id),
                    error: e.to_string(),
                }
            }
        }
    }
}

#[async_trait]
impl BatchOperation<ImportResults> for ImportRowOperation {
    async fn run(&self, ctx: &mut BatchContext<ImportResults>) -> Result<()> {
        let outcomes = self.process(&ctx.results).await;

        tracing::trace!(
            line = self.row.line,
            step = ctx.results.rows_processed + 1,
            total = self.total_rows,
            outcomes = ?outcomes,
            "Imported row"
        );

        ctx.results.rows_processed += 1;
        ctx.results
            .records
            .extend(outcomes.into_iter().map(|outcome| ImportRecord {
                line: self.row.line,
                outcome,
            }));
        ctx.set_message(format!("Importing term: {}", self.row.original_name));
        Ok(())
    }
}
