//! Import finisher: summarizes what was written

use super::job::{ImportCounts, ImportResults};
use crate::adapters::messenger::Messenger;
use crate::core::batch::BatchFinished;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

pub const MSG_IMPORT_FAILED: &str = "Taxonomy translations import encountered an error.";

/// Summary of an import run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub rows: usize,
    pub counts: ImportCounts,
    pub dry_run: bool,
    pub completed: bool,
}

impl ImportReport {
    /// Nothing failed and at least one translation is in place
    pub fn is_clean(&self) -> bool {
        self.counts.failed == 0 && self.counts.applied() > 0
    }
}

pub struct ImportFinalizer {
    messenger: Arc<dyn Messenger>,
}

impl ImportFinalizer {
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self { messenger }
    }

    pub fn finish(&self, success: bool, results: ImportResults) -> ImportReport {
        let counts = results.counts();

        if !success {
            self.messenger
                .add_warning("Import stopped before all rows were processed.");
        }

        if counts.applied() == 0 {
            self.messenger.add_error(MSG_IMPORT_FAILED);
        } else {
            let prefix = if results.dry_run { "Dry run: " } else { "" };
            self.messenger.add_status(&format!(
                "{prefix}Taxonomy translations have been imported: {} created, {} updated, {} unchanged, {} skipped.",
                counts.created, counts.updated, counts.unchanged, counts.skipped
            ));
        }

        if counts.failed > 0 {
            self.messenger.add_error(&format!(
                "{} translation(s) could not be saved. See the log for details.",
                counts.failed
            ));
        }

        tracing::info!(
            vocabulary = %results.vocabulary,
            language = %results.language,
            dry_run = results.dry_run,
            created = counts.created,
            updated = counts.updated,
            unchanged = counts.unchanged,
            skipped = counts.skipped,
            failed = counts.failed,
            "Import finished"
        );

        ImportReport {
            rows: results.rows_processed,
            counts,
            dry_run: results.dry_run,
            completed: success,
        }
    }
}

#[async_trait]
impl BatchFinished<ImportResults> for ImportFinalizer {
    type Output = ImportReport;

    async fn finished(&self, success: bool, results: ImportResults) -> ImportReport {
        self.finish(success, results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::messenger::MemoryMessenger;
    use crate::adapters::taxonomy::TranslationWrite;
    use crate::core::import::job::{ImportRecord, ImportSkip, RowOutcome};
    use crate::domain::ids::{LangCode, TermId, VocabularyId};

    fn results(outcomes: Vec<RowOutcome>) -> ImportResults {
        let mut results = ImportResults::new(
            VocabularyId::new("tags").unwrap(),
            LangCode::new("fr").unwrap(),
            false,
        );
        results.rows_processed = outcomes.len();
        results.records = outcomes
            .into_iter()
            .map(|outcome| ImportRecord { line: 2, outcome })
            .collect();
        results
    }

    #[test]
    fn test_summary_status() {
        let messenger = Arc::new(MemoryMessenger::new());
        let report = ImportFinalizer::new(messenger.clone()).finish(
            true,
            results(vec![
                RowOutcome::Applied {
                    term_id: TermId::new(1),
                    write: TranslationWrite::Created,
                },
                RowOutcome::Skipped {
                    term_id: None,
                    reason: ImportSkip::TermNotFound,
                },
            ]),
        );

        assert!(report.is_clean());
        assert_eq!(
            messenger.statuses(),
            vec!["Taxonomy translations have been imported: 1 created, 0 updated, 0 unchanged, 1 skipped.".to_string()]
        );
        assert!(messenger.errors().is_empty());
    }

    #[test]
    fn test_nothing_applied_is_an_error() {
        let messenger = Arc::new(MemoryMessenger::new());
        let report = ImportFinalizer::new(messenger.clone()).finish(true, results(Vec::new()));

        assert!(!report.is_clean());
        assert_eq!(messenger.errors(), vec![MSG_IMPORT_FAILED.to_string()]);
    }

    #[test]
    fn test_failures_are_reported() {
        let messenger = Arc::new(MemoryMessenger::new());
        let report = ImportFinalizer::new(messenger.clone()).finish(
            false,
            results(vec![
                RowOutcome::Applied {
                    term_id: TermId::new(1),
                    write: TranslationWrite::Updated,
                },
                RowOutcome::Failed {
                    term_id: Some(TermId::new(2)),
                    error: "connection reset".to_string(),
                },
            ]),
        );

        assert!(!report.completed);
        assert_eq!(report.counts.failed, 1);
        assert_eq!(messenger.warnings().len(), 1);
        assert_eq!(messenger.errors().len(), 1);
        assert!(messenger.errors()[0].starts_with("1 translation(s)"));
    }
}
