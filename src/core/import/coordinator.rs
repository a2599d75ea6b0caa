//! Import orchestration

use super::finalizer::{ImportFinalizer, ImportReport};
use super::job::{ImportResults, ImportRowOperation};
use super::reader::read_translation_file;
use crate::adapters::messenger::Messenger;
use crate::adapters::taxonomy::{LanguageRegistry, TaxonomyStorage};
use crate::config::ImportConfig;
use crate::core::batch::{Batch, BatchRun, BatchRunner};
use crate::domain::ids::{LangCode, VocabularyId};
use crate::domain::{Result, TaxonomyError};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

pub const IMPORT_TITLE: &str = "Importing Taxonomy Translations";
pub const IMPORT_INIT_MESSAGE: &str = "Commencing";

/// Runs translation imports
pub struct ImportCoordinator {
    storage: Arc<dyn TaxonomyStorage>,
    languages: Arc<dyn LanguageRegistry>,
    messenger: Arc<dyn Messenger>,
    config: ImportConfig,
}

impl ImportCoordinator {
    pub fn new(
        storage: Arc<dyn TaxonomyStorage>,
        languages: Arc<dyn LanguageRegistry>,
        messenger: Arc<dyn Messenger>,
        config: ImportConfig,
    ) -> Self {
        Self {
            storage,
            languages,
            messenger,
            config,
        }
    }

    /// Read `file` and build the import batch without running it
    ///
    /// # Errors
    ///
    /// Returns `LanguageNotFound` or `VocabularyNotFound` for unknown
    /// targets, and the reader's error for an unreadable or malformed file.
    pub async fn prepare(
        &self,
        file: &Path,
        vocabulary: &VocabularyId,
        language: &LangCode,
        dry_run: bool,
    ) -> Result<Batch<ImportResults, ImportFinalizer>> {
        if self.languages.find_language(language).await?.is_none() {
            return Err(TaxonomyError::LanguageNotFound(language.to_string()).into());
        }

        let vocabularies = self.storage.list_vocabularies().await?;
        if !vocabularies.iter().any(|v| &v.id == vocabulary) {
            return Err(TaxonomyError::VocabularyNotFound(vocabulary.to_string()).into());
        }

        let rows = read_translation_file(file)?;
        let total = rows.len();
        crate::log_import_start!(vocabulary, language, total);

        let results = ImportResults::new(vocabulary.clone(), language.clone(), dry_run);
        let mut batch = Batch::new(
            IMPORT_TITLE,
            results,
            ImportFinalizer::new(self.messenger.clone()),
        )
        .init_message(IMPORT_INIT_MESSAGE);

        for row in rows {
            batch.add_operation(ImportRowOperation::new(
                self.storage.clone(),
                row,
                self.config.overwrite_existing,
                total,
            ));
        }

        Ok(batch)
    }

    /// Import `file` into `vocabulary` for `language`
    pub async fn run(
        &self,
        file: &Path,
        vocabulary: &VocabularyId,
        language: &LangCode,
        dry_run: bool,
        shutdown: Option<watch::Receiver<bool>>,
    ) -> Result<BatchRun<ImportReport>> {
        let mut runner = BatchRunner::new();
        if let Some(shutdown) = shutdown {
            runner = runner.with_shutdown(shutdown);
        }
        self.run_with(file, vocabulary, language, dry_run, runner)
            .await
    }

    /// Import using a preconfigured runner
    pub async fn run_with(
        &self,
        file: &Path,
        vocabulary: &VocabularyId,
        language: &LangCode,
        dry_run: bool,
        mut runner: BatchRunner,
    ) -> Result<BatchRun<ImportReport>> {
        let batch = self.prepare(file, vocabulary, language, dry_run).await?;
        Ok(runner.run(batch).await)
    }
}
