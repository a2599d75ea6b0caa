//! Export orchestration
//!
//! Validates the request, selects the vocabulary's terms, queues one
//! [`ExportTermOperation`] per term and hands the batch to a runner.

use super::finalizer::{ExportFinalizer, ExportReport};
use super::job::{ExportResults, ExportTermOperation};
use super::selector::TermSelector;
use crate::adapters::files::PublicFileSystem;
use crate::adapters::messenger::Messenger;
use crate::adapters::taxonomy::{LanguageRegistry, TaxonomyStorage};
use crate::config::ExportConfig;
use crate::core::batch::{Batch, BatchRun, BatchRunner};
use crate::domain::ids::{LangCode, VocabularyId};
use crate::domain::{Result, TaxonomyError};
use std::sync::Arc;
use tokio::sync::watch;

pub const EXPORT_TITLE: &str = "Exporting Taxonomy Translations";
pub const EXPORT_INIT_MESSAGE: &str = "Commencing";

/// Runs translation exports
pub struct ExportCoordinator {
    storage: Arc<dyn TaxonomyStorage>,
    languages: Arc<dyn LanguageRegistry>,
    files: Arc<dyn PublicFileSystem>,
    messenger: Arc<dyn Messenger>,
    config: ExportConfig,
}

impl ExportCoordinator {
    pub fn new(
        storage: Arc<dyn TaxonomyStorage>,
        languages: Arc<dyn LanguageRegistry>,
        files: Arc<dyn PublicFileSystem>,
        messenger: Arc<dyn Messenger>,
        config: ExportConfig,
    ) -> Self {
        Self {
            storage,
            languages,
            files,
            messenger,
            config,
        }
    }

    /// Build the export batch without running it
    ///
    /// # Errors
    ///
    /// Returns `TaxonomyError::LanguageNotFound` for an unconfigured
    /// language and propagates selection errors such as
    /// `TaxonomyError::VocabularyNotFound`.
    pub async fn prepare(
        &self,
        vocabulary: &VocabularyId,
        language: &LangCode,
    ) -> Result<Batch<ExportResults, ExportFinalizer>> {
        if self.languages.find_language(language).await?.is_none() {
            return Err(TaxonomyError::LanguageNotFound(language.to_string()).into());
        }

        let term_ids = TermSelector::new(self.storage.clone())
            .select(vocabulary)
            .await?;
        let total = term_ids.len();

        let finalizer =
            ExportFinalizer::new(self.files.clone(), self.messenger.clone(), &self.config);
        let mut batch = Batch::new(EXPORT_TITLE, ExportResults::new(vocabulary.clone()), finalizer)
            .init_message(EXPORT_INIT_MESSAGE);

        for term_id in term_ids {
            batch.add_operation(ExportTermOperation::new(
                self.storage.clone(),
                term_id,
                language.clone(),
                total,
            ));
        }

        Ok(batch)
    }

    /// Export `vocabulary` in `language`, stopping early if `shutdown` fires
    pub async fn run(
        &self,
        vocabulary: &VocabularyId,
        language: &LangCode,
        shutdown: Option<watch::Receiver<bool>>,
    ) -> Result<BatchRun<ExportReport>> {
        let mut runner = BatchRunner::new();
        if let Some(shutdown) = shutdown {
            runner = runner.with_shutdown(shutdown);
        }
        self.run_with(vocabulary, language, runner).await
    }

    /// Export using a preconfigured runner (progress callback, shutdown)
    pub async fn run_with(
        &self,
        vocabulary: &VocabularyId,
        language: &LangCode,
        mut runner: BatchRunner,
    ) -> Result<BatchRun<ExportReport>> {
        crate::log_export_start!(vocabulary, language);

        let batch = self.prepare(vocabulary, language).await?;
        let run = runner.run(batch).await;

        crate::log_export_complete!(run.processed, run.duration);
        Ok(run)
    }
}
