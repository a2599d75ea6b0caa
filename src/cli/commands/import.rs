//! Import command implementation

use super::{
    connect_or_report, load_or_report, log_progress, report_setup_error, EXIT_INTERRUPTED,
    EXIT_OK, EXIT_REPORTED_ERROR,
};
use crate::adapters::messenger::ConsoleMessenger;
use crate::config::ImportConfig;
use crate::core::batch::BatchRunner;
use crate::core::import::ImportCoordinator;
use crate::domain::{LangCode, TermportError, VocabularyId};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV file with `Original Name` and `Translated Name` columns
    #[arg(long)]
    pub file: PathBuf,

    /// Vocabulary machine name the terms belong to
    #[arg(long)]
    pub vocabulary: String,

    /// Language code the translations are written in
    #[arg(long)]
    pub language: String,

    /// Report what would change without saving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Leave existing translations untouched
    #[arg(long)]
    pub no_overwrite: bool,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = match load_or_report(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };

        let (vocabulary, language) = match self.targets() {
            Ok(targets) => targets,
            Err(e) => return Ok(report_setup_error(&e)),
        };

        let (storage, languages) = match connect_or_report(&config).await {
            Ok(handles) => handles,
            Err(code) => return Ok(code),
        };

        let dry_run = self.dry_run || config.application.dry_run;
        let import_config = ImportConfig {
            overwrite_existing: config.import.overwrite_existing && !self.no_overwrite,
        };
        let coordinator =
            ImportCoordinator::new(storage, languages, Arc::new(ConsoleMessenger), import_config);

        if dry_run {
            println!("🧪 Dry run: no translations will be saved");
        }
        println!(
            "📥 Importing {} into {vocabulary} ({language})",
            self.file.display()
        );

        let runner = BatchRunner::new()
            .with_shutdown(shutdown)
            .on_progress(log_progress);
        let run = match coordinator
            .run_with(&self.file, &vocabulary, &language, dry_run, runner)
            .await
        {
            Ok(run) => run,
            Err(e) => {
                crate::log_error_with_context!(&e, "Import could not start");
                return Ok(report_setup_error(&e));
            }
        };

        if run.interrupted {
            println!(
                "⚠️  Import interrupted after {} of {} rows",
                run.processed, run.total
            );
            return Ok(EXIT_INTERRUPTED);
        }

        println!("   Duration: {:.2}s", run.duration.as_secs_f64());
        if run.output.is_clean() {
            Ok(EXIT_OK)
        } else {
            Ok(EXIT_REPORTED_ERROR)
        }
    }

    fn targets(&self) -> Result<(VocabularyId, LangCode), TermportError> {
        let vocabulary = VocabularyId::new(self.vocabulary.as_str())
            .map_err(TermportError::Validation)?;
        let language = LangCode::new(self.language.as_str()).map_err(TermportError::Validation)?;
        Ok((vocabulary, language))
    }
}
