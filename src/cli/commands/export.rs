//! Export command implementation
//!
//! Writes the translations of one vocabulary to a CSV report under
//! `public://<report_directory>/`.

use super::{
    connect_or_report, load_or_report, log_progress, report_setup_error, EXIT_INTERRUPTED,
    EXIT_OK, EXIT_REPORTED_ERROR,
};
use crate::adapters::files::LocalPublicFileSystem;
use crate::adapters::messenger::ConsoleMessenger;
use crate::core::batch::BatchRunner;
use crate::core::export::{ExportCoordinator, ExportReport};
use crate::domain::{LangCode, TermportError, VocabularyId};
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Vocabulary machine name (for example `tags`)
    #[arg(long)]
    pub vocabulary: String,

    /// Language code of the translations to export
    #[arg(long)]
    pub language: String,
}

impl ExportArgs {
    /// Execute the export command
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

        let coordinator = ExportCoordinator::new(
            storage,
            languages,
            Arc::new(LocalPublicFileSystem::from_config(&config.files)),
            Arc::new(ConsoleMessenger),
            config.export.clone(),
        );

        println!("📤 Exporting {vocabulary} translations ({language})");
        let runner = BatchRunner::new()
            .with_shutdown(shutdown)
            .on_progress(log_progress);

        let run = match coordinator.run_with(&vocabulary, &language, runner).await {
            Ok(run) => run,
            Err(e) => {
                crate::log_error_with_context!(&e, "Export could not start");
                return Ok(report_setup_error(&e));
            }
        };

        if run.interrupted {
            println!(
                "⚠️  Export interrupted after {} of {} terms",
                run.processed, run.total
            );
            return Ok(EXIT_INTERRUPTED);
        }

        match &run.output {
            ExportReport::Written {
                real_path, rows, ..
            } => {
                println!("   Rows: {rows}");
                println!("   File: {}", real_path.display());
                println!("   Duration: {:.2}s", run.duration.as_secs_f64());
                Ok(EXIT_OK)
            }
            _ => Ok(EXIT_REPORTED_ERROR),
        }
    }

    fn targets(&self) -> Result<(VocabularyId, LangCode), TermportError> {
        let vocabulary = VocabularyId::new(self.vocabulary.as_str())
            .map_err(TermportError::Validation)?;
        let language = LangCode::new(self.language.as_str()).map_err(TermportError::Validation)?;
        Ok((vocabulary, language))
    }
}
