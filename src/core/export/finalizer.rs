//! Export finisher: writes the collected rows to a CSV report

use super::job::{ExportResults, ExportRow, SkipBreakdown};
use crate::adapters::files::{PublicFileSystem, PUBLIC_SCHEME};
use crate::adapters::messenger::Messenger;
use crate::config::ExportConfig;
use crate::core::batch::BatchFinished;
use crate::domain::{Result, TermportError};
use async_trait::async_trait;
use chrono::Utc;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// CSV header of every export
pub const CSV_HEADER: [&str; 2] = ["Original Name", "Translated Name"];

pub const MSG_DIRECTORY_FAILED: &str = "Failed to create directory for file.";
pub const MSG_EXPORT_FAILED: &str = "Taxonomy translations export encountered an error.";

/// What the finisher did with the results
#[derive(Debug, Clone, PartialEq)]
pub enum ExportReport {
    /// The CSV file was written
    Written {
        uri: String,
        real_path: PathBuf,
        filename: String,
        rows: usize,
    },
    /// No term produced a row, so no file was written
    Empty {
        processed: usize,
        skipped: SkipBreakdown,
    },
    /// The report directory could not be prepared; rows are kept
    DirectoryUnavailable {
        directory: String,
        rows: Vec<ExportRow>,
    },
    /// The file could not be opened or written
    WriteFailed { uri: String, reason: String },
}

impl ExportReport {
    pub fn is_written(&self) -> bool {
        matches!(self, ExportReport::Written { .. })
    }
}

/// Writes `public://<directory>/<prefix>-<bundle>-<timestamp>.csv`
pub struct ExportFinalizer {
    files: Arc<dyn PublicFileSystem>,
    messenger: Arc<dyn Messenger>,
    report_directory: String,
    filename_prefix: String,
}

impl ExportFinalizer {
    pub fn new(
        files: Arc<dyn PublicFileSystem>,
        messenger: Arc<dyn Messenger>,
        config: &ExportConfig,
    ) -> Self {
        Self {
            files,
            messenger,
            report_directory: config.report_directory.trim_matches('/').to_string(),
            filename_prefix: config.filename_prefix.clone(),
        }
    }

    /// URI of the report directory
    pub fn directory_uri(&self) -> String {
        format!("{PUBLIC_SCHEME}{}", self.report_directory)
    }

    /// File name for a report of `taxonomy_type` written at `timestamp`
    pub fn filename(&self, taxonomy_type: &str, timestamp: i64) -> String {
        format!("{}-{}-{}.csv", self.filename_prefix, taxonomy_type, timestamp)
    }

    /// Finish the run as of `timestamp` (Unix seconds)
    pub fn finish_at(&self, success: bool, results: ExportResults, timestamp: i64) -> ExportReport {
        if !success {
            tracing::warn!(
                processed = results.processed(),
                rows = results.rows.len(),
                "Export batch did not complete; writing the rows collected so far"
            );
        }

        if results.rows.is_empty() {
            let skipped = results.skip_breakdown();
            tracing::warn!(
                taxonomy_type = %results.taxonomy_type,
                processed = results.processed(),
                missing_term = skipped.missing_term,
                missing_translation = skipped.missing_translation,
                lookup_failed = skipped.lookup_failed,
                "No translated terms to export"
            );
            self.messenger.add_error(MSG_EXPORT_FAILED);
            return ExportReport::Empty {
                processed: results.processed(),
                skipped,
            };
        }

        let directory = self.directory_uri();
        let filename = self.filename(results.taxonomy_type.as_str(), timestamp);
        let uri = format!("{directory}/{filename}");

        let local_directory = match self.files.prepare_directory(&directory, true) {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(directory = %directory, error = %e, "Cannot prepare report directory");
                self.messenger.add_error(MSG_DIRECTORY_FAILED);
                return ExportReport::DirectoryUnavailable {
                    directory,
                    rows: results.rows,
                };
            }
        };

        if let Err(e) = write_csv(&local_directory.join(&filename), &results.rows) {
            tracing::error!(uri = %uri, error = %e, "Cannot write export file");
            self.messenger
                .add_error(&format!("Unable to write CSV file to {uri}"));
            return ExportReport::WriteFailed {
                uri,
                reason: e.to_string(),
            };
        }

        let real_path = self
            .files
            .realpath(&uri)
            .unwrap_or_else(|_| local_directory.join(&filename));

        self.messenger.add_status(&format!(
            "Taxonomy translations have been exported. Please download it here: <a href=\"{}\">{}</a>",
            real_path.display(),
            filename
        ));

        ExportReport::Written {
            uri,
            real_path,
            filename,
            rows: results.rows.len(),
        }
    }
}

#[async_trait]
impl BatchFinished<ExportResults> for ExportFinalizer {
    type Output = ExportReport;

    async fn finished(&self, success: bool, results: ExportResults) -> ExportReport {
        self.finish_at(success, results, Utc::now().timestamp())
    }
}

/// Create or truncate `path` and write the header plus one line per row
fn write_csv(path: &Path, rows: &[ExportRow]) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        TermportError::Io(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(file);

    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record([&row.original_name, &row.translated_name])?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::files::LocalPublicFileSystem;
    use crate::adapters::messenger::MemoryMessenger;
    use crate::core::export::job::{SkipReason, StepOutcome};
    use crate::domain::ids::{TermId, VocabularyId};
    use tempfile::TempDir;

    fn results(rows: &[(&str, &str)]) -> ExportResults {
        let mut results = ExportResults::new(VocabularyId::new("tags").unwrap());
        for (i, (original, translated)) in rows.iter().enumerate() {
            results.record(
                TermId::new(i as u32 + 1),
                StepOutcome::Translated(ExportRow {
                    original_name: original.to_string(),
                    translated_name: translated.to_string(),
                }),
            );
        }
        results
    }

    fn finalizer(root: &Path, messenger: Arc<MemoryMessenger>) -> ExportFinalizer {
        ExportFinalizer::new(
            Arc::new(LocalPublicFileSystem::new(root)),
            messenger,
            &ExportConfig::default(),
        )
    }

    #[test]
    fn test_writes_csv_with_header() {
        let temp = TempDir::new().unwrap();
        let messenger = Arc::new(MemoryMessenger::new());
        let report = finalizer(temp.path(), messenger.clone()).finish_at(
            true,
            results(&[("Fruit", "Fruit (FR)"), ("Apple", "Pomme, rouge")]),
            1_700_000_000,
        );

        let path = temp
            .path()
            .join("taxonomy_report_logs/taxonomy_translations-tags-1700000000.csv");
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "Original Name,Translated Name\nFruit,Fruit (FR)\nApple,\"Pomme, rouge\"\n"
        );

        match report {
            ExportReport::Written { filename, rows, .. } => {
                assert_eq!(filename, "taxonomy_translations-tags-1700000000.csv");
                assert_eq!(rows, 2);
            }
            other => panic!("unexpected report: {other:?}"),
        }

        let statuses = messenger.statuses();
        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].starts_with(
            "Taxonomy translations have been exported. Please download it here: <a href=\""
        ));
        assert!(statuses[0].ends_with(">taxonomy_translations-tags-1700000000.csv</a>"));
    }

    #[test]
    fn test_empty_rows_report_generic_error() {
        let temp = TempDir::new().unwrap();
        let messenger = Arc::new(MemoryMessenger::new());

        let mut empty = results(&[]);
        empty.record(
            TermId::new(5),
            StepOutcome::Skipped(SkipReason::MissingTranslation),
        );

        let report = finalizer(temp.path(), messenger.clone()).finish_at(true, empty, 1);

        assert_eq!(messenger.errors(), vec![MSG_EXPORT_FAILED.to_string()]);
        assert!(matches!(
            report,
            ExportReport::Empty { processed: 1, skipped } if skipped.missing_translation == 1
        ));
        assert!(!temp.path().join("taxonomy_report_logs").exists());
    }

    #[test]
    fn test_truncates_existing_file() {
        let temp = TempDir::new().unwrap();
        let messenger = Arc::new(MemoryMessenger::new());
        let finalizer = finalizer(temp.path(), messenger);

        finalizer.finish_at(true, results(&[("A", "a"), ("B", "b")]), 42);
        finalizer.finish_at(true, results(&[("C", "c")]), 42);

        let contents = std::fs::read_to_string(
            temp.path()
                .join("taxonomy_report_logs/taxonomy_translations-tags-42.csv"),
        )
        .unwrap();
        assert_eq!(contents, "Original Name,Translated Name\nC,c\n");
    }

    #[test]
    fn test_unsuccessful_batch_still_writes_rows() {
        let temp = TempDir::new().unwrap();
        let messenger = Arc::new(MemoryMessenger::new());
        let report = finalizer(temp.path(), messenger).finish_at(false, results(&[("A", "a")]), 7);
        assert!(report.is_written());
    }

    #[test]
    fn test_filename_uses_prefix_and_bundle() {
        let temp = TempDir::new().unwrap();
        let config = ExportConfig {
            report_directory: "/reports/".to_string(),
            filename_prefix: "terms".to_string(),
        };
        let finalizer = ExportFinalizer::new(
            Arc::new(LocalPublicFileSystem::new(temp.path())),
            Arc::new(MemoryMessenger::new()),
            &config,
        );

        assert_eq!(finalizer.directory_uri(), "public://reports");
        assert_eq!(finalizer.filename("colors", 9), "terms-colors-9.csv");
    }
}
