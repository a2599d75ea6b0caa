//! Integration tests for the export pipeline against the JSON store

use std::path::{Path, PathBuf};
use std::sync::Arc;
use termport::adapters::files::LocalPublicFileSystem;
use termport::adapters::json::JsonTaxonomyStore;
use termport::adapters::messenger::MemoryMessenger;
use termport::config::ExportConfig;
use termport::adapters::taxonomy::TaxonomyStorage;
use termport::core::batch::{BatchContext, BatchOperation, BatchRunner};
use termport::core::export::{
    ExportCoordinator, ExportFinalizer, ExportReport, ExportResults, ExportRow,
    ExportTermOperation, StepOutcome, TermSelector,
};
use termport::domain::{LangCode, TermId, VocabularyId};
use tempfile::TempDir;
use tokio::sync::watch;

const SNAPSHOT: &str = r#"{
    "languages": [
        {"id": "en", "name": "English"},
        {"id": "fr", "name": "French"},
        {"id": "de", "name": "German"}
    ],
    "vocabularies": [
        {"id": "tags", "label": "Tags"},
        {"id": "empty", "label": "Empty"}
    ],
    "terms": [
        {"id": 1, "vocabulary": "tags", "name": "Fruit", "langcode": "en", "weight": 1,
         "translations": {"fr": {"name": "Fruit (FR)"}}},
        {"id": 2, "vocabulary": "tags", "name": "Apple", "langcode": "en", "parents": [1],
         "translations": {"fr": {"name": "Pomme"}}},
        {"id": 3, "vocabulary": "tags", "name": "Vegetable", "langcode": "en", "weight": 0,
         "translations": {"fr": {"name": "Légume, vert"}}},
        {"id": 4, "vocabulary": "tags", "name": "Untranslated", "langcode": "en", "weight": 2}
    ]
}"#;

struct Harness {
    public: TempDir,
    messenger: Arc<MemoryMessenger>,
    coordinator: ExportCoordinator,
}

fn harness_with_root(public: TempDir, root: PathBuf) -> Harness {
    let store = Arc::new(JsonTaxonomyStore::from_json_str(SNAPSHOT).unwrap());
    let messenger = Arc::new(MemoryMessenger::new());
    let coordinator = ExportCoordinator::new(
        store.clone(),
        store,
        Arc::new(LocalPublicFileSystem::new(root)),
        messenger.clone(),
        ExportConfig::default(),
    );
    Harness {
        public,
        messenger,
        coordinator,
    }
}

fn harness() -> Harness {
    let public = TempDir::new().unwrap();
    let root = public.path().to_path_buf();
    harness_with_root(public, root)
}

fn vocabulary(name: &str) -> VocabularyId {
    VocabularyId::new(name).unwrap()
}

fn language(code: &str) -> LangCode {
    LangCode::new(code).unwrap()
}

fn report_files(root: &Path) -> Vec<PathBuf> {
    let dir = root.join("taxonomy_report_logs");
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    files.sort();
    files
}

#[tokio::test]
async fn test_export_writes_rows_in_tree_order() {
    let h = harness();
    let run = h
        .coordinator
        .run(&vocabulary("tags"), &language("fr"), None)
        .await
        .unwrap();

    assert!(run.success);
    assert_eq!(run.processed, 4);

    let ExportReport::Written {
        real_path,
        filename,
        rows,
        ..
    } = &run.output
    else {
        panic!("expected a written report, got {:?}", run.output);
    };
    assert_eq!(*rows, 3);
    assert!(filename.starts_with("taxonomy_translations-tags-"));
    assert!(filename.ends_with(".csv"));

    let contents = std::fs::read_to_string(real_path).unwrap();
    assert_eq!(
        contents,
        "Original Name,Translated Name\n\
         Vegetable,\"Légume, vert\"\n\
         Fruit,Fruit (FR)\n\
         Apple,Pomme\n"
    );

    let statuses = h.messenger.statuses();
    assert_eq!(statuses.len(), 1);
    assert!(statuses[0].contains("Please download it here"));
    assert!(statuses[0].contains(filename.as_str()));
    assert!(h.messenger.errors().is_empty());
}

#[tokio::test]
async fn test_export_language_without_translations() {
    let h = harness();
    let run = h
        .coordinator
        .run(&vocabulary("tags"), &language("de"), None)
        .await
        .unwrap();

    match run.output {
        ExportReport::Empty { processed, skipped } => {
            assert_eq!(processed, 4);
            assert_eq!(skipped.missing_translation, 4);
        }
        other => panic!("expected an empty report, got {other:?}"),
    }
    assert_eq!(
        h.messenger.errors(),
        vec!["Taxonomy translations export encountered an error.".to_string()]
    );
    assert!(report_files(h.public.path()).is_empty());
}

#[tokio::test]
async fn test_export_empty_vocabulary() {
    let h = harness();
    let run = h
        .coordinator
        .run(&vocabulary("empty"), &language("fr"), None)
        .await
        .unwrap();

    assert_eq!(run.total, 0);
    assert!(matches!(run.output, ExportReport::Empty { processed: 0, .. }));
    assert_eq!(h.messenger.errors().len(), 1);
}

#[tokio::test]
async fn test_export_source_language_counts_as_translation() {
    let h = harness();
    let run = h
        .coordinator
        .run(&vocabulary("tags"), &language("en"), None)
        .await
        .unwrap();

    // Every term has English as its source language
    let ExportReport::Written {
        real_path, rows, ..
    } = &run.output
    else {
        panic!("expected a written report, got {:?}", run.output);
    };
    assert_eq!(*rows, 4);
    let contents = std::fs::read_to_string(real_path).unwrap();
    assert!(contents.contains("Untranslated,Untranslated\n"));
}

#[tokio::test]
async fn test_export_unknown_vocabulary() {
    let h = harness();
    let result = h
        .coordinator
        .run(&vocabulary("missing"), &language("fr"), None)
        .await;
    assert!(result.is_err());
    assert!(h.messenger.messages().is_empty());
}

#[tokio::test]
async fn test_export_directory_failure_keeps_rows() {
    let public = TempDir::new().unwrap();
    let not_a_directory = public.path().join("files");
    std::fs::write(&not_a_directory, "plain file").unwrap();
    let h = harness_with_root(public, not_a_directory);

    let run = h
        .coordinator
        .run(&vocabulary("tags"), &language("fr"), None)
        .await
        .unwrap();

    match run.output {
        ExportReport::DirectoryUnavailable { directory, rows } => {
            assert_eq!(directory, "public://taxonomy_report_logs");
            assert_eq!(rows.len(), 3);
        }
        other => panic!("expected a directory failure, got {other:?}"),
    }
    assert_eq!(
        h.messenger.errors(),
        vec!["Failed to create directory for file.".to_string()]
    );
}

#[tokio::test]
async fn test_export_open_failure() {
    let public = TempDir::new().unwrap();
    let messenger = Arc::new(MemoryMessenger::new());
    let finalizer = ExportFinalizer::new(
        Arc::new(LocalPublicFileSystem::new(public.path())),
        messenger.clone(),
        &ExportConfig::default(),
    );

    // A directory sitting where the report file should go
    let blocked = public
        .path()
        .join("taxonomy_report_logs")
        .join(finalizer.filename("tags", 1_700_000_000));
    std::fs::create_dir_all(&blocked).unwrap();

    let mut results = ExportResults::new(vocabulary("tags"));
    results.record(
        TermId::new(1),
        StepOutcome::Translated(ExportRow {
            original_name: "Fruit".to_string(),
            translated_name: "Fruit (FR)".to_string(),
        }),
    );

    let report = finalizer.finish_at(true, results, 1_700_000_000);
    match report {
        ExportReport::WriteFailed { uri, .. } => {
            assert_eq!(
                uri,
                "public://taxonomy_report_logs/taxonomy_translations-tags-1700000000.csv"
            );
        }
        other => panic!("expected a write failure, got {other:?}"),
    }
    let errors = messenger.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Unable to write CSV file to public://"));
}

/// Runs the select and per-term stages without finishing, so the caller
/// controls the timestamp
async fn collect(storage: Arc<dyn TaxonomyStorage>) -> ExportResults {
    let term_ids = TermSelector::new(storage.clone())
        .select(&vocabulary("tags"))
        .await
        .unwrap();
    let total = term_ids.len();

    let mut ctx = BatchContext::new(ExportResults::new(vocabulary("tags")));
    for term_id in term_ids {
        ExportTermOperation::new(storage.clone(), term_id, language("fr"), total)
            .run(&mut ctx)
            .await
            .unwrap();
    }
    ctx.results
}

fn data_rows(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_exports_at_different_times_write_separate_files() {
    let public = TempDir::new().unwrap();
    let storage: Arc<dyn TaxonomyStorage> =
        Arc::new(JsonTaxonomyStore::from_json_str(SNAPSHOT).unwrap());
    let finalizer = ExportFinalizer::new(
        Arc::new(LocalPublicFileSystem::new(public.path())),
        Arc::new(MemoryMessenger::new()),
        &ExportConfig::default(),
    );

    for timestamp in [1_700_000_000, 1_700_000_060] {
        let results = collect(storage.clone()).await;
        assert!(finalizer.finish_at(true, results, timestamp).is_written());
    }

    let files = report_files(public.path());
    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("taxonomy_translations-tags-1700000000.csv"));
    assert!(files[1].ends_with("taxonomy_translations-tags-1700000060.csv"));

    let first = data_rows(&files[0]);
    assert_eq!(first, data_rows(&files[1]));
    assert_eq!(
        first,
        vec![
            "Vegetable,\"Légume, vert\"".to_string(),
            "Fruit,Fruit (FR)".to_string(),
            "Apple,Pomme".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_export_reports_progress_for_every_term() {
    let h = harness();
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = seen.clone();
    let runner = BatchRunner::new().on_progress(move |progress| {
        sink.lock()
            .unwrap()
            .push((progress.current, progress.message.clone()));
    });

    let run = h
        .coordinator
        .run_with(&vocabulary("tags"), &language("fr"), runner)
        .await
        .unwrap();
    assert!(run.output.is_written());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert_eq!(seen[0], (1, "Exporting term: Vegetable".to_string()));
    assert_eq!(seen[3].0, 4);
}

#[tokio::test]
async fn test_export_interrupted_before_first_term() {
    let h = harness();
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();

    let run = h
        .coordinator
        .run(&vocabulary("tags"), &language("fr"), Some(rx))
        .await
        .unwrap();

    assert!(run.interrupted);
    assert!(!run.success);
    assert_eq!(run.processed, 0);
    assert!(matches!(run.output, ExportReport::Empty { .. }));
}
