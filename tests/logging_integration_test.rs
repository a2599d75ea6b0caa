//! Integration tests for logging configuration
//!
//! A global subscriber can only be installed once per process, so a single
//! test initializes logging and the rest exercise config and macros.

use std::time::Duration;
use tempfile::TempDir;
use termport::config::LoggingConfig;
use termport::domain::{LangCode, TermportError, VocabularyId};
use termport::logging::{init_logging, LOG_FILE_NAME};

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(config.local_enabled);
    assert_eq!(config.local_path, "./logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_init_logging_creates_log_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };
    assert!(!log_path.exists());

    let guard = init_logging("debug", &config).expect("Failed to initialize logging");
    assert!(guard.has_file_writer());
    assert!(log_path.is_dir());

    let vocabulary = VocabularyId::new("tags").unwrap();
    let language = LangCode::new("fr").unwrap();
    termport::log_export_start!(&vocabulary, &language);
    termport::log_import_start!(&vocabulary, &language, 3);
    termport::log_export_complete!(2, Duration::from_millis(15));
    termport::log_batch_processing!(1, 2);
    termport::log_batch_processing!(0, 0);
    termport::log_error_with_context!(
        &TermportError::FileSystem("disk full".to_string()),
        "Writing report"
    );
    drop(guard);

    assert!(log_path.join(LOG_FILE_NAME).exists());

    // A second global subscriber is refused
    let second = init_logging("info", &config);
    assert!(matches!(second, Err(TermportError::Configuration(_))));
}
