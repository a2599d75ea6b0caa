//! Logging and observability
//!
//! Structured logging through `tracing`, with a console layer and a JSON
//! rolling file layer. The macros below keep field names consistent across
//! export and import runs so the file log can be queried by `vocabulary`
//! and `language`.
//!
//! # Example
//!
//! ```no_run
//! use termport::config::LoggingConfig;
//! use termport::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(vocabulary = "tags", "Listing terms");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard, LOG_FILE_NAME};

/// Log the start of a translation export
///
/// # Example
///
/// ```no_run
/// use termport::domain::{LangCode, VocabularyId};
/// use termport::log_export_start;
///
/// let vocabulary = VocabularyId::new("tags").unwrap();
/// let language = LangCode::new("fr").unwrap();
/// log_export_start!(&vocabulary, &language);
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($vocabulary:expr, $language:expr) => {
        tracing::info!(
            vocabulary = %$vocabulary,
            language = %$language,
            "Starting translation export"
        );
    };
}

/// Log the start of a translation import
#[macro_export]
macro_rules! log_import_start {
    ($vocabulary:expr, $language:expr, $rows:expr) => {
        tracing::info!(
            vocabulary = %$vocabulary,
            language = %$language,
            rows = $rows,
            "Starting translation import"
        );
    };
}

/// Log the completion of an export or import run
///
/// ```no_run
/// use std::time::Duration;
/// use termport::log_export_complete;
///
/// log_export_complete!(42, Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Export completed"
        );
    };
}

/// Log an error with context
///
/// ```no_run
/// use termport::domain::TermportError;
/// use termport::log_error_with_context;
///
/// let error = TermportError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log progress through a batch
#[macro_export]
macro_rules! log_batch_processing {
    ($current:expr, $total:expr) => {
        tracing::debug!(
            current = $current,
            total = $total,
            progress_pct = if $total == 0 {
                100.0
            } else {
                $current as f64 / $total as f64 * 100.0
            },
            "Processing batch"
        );
    };
}
