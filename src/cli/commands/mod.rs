//! CLI command implementations
//!
//! Commands return process exit codes:
//! `0` success, `1` finished with an error notification, `2` configuration
//! or input error, `4` storage unavailable, `5` fatal, `130` interrupted.

pub mod export;
pub mod import;
pub mod init;
pub mod validate;
pub mod vocabularies;

use crate::adapters::taxonomy::factory::StorageHandles;
use crate::adapters::taxonomy::create_storage_and_languages;
use crate::config::{load_config, TermportConfig};
use crate::core::batch::BatchProgress;
use crate::domain::TermportError;

pub const EXIT_OK: i32 = 0;
pub const EXIT_REPORTED_ERROR: i32 = 1;
pub const EXIT_CONFIG: i32 = 2;
pub const EXIT_STORAGE: i32 = 4;
pub const EXIT_FATAL: i32 = 5;
pub const EXIT_INTERRUPTED: i32 = 130;

/// Load configuration, printing the error and returning the exit code on failure
pub(crate) fn load_or_report(config_path: &str) -> Result<TermportConfig, i32> {
    load_config(config_path).map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        eprintln!("❌ {e}");
        EXIT_CONFIG
    })
}

/// Open the configured storage and check that it answers
pub(crate) async fn connect_or_report(config: &TermportConfig) -> Result<StorageHandles, i32> {
    let handles = create_storage_and_languages(config).await.map_err(|e| {
        crate::log_error_with_context!(&e, "Failed to open taxonomy storage");
        eprintln!("❌ Failed to open taxonomy storage: {e}");
        EXIT_STORAGE
    })?;

    if let Err(e) = handles.0.test_connection().await {
        crate::log_error_with_context!(&e, "Taxonomy storage connection test failed");
        eprintln!("❌ Taxonomy storage is not reachable: {e}");
        return Err(EXIT_STORAGE);
    }

    Ok(handles)
}

/// Map an error raised before a batch started to an exit code
pub(crate) fn report_setup_error(error: &TermportError) -> i32 {
    eprintln!("❌ {error}");
    match error {
        TermportError::Taxonomy(_)
        | TermportError::Validation(_)
        | TermportError::Csv(_)
        | TermportError::Configuration(_) => EXIT_CONFIG,
        TermportError::Database(_) => EXIT_STORAGE,
        _ => EXIT_FATAL,
    }
}

/// Log progress every 100 operations and at the end
pub(crate) fn log_progress(progress: &BatchProgress) {
    if progress.current % 100 == 0 || progress.current == progress.total {
        tracing::info!(
            current = progress.current,
            total = progress.total,
            "{} {}",
            progress.progress,
            progress.message
        );
    }
}
