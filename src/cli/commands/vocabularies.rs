//! Vocabularies command implementation
//!
//! Lists what can be passed to `export --vocabulary` and `--language`.

use super::{connect_or_report, load_or_report, EXIT_OK, EXIT_STORAGE};
use clap::Args;

/// Arguments for the vocabularies command
#[derive(Args, Debug)]
pub struct VocabulariesArgs {}

impl VocabulariesArgs {
    /// Execute the vocabularies command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_or_report(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };

        let (storage, languages) = match connect_or_report(&config).await {
            Ok(handles) => handles,
            Err(code) => return Ok(code),
        };

        let vocabularies = match storage.list_vocabularies().await {
            Ok(v) => v,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to list vocabularies");
                eprintln!("❌ Failed to list vocabularies: {e}");
                return Ok(EXIT_STORAGE);
            }
        };
        let languages = match languages.list_languages().await {
            Ok(l) => l,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to list languages");
                eprintln!("❌ Failed to list languages: {e}");
                return Ok(EXIT_STORAGE);
            }
        };

        println!("📚 Vocabularies ({}):", storage.backend_name());
        if vocabularies.is_empty() {
            println!("  (none)");
        }
        for vocabulary in &vocabularies {
            println!("  {:<24} {}", vocabulary.id.as_str(), vocabulary.label);
        }

        println!();
        println!("🌐 Languages:");
        for language in &languages {
            println!("  {:<24} {}", language.id.as_str(), language.name);
        }

        Ok(EXIT_OK)
    }
}
