//! Validate config command implementation

use super::{EXIT_CONFIG, EXIT_OK};
use crate::config::{load_config, redact_connection_string, StorageBackend};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);

        match config.storage_backend {
            StorageBackend::Json => {
                if let Some(ref json_config) = config.json_store {
                    println!("  Storage Backend: JSON snapshot");
                    println!("  Snapshot: {}", json_config.path);
                    println!("  Persist Imports: {}", json_config.persist);
                }
            }
            StorageBackend::PostgreSQL => {
                if let Some(ref pg_config) = config.postgresql {
                    println!("  Storage Backend: PostgreSQL");
                    println!(
                        "  PostgreSQL Connection: {}",
                        redact_connection_string(pg_config.connection_string.expose_secret())
                    );
                    println!("  Max Connections: {}", pg_config.max_connections);
                    println!("  SSL Mode: {}", pg_config.ssl_mode);
                }
            }
        }

        println!("  Public Files: {}", config.files.public_path);
        println!(
            "  Report Directory: public://{}",
            config.export.report_directory.trim_matches('/')
        );
        println!("  Filename Prefix: {}", config.export.filename_prefix);
        println!(
            "  Overwrite Existing Translations: {}",
            config.import.overwrite_existing
        );
        if config.logging.local_enabled {
            println!(
                "  Log Files: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(EXIT_OK)
    }
}
