//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{StorageBackend, TermportConfig};
use crate::domain::errors::TermportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into TermportConfig
/// 4. Applies environment variable overrides (TERMPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use termport::config::loader::load_config;
///
/// let config = load_config("termport.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<TermportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TermportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TermportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Performs the same substitution, override and validation steps as
/// [`load_config`].
pub fn parse_config(contents: &str) -> Result<TermportConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: TermportConfig = toml::from_str(&contents)
        .map_err(|e| TermportError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        TermportError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| TermportError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(TermportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using TERMPORT_* prefix
///
/// Environment variables follow the pattern: TERMPORT_<SECTION>_<KEY>
/// For example: TERMPORT_FILES_PUBLIC_PATH, TERMPORT_EXPORT_REPORT_DIRECTORY
fn apply_env_overrides(config: &mut TermportConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("TERMPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("TERMPORT_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Storage backend override
    if let Ok(val) = std::env::var("TERMPORT_STORAGE_BACKEND") {
        config.storage_backend = match val.to_lowercase().as_str() {
            "json" => StorageBackend::Json,
            "postgresql" => StorageBackend::PostgreSQL,
            other => {
                return Err(TermportError::Configuration(format!(
                    "Invalid TERMPORT_STORAGE_BACKEND '{other}'. Must be one of: json, postgresql"
                )))
            }
        };
    }

    // JSON store overrides (only if the section is configured)
    if let Some(ref mut json_config) = config.json_store {
        if let Ok(val) = std::env::var("TERMPORT_JSON_STORE_PATH") {
            json_config.path = val;
        }
        if let Ok(val) = std::env::var("TERMPORT_JSON_STORE_PERSIST") {
            json_config.persist = val.parse().unwrap_or(true);
        }
    }

    // PostgreSQL overrides (only if the section is configured)
    if let Some(ref mut pg_config) = config.postgresql {
        if let Ok(val) = std::env::var("TERMPORT_POSTGRESQL_CONNECTION_STRING") {
            pg_config.connection_string = super::secret_string(val);
        }
        if let Ok(val) = std::env::var("TERMPORT_POSTGRESQL_MAX_CONNECTIONS") {
            if let Ok(max) = val.parse() {
                pg_config.max_connections = max;
            }
        }
        if let Ok(val) = std::env::var("TERMPORT_POSTGRESQL_SSL_MODE") {
            pg_config.ssl_mode = val;
        }
    }

    // Files overrides
    if let Ok(val) = std::env::var("TERMPORT_FILES_PUBLIC_PATH") {
        config.files.public_path = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("TERMPORT_EXPORT_REPORT_DIRECTORY") {
        config.export.report_directory = val;
    }
    if let Ok(val) = std::env::var("TERMPORT_EXPORT_FILENAME_PREFIX") {
        config.export.filename_prefix = val;
    }

    // Import overrides
    if let Ok(val) = std::env::var("TERMPORT_IMPORT_OVERWRITE_EXISTING") {
        config.import.overwrite_existing = val.parse().unwrap_or(true);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("TERMPORT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("TERMPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("TERMPORT_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
