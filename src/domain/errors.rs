//! Domain error types
//!
//! This module defines the error hierarchy for termport.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main termport error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum TermportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Taxonomy lookup errors
    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] TaxonomyError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// CSV encoding/decoding errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Public file area errors (directory preparation, path resolution)
    #[error("File system error: {0}")]
    FileSystem(String),

    /// Batch execution errors
    #[error("Batch error: {0}")]
    Batch(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Taxonomy-specific errors
///
/// Errors raised by taxonomy storage backends when a vocabulary, term or
/// language cannot be resolved.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    /// Vocabulary does not exist
    #[error("Vocabulary not found: {0}")]
    VocabularyNotFound(String),

    /// Term does not exist
    #[error("Term not found: {0}")]
    TermNotFound(u32),

    /// Language is not configured
    #[error("Language not found: {0}")]
    LanguageNotFound(String),

    /// Stored data could not be interpreted
    #[error("Invalid taxonomy data: {0}")]
    InvalidData(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for TermportError {
    fn from(err: std::io::Error) -> Self {
        TermportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for TermportError {
    fn from(err: serde_json::Error) -> Self {
        TermportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TermportError {
    fn from(err: toml::de::Error) -> Self {
        TermportError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for TermportError {
    fn from(err: csv::Error) -> Self {
        TermportError::Csv(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termport_error_display() {
        let err = TermportError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_taxonomy_error_conversion() {
        let taxonomy_err = TaxonomyError::VocabularyNotFound("tags".to_string());
        let err: TermportError = taxonomy_err.into();
        assert!(matches!(err, TermportError::Taxonomy(_)));
        assert_eq!(err.to_string(), "Taxonomy error: Vocabulary not found: tags");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: TermportError = io_err.into();
        assert!(matches!(err, TermportError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: TermportError = json_err.into();
        assert!(matches!(err, TermportError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: TermportError = toml_err.into();
        assert!(matches!(err, TermportError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_csv_error_conversion() {
        let data = "a,b\n1,2,3\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let csv_err = reader
            .records()
            .find_map(|r| r.err())
            .expect("uneven record should fail");
        let err: TermportError = csv_err.into();
        assert!(matches!(err, TermportError::Csv(_)));
    }

    #[test]
    fn test_termport_error_implements_std_error() {
        let err = TermportError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
