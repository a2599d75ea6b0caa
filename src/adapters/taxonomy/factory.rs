//! Taxonomy storage factory
//!
//! Builds the configured backend once and hands it out as both the term
//! store and the language registry, so they share one pool or snapshot.

use crate::adapters::json::JsonTaxonomyStore;
use crate::adapters::postgresql::{PostgreSQLClient, PostgresTaxonomyStore};
use crate::adapters::taxonomy::traits::{LanguageRegistry, TaxonomyStorage};
use crate::config::schema::{StorageBackend, TermportConfig};
use crate::domain::{Result, TermportError};
use std::sync::Arc;

/// Storage handles produced by [`create_storage_and_languages`]
pub type StorageHandles = (Arc<dyn TaxonomyStorage>, Arc<dyn LanguageRegistry>);

/// Create the taxonomy store and language registry for the configured backend
///
/// # Errors
///
/// Returns a configuration error if the backend section is missing, or the
/// backend's own error if it cannot be opened.
pub async fn create_storage_and_languages(config: &TermportConfig) -> Result<StorageHandles> {
    match config.storage_backend {
        StorageBackend::Json => {
            let json_config = config.json_store.as_ref().ok_or_else(|| {
                TermportError::Configuration(
                    "json_store configuration is required when storage_backend = 'json'"
                        .to_string(),
                )
            })?;

            tracing::info!(path = %json_config.path, "Opening JSON taxonomy store");
            let store = Arc::new(JsonTaxonomyStore::open(json_config).await?);

            Ok((
                store.clone() as Arc<dyn TaxonomyStorage>,
                store as Arc<dyn LanguageRegistry>,
            ))
        }
        StorageBackend::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                TermportError::Configuration(
                    "postgresql configuration is required when storage_backend = 'postgresql'"
                        .to_string(),
                )
            })?;

            let client = PostgreSQLClient::new(pg_config.clone()).await?;
            tracing::info!(
                connection = %client.connection_string_safe(),
                "Creating PostgreSQL taxonomy store"
            );
            let store = Arc::new(PostgresTaxonomyStore::new(client));

            Ok((
                store.clone() as Arc<dyn TaxonomyStorage>,
                store as Arc<dyn LanguageRegistry>,
            ))
        }
    }
}
