//! PostgreSQL adapter implementing the taxonomy traits
//!
//! Reads and writes the CMS's own tables. Translations are written to
//! `taxonomy_term_field_data` only; revision tables and caches are left to
//! the CMS, so clear its caches after an import.

use super::client::PostgreSQLClient;
use super::models::{
    config_suffix, hierarchy_from_rows, php_string_property, term_from_rows, tid_param,
    LANGUAGE_CONFIG_PREFIX, LOCKED_LANGUAGES, VOCABULARY_CONFIG_PREFIX,
};
use crate::adapters::taxonomy::traits::{LanguageRegistry, TaxonomyStorage, TranslationWrite};
use crate::domain::ids::{LangCode, TermId, VocabularyId};
use crate::domain::taxonomy::{build_tree, Language, Term, TreeItem, Vocabulary};
use crate::domain::{Result, TaxonomyError, TermportError};
use async_trait::async_trait;
use std::sync::Arc;

const TERM_ROWS_QUERY: &str = r#"
    SELECT tid, vid, langcode, name, default_langcode
    FROM taxonomy_term_field_data
    WHERE tid = $1
"#;

const TREE_QUERY: &str = r#"
    SELECT d.tid, d.name, d.weight, p.parent_target_id
    FROM taxonomy_term_field_data d
    LEFT JOIN taxonomy_term__parent p ON p.entity_id = d.tid
    WHERE d.vid = $1 AND d.default_langcode = 1
    ORDER BY d.tid, p.delta
"#;

// Copies the default-language row so every other column keeps its value.
const INSERT_TRANSLATION: &str = r#"
    INSERT INTO taxonomy_term_field_data
    SELECT (jsonb_populate_record(
        t,
        jsonb_build_object('langcode', $2::text, 'name', $3::text, 'default_langcode', 0)
    )).*
    FROM taxonomy_term_field_data t
    WHERE t.tid = $1 AND t.default_langcode = 1
"#;

const UPDATE_TRANSLATION: &str = r#"
    UPDATE taxonomy_term_field_data
    SET name = $3
    WHERE tid = $1 AND langcode = $2 AND default_langcode = 0
"#;

/// Taxonomy store over a CMS PostgreSQL database
pub struct PostgresTaxonomyStore {
    client: Arc<PostgreSQLClient>,
}

impl PostgresTaxonomyStore {
    /// Create a new store
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    async fn config_entries(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let rows = self
            .client
            .query(
                "SELECT name, data FROM config WHERE collection = '' AND name LIKE $1 ORDER BY name",
                &[&format!("{prefix}%")],
            )
            .await?;

        rows.iter()
            .map(|row| -> Result<(String, Vec<u8>)> {
                let name: String = row
                    .try_get("name")
                    .map_err(|e| TermportError::Database(e.to_string()))?;
                let data: Vec<u8> = row
                    .try_get("data")
                    .map_err(|e| TermportError::Database(e.to_string()))?;
                Ok((name, data))
            })
            .collect()
    }

    async fn vocabulary_exists(&self, vocabulary: &VocabularyId) -> Result<bool> {
        let rows = self
            .client
            .query(
                "SELECT 1 FROM config WHERE collection = '' AND name = $1",
                &[&format!("{VOCABULARY_CONFIG_PREFIX}{vocabulary}")],
            )
            .await?;
        Ok(!rows.is_empty())
    }
}

#[async_trait]
impl TaxonomyStorage for PostgresTaxonomyStore {
    fn backend_name(&self) -> &'static str {
        "postgresql"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn list_vocabularies(&self) -> Result<Vec<Vocabulary>> {
        let mut vocabularies = Vec::new();

        for (name, data) in self.config_entries(VOCABULARY_CONFIG_PREFIX).await? {
            let Some(machine_name) = config_suffix(&name, VOCABULARY_CONFIG_PREFIX) else {
                continue;
            };
            let id = match VocabularyId::new(machine_name) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(config = %name, error = %e, "Skipping vocabulary");
                    continue;
                }
            };
            let label = php_string_property(&data, "name").unwrap_or_else(|| id.to_string());
            vocabularies.push(Vocabulary { id, label });
        }

        Ok(vocabularies)
    }

    async fn load_tree(&self, vocabulary: &VocabularyId) -> Result<Vec<TreeItem>> {
        if !self.vocabulary_exists(vocabulary).await? {
            return Err(TaxonomyError::VocabularyNotFound(vocabulary.to_string()).into());
        }

        let rows = self.client.query(TREE_QUERY, &[&vocabulary.as_str()]).await?;
        let nodes = hierarchy_from_rows(&rows)?;

        tracing::debug!(vocabulary = %vocabulary, terms = nodes.len(), "Loaded vocabulary tree");
        Ok(build_tree(nodes))
    }

    async fn load_term(&self, id: TermId) -> Result<Option<Term>> {
        let rows = self
            .client
            .query(TERM_ROWS_QUERY, &[&tid_param(id)?])
            .await?;
        term_from_rows(&rows)
    }

    async fn find_terms_by_name(
        &self,
        vocabulary: &VocabularyId,
        name: &str,
    ) -> Result<Vec<TermId>> {
        let rows = self
            .client
            .query(
                "SELECT tid FROM taxonomy_term_field_data \
                 WHERE vid = $1 AND default_langcode = 1 AND name = $2 ORDER BY tid",
                &[&vocabulary.as_str(), &name],
            )
            .await?;

        rows.iter()
            .map(|row| -> Result<TermId> {
                let tid: i32 = row
                    .try_get("tid")
                    .map_err(|e| TermportError::Database(e.to_string()))?;
                TermId::try_from(tid).map_err(|e| TaxonomyError::InvalidData(e).into())
            })
            .collect()
    }

    async fn save_translation(
        &self,
        id: TermId,
        language: &LangCode,
        name: &str,
    ) -> Result<TranslationWrite> {
        let tid = tid_param(id)?;
        let mut conn = self.client.get_connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| TermportError::Database(format!("Failed to begin transaction: {e}")))?;

        let rows = tx
            .query(TERM_ROWS_QUERY, &[&tid])
            .await
            .map_err(|e| TermportError::Database(format!("Query failed: {e}")))?;
        let term = term_from_rows(&rows)?.ok_or(TaxonomyError::TermNotFound(id.value()))?;

        if &term.langcode == language {
            return Err(TermportError::Validation(format!(
                "Term {id} is written in {language}; its source name is not a translation"
            )));
        }

        let write = match term.translations.get(language) {
            Some(existing) if existing.name == name => return Ok(TranslationWrite::Unchanged),
            Some(_) => {
                tx.execute(UPDATE_TRANSLATION, &[&tid, &language.as_str(), &name])
                    .await
                    .map_err(|e| TermportError::Database(format!("Update failed: {e}")))?;
                TranslationWrite::Updated
            }
            None => {
                tx.execute(INSERT_TRANSLATION, &[&tid, &language.as_str(), &name])
                    .await
                    .map_err(|e| TermportError::Database(format!("Insert failed: {e}")))?;
                TranslationWrite::Created
            }
        };

        tx.commit()
            .await
            .map_err(|e| TermportError::Database(format!("Commit failed: {e}")))?;

        tracing::debug!(term_id = %id, language = %language, write = ?write, "Saved translation");
        Ok(write)
    }
}

#[async_trait]
impl LanguageRegistry for PostgresTaxonomyStore {
    async fn list_languages(&self) -> Result<Vec<Language>> {
        let mut languages = Vec::new();

        for (name, data) in self.config_entries(LANGUAGE_CONFIG_PREFIX).await? {
            let Some(code) = config_suffix(&name, LANGUAGE_CONFIG_PREFIX) else {
                continue;
            };
            if LOCKED_LANGUAGES.contains(&code) {
                continue;
            }
            let id = match LangCode::new(code) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(config = %name, error = %e, "Skipping language");
                    continue;
                }
            };
            let name = php_string_property(&data, "label").unwrap_or_else(|| id.to_string());
            languages.push(Language { id, name });
        }

        Ok(languages)
    }
}
