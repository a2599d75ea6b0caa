//! Taxonomy storage abstraction traits
//!
//! Backends implement these traits so the export and import jobs never see
//! whether terms come from a JSON snapshot or a live CMS database.

use crate::domain::ids::{LangCode, TermId, VocabularyId};
use crate::domain::taxonomy::{Language, Term, TreeItem, Vocabulary};
use crate::domain::Result;
use async_trait::async_trait;

/// Outcome of writing a single translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationWrite {
    /// A new translation was added
    Created,
    /// An existing translation got a new name
    Updated,
    /// The stored translation already had this name
    Unchanged,
}

/// Taxonomy storage trait for term lookups and translation writes
#[async_trait]
pub trait TaxonomyStorage: Send + Sync {
    /// Short backend name for logs (`json`, `postgresql`)
    fn backend_name(&self) -> &'static str;

    /// Test that the backend is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    async fn test_connection(&self) -> Result<()>;

    /// List all vocabularies, sorted by ID
    async fn list_vocabularies(&self) -> Result<Vec<Vocabulary>>;

    /// Load the vocabulary tree in hierarchical order
    ///
    /// # Errors
    ///
    /// Returns `TaxonomyError::VocabularyNotFound` if the vocabulary does not
    /// exist.
    async fn load_tree(&self, vocabulary: &VocabularyId) -> Result<Vec<TreeItem>>;

    /// Load a single term with its translations
    ///
    /// Returns `Ok(None)` when no term has this ID.
    async fn load_term(&self, id: TermId) -> Result<Option<Term>>;

    /// Find the terms of a vocabulary whose base name equals `name`
    async fn find_terms_by_name(&self, vocabulary: &VocabularyId, name: &str)
        -> Result<Vec<TermId>>;

    /// Create or replace the translation of a term
    ///
    /// # Errors
    ///
    /// Returns `TaxonomyError::TermNotFound` if the term does not exist, or a
    /// storage error if the write fails.
    async fn save_translation(
        &self,
        id: TermId,
        language: &LangCode,
        name: &str,
    ) -> Result<TranslationWrite>;
}

/// Source of the languages configured on the site
#[async_trait]
pub trait LanguageRegistry: Send + Sync {
    /// List configured languages, sorted by ID
    async fn list_languages(&self) -> Result<Vec<Language>>;

    /// Look up one language
    async fn find_language(&self, id: &LangCode) -> Result<Option<Language>> {
        Ok(self
            .list_languages()
            .await?
            .into_iter()
            .find(|language| &language.id == id))
    }
}
