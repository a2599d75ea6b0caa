//! Term selection for an export run

use crate::adapters::taxonomy::TaxonomyStorage;
use crate::domain::ids::{TermId, VocabularyId};
use crate::domain::Result;
use std::sync::Arc;

/// Lists the terms of a vocabulary in the order they are exported
pub struct TermSelector {
    storage: Arc<dyn TaxonomyStorage>,
}

impl TermSelector {
    pub fn new(storage: Arc<dyn TaxonomyStorage>) -> Self {
        Self { storage }
    }

    /// Term IDs of the vocabulary's tree, depth first
    ///
    /// The order is whatever the store's tree returns. A term with several
    /// parents appears once per parent.
    ///
    /// # Errors
    ///
    /// Propagates the store's error unchanged, including
    /// `TaxonomyError::VocabularyNotFound`.
    pub async fn select(&self, vocabulary: &VocabularyId) -> Result<Vec<TermId>> {
        let tree = self.storage.load_tree(vocabulary).await?;
        tracing::debug!(vocabulary = %vocabulary, terms = tree.len(), "Selected terms");
        Ok(tree.into_iter().map(|item| item.id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::json::JsonTaxonomyStore;
    use crate::domain::{TaxonomyError, TermportError};

    fn storage() -> Arc<dyn TaxonomyStorage> {
        Arc::new(
            JsonTaxonomyStore::from_json_str(
                r#"{
                    "vocabularies": [{"id": "tags", "label": "Tags"}, {"id": "empty", "label": "Empty"}],
                    "terms": [
                        {"id": 10, "vocabulary": "tags", "name": "Beta", "langcode": "en"},
                        {"id": 11, "vocabulary": "tags", "name": "Alpha", "langcode": "en"},
                        {"id": 12, "vocabulary": "tags", "name": "Child", "langcode": "en", "parents": [10]}
                    ]
                }"#,
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_select_returns_tree_order() {
        let selector = TermSelector::new(storage());
        let ids = selector
            .select(&VocabularyId::new("tags").unwrap())
            .await
            .unwrap();

        assert_eq!(ids, vec![TermId::new(11), TermId::new(10), TermId::new(12)]);
    }

    #[tokio::test]
    async fn test_select_empty_vocabulary() {
        let selector = TermSelector::new(storage());
        let ids = selector
            .select(&VocabularyId::new("empty").unwrap())
            .await
            .unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_select_unknown_vocabulary_propagates() {
        let selector = TermSelector::new(storage());
        let err = selector
            .select(&VocabularyId::new("nope").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TermportError::Taxonomy(TaxonomyError::VocabularyNotFound(ref v)) if v == "nope"
        ));
    }
}
