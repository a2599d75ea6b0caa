//! JSON snapshot implementation of the taxonomy traits

use super::models::{StoredTerm, TaxonomySnapshot};
use crate::adapters::taxonomy::traits::{LanguageRegistry, TaxonomyStorage, TranslationWrite};
use crate::config::schema::JsonStoreConfig;
use crate::domain::ids::{LangCode, TermId, VocabularyId};
use crate::domain::taxonomy::{build_tree, Language, Term, Translation, TreeItem, Vocabulary};
use crate::domain::{Result, TaxonomyError, TermportError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Taxonomy store backed by an in-memory snapshot
///
/// When opened with `persist = true`, every saved translation is written
/// back to the snapshot file.
pub struct JsonTaxonomyStore {
    snapshot: RwLock<TaxonomySnapshot>,
    persist_path: Option<PathBuf>,
}

impl JsonTaxonomyStore {
    /// Open the snapshot file named in configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails snapshot validation.
    pub async fn open(config: &JsonStoreConfig) -> Result<Self> {
        let path = Path::new(&config.path);
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            TermportError::Io(format!(
                "Failed to read taxonomy snapshot {}: {}",
                path.display(),
                e
            ))
        })?;

        let snapshot = Self::parse(&contents)?;
        tracing::debug!(
            path = %path.display(),
            vocabularies = snapshot.vocabularies.len(),
            terms = snapshot.terms.len(),
            "Loaded taxonomy snapshot"
        );

        Ok(Self {
            snapshot: RwLock::new(snapshot),
            persist_path: config.persist.then(|| path.to_path_buf()),
        })
    }

    /// Build an in-memory store from snapshot JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or fails snapshot validation.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(Self::from_snapshot(Self::parse(contents)?))
    }

    /// Build an in-memory store that is never written to disk
    pub fn from_snapshot(snapshot: TaxonomySnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
            persist_path: None,
        }
    }

    /// Copy of the current snapshot
    pub async fn snapshot(&self) -> TaxonomySnapshot {
        self.snapshot.read().await.clone()
    }

    fn parse(contents: &str) -> Result<TaxonomySnapshot> {
        let snapshot: TaxonomySnapshot = serde_json::from_str(contents)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    async fn persist(&self, serialized: String) -> Result<()> {
        let Some(path) = &self.persist_path else {
            return Ok(());
        };

        tokio::fs::write(path, serialized).await.map_err(|e| {
            TermportError::Io(format!(
                "Failed to write taxonomy snapshot {}: {}",
                path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl TaxonomyStorage for JsonTaxonomyStore {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn list_vocabularies(&self) -> Result<Vec<Vocabulary>> {
        let mut vocabularies = self.snapshot.read().await.vocabularies.clone();
        vocabularies.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(vocabularies)
    }

    async fn load_tree(&self, vocabulary: &VocabularyId) -> Result<Vec<TreeItem>> {
        let snapshot = self.snapshot.read().await;

        if !snapshot.vocabularies.iter().any(|v| &v.id == vocabulary) {
            return Err(TaxonomyError::VocabularyNotFound(vocabulary.to_string()).into());
        }

        let nodes = snapshot
            .terms
            .iter()
            .filter(|term| &term.vocabulary == vocabulary)
            .map(|term| term.hierarchy_node())
            .collect();

        Ok(build_tree(nodes))
    }

    async fn load_term(&self, id: TermId) -> Result<Option<Term>> {
        let snapshot = self.snapshot.read().await;
        Ok(snapshot
            .terms
            .iter()
            .find(|term| term.id == id)
            .map(|term| term.to_term()))
    }

    async fn find_terms_by_name(
        &self,
        vocabulary: &VocabularyId,
        name: &str,
    ) -> Result<Vec<TermId>> {
        let snapshot = self.snapshot.read().await;
        let mut ids: Vec<TermId> = snapshot
            .terms
            .iter()
            .filter(|term| &term.vocabulary == vocabulary && term.name == name)
            .map(|term| term.id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn save_translation(
        &self,
        id: TermId,
        language: &LangCode,
        name: &str,
    ) -> Result<TranslationWrite> {
        let mut snapshot = self.snapshot.write().await;

        let term = term_mut(&mut snapshot, id)?;

        if &term.langcode == language {
            return Err(TermportError::Validation(format!(
                "Term {id} is written in {language}; its source name is not a translation"
            )));
        }

        let write = match term.translations.get(language) {
            Some(existing) if existing.name == name => return Ok(TranslationWrite::Unchanged),
            Some(_) => TranslationWrite::Updated,
            None => TranslationWrite::Created,
        };

        let previous = term.translations.insert(
            language.clone(),
            Translation {
                name: name.to_string(),
            },
        );

        // The write lock is held until the file matches memory again.
        let persisted = match serde_json::to_string_pretty(&*snapshot) {
            Ok(serialized) => self.persist(serialized).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = persisted {
            let term = term_mut(&mut snapshot, id)?;
            match previous {
                Some(translation) => {
                    term.translations.insert(language.clone(), translation);
                }
                None => {
                    term.translations.remove(language);
                }
            }
            return Err(e);
        }

        Ok(write)
    }
}

fn term_mut(snapshot: &mut TaxonomySnapshot, id: TermId) -> Result<&mut StoredTerm> {
    snapshot
        .terms
        .iter_mut()
        .find(|term| term.id == id)
        .ok_or_else(|| TaxonomyError::TermNotFound(id.value()).into())
}

#[async_trait]
impl LanguageRegistry for JsonTaxonomyStore {
    async fn list_languages(&self) -> Result<Vec<Language>> {
        let mut languages = self.snapshot.read().await.languages.clone();
        languages.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(languages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SNAPSHOT: &str = r#"{
        "languages": [{"id": "fr", "name": "French"}, {"id": "en", "name": "English"}],
        "vocabularies": [{"id": "tags", "label": "Tags"}, {"id": "colors", "label": "Colors"}],
        "terms": [
            {"id": 1, "vocabulary": "tags", "name": "Vegetables", "langcode": "en", "weight": 1},
            {"id": 2, "vocabulary": "tags", "name": "Fruit", "langcode": "en",
             "translations": {"fr": {"name": "Fruit (FR)"}}},
            {"id": 3, "vocabulary": "tags", "name": "Apple", "langcode": "en", "parents": [2]},
            {"id": 4, "vocabulary": "colors", "name": "Red", "langcode": "en"}
        ]
    }"#;

    fn lang(code: &str) -> LangCode {
        LangCode::new(code).unwrap()
    }

    #[tokio::test]
    async fn test_load_tree_in_hierarchical_order() {
        let store = JsonTaxonomyStore::from_json_str(SNAPSHOT).unwrap();
        let tree = store
            .load_tree(&VocabularyId::new("tags").unwrap())
            .await
            .unwrap();

        let ids: Vec<u32> = tree.iter().map(|item| item.id.value()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(tree[1].depth, 1);
    }

    #[tokio::test]
    async fn test_load_tree_unknown_vocabulary() {
        let store = JsonTaxonomyStore::from_json_str(SNAPSHOT).unwrap();
        let err = store
            .load_tree(&VocabularyId::new("missing").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TermportError::Taxonomy(TaxonomyError::VocabularyNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_load_term_missing_is_none() {
        let store = JsonTaxonomyStore::from_json_str(SNAPSHOT).unwrap();
        assert!(store.load_term(TermId::new(99)).await.unwrap().is_none());
        assert!(store.load_term(TermId::new(2)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_find_terms_by_name_is_scoped_to_vocabulary() {
        let store = JsonTaxonomyStore::from_json_str(SNAPSHOT).unwrap();
        let tags = VocabularyId::new("tags").unwrap();
        let colors = VocabularyId::new("colors").unwrap();

        assert_eq!(
            store.find_terms_by_name(&tags, "Fruit").await.unwrap(),
            vec![TermId::new(2)]
        );
        assert!(store
            .find_terms_by_name(&colors, "Fruit")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_save_translation_outcomes() {
        let store = JsonTaxonomyStore::from_json_str(SNAPSHOT).unwrap();
        let fr = lang("fr");

        assert_eq!(
            store
                .save_translation(TermId::new(2), &fr, "Fruit (FR)")
                .await
                .unwrap(),
            TranslationWrite::Unchanged
        );
        assert_eq!(
            store
                .save_translation(TermId::new(2), &fr, "Fruits")
                .await
                .unwrap(),
            TranslationWrite::Updated
        );
        assert_eq!(
            store
                .save_translation(TermId::new(3), &fr, "Pomme")
                .await
                .unwrap(),
            TranslationWrite::Created
        );

        let apple = store.load_term(TermId::new(3)).await.unwrap().unwrap();
        assert_eq!(apple.translated_name(&fr), Some("Pomme"));
    }

    #[tokio::test]
    async fn test_save_translation_rejects_source_language_and_missing_term() {
        let store = JsonTaxonomyStore::from_json_str(SNAPSHOT).unwrap();

        assert!(store
            .save_translation(TermId::new(2), &lang("en"), "Fruit")
            .await
            .is_err());
        assert!(matches!(
            store
                .save_translation(TermId::new(99), &lang("fr"), "x")
                .await
                .unwrap_err(),
            TermportError::Taxonomy(TaxonomyError::TermNotFound(99))
        ));
    }

    #[tokio::test]
    async fn test_persisted_translation_survives_reopen() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();
        file.flush().unwrap();

        let config = JsonStoreConfig {
            path: file.path().to_string_lossy().to_string(),
            persist: true,
        };

        let store = JsonTaxonomyStore::open(&config).await.unwrap();
        store
            .save_translation(TermId::new(3), &lang("fr"), "Pomme")
            .await
            .unwrap();

        let reopened = JsonTaxonomyStore::open(&config).await.unwrap();
        let apple = reopened.load_term(TermId::new(3)).await.unwrap().unwrap();
        assert_eq!(apple.translated_name(&lang("fr")), Some("Pomme"));
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_memory_unchanged() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("taxonomy.json");
        std::fs::write(&path, SNAPSHOT).unwrap();

        let config = JsonStoreConfig {
            path: path.to_string_lossy().to_string(),
            persist: true,
        };
        let store = JsonTaxonomyStore::open(&config).await.unwrap();

        // A directory in place of the file makes every write fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let fr = lang("fr");
        let err = store
            .save_translation(TermId::new(3), &fr, "Pomme")
            .await
            .unwrap_err();
        assert!(matches!(err, TermportError::Io(_)));

        let apple = store.load_term(TermId::new(3)).await.unwrap().unwrap();
        assert_eq!(apple.translated_name(&fr), None);
        assert!(store
            .save_translation(TermId::new(3), &fr, "Pomme")
            .await
            .is_err());

        assert!(store
            .save_translation(TermId::new(2), &fr, "Fruits")
            .await
            .is_err());
        let fruit = store.load_term(TermId::new(2)).await.unwrap().unwrap();
        assert_eq!(fruit.translated_name(&fr), Some("Fruit (FR)"));
    }

    #[tokio::test]
    async fn test_languages_sorted() {
        let store = JsonTaxonomyStore::from_json_str(SNAPSHOT).unwrap();
        let ids: Vec<String> = store
            .list_languages()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id.to_string())
            .collect();
        assert_eq!(ids, vec!["en", "fr"]);
    }
}
