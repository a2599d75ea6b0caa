//! On-disk snapshot format for the JSON taxonomy store

use crate::domain::ids::{LangCode, TermId, VocabularyId};
use crate::domain::taxonomy::{HierarchyNode, Language, Term, Translation, Vocabulary};
use crate::domain::{Result, TaxonomyError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Whole taxonomy as stored in the snapshot file
///
/// ```json
/// {
///   "languages": [{"id": "en", "name": "English"}, {"id": "fr", "name": "French"}],
///   "vocabularies": [{"id": "tags", "label": "Tags"}],
///   "terms": [
///     {"id": 1, "vocabulary": "tags", "name": "Fruit", "langcode": "en",
///      "parents": [], "weight": 0, "translations": {"fr": {"name": "Fruit (FR)"}}}
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomySnapshot {
    #[serde(default)]
    pub languages: Vec<Language>,

    #[serde(default)]
    pub vocabularies: Vec<Vocabulary>,

    #[serde(default)]
    pub terms: Vec<StoredTerm>,
}

/// A term record with its hierarchy data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTerm {
    pub id: TermId,
    pub vocabulary: VocabularyId,
    pub name: String,
    pub langcode: LangCode,

    #[serde(default)]
    pub parents: Vec<TermId>,

    #[serde(default)]
    pub weight: i32,

    #[serde(default)]
    pub translations: BTreeMap<LangCode, Translation>,
}

impl StoredTerm {
    pub fn to_term(&self) -> Term {
        let mut translations = self.translations.clone();
        translations.remove(&self.langcode);

        Term {
            id: self.id,
            vocabulary: self.vocabulary.clone(),
            name: self.name.clone(),
            langcode: self.langcode.clone(),
            translations,
        }
    }

    pub fn hierarchy_node(&self) -> HierarchyNode {
        HierarchyNode {
            id: self.id,
            name: self.name.clone(),
            weight: self.weight,
            parents: self.parents.clone(),
        }
    }
}

impl TaxonomySnapshot {
    /// Checks referential integrity of the snapshot
    ///
    /// # Errors
    ///
    /// Returns `TaxonomyError::InvalidData` for duplicate term IDs or terms
    /// that reference an undeclared vocabulary.
    pub fn validate(&self) -> Result<()> {
        let vocabularies: HashSet<&VocabularyId> =
            self.vocabularies.iter().map(|v| &v.id).collect();
        let mut seen = HashSet::new();

        for term in &self.terms {
            if !seen.insert(term.id) {
                return Err(TaxonomyError::InvalidData(format!(
                    "Duplicate term ID {} in snapshot",
                    term.id
                ))
                .into());
            }
            if !vocabularies.contains(&term.vocabulary) {
                return Err(TaxonomyError::InvalidData(format!(
                    "Term {} references unknown vocabulary '{}'",
                    term.id, term.vocabulary
                ))
                .into());
            }
        }

        Ok(())
    }
}
