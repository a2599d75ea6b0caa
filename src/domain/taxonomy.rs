//! Taxonomy domain models
//!
//! Vocabularies, terms, translations and the hierarchical tree ordering
//! shared by every storage backend.

use super::ids::{LangCode, TermId, VocabularyId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A named collection of taxonomy terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Machine name, also the bundle of its terms
    pub id: VocabularyId,

    /// Human-readable label
    pub label: String,
}

/// A language configured on the site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Language code
    pub id: LangCode,

    /// Human-readable name
    pub name: String,
}

/// Language-specific override of a term's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    /// Translated term name
    pub name: String,
}

/// A single taxonomy term with its translations
///
/// # Examples
///
/// ```
/// use termport::domain::{LangCode, Term, TermId, VocabularyId};
///
/// let term = Term::builder()
///     .id(TermId::new(1))
///     .vocabulary(VocabularyId::new("tags").unwrap())
///     .name("Fruit")
///     .langcode(LangCode::new("en").unwrap())
///     .translation(LangCode::new("fr").unwrap(), "Fruit (FR)")
///     .build()
///     .unwrap();
///
/// assert!(term.has_translation(&LangCode::new("fr").unwrap()));
/// assert!(!term.has_translation(&LangCode::new("de").unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Term identifier
    pub id: TermId,

    /// Vocabulary (bundle) the term belongs to
    pub vocabulary: VocabularyId,

    /// Base (source language) name
    pub name: String,

    /// Source language of the base name
    pub langcode: LangCode,

    /// Translations keyed by language code, excluding the source language
    #[serde(default)]
    pub translations: BTreeMap<LangCode, Translation>,
}

impl Term {
    /// Returns a builder for constructing a Term
    pub fn builder() -> TermBuilder {
        TermBuilder::default()
    }

    /// Returns the bundle of this term
    pub fn bundle(&self) -> &VocabularyId {
        &self.vocabulary
    }

    /// Whether the term has a translation in `language`
    ///
    /// The source language always counts as a translation of itself.
    pub fn has_translation(&self, language: &LangCode) -> bool {
        *language == self.langcode || self.translations.contains_key(language)
    }

    /// Returns the term name in `language`, if the term is translated into it
    pub fn translated_name(&self, language: &LangCode) -> Option<&str> {
        if *language == self.langcode {
            return Some(&self.name);
        }
        self.translations.get(language).map(|t| t.name.as_str())
    }
}

/// Builder for [`Term`]
#[derive(Debug, Default)]
pub struct TermBuilder {
    id: Option<TermId>,
    vocabulary: Option<VocabularyId>,
    name: Option<String>,
    langcode: Option<LangCode>,
    translations: BTreeMap<LangCode, Translation>,
}

impl TermBuilder {
    /// Sets the term ID
    pub fn id(mut self, id: TermId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the vocabulary
    pub fn vocabulary(mut self, vocabulary: VocabularyId) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    /// Sets the base name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the source language
    pub fn langcode(mut self, langcode: LangCode) -> Self {
        self.langcode = Some(langcode);
        self
    }

    /// Adds a translation
    pub fn translation(mut self, language: LangCode, name: impl Into<String>) -> Self {
        self.translations.insert(language, Translation { name: name.into() });
        self
    }

    /// Builds the Term
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing.
    pub fn build(self) -> Result<Term, String> {
        let id = self.id.ok_or("Term ID is required")?;
        let vocabulary = self.vocabulary.ok_or("Term vocabulary is required")?;
        let name = self.name.ok_or("Term name is required")?;
        let langcode = self.langcode.ok_or("Term langcode is required")?;

        let mut translations = self.translations;
        translations.remove(&langcode);

        Ok(Term {
            id,
            vocabulary,
            name,
            langcode,
            translations,
        })
    }
}

/// Flat hierarchy record as stored by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    /// Term ID
    pub id: TermId,

    /// Base name, used as a secondary sort key
    pub name: String,

    /// Sort weight among siblings
    pub weight: i32,

    /// Parent term IDs (empty for root terms)
    pub parents: Vec<TermId>,
}

/// One entry of a vocabulary tree in hierarchical order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeItem {
    /// Term ID
    pub id: TermId,

    /// Base name
    pub name: String,

    /// Depth in the tree (0 for root terms)
    pub depth: usize,

    /// Parent under which this entry was reached (`None` for roots)
    pub parent: Option<TermId>,
}

/// Orders a flat hierarchy into a depth-first tree listing
///
/// Siblings are sorted by weight, then name, then ID. A term with several
/// parents is listed once under each of them. A parent that does not belong
/// to the node set is treated as the root, and cycles are broken at the first
/// revisited term. Terms that no root leads to (a parent cycle with no way
/// in) are listed at the top level after the rooted tree, with a warning.
pub fn build_tree(nodes: Vec<HierarchyNode>) -> Vec<TreeItem> {
    let known: HashSet<TermId> = nodes.iter().map(|n| n.id).collect();
    let mut children: HashMap<Option<TermId>, Vec<&HierarchyNode>> = HashMap::new();

    for node in &nodes {
        let parents: Vec<Option<TermId>> = {
            let mut attached: Vec<Option<TermId>> = node
                .parents
                .iter()
                .filter(|p| known.contains(*p) && **p != node.id)
                .map(|p| Some(*p))
                .collect();
            if attached.is_empty() {
                attached.push(None);
            }
            attached.sort();
            attached.dedup();
            attached
        };

        for parent in parents {
            children.entry(parent).or_default().push(node);
        }
    }

    for siblings in children.values_mut() {
        siblings.sort_by(|a, b| sibling_order(a, b));
    }

    let mut tree = Vec::with_capacity(nodes.len());
    let mut path = Vec::new();
    walk(&children, None, 0, &mut path, &mut tree);

    let mut reached: HashSet<TermId> = tree.iter().map(|item| item.id).collect();
    let mut detached: Vec<&HierarchyNode> =
        nodes.iter().filter(|n| !reached.contains(&n.id)).collect();
    detached.sort_by(|a, b| sibling_order(a, b));

    for node in detached {
        if reached.contains(&node.id) {
            continue;
        }
        tracing::warn!(
            term_id = %node.id,
            name = %node.name,
            "Term is not reachable from a root term, listing it at the top level"
        );

        let start = tree.len();
        tree.push(TreeItem {
            id: node.id,
            name: node.name.clone(),
            depth: 0,
            parent: None,
        });
        path.push(node.id);
        walk(&children, Some(node.id), 1, &mut path, &mut tree);
        path.pop();
        reached.extend(tree[start..].iter().map(|item| item.id));
    }

    tree
}

fn sibling_order(a: &HierarchyNode, b: &HierarchyNode) -> Ordering {
    a.weight
        .cmp(&b.weight)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

fn walk(
    children: &HashMap<Option<TermId>, Vec<&HierarchyNode>>,
    parent: Option<TermId>,
    depth: usize,
    path: &mut Vec<TermId>,
    tree: &mut Vec<TreeItem>,
) {
    let Some(siblings) = children.get(&parent) else {
        return;
    };

    for node in siblings {
        if path.contains(&node.id) {
            continue;
        }

        tree.push(TreeItem {
            id: node.id,
            name: node.name.clone(),
            depth,
            parent,
        });

        path.push(node.id);
        walk(children, Some(node.id), depth + 1, path, tree);
        path.pop();
    }
}
