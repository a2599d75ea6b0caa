//! Row mapping for the CMS taxonomy tables
//!
//! Vocabulary and language definitions live in the `config` table as
//! PHP-serialized blobs; only their label is read from them.

use crate::domain::ids::{LangCode, TermId, VocabularyId};
use crate::domain::taxonomy::{HierarchyNode, Term, Translation};
use crate::domain::{Result, TaxonomyError, TermportError};
use regex::bytes::Regex;
use std::collections::BTreeMap;
use tokio_postgres::Row;

/// Config name prefix of vocabulary definitions
pub const VOCABULARY_CONFIG_PREFIX: &str = "taxonomy.vocabulary.";

/// Config name prefix of language definitions
pub const LANGUAGE_CONFIG_PREFIX: &str = "language.entity.";

/// Locked language codes that are never offered ("not specified", "not applicable")
pub const LOCKED_LANGUAGES: [&str; 2] = ["und", "zxx"];

/// Reads a string property out of a PHP-serialized array
///
/// Finds `s:<n>:"<key>";s:<len>:"` and returns the `len` bytes that follow,
/// which keeps values containing quotes or semicolons intact.
pub fn php_string_property(data: &[u8], key: &str) -> Option<String> {
    let pattern = format!(r#"s:\d+:"{}";s:(\d+):""#, regex::escape(key));
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(data)?;

    let len: usize = std::str::from_utf8(caps.get(1)?.as_bytes())
        .ok()?
        .parse()
        .ok()?;
    let start = caps.get(0)?.end();
    let value = data.get(start..start + len)?;

    String::from_utf8(value.to_vec()).ok()
}

/// Strips a config prefix, returning the machine name
pub fn config_suffix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix).filter(|rest| !rest.is_empty())
}

/// Converts a term ID to the `int4` column type
pub fn tid_param(id: TermId) -> Result<i32> {
    i32::try_from(id.value())
        .map_err(|_| TaxonomyError::InvalidData(format!("Term ID {id} exceeds int4 range")).into())
}

fn tid_column(row: &Row, column: &str) -> Result<TermId> {
    let raw: i32 = row.try_get(column).map_err(db_err)?;
    TermId::try_from(raw).map_err(|e| TaxonomyError::InvalidData(e).into())
}

fn db_err(e: tokio_postgres::Error) -> TermportError {
    TermportError::Database(format!("Failed to read column: {e}"))
}

/// Builds a [`Term`] from its `taxonomy_term_field_data` rows
///
/// Expects the columns `tid, vid, langcode, name, default_langcode`. The
/// row with `default_langcode = 1` carries the base name; the rest are
/// translations. Returns `Ok(None)` for an empty row set.
pub fn term_from_rows(rows: &[Row]) -> Result<Option<Term>> {
    let mut base = None;
    let mut translations = BTreeMap::new();

    for row in rows {
        let id = tid_column(row, "tid")?;
        let vid: String = row.try_get("vid").map_err(db_err)?;
        let langcode: String = row.try_get("langcode").map_err(db_err)?;
        let name: String = row.try_get("name").map_err(db_err)?;
        let default_langcode: i16 = row.try_get("default_langcode").map_err(db_err)?;

        let langcode = LangCode::new(langcode).map_err(TaxonomyError::InvalidData)?;
        if default_langcode == 1 {
            let vocabulary = VocabularyId::new(vid).map_err(TaxonomyError::InvalidData)?;
            base = Some((id, vocabulary, name, langcode));
        } else {
            translations.insert(langcode, Translation { name });
        }
    }

    let Some((id, vocabulary, name, langcode)) = base else {
        if let Some(row) = rows.first() {
            let id = tid_column(row, "tid")?;
            return Err(TaxonomyError::InvalidData(format!(
                "Term {id} has no default language row"
            ))
            .into());
        }
        return Ok(None);
    };

    translations.remove(&langcode);
    Ok(Some(Term {
        id,
        vocabulary,
        name,
        langcode,
        translations,
    }))
}

/// Groups `tid, name, weight, parent_target_id` rows into hierarchy nodes
///
/// A parent of `0` (or NULL from the outer join) marks a root term.
pub fn hierarchy_from_rows(rows: &[Row]) -> Result<Vec<HierarchyNode>> {
    let mut nodes: Vec<HierarchyNode> = Vec::new();

    for row in rows {
        let id = tid_column(row, "tid")?;
        let parent: Option<i32> = row.try_get("parent_target_id").map_err(db_err)?;
        let parent = match parent {
            Some(p) if p > 0 => Some(TermId::try_from(p).map_err(TaxonomyError::InvalidData)?),
            _ => None,
        };

        match nodes.last_mut() {
            Some(node) if node.id == id => {
                if let Some(parent) = parent {
                    node.parents.push(parent);
                }
            }
            _ => {
                let name: String = row.try_get("name").map_err(db_err)?;
                let weight: i32 = row.try_get("weight").map_err(db_err)?;
                nodes.push(HierarchyNode {
                    id,
                    name,
                    weight,
                    parents: parent.into_iter().collect(),
                });
            }
        }
    }

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOCABULARY_DATA: &[u8] = br#"a:8:{s:4:"uuid";s:36:"0d3b4a9e-8f0c-4f53-9f7a-2d1a6f6c1e11";s:8:"langcode";s:2:"en";s:6:"status";b:1;s:12:"dependencies";a:0:{}s:4:"name";s:4:"Tags";s:3:"vid";s:4:"tags";s:11:"description";s:25:"Use tags to group things.";s:6:"weight";i:0;}"#;

    #[test]
    fn test_php_string_property() {
        assert_eq!(
            php_string_property(VOCABULARY_DATA, "name"),
            Some("Tags".to_string())
        );
        assert_eq!(
            php_string_property(VOCABULARY_DATA, "vid"),
            Some("tags".to_string())
        );
        assert_eq!(php_string_property(VOCABULARY_DATA, "label"), None);
    }

    #[test]
    fn test_php_string_property_with_quotes_and_multibyte() {
        let data = "a:1:{s:5:\"label\";s:9:\"Fran\u{e7}ais\";}".as_bytes();
        assert_eq!(
            php_string_property(data, "label"),
            Some("Fran\u{e7}ais".to_string())
        );

        let quoted = br#"a:1:{s:4:"name";s:9:"a";"b";cd";}"#;
        assert_eq!(
            php_string_property(quoted, "name"),
            Some(r#"a";"b";cd"#.to_string())
        );
    }

    #[test]
    fn test_config_suffix() {
        assert_eq!(
            config_suffix("taxonomy.vocabulary.tags", VOCABULARY_CONFIG_PREFIX),
            Some("tags")
        );
        assert_eq!(config_suffix("language.entity.", LANGUAGE_CONFIG_PREFIX), None);
    }

    #[test]
    fn test_tid_param_range() {
        assert_eq!(tid_param(TermId::new(7)).unwrap(), 7);
        assert!(tid_param(TermId::new(u32::MAX)).is_err());
    }
}
