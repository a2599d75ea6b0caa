//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for taxonomy identifiers.
//! Each type ensures type safety and provides validation for format compliance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Taxonomy term identifier newtype wrapper
///
/// # Examples
///
/// ```
/// use termport::domain::ids::TermId;
/// use std::str::FromStr;
///
/// let term_id = TermId::from_str("42").unwrap();
/// assert_eq!(term_id.value(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(u32);

impl TermId {
    /// Creates a new TermId
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw identifier
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for TermId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl TryFrom<i32> for TermId {
    type Error = String;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        u32::try_from(id)
            .map(Self)
            .map_err(|_| format!("Term ID cannot be negative, got {id}"))
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TermId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|e| format!("Invalid term ID '{s}': {e}"))
    }
}

/// Vocabulary identifier newtype wrapper
///
/// Vocabulary identifiers are machine names (lowercase ASCII letters, digits
/// and underscores). They double as the bundle of every term in the
/// vocabulary and end up in export filenames.
///
/// # Examples
///
/// ```
/// use termport::domain::ids::VocabularyId;
///
/// let vocabulary = VocabularyId::new("product_categories").unwrap();
/// assert_eq!(vocabulary.as_str(), "product_categories");
/// assert!(VocabularyId::new("../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VocabularyId(String);

impl VocabularyId {
    /// Creates a new VocabularyId from a machine name
    ///
    /// # Returns
    ///
    /// Returns `Ok(VocabularyId)` if the ID is a valid machine name, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Vocabulary ID cannot be empty".to_string());
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(format!(
                "Invalid vocabulary ID '{id}'. Only lowercase letters, digits and underscores are allowed"
            ));
        }

        Ok(Self(id))
    }

    /// Returns the vocabulary ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for VocabularyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VocabularyId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for VocabularyId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VocabularyId> for String {
    fn from(id: VocabularyId) -> Self {
        id.0
    }
}

impl AsRef<str> for VocabularyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Language code newtype wrapper (e.g. `fr`, `pt-br`, `zh-hans`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LangCode(String);

impl LangCode {
    /// Creates a new LangCode, normalizing to lowercase
    pub fn new(code: impl Into<String>) -> Result<Self, String> {
        let code = code.into().trim().to_lowercase();
        if code.is_empty() {
            return Err("Language code cannot be empty".to_string());
        }

        let valid = code.split('-').all(|part| {
            !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric())
        });
        if !valid {
            return Err(format!("Invalid language code '{code}'"));
        }

        Ok(Self(code))
    }

    /// Returns the language code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LangCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LangCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LangCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LangCode> for String {
    fn from(code: LangCode) -> Self {
        code.0
    }
}

impl AsRef<str> for LangCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
