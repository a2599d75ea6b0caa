//! Domain models and types for termport.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`TermId`], [`VocabularyId`], [`LangCode`])
//! - **Taxonomy models** ([`Term`], [`Translation`], [`Vocabulary`], [`Language`])
//! - **Tree ordering** ([`build_tree`]) shared by every storage backend
//! - **Error types** ([`TermportError`], [`TaxonomyError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Vocabulary IDs are validated machine names, so they can be embedded in
//! export filenames without further escaping:
//!
//! ```rust
//! use termport::domain::{LangCode, VocabularyId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let vocabulary = VocabularyId::new("tags")?;
//! let language = LangCode::new("fr")?;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod result;
pub mod taxonomy;

// Re-export commonly used types for convenience
pub use errors::{TaxonomyError, TermportError};
pub use ids::{LangCode, TermId, VocabularyId};
pub use result::Result;
pub use taxonomy::{
    build_tree, HierarchyNode, Language, Term, TermBuilder, Translation, TreeItem, Vocabulary,
};
