//! Taxonomy storage abstraction layer
//!
//! Trait-based access to vocabularies, terms and languages, with a factory
//! that builds the backend selected in configuration.

pub mod factory;
pub mod traits;

pub use factory::create_storage_and_languages;
pub use traits::{LanguageRegistry, TaxonomyStorage, TranslationWrite};
