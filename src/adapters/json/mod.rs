//! JSON snapshot taxonomy backend
//!
//! Useful for offline exports, fixtures and tests. The snapshot holds the
//! same data the CMS tables do: languages, vocabularies, and terms with
//! their parents, weights and translations.

pub mod models;
pub mod store;

pub use models::{StoredTerm, TaxonomySnapshot};
pub use store::JsonTaxonomyStore;
