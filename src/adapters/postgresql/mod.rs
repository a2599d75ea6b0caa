//! PostgreSQL taxonomy backend
//!
//! Reads vocabularies, languages and terms straight from a CMS database
//! (`config`, `taxonomy_term_field_data`, `taxonomy_term__parent`).

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgresTaxonomyStore;
pub use client::PostgreSQLClient;
