//! Core business logic for termport.
//!
//! - [`batch`] - sequential batch runner with progress and shutdown
//! - [`export`] - taxonomy translations to CSV
//! - [`import`] - CSV back into taxonomy translations
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use termport::adapters::files::LocalPublicFileSystem;
//! use termport::adapters::json::JsonTaxonomyStore;
//! use termport::adapters::messenger::ConsoleMessenger;
//! use termport::config::ExportConfig;
//! use termport::core::export::ExportCoordinator;
//! use termport::domain::{LangCode, VocabularyId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(JsonTaxonomyStore::from_json_str(
//!     &std::fs::read_to_string("taxonomy.json")?,
//! )?);
//! let coordinator = ExportCoordinator::new(
//!     store.clone(),
//!     store,
//!     Arc::new(LocalPublicFileSystem::new("./files")),
//!     Arc::new(ConsoleMessenger),
//!     ExportConfig::default(),
//! );
//!
//! let run = coordinator
//!     .run(&VocabularyId::new("tags")?, &LangCode::new("fr")?, None)
//!     .await?;
//! println!("Processed {} of {} terms", run.processed, run.total);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod export;
pub mod import;
