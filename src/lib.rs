// Termport - Taxonomy translation export and import
// Copyright (c) 2025 Termport Contributors
// Licensed under the MIT License

//! # Termport - Taxonomy translation export and import
//!
//! Termport exports the translations of a taxonomy vocabulary to a
//! two-column CSV report and imports edited reports back into the site.
//!
//! ## Overview
//!
//! - **Export** walks a vocabulary in tree order and writes one
//!   `Original Name,Translated Name` row per term translated into the
//!   chosen language, to `public://taxonomy_report_logs/`
//! - **Import** reads the same format and saves each translated name on
//!   the terms whose source name matches
//! - Both run as batches: one operation per term or row, progress after
//!   every step, a finisher that reports what happened
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Batch runner, export and import pipelines
//! - [`adapters`] - Taxonomy storage (JSON snapshot, PostgreSQL), public
//!   file system, user messages
//! - [`domain`] - Identifiers, taxonomy models and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use termport::adapters::files::LocalPublicFileSystem;
//! use termport::adapters::messenger::ConsoleMessenger;
//! use termport::adapters::taxonomy::create_storage_and_languages;
//! use termport::config::load_config;
//! use termport::core::export::{ExportCoordinator, ExportReport};
//! use termport::domain::{LangCode, VocabularyId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("termport.toml")?;
//!     let (storage, languages) = create_storage_and_languages(&config).await?;
//!
//!     let coordinator = ExportCoordinator::new(
//!         storage,
//!         languages,
//!         Arc::new(LocalPublicFileSystem::from_config(&config.files)),
//!         Arc::new(ConsoleMessenger),
//!         config.export.clone(),
//!     );
//!
//!     let run = coordinator
//!         .run(&VocabularyId::new("tags")?, &LangCode::new("fr")?, None)
//!         .await?;
//!     if let ExportReport::Written { real_path, rows, .. } = run.output {
//!         println!("Wrote {rows} rows to {}", real_path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error is
//! [`domain::TermportError`]. Taxonomy lookups fail with
//! [`domain::TaxonomyError`], which converts with `?`.
//!
//! Problems with a single term do not abort a batch: an export step
//! records a skip and an import row records a failure. The finisher turns
//! these into status, warning and error messages.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
