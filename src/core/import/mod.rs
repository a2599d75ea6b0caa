//! Translation import
//!
//! Reads a file in the export format and writes each translated name back
//! to the terms of the selected vocabulary that carry the original name.

pub mod coordinator;
pub mod finalizer;
pub mod job;
pub mod reader;

pub use coordinator::ImportCoordinator;
pub use finalizer::{ImportFinalizer, ImportReport};
pub use job::{ImportCounts, ImportRecord, ImportResults, ImportRowOperation, ImportSkip, RowOutcome};
pub use reader::{read_translation_file, read_translations, ImportRow};
