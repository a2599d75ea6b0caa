//! Translation export
//!
//! - [`selector`] lists the terms of a vocabulary in tree order
//! - [`job`] turns one term into an optional CSV row
//! - [`finalizer`] writes the rows to `public://` and notifies the user
//! - [`coordinator`] wires them into a batch

pub mod coordinator;
pub mod finalizer;
pub mod job;
pub mod selector;

pub use coordinator::ExportCoordinator;
pub use finalizer::{ExportFinalizer, ExportReport, CSV_HEADER};
pub use job::{ExportResults, ExportRow, ExportTermOperation, SkipBreakdown, SkipReason, StepOutcome};
pub use selector::TermSelector;
