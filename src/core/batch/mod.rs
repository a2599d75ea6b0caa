//! Long-running job execution
//!
//! Jobs are expressed as a [`Batch`] of operations sharing a
//! [`BatchContext`], run one after another by a [`BatchRunner`].

pub mod runner;

pub use runner::{
    Batch, BatchContext, BatchFinished, BatchOperation, BatchProgress, BatchRun, BatchRunner,
    BatchState, ProgressCallback, DEFAULT_INIT_MESSAGE, DEFAULT_PROGRESS_MESSAGE,
};
